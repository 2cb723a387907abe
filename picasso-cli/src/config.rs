//! Configuration loading and CLI override logic.

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, warn};
use picasso_utils::{
    RgbColor,
    config::{AppSettings, default_settings_path},
    normalize_path,
};

use crate::args::RunArgs;

/// Load application settings from a file or use defaults.
pub fn load_settings(config_path: Option<&PathBuf>) -> Result<AppSettings> {
    if let Some(path) = config_path {
        let resolved = normalize_path(path)?;
        let settings = AppSettings::load_from_path(&resolved)?;
        info!("Loaded settings from {}", resolved.display());
        Ok(settings)
    } else {
        let default_path = default_settings_path();
        if default_path.exists() {
            let settings = AppSettings::load_from_path(&default_path).with_context(|| {
                format!(
                    "failed to load default settings from {}",
                    default_path.display()
                )
            })?;
            info!("Loaded settings from {}", default_path.display());
            Ok(settings)
        } else {
            Ok(AppSettings::default())
        }
    }
}

/// Apply command-line arguments to override loaded or default settings.
pub fn apply_cli_overrides(settings: &mut AppSettings, args: &RunArgs) {
    if args.telemetry {
        settings.telemetry.enabled = true;
    }
    if let Some(level) = args.telemetry_level.as_ref() {
        let normalized = level.trim();
        if !normalized.is_empty() {
            let lower = normalized.to_ascii_lowercase();
            settings.telemetry.level = lower.clone();
            if lower == "off" {
                settings.telemetry.enabled = false;
            }
        }
    }

    if let Some(dir) = args.masks.as_ref() {
        settings.paths.masks_dir = dir.clone();
    }
    if let Some(prefix) = args.mask_prefix.as_ref() {
        settings.paths.mask_prefix = prefix.clone();
    }
    if let Some(dir) = args.input.as_ref() {
        settings.paths.input_dir = dir.clone();
    }
    if let Some(dir) = args.output.as_ref() {
        settings.paths.output_dir = dir.clone();
    }
    if let Some(model) = args.model.as_ref() {
        settings.detector.model_path = model.clone();
    }
    if let Some(score) = args.score_threshold {
        settings.detector.score_threshold = score;
    }

    if let Some(width) = args.detection_width {
        settings.resize.detection_width = width;
    }
    if let Some(width) = args.output_width {
        settings.resize.output_width = width;
    }

    if !args.palette.is_empty() {
        let palette = parse_palette_args(&args.palette);
        if palette.is_empty() {
            warn!("No valid --palette colours given; keeping the configured palette");
        } else {
            settings.palette = palette;
        }
    }

    if let Some(workers) = args.workers {
        settings.batch.workers = workers;
    }
    if let Some(seed) = args.seed {
        settings.batch.seed = Some(seed);
    }
}

fn parse_palette_args(entries: &[String]) -> Vec<RgbColor> {
    entries
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse::<RgbColor>() {
            Ok(color) => Some(color),
            Err(err) => {
                warn!("Ignoring palette entry '{entry}': {err}");
                None
            }
        })
        .collect()
}
