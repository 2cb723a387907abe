//! Shared configuration types consumed by the picasso pipeline and CLI.
//!
//! Settings are grouped by concern and serialized to pretty JSON. Every section is
//! `#[serde(default)]` so partial files only override what they mention.

use crate::color::{RgbColor, default_palette};

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Where decorations and photos are read from and where results land.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathSettings {
    /// Directory holding the decoration masks.
    pub masks_dir: PathBuf,
    /// File-name prefix a PNG must carry to be treated as a mask.
    pub mask_prefix: String,
    /// Directory scanned for source JPEG photographs.
    pub input_dir: PathBuf,
    /// Directory receiving the stylized output images.
    pub output_dir: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            masks_dir: PathBuf::from("masks"),
            mask_prefix: "mask".to_string(),
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
        }
    }
}

/// Target widths for the two proportional resize passes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResizeSettings {
    /// Width used for detection and compositing.
    pub detection_width: u32,
    /// Width of the saved, stylized output.
    pub output_width: u32,
}

impl Default for ResizeSettings {
    fn default() -> Self {
        Self {
            detection_width: 1024,
            output_width: 512,
        }
    }
}

/// Tuning for the SeetaFace backend. Scale factor, neighbour count and minimum face
/// size are fixed by the pipeline and intentionally not exposed here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectorSettings {
    /// Path to the SeetaFace frontal model file.
    pub model_path: PathBuf,
    /// Minimum classifier score for a window to count as a face.
    pub score_threshold: f64,
    /// Horizontal and vertical step of the sliding window, in pixels.
    pub slide_window_step: u32,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/seeta_fd_frontal_v1.0.bin"),
            score_threshold: 2.0,
            slide_window_step: 4,
        }
    }
}

/// Worker pool and randomness controls.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct BatchSettings {
    /// Number of images processed concurrently. `0` means one per available core.
    pub workers: usize,
    /// Fixed seed for reproducible runs; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl BatchSettings {
    /// Resolve `workers` into a concrete, non-zero thread count.
    pub fn resolved_workers(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

/// Settings controlling optional runtime telemetry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TelemetrySettings {
    /// Whether telemetry timing logs are enabled.
    pub enabled: bool,
    /// Logging level for telemetry output (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "debug".to_string(),
        }
    }
}

impl TelemetrySettings {
    /// Resolve the configured level string into a `LevelFilter`.
    pub fn level_filter(&self) -> LevelFilter {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" | "warning" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Debug,
        }
    }
}

/// Persistent settings for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub paths: PathSettings,
    pub resize: ResizeSettings,
    pub detector: DetectorSettings,
    /// Colour pool for colour-dot decorations.
    pub palette: Vec<RgbColor>,
    pub batch: BatchSettings,
    pub telemetry: TelemetrySettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            paths: PathSettings::default(),
            resize: ResizeSettings::default(),
            detector: DetectorSettings::default(),
            palette: default_palette(),
            batch: BatchSettings::default(),
            telemetry: TelemetrySettings::default(),
        }
    }
}

impl AppSettings {
    /// Load settings from a JSON file.
    ///
    /// Missing sections fall back to their defaults; an empty palette is replaced by
    /// the default palette so a half-written file never disables colour dots.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let mut settings: AppSettings = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse settings JSON at {}", path.display()))?;

        if settings.palette.is_empty() {
            settings.palette = default_palette();
        }

        Ok(settings)
    }

    /// Serialize settings to disk in pretty-printed JSON, overwriting any existing file.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let payload =
            serde_json::to_string_pretty(self).context("failed to serialize settings JSON")?;
        fs::write(path, payload)
            .with_context(|| format!("failed to write settings file {}", path.display()))?;
        Ok(())
    }
}

/// Returns the default path for persisted settings (`config/picasso.json`).
pub fn default_settings_path() -> PathBuf {
    env::current_dir()
        .map(|dir| dir.join("config/picasso.json"))
        .unwrap_or_else(|_| PathBuf::from("config/picasso.json"))
}
