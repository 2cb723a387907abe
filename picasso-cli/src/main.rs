mod args;
mod config;

use std::{
    fs::{self, File},
    path::Path,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info, warn};
use picasso_core::{BatchConfig, BatchReport, BatchRunner, ImageOutcome, RustfaceDetector};
use picasso_utils::{configure_telemetry, init_logging};

use crate::{
    args::RunArgs,
    config::{apply_cli_overrides, load_settings},
};

fn main() -> Result<()> {
    init_logging(LevelFilter::Info)?;
    let args = RunArgs::parse();

    let mut settings = load_settings(args.config.as_ref())?;
    apply_cli_overrides(&mut settings, &args);
    configure_telemetry(
        settings.telemetry.enabled,
        settings.telemetry.level_filter(),
    );

    if let Some(path) = args.save_config.as_ref() {
        ensure_parent_dir(path)?;
        settings.save_to_path(path)?;
        info!("Saved resolved settings to {}", path.display());
    }

    info!(
        "picasso {}: masks from {}, photos from {}",
        picasso_core::version(),
        settings.paths.masks_dir.display(),
        settings.paths.input_dir.display()
    );
    let runner = BatchRunner::prepare(BatchConfig::from_settings(&settings))?;

    let model_path = &settings.detector.model_path;
    info!("Loading SeetaFace model from {}", model_path.display());
    let detector = RustfaceDetector::from_path(
        model_path,
        settings.detector.score_threshold,
        settings.detector.slide_window_step,
    )?;

    let report = runner.run(&detector);
    log_failures(&report);

    if let Some(report_path) = args.report.as_ref() {
        write_report(report_path, &report)?;
    }

    info!(
        "Processed {} photo(s): {} saved, {} skipped, {} failed",
        report.total(),
        report.saved,
        report.skipped,
        report.failed
    );
    Ok(())
}

fn log_failures(report: &BatchReport) {
    for record in &report.images {
        match &record.outcome {
            ImageOutcome::Saved { .. } => {}
            ImageOutcome::Skipped { reason } => {
                warn!("#{} {} skipped: {reason}", record.sequence, record.source.display());
            }
            ImageOutcome::Failed { step, error } => {
                warn!(
                    "#{} {} failed at {step}: {error}",
                    record.sequence,
                    record.source.display()
                );
            }
        }
    }
}

fn write_report(path: &Path, report: &BatchReport) -> Result<()> {
    ensure_parent_dir(path)?;
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, report)
        .with_context(|| format!("failed to write batch report to {}", path.display()))?;
    info!("Wrote batch report to {}", path.display());
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }
    Ok(())
}
