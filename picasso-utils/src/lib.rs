//! Common helpers shared across the picasso crates.

/// Hex colour parsing for the decoration palette.
pub mod color;
/// Application configuration and settings management.
pub mod config;
/// Image decoding, proportional resizing and compositing primitives.
pub mod image_utils;
/// JPEG encoding and persistence.
pub mod output;
/// Directory scanning for source photos and decoration assets.
pub mod scan;
/// Instrumentation helpers for optional performance tracing.
pub mod telemetry;

use std::path::Path;

use anyhow::Result;
use log::LevelFilter;

pub use color::RgbColor;
pub use config::AppSettings;
pub use image_utils::{
    PixelRect, composite_resized, draw_filled_ellipse, load_image, proportional_height, resize_proportional,
};
pub use output::{encode_jpeg, save_jpeg};
pub use scan::{FileFilter, collect_files};
pub use telemetry::{
    TimingGuard, configure as configure_telemetry, telemetry_allows, telemetry_enabled,
    timing_guard,
};

/// Initialize logging once for the CLI and for tests.
///
/// This function respects the `RUST_LOG` environment variable if it is set.
/// Otherwise, it falls back to the provided default filter level.
pub fn init_logging(default_filter: LevelFilter) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter.as_str()),
    );
    builder.filter_module("picasso::telemetry", LevelFilter::Trace);

    if builder.try_init().is_err() {
        // Logger already initialized; nothing to do.
    }
    Ok(())
}

/// Validate that a path exists and resolve it to an absolute path.
pub fn normalize_path<P: AsRef<Path>>(path: P) -> Result<std::path::PathBuf> {
    let path = path.as_ref();
    anyhow::ensure!(path.exists(), "path does not exist: {}", path.display());
    Ok(path.canonicalize()?)
}
