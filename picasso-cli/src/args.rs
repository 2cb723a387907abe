//! Command-line argument definitions for the picasso binary.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Cover every face in a folder of photos with a random mask or colour dot.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct RunArgs {
    /// Directory holding the decoration masks (`<prefix>*.png`).
    #[arg(long, value_name = "DIR")]
    pub masks: Option<PathBuf>,

    /// File-name prefix that marks a PNG as a mask (default: `mask`).
    #[arg(long, value_name = "PREFIX")]
    pub mask_prefix: Option<String>,

    /// Directory scanned for source photos (`*.jpg`, `*.jpeg`).
    #[arg(short, long, value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Directory receiving the stylized JPEGs; created if missing.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Path to the SeetaFace frontal detection model.
    #[arg(short, long, value_name = "FILE")]
    pub model: Option<PathBuf>,

    /// Optional settings JSON. Defaults to `config/picasso.json` when present, otherwise built-in parameters.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the fully resolved settings (file + flags) to this JSON path.
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,

    /// Width of the first resize pass, used for detection and compositing.
    #[arg(long)]
    pub detection_width: Option<u32>,

    /// Width of the saved output images.
    #[arg(long)]
    pub output_width: Option<u32>,

    /// Override the detector's minimum window score.
    #[arg(long)]
    pub score_threshold: Option<f64>,

    /// Colour-dot palette as comma-separated hex colours, e.g. `#ff0000,#00ff00`.
    #[arg(long, value_delimiter = ',', value_name = "HEX")]
    pub palette: Vec<String>,

    /// Number of photos processed concurrently (0 = one per core).
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Seed every random choice for reproducible output.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Enable telemetry timing logs (defaults to settings file).
    #[arg(long, action = ArgAction::SetTrue)]
    pub telemetry: bool,

    /// Override telemetry logging level (error, warn, info, debug, trace).
    #[arg(long, value_name = "LEVEL")]
    pub telemetry_level: Option<String>,

    /// Write a JSON report of every processed photo to this path.
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}
