use std::{io, path::PathBuf};

use thiserror::Error;

use crate::detector::DetectionError;

/// Fatal problems found while preparing a batch. Nothing has been decoded yet when
/// one of these is returned.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no decoration masks matching '{pattern}' found in {}", dir.display())]
    EmptyCatalog { dir: PathBuf, pattern: String },

    #[error("no source images (*.jpg, *.jpeg) found in {}", dir.display())]
    NoSourceImages { dir: PathBuf },

    #[error("failed to scan {}: {reason}", dir.display())]
    ScanFailed { dir: PathBuf, reason: String },

    #[error("failed to load mask {}: {reason}", path.display())]
    MaskLoad { path: PathBuf, reason: String },

    #[error("decoration catalog has no masks")]
    NoMasks,

    #[error("decoration palette is empty")]
    EmptyPalette,

    #[error("{name} must be greater than zero")]
    InvalidWidth { name: &'static str },

    #[error("failed to create output directory {}: {source}", dir.display())]
    OutputDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to load face detection model {}: {reason}", path.display())]
    DetectorModel { path: PathBuf, reason: String },

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Failure confined to a single source image. The batch carries on without it.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("failed to resize: {reason}")]
    Resize { reason: String },

    #[error(transparent)]
    Detection(#[from] DetectionError),

    #[error("failed to save {}: {reason}", path.display())]
    Save { path: PathBuf, reason: String },
}

impl PipelineError {
    /// Short name of the step that failed, for logs and reports.
    pub fn step(&self) -> &'static str {
        match self {
            PipelineError::Decode { .. } => "decode",
            PipelineError::Resize { .. } => "resize",
            PipelineError::Detection(_) => "detect",
            PipelineError::Save { .. } => "save",
        }
    }
}
