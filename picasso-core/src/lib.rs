//! Face-to-decoration pipeline.
//!
//! This crate finds faces in photos, covers each one with a randomly chosen mask or
//! colour dot, and writes stylized, downscaled JPEGs. The face detector is pluggable
//! through [`FaceDetector`]; [`RustfaceDetector`] is the bundled SeetaFace backend.

/// Non-repeating random index draws.
pub mod allocator;
/// Directory-wide batch setup and bounded parallel execution.
pub mod batch;
/// Mask images and colour palette shared by every image of a run.
pub mod catalog;
/// Face detector seam and the rustface backend.
pub mod detector;
/// Setup and per-image error types.
pub mod error;
/// Per-image processing steps.
pub mod pipeline;
/// Decoration choice and geometry.
pub mod placement;
/// Per-image random generators.
pub mod random;

pub use allocator::UniqueIndexAllocator;
pub use batch::{BatchConfig, BatchReport, BatchRunner, ImageOutcome, ImageRecord};
pub use catalog::{DecorationAsset, DecorationCatalog};
pub use detector::{DetectionError, DetectionOptions, FaceDetector, FaceRegion, RustfaceDetector};
pub use error::{PipelineError, SetupError};
pub use pipeline::{ImagePipeline, PipelineConfig, RenderedImage, SavedImage, SourceJob};
pub use placement::{AppliedDecoration, DecorationChoice, DecorationKind, PlacementEngine};
pub use random::SeedPolicy;

/// Returns the crate version for diagnostics.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
