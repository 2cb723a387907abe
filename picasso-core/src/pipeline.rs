//! Per-image pipeline: decode, detection-width resize, detect, decorate, stylization
//! downscale and save.

use std::path::{Path, PathBuf};

use image::{RgbaImage, imageops};
use log::{Level, debug, trace};
use picasso_utils::{load_image, resize_proportional, save_jpeg, timing_guard};
use rand::Rng;

use crate::{
    catalog::DecorationCatalog,
    detector::{DetectionOptions, FaceDetector, FaceRegion},
    error::PipelineError,
    placement::{AppliedDecoration, PlacementEngine},
};

/// Highest JPEG quality a save may draw. Low values are deliberate: the blocky
/// compression is part of the look.
pub const MAX_QUALITY: u8 = 10;

/// Settings shared by every image of a batch.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Width of the first resize pass, the one the detector sees.
    pub detection_width: u32,
    /// Width of the saved image.
    pub output_width: u32,
    pub output_dir: PathBuf,
    pub detection: DetectionOptions,
}

/// One source photo and its 1-based position in the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceJob {
    pub source: PathBuf,
    pub sequence: usize,
}

/// Result of running the in-memory part of the pipeline.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub image: RgbaImage,
    pub faces: Vec<FaceRegion>,
    pub decorations: Vec<AppliedDecoration>,
}

/// What was written for one source photo.
#[derive(Debug, Clone)]
pub struct SavedImage {
    pub output: PathBuf,
    pub quality: u8,
    pub width: u32,
    pub height: u32,
    pub faces: usize,
    pub decorations: Vec<AppliedDecoration>,
}

pub struct ImagePipeline<'a> {
    catalog: &'a DecorationCatalog,
    detector: &'a dyn FaceDetector,
    config: &'a PipelineConfig,
}

impl<'a> ImagePipeline<'a> {
    pub fn new(
        catalog: &'a DecorationCatalog,
        detector: &'a dyn FaceDetector,
        config: &'a PipelineConfig,
    ) -> Self {
        Self {
            catalog,
            detector,
            config,
        }
    }

    /// Resize, detect and decorate `source`, then downscale it to the output width.
    ///
    /// An image without faces only goes through the two resize passes.
    pub fn render<R: Rng + ?Sized>(
        &self,
        source: &RgbaImage,
        rng: &mut R,
    ) -> Result<RenderedImage, PipelineError> {
        let mut working =
            resize_proportional(source, self.config.detection_width).map_err(resize_error)?;
        trace!("Resized to {}x{}", working.width(), working.height());

        let faces = {
            let _guard = timing_guard("picasso_core::detect", Level::Debug);
            let luma = imageops::grayscale(&working);
            self.detector.detect(&luma, &self.config.detection)?
        };
        debug!("Detected {} face(s)", faces.len());

        let decorations = if faces.is_empty() {
            Vec::new()
        } else {
            let _guard = timing_guard("picasso_core::decorate", Level::Debug);
            PlacementEngine::new(self.catalog).decorate(&mut working, &faces, rng)
        };

        let image =
            resize_proportional(&working, self.config.output_width).map_err(resize_error)?;
        Ok(RenderedImage {
            image,
            faces,
            decorations,
        })
    }

    /// Run the whole pipeline for one source photo and write the result.
    pub fn process<R: Rng + ?Sized>(
        &self,
        job: &SourceJob,
        rng: &mut R,
    ) -> Result<SavedImage, PipelineError> {
        let source = {
            let _guard = timing_guard("picasso_core::decode", Level::Debug);
            load_image(&job.source)
                .map_err(|err| PipelineError::Decode {
                    path: job.source.clone(),
                    reason: format!("{err:#}"),
                })?
                .to_rgba8()
        };

        let rendered = self.render(&source, rng)?;
        drop(source);

        let quality = rng.random_range(0..=MAX_QUALITY);
        let output = self.output_path(job);
        {
            let _guard = timing_guard("picasso_core::save", Level::Debug);
            save_jpeg(&rendered.image, &output, quality.max(1)).map_err(|err| {
                PipelineError::Save {
                    path: output.clone(),
                    reason: format!("{err:#}"),
                }
            })?;
        }

        Ok(SavedImage {
            output,
            quality,
            width: rendered.image.width(),
            height: rendered.image.height(),
            faces: rendered.faces.len(),
            decorations: rendered.decorations,
        })
    }

    /// `<output_dir>/<stem>-<sequence:04>.jpg`.
    pub fn output_path(&self, job: &SourceJob) -> PathBuf {
        self.config
            .output_dir
            .join(output_file_name(&job.source, job.sequence))
    }
}

/// File name for the output of `source`; unique as long as sequence numbers are.
pub fn output_file_name(source: &Path, sequence: usize) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "image".to_string());
    format!("{stem}-{sequence:04}.jpg")
}

fn resize_error(err: anyhow::Error) -> PipelineError {
    PipelineError::Resize {
        reason: format!("{err:#}"),
    }
}
