//! Face detection seam and the SeetaFace-backed implementation.

use std::{fs::File, io::BufReader, path::Path};

use image::GrayImage;
use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::error::SetupError;

/// Parameters handed to a [`FaceDetector`] for every image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionOptions {
    /// Growth factor between successive search scales (> 1.0).
    pub scale_factor: f32,
    /// Overlapping hits a candidate needs before it counts as a face.
    pub min_neighbors: u32,
    /// Smallest face, in pixels, worth reporting.
    pub min_size: (u32, u32),
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            scale_factor: 1.3,
            min_neighbors: 3,
            min_size: (80, 80),
        }
    }
}

/// Axis-aligned rectangle believed to contain a face, in the coordinate space of the
/// image that was handed to the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaceRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl FaceRegion {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Integer centre of the region.
    pub fn center(&self) -> (i32, i32) {
        (
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }
}

/// Failure of the detection step itself. An image without faces is not an error.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("image has zero dimensions")]
    EmptyImage,
    #[error("face detector failed: {0}")]
    Backend(String),
}

/// Pluggable face detection backend.
///
/// Implementations receive an 8-bit luma image and return every face they find, in
/// any order. They are shared across worker threads, hence `Send + Sync`.
pub trait FaceDetector: Send + Sync {
    fn detect(
        &self,
        image: &GrayImage,
        options: &DetectionOptions,
    ) -> Result<Vec<FaceRegion>, DetectionError>;
}

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// The model is read once; each call builds a fresh detector from a clone of it
/// because `rustface` detectors are stateful and not `Sync`.
pub struct RustfaceDetector {
    model: rustface::Model,
    score_threshold: f64,
    window_step: u32,
}

impl RustfaceDetector {
    /// Load a SeetaFace frontal model from `path`.
    pub fn from_path(
        path: &Path,
        score_threshold: f64,
        window_step: u32,
    ) -> Result<Self, SetupError> {
        let model_error = |reason: String| SetupError::DetectorModel {
            path: path.to_path_buf(),
            reason,
        };
        let file = File::open(path).map_err(|e| model_error(e.to_string()))?;
        let model =
            rustface::read_model(BufReader::new(file)).map_err(|e| model_error(e.to_string()))?;
        Ok(Self {
            model,
            score_threshold,
            window_step: window_step.max(1),
        })
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(
        &self,
        image: &GrayImage,
        options: &DetectionOptions,
    ) -> Result<Vec<FaceRegion>, DetectionError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(DetectionError::EmptyImage);
        }
        let min_face = options.min_size.0.max(options.min_size.1);
        if width < min_face || height < min_face {
            return Ok(Vec::new());
        }
        if options.scale_factor <= 1.0 {
            return Err(DetectionError::Backend(format!(
                "scale factor must exceed 1.0, got {}",
                options.scale_factor
            )));
        }

        // SeetaFace merges overlapping windows itself; there is no neighbour count to tune.
        debug!(
            "rustface ignores min_neighbors={} (windows are merged internally)",
            options.min_neighbors
        );

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(min_face);
        detector.set_score_thresh(self.score_threshold);
        detector.set_pyramid_scale_factor(1.0 / options.scale_factor);
        detector.set_slide_window_step(self.window_step, self.window_step);

        let faces = detector.detect(&rustface::ImageData::new(image.as_raw(), width, height));

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceRegion::new(bbox.x(), bbox.y(), bbox.width(), bbox.height())
            })
            .collect())
    }
}
