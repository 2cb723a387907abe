//! Decoration assets loaded once per run and shared read-only by every image.

use std::{num::NonZeroUsize, path::Path};

use image::RgbaImage;
use log::{debug, info};
use picasso_utils::{FileFilter, RgbColor, collect_files, load_image};
use rayon::prelude::*;

use crate::error::SetupError;

/// A decoded mask image.
#[derive(Debug, Clone)]
pub struct DecorationAsset {
    pub name: String,
    pub image: RgbaImage,
}

/// Mask images and the colour-dot palette. Both pools are guaranteed non-empty.
#[derive(Debug, Clone)]
pub struct DecorationCatalog {
    masks: Vec<DecorationAsset>,
    palette: Vec<RgbColor>,
}

impl DecorationCatalog {
    /// Build a catalog from already decoded masks.
    pub fn new(masks: Vec<DecorationAsset>, palette: Vec<RgbColor>) -> Result<Self, SetupError> {
        if palette.is_empty() {
            return Err(SetupError::EmptyPalette);
        }
        if masks.is_empty() {
            return Err(SetupError::NoMasks);
        }
        Ok(Self { masks, palette })
    }

    /// Decode every `<prefix>*.png` directly inside `dir`, in sorted file-name order.
    ///
    /// Masks are decoded in parallel; the first failure aborts loading.
    pub fn load(dir: &Path, prefix: &str, palette: &[RgbColor]) -> Result<Self, SetupError> {
        let filter = FileFilter::with_extensions(&["png"]).prefix(prefix);
        let paths = collect_files(dir, &filter).map_err(|err| SetupError::ScanFailed {
            dir: dir.to_path_buf(),
            reason: format!("{err:#}"),
        })?;
        if paths.is_empty() {
            return Err(SetupError::EmptyCatalog {
                dir: dir.to_path_buf(),
                pattern: format!("{prefix}*.png"),
            });
        }

        let masks = paths
            .par_iter()
            .map(|path| {
                let image = load_image(path).map_err(|err| SetupError::MaskLoad {
                    path: path.clone(),
                    reason: format!("{err:#}"),
                })?;
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                debug!("Loaded mask {name} ({}x{})", image.width(), image.height());
                Ok(DecorationAsset {
                    name,
                    image: image.to_rgba8(),
                })
            })
            .collect::<Result<Vec<_>, SetupError>>()?;

        let catalog = Self::new(masks, palette.to_vec())?;
        info!(
            "Loaded {} mask(s) from {} and {} palette colour(s)",
            catalog.masks.len(),
            dir.display(),
            catalog.palette.len()
        );
        Ok(catalog)
    }

    pub fn masks(&self) -> &[DecorationAsset] {
        &self.masks
    }

    pub fn palette(&self) -> &[RgbColor] {
        &self.palette
    }

    pub fn mask_pool(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.masks.len()).unwrap_or(NonZeroUsize::MIN)
    }

    pub fn palette_pool(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.palette.len()).unwrap_or(NonZeroUsize::MIN)
    }
}
