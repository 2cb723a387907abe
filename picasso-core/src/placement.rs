//! Decoration choice and geometry for detected faces.
//!
//! Every face independently gets either a solid colour dot centred on it or a mask
//! stretched over a rectangle that extends past the face on all sides. Indices into
//! the mask and colour pools come from per-image [`UniqueIndexAllocator`]s so one photo
//! shows as much variety as its pools allow.

use image::RgbaImage;
use log::debug;
use picasso_utils::{PixelRect, RgbColor, composite_resized, draw_filled_ellipse};
use rand::Rng;
use serde::Serialize;

use crate::{
    allocator::UniqueIndexAllocator,
    catalog::{DecorationAsset, DecorationCatalog},
    detector::FaceRegion,
};

/// Horizontal margin added on each side of a face before placing a mask.
pub const MASK_MARGIN_X: u32 = 40;
/// Vertical margin added above and below a face before placing a mask.
pub const MASK_MARGIN_Y: u32 = 70;
/// How much narrower than the face a colour dot is.
pub const DOT_INSET: u32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationKind {
    Mask,
    ColorDot,
}

/// What will be painted over one face.
#[derive(Debug, Clone, Copy)]
pub enum DecorationChoice<'a> {
    Mask {
        index: usize,
        asset: &'a DecorationAsset,
        rect: PixelRect,
    },
    ColorDot {
        index: usize,
        color: RgbColor,
        center: (i32, i32),
        diameter: u32,
    },
}

impl DecorationChoice<'_> {
    pub fn kind(&self) -> DecorationKind {
        match self {
            DecorationChoice::Mask { .. } => DecorationKind::Mask,
            DecorationChoice::ColorDot { .. } => DecorationKind::ColorDot,
        }
    }

    /// Bounding rectangle of the painted area, before clipping to the canvas.
    ///
    /// A dot is painted with radius `diameter / 2` around its centre pixel, so it spans
    /// `2 * (diameter / 2) + 1` pixels; even diameters come out one pixel wider.
    pub fn bounds(&self) -> PixelRect {
        match *self {
            DecorationChoice::Mask { rect, .. } => rect,
            DecorationChoice::ColorDot {
                center, diameter, ..
            } => {
                if diameter / 2 == 0 {
                    return PixelRect::new(i64::from(center.0), i64::from(center.1), 0, 0);
                }
                let radius = diameter / 2;
                let span = 2 * radius + 1;
                PixelRect::new(
                    i64::from(center.0) - i64::from(radius),
                    i64::from(center.1) - i64::from(radius),
                    span,
                    span,
                )
            }
        }
    }
}

/// Record of one decoration painted on an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppliedDecoration {
    pub kind: DecorationKind,
    /// Index into the mask list or the palette, depending on `kind`.
    pub index: usize,
    pub face: FaceRegion,
    pub bounds: PixelRect,
}

/// Rectangle a mask is stretched over: the face grown by the fixed margins.
pub fn mask_rect(face: &FaceRegion) -> PixelRect {
    PixelRect::new(
        i64::from(face.x) - i64::from(MASK_MARGIN_X),
        i64::from(face.y) - i64::from(MASK_MARGIN_Y),
        face.width + 2 * MASK_MARGIN_X,
        face.height + 2 * MASK_MARGIN_Y,
    )
}

/// Centre and diameter of the colour dot for a face.
pub fn dot_geometry(face: &FaceRegion) -> ((i32, i32), u32) {
    (face.center(), face.width.saturating_sub(DOT_INSET))
}

/// Chooses and paints decorations for the faces of a single image.
pub struct PlacementEngine<'a> {
    catalog: &'a DecorationCatalog,
    masks: UniqueIndexAllocator,
    colors: UniqueIndexAllocator,
}

impl<'a> PlacementEngine<'a> {
    /// Engine with fresh allocators; create one per image.
    pub fn new(catalog: &'a DecorationCatalog) -> Self {
        Self {
            catalog,
            masks: UniqueIndexAllocator::new(catalog.mask_pool()),
            colors: UniqueIndexAllocator::new(catalog.palette_pool()),
        }
    }

    /// Flip a fair coin between a colour dot and a mask, then draw from that pool.
    pub fn choose<R: Rng + ?Sized>(
        &mut self,
        face: &FaceRegion,
        rng: &mut R,
    ) -> DecorationChoice<'a> {
        if rng.random_bool(0.5) {
            let index = self.colors.next(rng);
            let (center, diameter) = dot_geometry(face);
            DecorationChoice::ColorDot {
                index,
                color: self.catalog.palette()[index],
                center,
                diameter,
            }
        } else {
            let index = self.masks.next(rng);
            DecorationChoice::Mask {
                index,
                asset: &self.catalog.masks()[index],
                rect: mask_rect(face),
            }
        }
    }

    /// Paint `choice` onto `canvas`. Anything outside the canvas is clipped.
    pub fn apply(canvas: &mut RgbaImage, choice: &DecorationChoice<'_>) {
        match *choice {
            DecorationChoice::Mask { asset, rect, .. } => {
                let source = PixelRect::full(asset.image.width(), asset.image.height());
                composite_resized(canvas, &asset.image, rect, source);
            }
            DecorationChoice::ColorDot {
                color,
                center,
                diameter,
                ..
            } => {
                if diameter == 0 {
                    debug!("Face at {center:?} too narrow for a colour dot; skipping");
                    return;
                }
                draw_filled_ellipse(canvas, center, diameter, diameter, color.to_rgba());
            }
        }
    }

    /// Choose and paint a decoration for every face, in the order given.
    pub fn decorate<R: Rng + ?Sized>(
        &mut self,
        canvas: &mut RgbaImage,
        faces: &[FaceRegion],
        rng: &mut R,
    ) -> Vec<AppliedDecoration> {
        faces
            .iter()
            .map(|face| {
                let choice = self.choose(face, rng);
                Self::apply(canvas, &choice);
                let applied = AppliedDecoration {
                    kind: choice.kind(),
                    index: match choice {
                        DecorationChoice::Mask { index, .. }
                        | DecorationChoice::ColorDot { index, .. } => index,
                    },
                    face: *face,
                    bounds: choice.bounds(),
                };
                debug!(
                    "Face {:?} -> {:?} #{} at {:?}",
                    face, applied.kind, applied.index, applied.bounds
                );
                applied
            })
            .collect()
    }
}
