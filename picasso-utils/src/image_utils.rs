use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, Rgba, RgbaImage, imageops, imageops::FilterType};
use imageproc::drawing::draw_filled_ellipse_mut;
use serde::Serialize;

/// Axis-aligned rectangle in pixel space. The origin may be negative or lie beyond
/// the canvas; consumers clip against the image they draw on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole `width` x `height` image.
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Clip the rectangle to a `width` x `height` canvas, returning `None` when
    /// nothing of it remains visible.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<PixelRect> {
        let x1 = self.x.max(0);
        let y1 = self.y.max(0);
        let x2 = (self.x + i64::from(self.width)).min(i64::from(width));
        let y2 = (self.y + i64::from(self.height)).min(i64::from(height));
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(PixelRect::new(x1, y1, (x2 - x1) as u32, (y2 - y1) as u32))
    }
}

/// Load an image from disk into memory.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path_ref = path.as_ref();
    image::open(path_ref).with_context(|| format!("failed to open image {}", path_ref.display()))
}

/// Height that keeps the aspect ratio of a `width` x `height` image scaled to
/// `target_width`, rounded to the nearest pixel and never below one.
pub fn proportional_height(width: u32, height: u32, target_width: u32) -> Result<u32> {
    anyhow::ensure!(
        width > 0 && height > 0,
        "source dimensions must be non-zero (got {width}x{height})"
    );
    anyhow::ensure!(target_width > 0, "target width must be non-zero");
    let scaled = (f64::from(height) * f64::from(target_width) / f64::from(width)).round();
    Ok((scaled as u32).max(1))
}

/// Resize `image` to `target_width`, keeping its aspect ratio.
///
/// Uses Lanczos resampling so faces stay free of aliasing in both directions.
pub fn resize_proportional(image: &RgbaImage, target_width: u32) -> Result<RgbaImage> {
    let (width, height) = image.dimensions();
    let target_height = proportional_height(width, height, target_width)?;
    if (target_width, target_height) == (width, height) {
        return Ok(image.clone());
    }
    Ok(imageops::resize(
        image,
        target_width,
        target_height,
        FilterType::Lanczos3,
    ))
}

/// Scale the `src_rect` part of `src` to the size of `dst_rect` and blend it onto `dst`.
///
/// Opaque source pixels replace the destination; translucent ones are alpha-blended.
/// Parts of `dst_rect` outside the canvas are silently clipped.
pub fn composite_resized(
    dst: &mut RgbaImage,
    src: &RgbaImage,
    dst_rect: PixelRect,
    src_rect: PixelRect,
) {
    if dst_rect.is_empty() || dst_rect.clip_to(dst.width(), dst.height()).is_none() {
        return;
    }
    let Some(source) = src_rect.clip_to(src.width(), src.height()) else {
        return;
    };

    let region = imageops::crop_imm(
        src,
        source.x as u32,
        source.y as u32,
        source.width,
        source.height,
    )
    .to_image();
    let scaled = if region.dimensions() == (dst_rect.width, dst_rect.height) {
        region
    } else {
        imageops::resize(
            &region,
            dst_rect.width,
            dst_rect.height,
            FilterType::Triangle,
        )
    };
    imageops::overlay(dst, &scaled, dst_rect.x, dst_rect.y);
}

/// Fill an axis-aligned ellipse of the given outer `width` and `height` centred on `center`.
pub fn draw_filled_ellipse(
    image: &mut RgbaImage,
    center: (i32, i32),
    width: u32,
    height: u32,
    color: Rgba<u8>,
) {
    let width_radius = (width / 2) as i32;
    let height_radius = (height / 2) as i32;
    if width_radius == 0 || height_radius == 0 {
        return;
    }
    draw_filled_ellipse_mut(image, center, width_radius, height_radius, color);
}
