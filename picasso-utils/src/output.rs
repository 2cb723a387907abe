//! JPEG export for finished images.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use image::{
    ExtendedColorType, ImageEncoder, RgbImage, RgbaImage, buffer::ConvertBuffer,
    codecs::jpeg::JpegEncoder,
};
use log::debug;

/// Encode `image` as a baseline JPEG. Alpha is dropped.
///
/// `quality` uses the libjpeg scale; zero is raised to one, the encoder's lowest setting.
pub fn encode_jpeg(image: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    let rgb: RgbImage = image.convert();
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .context("failed to encode JPEG")?;
    Ok(buffer)
}

/// Encode `image` and write it to `destination`, creating parent directories as needed.
pub fn save_jpeg(image: &RgbaImage, destination: &Path, quality: u8) -> Result<()> {
    if let Some(parent) = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty() && !p.exists())
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let payload = encode_jpeg(image, quality)?;
    debug!(
        "Writing {} bytes to {} (quality {quality})",
        payload.len(),
        destination.display()
    );
    let file = File::create(destination)
        .with_context(|| format!("failed to create {}", destination.display()))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&payload)
        .with_context(|| format!("failed to write {}", destination.display()))?;
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", destination.display()))?;
    Ok(())
}
