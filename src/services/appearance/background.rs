use std::borrow::Cow;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbaImage;

use thiserror::Error;

use crate::models::settings::BackgroundImage;

#[derive(Debug, Error)]
#[error("failed to load image {}", path.display())]
pub struct ImageLoadError {
    pub path: PathBuf,
    #[source]
    pub source: image::ImageError,
}

/// Reads and decodes a background picture into RGBA8 pixels.
pub fn load_background_image(path: &Path) -> Result<BackgroundImage, ImageLoadError> {
    let decoded = image::open(path).map_err(|source| ImageLoadError {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::debug!(
        "Decoded background image {} ({}x{})",
        path.display(),
        width,
        height
    );

    Ok(BackgroundImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

/// Shrinks `image` so neither side exceeds `max_side`, keeping its aspect
/// ratio. Returns `None` when the pixel buffer does not match the stated size.
pub fn fit_texture_side(
    image: &BackgroundImage,
    max_side: usize,
) -> Option<Cow<'_, BackgroundImage>> {
    let max_side = u32::try_from(max_side).unwrap_or(u32::MAX).max(1);
    if image.width <= max_side && image.height <= max_side {
        return Some(Cow::Borrowed(image));
    }

    let scale = max_side as f64 / image.width.max(image.height) as f64;
    let width = ((image.width as f64 * scale).round() as u32).clamp(1, max_side);
    let height = ((image.height as f64 * scale).round() as u32).clamp(1, max_side);
    let source = RgbaImage::from_raw(image.width, image.height, image.rgba.clone())?;
    let resized = imageops::resize(&source, width, height, FilterType::Triangle);
    log::debug!(
        "Downscaled background image {}x{} to {}x{}",
        image.width,
        image.height,
        width,
        height
    );

    Some(Cow::Owned(BackgroundImage {
        width,
        height,
        rgba: resized.into_raw(),
    }))
}
