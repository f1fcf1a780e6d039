//! Synthetic photos for running the booth without a camera.

use crate::capability::ImageHandle;
use crate::errors::BoothError;
use image::{Rgb, RgbImage};
use std::path::Path;

/// Webcam-like still size used by the fakes.
pub const SYNTHETIC_PHOTO_SIZE: (u32, u32) = (640, 480);

/// A gradient frame whose tint changes with `index`, so composed strips show
/// which photo landed in which slot.
pub fn synthetic_frame(index: usize, width: u32, height: u32) -> RgbImage {
    let base = (index as u32 * 53 % 256) as u8;
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            base.wrapping_add((x % 256) as u8),
            base.wrapping_add((y % 256) as u8),
            base.wrapping_add(((x + y) % 256) as u8),
        ])
    })
}

/// Writes a synthetic JPEG into `dir` and returns its `file://` URI.
pub fn synthetic_photo(dir: &Path, index: usize) -> Result<String, BoothError> {
    std::fs::create_dir_all(dir)?;
    let (width, height) = SYNTHETIC_PHOTO_SIZE;
    let path = dir.join(format!("synthetic_{}_{}.jpg", index, uuid::Uuid::new_v4().simple()));
    synthetic_frame(index, width, height).save_with_format(&path, image::ImageFormat::Jpeg)?;
    Ok(ImageHandle::from_path(&path).uri)
}
