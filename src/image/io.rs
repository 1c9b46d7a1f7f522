//! Convenience helpers for loading images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::OwnedImage;
use crate::render::RgbCanvas;
use crate::util::{GlyphGroupError, GlyphGroupResult};
use std::path::Path;

/// Creates an owned image from a grayscale image buffer.
pub fn owned_from_gray_image(img: &image::GrayImage) -> GlyphGroupResult<OwnedImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    OwnedImage::new(img.as_raw().clone(), width, height)
}

/// Loads an image from disk and converts it to a grayscale owned image.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> GlyphGroupResult<OwnedImage> {
    let img = image::open(path).map_err(|err| GlyphGroupError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_gray_image(&img.to_luma8())
}

/// Writes a rendered canvas to disk; the format follows the file extension.
pub fn save_canvas<P: AsRef<Path>>(canvas: &RgbCanvas, path: P) -> GlyphGroupResult<()> {
    let width = u32::try_from(canvas.width()).map_err(|_| GlyphGroupError::InvalidDimensions {
        width: canvas.width(),
        height: canvas.height(),
    })?;
    let height =
        u32::try_from(canvas.height()).map_err(|_| GlyphGroupError::InvalidDimensions {
            width: canvas.width(),
            height: canvas.height(),
        })?;
    let buffer = image::RgbImage::from_raw(width, height, canvas.as_bytes().to_vec()).ok_or(
        GlyphGroupError::BufferTooSmall {
            needed: canvas.width() * canvas.height() * 3,
            got: canvas.as_bytes().len(),
        },
    )?;
    buffer.save(path).map_err(|err| GlyphGroupError::ImageIo {
        reason: err.to_string(),
    })
}
