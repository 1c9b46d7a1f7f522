//! Global binarization helpers.
//!
//! Pixels strictly above the level become 255 (or 0 when inverted); the rest
//! become the opposite value.

use crate::image::{ImageView, OwnedImage};
use crate::util::GlyphGroupResult;

/// Binarizes `src` against a fixed `level`.
pub fn binarize(src: ImageView<'_, u8>, level: u8, invert: bool) -> GlyphGroupResult<OwnedImage> {
    let (above, below) = if invert { (0u8, 255u8) } else { (255u8, 0u8) };
    let mut data = Vec::with_capacity(src.width() * src.height());
    for y in 0..src.height() {
        if let Some(row) = src.row(y) {
            data.extend(row.iter().map(|&v| if v > level { above } else { below }));
        }
    }
    OwnedImage::new(data, src.width(), src.height())
}

/// Computes the Otsu level maximizing between-class variance.
pub fn otsu_level(src: ImageView<'_, u8>) -> u8 {
    let mut histogram = [0u64; 256];
    for y in 0..src.height() {
        if let Some(row) = src.row(y) {
            for &v in row {
                histogram[v as usize] += 1;
            }
        }
    }

    let total: u64 = histogram.iter().sum();
    let sum_all: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut weight_bg = 0u64;
    let mut sum_bg = 0.0f64;
    let mut best_level = 0u8;
    let mut best_var = -1.0f64;
    for (level, &count) in histogram.iter().enumerate() {
        weight_bg += count;
        if weight_bg == 0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0 {
            break;
        }
        sum_bg += level as f64 * count as f64;
        let mean_bg = sum_bg / weight_bg as f64;
        let mean_fg = (sum_all - sum_bg) / weight_fg as f64;
        let var = weight_bg as f64 * weight_fg as f64 * (mean_bg - mean_fg).powi(2);
        if var > best_var {
            best_var = var;
            best_level = level as u8;
        }
    }
    best_level
}

/// Binarizes `src` at its Otsu level.
pub fn binarize_otsu(src: ImageView<'_, u8>, invert: bool) -> GlyphGroupResult<OwnedImage> {
    binarize(src, otsu_level(src), invert)
}
