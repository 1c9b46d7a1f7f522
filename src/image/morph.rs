//! Morphological dilation with a rectangular structuring element.
//!
//! The anchor sits at `(kernel_width / 2, kernel_height / 2)`, so a 2x2 kernel
//! grows bright shapes down and to the right by one pixel. Pixels outside the
//! image do not contribute. The operation is separable: a horizontal running
//! max followed by a vertical one.

use crate::image::{ImageView, OwnedImage};
use crate::util::{GlyphGroupError, GlyphGroupResult};

/// Dilates `src` with a `kernel_width x kernel_height` rectangle.
pub fn dilate_rect(
    src: ImageView<'_, u8>,
    kernel_width: usize,
    kernel_height: usize,
) -> GlyphGroupResult<OwnedImage> {
    if kernel_width == 0 || kernel_height == 0 {
        return Err(GlyphGroupError::InvalidDimensions {
            width: kernel_width,
            height: kernel_height,
        });
    }

    let width = src.width();
    let height = src.height();
    let anchor_x = kernel_width / 2;
    let anchor_y = kernel_height / 2;

    let mut horizontal = vec![0u8; width * height];
    for y in 0..height {
        let row = src.row(y).ok_or(GlyphGroupError::BufferTooSmall {
            needed: (y + 1) * src.stride(),
            got: src.data.len(),
        })?;
        let out = &mut horizontal[y * width..(y + 1) * width];
        for (x, dst) in out.iter_mut().enumerate() {
            let lo = x.saturating_sub(anchor_x);
            let hi = (x + kernel_width - anchor_x).min(width);
            *dst = row[lo..hi].iter().copied().max().unwrap_or(0);
        }
    }

    let mut data = vec![0u8; width * height];
    for y in 0..height {
        let lo = y.saturating_sub(anchor_y);
        let hi = (y + kernel_height - anchor_y).min(height);
        for x in 0..width {
            let mut best = 0u8;
            for yy in lo..hi {
                best = best.max(horizontal[yy * width + x]);
            }
            data[y * width + x] = best;
        }
    }

    OwnedImage::new(data, width, height)
}
