//! Correlation kernel implementations.
//!
//! Kernels score every valid top-left placement of a template inside an image
//! with the zero-mean normalized cross-correlation (the correlation
//! coefficient) and keep those at or above a threshold.

use crate::template::TemplatePlan;
use crate::util::{GlyphGroupError, GlyphGroupResult};
use crate::ImageView;

/// Scored template placement (top-left corner).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// X coordinate (column) of the placement.
    pub x: usize,
    /// Y coordinate (row) of the placement.
    pub y: usize,
    /// Correlation coefficient in approximately `[-1, 1]`.
    pub score: f32,
}

/// Scan configuration for kernel evaluations.
#[derive(Clone, Copy, Debug)]
pub struct ScanParams {
    /// Minimum variance of the image window; flatter windows are skipped.
    pub min_var_i: f32,
    /// Placements scoring below this value are discarded.
    pub min_score: f32,
}

/// Kernel trait for scoring and scan operations.
pub trait Kernel {
    /// Computes the score at a single placement (top-left coordinates).
    fn score_at(image: ImageView<'_, u8>, plan: &TemplatePlan, x: usize, y: usize, min_var_i: f32)
        -> f32;

    /// Scans the full valid placement range and returns every placement at or
    /// above `params.min_score`, in raster order.
    fn scan_full(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        params: ScanParams,
    ) -> GlyphGroupResult<Vec<Peak>>;
}

/// Returns the largest valid top-left placement, or an error when the template
/// does not fit inside the image.
pub(crate) fn placement_range(
    image: ImageView<'_, u8>,
    plan: &TemplatePlan,
) -> GlyphGroupResult<(usize, usize)> {
    let img_width = image.width();
    let img_height = image.height();
    if img_width < plan.width() || img_height < plan.height() {
        return Err(GlyphGroupError::RoiOutOfBounds {
            x: 0,
            y: 0,
            width: plan.width(),
            height: plan.height(),
            img_width,
            img_height,
        });
    }
    Ok((img_width - plan.width(), img_height - plan.height()))
}

/// Correlation coefficient of the window at `(x, y)`; `None` when the window is
/// too flat or the score is not finite.
#[inline]
pub(crate) fn zncc_window(
    image: ImageView<'_, u8>,
    plan: &TemplatePlan,
    x: usize,
    y: usize,
    min_var_i: f32,
) -> Option<f32> {
    let tpl_width = plan.width();
    let t_prime = plan.t_prime();
    let n = (tpl_width * plan.height()) as f32;

    let mut dot = 0.0f32;
    let mut sum_i = 0.0f32;
    let mut sum_i2 = 0.0f32;
    for ty in 0..plan.height() {
        let img_row = image.row(y + ty)?;
        let base = ty * tpl_width;
        for tx in 0..tpl_width {
            let value = img_row[x + tx] as f32;
            dot += t_prime[base + tx] * value;
            sum_i += value;
            sum_i2 += value * value;
        }
    }

    let var_i = sum_i2 - (sum_i * sum_i) / n;
    if var_i <= min_var_i {
        return None;
    }
    let score = dot / (plan.var_t() * var_i).sqrt();
    score.is_finite().then_some(score)
}

pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;
