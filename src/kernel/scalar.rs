//! Scalar reference kernel.

use crate::kernel::{placement_range, zncc_window, Kernel, Peak, ScanParams};
use crate::template::TemplatePlan;
use crate::util::GlyphGroupResult;
use crate::ImageView;

/// Single-threaded ZNCC kernel.
pub struct ZnccScalar;

impl Kernel for ZnccScalar {
    fn score_at(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        x: usize,
        y: usize,
        min_var_i: f32,
    ) -> f32 {
        match placement_range(image, plan) {
            Ok((max_x, max_y)) if x <= max_x && y <= max_y => {
                zncc_window(image, plan, x, y, min_var_i).unwrap_or(f32::NEG_INFINITY)
            }
            _ => f32::NEG_INFINITY,
        }
    }

    fn scan_full(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        params: ScanParams,
    ) -> GlyphGroupResult<Vec<Peak>> {
        let (max_x, max_y) = placement_range(image, plan)?;
        let mut peaks = Vec::new();
        for y in 0..=max_y {
            for x in 0..=max_x {
                if let Some(score) = zncc_window(image, plan, x, y, params.min_var_i) {
                    if score >= params.min_score {
                        peaks.push(Peak { x, y, score });
                    }
                }
            }
        }
        Ok(peaks)
    }
}
