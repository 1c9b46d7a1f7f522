//! Rayon-parallel kernel (feature-gated).
//!
//! Rows of placements are scored in parallel; results are concatenated in row
//! order so the output is identical to the scalar kernel.

use crate::kernel::scalar::ZnccScalar;
use crate::kernel::{placement_range, zncc_window, Kernel, Peak, ScanParams};
use crate::template::TemplatePlan;
use crate::util::GlyphGroupResult;
use crate::ImageView;
use rayon::prelude::*;

/// Row-parallel ZNCC kernel.
pub struct ZnccRowParallel;

impl Kernel for ZnccRowParallel {
    fn score_at(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        x: usize,
        y: usize,
        min_var_i: f32,
    ) -> f32 {
        ZnccScalar::score_at(image, plan, x, y, min_var_i)
    }

    fn scan_full(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        params: ScanParams,
    ) -> GlyphGroupResult<Vec<Peak>> {
        let (max_x, max_y) = placement_range(image, plan)?;
        let rows: Vec<Vec<Peak>> = (0..=max_y)
            .into_par_iter()
            .map(|y| {
                (0..=max_x)
                    .filter_map(|x| {
                        zncc_window(image, plan, x, y, params.min_var_i)
                            .filter(|&score| score >= params.min_score)
                            .map(|score| Peak { x, y, score })
                    })
                    .collect()
            })
            .collect();
        Ok(rows.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::ZnccRowParallel;
    use crate::kernel::scalar::ZnccScalar;
    use crate::kernel::{Kernel, ScanParams};
    use crate::template::TemplatePlan;
    use crate::ImageView;

    #[test]
    fn parallel_scan_equals_scalar_scan() {
        let (width, height) = (24, 18);
        let data: Vec<u8> = (0..width * height)
            .map(|i| (((i % width) * 31 ^ (i / width) * 7) & 0xFF) as u8)
            .collect();
        let view = ImageView::from_slice(&data, width, height).unwrap();
        let plan = TemplatePlan::from_view(view.roi(5, 4, 6, 5).unwrap()).unwrap();
        let params = ScanParams {
            min_var_i: 1e-8,
            min_score: 0.2,
        };
        let scalar = ZnccScalar::scan_full(view, &plan, params).unwrap();
        let parallel = ZnccRowParallel::scan_full(view, &plan, params).unwrap();
        assert_eq!(scalar, parallel);
    }
}
