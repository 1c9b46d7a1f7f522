//! Template match finding over the session image.
//!
//! A region's box is cut out of the (optionally pre-dilated) search image and
//! correlated against the whole image. Every placement scoring at or above
//! the threshold is reported as the center point of the placed template.

use crate::image::morph::dilate_rect;
use crate::image::{ImageView, OwnedImage};
use crate::kernel::scalar::ZnccScalar;
use crate::kernel::{Kernel, Peak, ScanParams};
use crate::region::{BoxRect, Point};
use crate::template::{Template, TemplatePlan};
use crate::trace::{trace_event, trace_span};
use crate::util::{GlyphGroupError, GlyphGroupResult};

/// Matching configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchConfig {
    /// Minimum correlation coefficient for a placement to count as a match.
    pub threshold: f32,
    /// Rectangular dilation kernel applied to the search image, if any.
    pub dilate: Option<(usize, usize)>,
    /// Minimum variance of an image window; flatter windows never match.
    pub min_var_i: f32,
    /// Score rows in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            dilate: Some((2, 2)),
            min_var_i: 1e-8,
            parallel: false,
        }
    }
}

/// Source of match points for a seed region.
///
/// The grouping pass and the MATCH editing mode depend only on this trait so
/// they can run against canned results as well as a real image.
pub trait MatchSource {
    /// Returns the center points of every location resembling `seed`.
    fn find_matches(&self, seed: &BoxRect) -> GlyphGroupResult<Vec<Point>>;
}

/// Image-backed match finder.
#[derive(Clone, Debug)]
pub struct MatchFinder {
    search: OwnedImage,
    cfg: MatchConfig,
}

impl MatchFinder {
    /// Prepares the search image once; the source image is never modified.
    pub fn new(image: ImageView<'_, u8>, cfg: MatchConfig) -> GlyphGroupResult<Self> {
        let search = match cfg.dilate {
            Some((kw, kh)) => dilate_rect(image, kw, kh)?,
            None => OwnedImage::from_view(image)?,
        };
        Ok(Self { search, cfg })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Current match threshold.
    pub fn threshold(&self) -> f32 {
        self.cfg.threshold
    }

    /// Changes the threshold, clamped to `[0, 1]`.
    pub fn set_threshold(&mut self, threshold: f32) {
        self.cfg.threshold = threshold.clamp(0.0, 1.0);
        trace_event!("threshold_changed", threshold = self.cfg.threshold);
    }

    /// The image matches are searched in.
    pub fn search_image(&self) -> ImageView<'_, u8> {
        self.search.view()
    }

    /// Cuts the seed box out of the search image, clipped to its bounds.
    pub fn template_for(&self, seed: &BoxRect) -> GlyphGroupResult<Template> {
        let view = self.search.view();
        let out_of_bounds = || GlyphGroupError::RoiOutOfBounds {
            x: seed.x.max(0) as usize,
            y: seed.y.max(0) as usize,
            width: seed.width.max(0) as usize,
            height: seed.height.max(0) as usize,
            img_width: view.width(),
            img_height: view.height(),
        };
        let x0 = seed.x.max(0) as usize;
        let y0 = seed.y.max(0) as usize;
        let x1 = (seed.right().max(0) as usize).min(view.width());
        let y1 = (seed.bottom().max(0) as usize).min(view.height());
        if x0 >= x1 || y0 >= y1 {
            return Err(out_of_bounds());
        }
        Template::from_view(view.roi(x0, y0, x1 - x0, y1 - y0)?)
    }

    /// Scores every placement of the seed's template; results in raster order.
    pub fn scan(&self, seed: &BoxRect) -> GlyphGroupResult<(Template, Vec<Peak>)> {
        let template = self.template_for(seed)?;
        let plan = TemplatePlan::from_view(template.view())?;
        let params = ScanParams {
            min_var_i: self.cfg.min_var_i,
            min_score: self.cfg.threshold,
        };
        let image = self.search.view();
        let peaks = if self.cfg.parallel {
            scan_parallel(image, &plan, params)?
        } else {
            ZnccScalar::scan_full(image, &plan, params)?
        };
        Ok((template, peaks))
    }
}

#[cfg(feature = "rayon")]
fn scan_parallel(
    image: ImageView<'_, u8>,
    plan: &TemplatePlan,
    params: ScanParams,
) -> GlyphGroupResult<Vec<Peak>> {
    crate::kernel::rayon::ZnccRowParallel::scan_full(image, plan, params)
}

#[cfg(not(feature = "rayon"))]
fn scan_parallel(
    image: ImageView<'_, u8>,
    plan: &TemplatePlan,
    params: ScanParams,
) -> GlyphGroupResult<Vec<Peak>> {
    ZnccScalar::scan_full(image, plan, params)
}

impl MatchSource for MatchFinder {
    fn find_matches(&self, seed: &BoxRect) -> GlyphGroupResult<Vec<Point>> {
        let _span = trace_span!("find_matches").entered();
        let (template, peaks) = self.scan(seed)?;
        let half_w = (template.width() / 2) as i32;
        let half_h = (template.height() / 2) as i32;
        let points: Vec<Point> = peaks
            .iter()
            .map(|peak| Point::new(peak.x as i32 + half_w, peak.y as i32 + half_h))
            .collect();
        trace_event!(
            "matches_found",
            seed_x = seed.x,
            seed_y = seed.y,
            count = points.len(),
            threshold = self.cfg.threshold
        );
        Ok(points)
    }
}
