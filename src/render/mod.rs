//! Drawing region boxes by state.
//!
//! Rendering only reads the registry. Active regions are green, ungrouped ones
//! blue, and grouped ones take a stable color derived from their group id.

use crate::image::ImageView;
use crate::region::{BoxRect, BoxRegistry, GroupId, UNGROUPED};

/// 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const ACTIVE: Rgb = Rgb([0, 255, 0]);
    pub const UNGROUPED: Rgb = Rgb([0, 0, 255]);

    /// Deterministic color for a group id.
    pub fn for_group(group: GroupId) -> Rgb {
        const PALETTE: [[u8; 3]; 8] = [
            [230, 25, 75],
            [255, 225, 25],
            [245, 130, 48],
            [145, 30, 180],
            [70, 240, 240],
            [240, 50, 230],
            [170, 110, 40],
            [128, 0, 0],
        ];
        if group == UNGROUPED {
            return Rgb::UNGROUPED;
        }
        Rgb(PALETTE[(group as usize - 1) % PALETTE.len()])
    }
}

/// Drawing surface consumed by [`render_registry`].
pub trait Renderer {
    /// Outlines `rect` in `color`.
    fn draw_rect(&mut self, rect: &BoxRect, color: Rgb);
}

/// Color a region is drawn with.
pub fn region_color(active: bool, group: GroupId) -> Rgb {
    if active {
        Rgb::ACTIVE
    } else {
        Rgb::for_group(group)
    }
}

/// Draws every region; active ones last so they stay on top.
pub fn render_registry<R: Renderer + ?Sized>(registry: &BoxRegistry, renderer: &mut R) {
    let (active, idle): (Vec<_>, Vec<_>) =
        registry.regions().iter().partition(|region| region.is_active());
    for region in idle.into_iter().chain(active) {
        renderer.draw_rect(&region.rect(), region_color(region.is_active(), region.group()));
    }
}

/// In-memory RGB raster with outlined rectangles.
#[derive(Clone, Debug, PartialEq)]
pub struct RgbCanvas {
    width: usize,
    height: usize,
    thickness: i32,
    data: Vec<u8>,
}

impl RgbCanvas {
    /// Creates a canvas showing `background` in gray.
    pub fn from_gray(background: ImageView<'_, u8>, thickness: i32) -> Self {
        let width = background.width();
        let height = background.height();
        let mut data = Vec::with_capacity(width * height * 3);
        for y in 0..height {
            if let Some(row) = background.row(y) {
                for &v in row {
                    data.extend_from_slice(&[v, v, v]);
                }
            }
        }
        Self {
            width,
            height,
            thickness: thickness.max(1),
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Interleaved RGB bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Color at `(x, y)`, if inside the canvas.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 3;
        Some(Rgb([self.data[idx], self.data[idx + 1], self.data[idx + 2]]))
    }

    fn fill(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb) {
        let x0 = x0.max(0) as usize;
        let y0 = y0.max(0) as usize;
        let x1 = (x1.max(0) as usize).min(self.width);
        let y1 = (y1.max(0) as usize).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let idx = (y * self.width + x) * 3;
                self.data[idx..idx + 3].copy_from_slice(&color.0);
            }
        }
    }
}

impl Renderer for RgbCanvas {
    fn draw_rect(&mut self, rect: &BoxRect, color: Rgb) {
        // Outline spans x..=right and y..=bottom, centered on the box edge.
        let t = self.thickness;
        let lo = t / 2;
        let hi = t - lo;
        let (left, top, right, bottom) = (rect.x, rect.y, rect.right(), rect.bottom());
        self.fill(left - lo, top - lo, right + hi, top + hi, color);
        self.fill(left - lo, bottom - lo, right + hi, bottom + hi, color);
        self.fill(left - lo, top - lo, left + hi, bottom + hi, color);
        self.fill(right - lo, top - lo, right + hi, bottom + hi, color);
    }
}
