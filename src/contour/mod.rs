//! Outline extraction from a binary image.
//!
//! Foreground pixels (non-zero) are grouped into 8-connected blobs. Only blobs
//! reachable from the outer background are reported, so shapes nested inside
//! another blob's hole do not produce boxes of their own. Boxes come out in
//! raster order of each blob's first pixel.

use crate::image::morph::dilate_rect;
use crate::image::{ImageView, OwnedImage};
use crate::region::{BoxRect, BoxRegistry, MinSize};
use crate::trace::{trace_event, trace_span};
use crate::util::GlyphGroupResult;

/// Settings for seeding a registry from an image.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectConfig {
    /// Rectangular dilation applied before labeling, merging nearby strokes.
    pub dilate: Option<(usize, usize)>,
    /// Boxes narrower than this are dropped.
    pub min_width: i32,
    /// Boxes shorter than this are dropped.
    pub min_height: i32,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            dilate: None,
            min_width: 0,
            min_height: 0,
        }
    }
}

struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new() -> Self {
        Self { parent: vec![0] }
    }

    fn make(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        label
    }

    fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grand = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grand;
            x = grand;
        }
        x
    }

    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi as usize] = lo;
        }
    }
}

/// Bounding boxes of the external blobs in `binary`.
pub fn find_external_boxes(binary: ImageView<'_, u8>) -> Vec<BoxRect> {
    let width = binary.width();
    let height = binary.height();
    let fg = |x: usize, y: usize| binary.get(x, y).is_some_and(|&v| v != 0);

    // First pass: provisional labels with 8-connectivity.
    let mut labels = vec![0u32; width * height];
    let mut uf = UnionFind::new();
    for y in 0..height {
        for x in 0..width {
            if !fg(x, y) {
                continue;
            }
            let mut neighbors = [0u32; 4];
            if x > 0 {
                neighbors[0] = labels[y * width + x - 1];
            }
            if y > 0 {
                let up = (y - 1) * width;
                neighbors[1] = labels[up + x];
                if x > 0 {
                    neighbors[2] = labels[up + x - 1];
                }
                if x + 1 < width {
                    neighbors[3] = labels[up + x + 1];
                }
            }
            let label = match neighbors.iter().copied().filter(|&l| l != 0).min() {
                Some(min) => {
                    for &l in neighbors.iter().filter(|&&l| l != 0 && l != min) {
                        uf.union(min, l);
                    }
                    min
                }
                None => uf.make(),
            };
            labels[y * width + x] = label;
        }
    }

    let outside = outer_background(binary);

    // Second pass: resolve roots, bounding boxes and externality.
    struct Blob {
        min_x: usize,
        min_y: usize,
        max_x: usize,
        max_y: usize,
        external: bool,
    }
    let mut slot_of_root: Vec<Option<usize>> = vec![None; uf.parent.len()];
    let mut blobs: Vec<Blob> = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let label = labels[y * width + x];
            if label == 0 {
                continue;
            }
            let root = uf.find(label) as usize;
            let slot = *slot_of_root[root].get_or_insert_with(|| {
                blobs.push(Blob {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                    external: false,
                });
                blobs.len() - 1
            });
            let blob = &mut blobs[slot];
            blob.min_x = blob.min_x.min(x);
            blob.min_y = blob.min_y.min(y);
            blob.max_x = blob.max_x.max(x);
            blob.max_y = blob.max_y.max(y);
            if !blob.external {
                blob.external = x == 0
                    || y == 0
                    || x + 1 == width
                    || y + 1 == height
                    || outside[y * width + x - 1]
                    || outside[y * width + x + 1]
                    || outside[(y - 1) * width + x]
                    || outside[(y + 1) * width + x];
            }
        }
    }

    blobs
        .into_iter()
        .filter(|blob| blob.external)
        .map(|blob| {
            BoxRect::new(
                blob.min_x as i32,
                blob.min_y as i32,
                (blob.max_x - blob.min_x + 1) as i32,
                (blob.max_y - blob.min_y + 1) as i32,
            )
        })
        .collect()
}

/// Background pixels 4-connected to the image border.
fn outer_background(binary: ImageView<'_, u8>) -> Vec<bool> {
    let width = binary.width();
    let height = binary.height();
    let is_bg = |x: usize, y: usize| binary.get(x, y).is_some_and(|&v| v == 0);
    let mut outside = vec![false; width * height];
    let mut stack = Vec::new();

    for x in 0..width {
        stack.push((x, 0));
        stack.push((x, height - 1));
    }
    for y in 0..height {
        stack.push((0, y));
        stack.push((width - 1, y));
    }

    while let Some((x, y)) = stack.pop() {
        let idx = y * width + x;
        if outside[idx] || !is_bg(x, y) {
            continue;
        }
        outside[idx] = true;
        if x > 0 {
            stack.push((x - 1, y));
        }
        if x + 1 < width {
            stack.push((x + 1, y));
        }
        if y > 0 {
            stack.push((x, y - 1));
        }
        if y + 1 < height {
            stack.push((x, y + 1));
        }
    }
    outside
}

/// Builds a registry seeded with every detected box of `binary`.
pub fn detect_regions(
    binary: ImageView<'_, u8>,
    cfg: &DetectConfig,
) -> GlyphGroupResult<BoxRegistry> {
    let _span = trace_span!("detect_regions").entered();
    let dilated: Option<OwnedImage> = match cfg.dilate {
        Some((kw, kh)) => Some(dilate_rect(binary, kw, kh)?),
        None => None,
    };
    let source = dilated.as_ref().map_or(binary, OwnedImage::view);
    let boxes = find_external_boxes(source);

    let mut registry = BoxRegistry::new(MinSize::new(cfg.min_width, cfg.min_height));
    let kept = registry.extend_from_rects(boxes.iter().copied());
    trace_event!("regions_detected", found = boxes.len(), kept = kept);
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::{detect_regions, find_external_boxes, DetectConfig};
    use crate::image::ImageView;
    use crate::region::BoxRect;

    fn parse(rows: &[&str]) -> (Vec<u8>, usize, usize) {
        let width = rows[0].len();
        let data = rows
            .iter()
            .flat_map(|row| row.bytes().map(|b| if b == b'#' { 255 } else { 0 }))
            .collect();
        (data, width, rows.len())
    }

    #[test]
    fn diagonal_pixels_join_one_blob() {
        let (data, w, h) = parse(&[
            "......", //
            ".#....", //
            "..#...", //
            "...#..", //
            "......", //
        ]);
        let view = ImageView::from_slice(&data, w, h).unwrap();
        assert_eq!(find_external_boxes(view), vec![BoxRect::new(1, 1, 3, 3)]);
    }

    #[test]
    fn blobs_come_out_in_raster_order() {
        let (data, w, h) = parse(&[
            "....##", //
            "....##", //
            "##....", //
            "##....", //
        ]);
        let view = ImageView::from_slice(&data, w, h).unwrap();
        assert_eq!(
            find_external_boxes(view),
            vec![BoxRect::new(4, 0, 2, 2), BoxRect::new(0, 2, 2, 2)]
        );
    }

    #[test]
    fn u_shape_merges_through_later_rows() {
        let (data, w, h) = parse(&[
            "#...#", //
            "#...#", //
            "#####", //
        ]);
        let view = ImageView::from_slice(&data, w, h).unwrap();
        assert_eq!(find_external_boxes(view), vec![BoxRect::new(0, 0, 5, 3)]);
    }

    #[test]
    fn shapes_inside_holes_are_not_external() {
        let (data, w, h) = parse(&[
            ".......", //
            ".#####.", //
            ".#...#.", //
            ".#.#.#.", //
            ".#...#.", //
            ".#####.", //
            ".......", //
        ]);
        let view = ImageView::from_slice(&data, w, h).unwrap();
        assert_eq!(find_external_boxes(view), vec![BoxRect::new(1, 1, 5, 5)]);
    }

    #[test]
    fn detection_applies_min_size_and_dilation() {
        let (data, w, h) = parse(&[
            "..........", //
            ".##....#..", //
            ".##.......", //
            "..........", //
            "...#.#....", //
            "..........", //
        ]);
        let view = ImageView::from_slice(&data, w, h).unwrap();
        let cfg = DetectConfig {
            min_width: 2,
            min_height: 2,
            ..DetectConfig::default()
        };
        let registry = detect_regions(view, &cfg).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.box_at(0).unwrap(), BoxRect::new(1, 1, 2, 2));

        let cfg = DetectConfig {
            dilate: Some((2, 1)),
            ..DetectConfig::default()
        };
        let registry = detect_regions(view, &cfg).unwrap();
        let boxes: Vec<BoxRect> = registry.regions().iter().map(|r| r.rect()).collect();
        assert!(boxes.contains(&BoxRect::new(3, 4, 4, 1)));
    }
}
