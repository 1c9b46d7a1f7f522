//! Candidate symbol regions and the registry that tracks them.
//!
//! A region is an axis-aligned box plus two pieces of editing state: the
//! transient `active` flag and the group id. Group `0` is reserved for
//! regions that have not been assigned to any symbol class yet.

mod registry;
mod snapshot;

pub use registry::{BoxFilter, BoxRegistry};

/// Symbol class identifier. `UNGROUPED` is never a real class.
pub type GroupId = u32;

/// Sentinel group id for regions without a class.
pub const UNGROUPED: GroupId = 0;

/// Integer pixel coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box with its top-left corner at `(x, y)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoxRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoxRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalizes the rectangle spanned by two opposite corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// Inclusive containment: points on any of the four edges count.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (i64::from(x), i64::from(y));
        let (left, top) = (i64::from(self.x), i64::from(self.y));
        left <= x
            && x <= left + i64::from(self.width)
            && top <= y
            && y <= top + i64::from(self.height)
    }

    /// True when the right and bottom edges are representable as `i32`.
    pub fn fits(&self) -> bool {
        self.x.checked_add(self.width).is_some() && self.y.checked_add(self.height).is_some()
    }

    /// Center rounded toward the top-left corner.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Returns `[x, y, width, height]`.
    pub fn to_array(self) -> [i32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    pub fn from_array([x, y, width, height]: [i32; 4]) -> Self {
        Self::new(x, y, width, height)
    }
}

/// Containment test used by every point lookup.
pub fn point_in_rect(x: i32, y: i32, rect: &BoxRect) -> bool {
    rect.contains(x, y)
}

/// Minimum accepted box size; smaller boxes are dropped at insertion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MinSize {
    pub width: i32,
    pub height: i32,
}

impl MinSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns true when `rect` is at least this large in both dimensions.
    pub fn admits(&self, rect: &BoxRect) -> bool {
        rect.width >= self.width && rect.height >= self.height
    }
}

/// Stable region identity. Unlike the positional index it survives removals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(u64);

impl RegionId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A tracked candidate symbol area.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    id: RegionId,
    rect: BoxRect,
    active: bool,
    group: GroupId,
}

impl Region {
    pub fn id(&self) -> RegionId {
        self.id
    }

    pub fn rect(&self) -> BoxRect {
        self.rect
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn group(&self) -> GroupId {
        self.group
    }

    pub fn is_grouped(&self) -> bool {
        self.group != UNGROUPED
    }
}
