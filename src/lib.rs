//! Glyphgroup clusters repeated symbols found in a scanned image.
//!
//! Candidate regions come from blob detection on a binary image and live in a
//! [`BoxRegistry`]. An operator edits them through mode-driven pointer events
//! ([`ModeController`]) and can propagate a single match into a whole symbol
//! class with [`auto_group`], which correlates each ungrouped region against
//! the image. Optional parallel scoring is available via the `rayon` feature.

pub mod contour;
pub mod group;
pub mod image;
pub mod kernel;
pub mod matcher;
pub mod mode;
pub mod region;
pub mod render;
pub mod session;
pub mod template;
mod trace;
pub mod util;

pub use contour::{detect_regions, find_external_boxes, DetectConfig};
pub use group::{auto_group, GroupReport};
#[cfg(feature = "image-io")]
pub use image::io;
pub use image::{ImageView, OwnedImage};
pub use matcher::{MatchConfig, MatchFinder, MatchSource};
pub use mode::{DragState, EditContext, Effect, Mode, ModeController, PointerEvent, PointerKind};
pub use region::{
    point_in_rect, BoxFilter, BoxRect, BoxRegistry, GroupId, MinSize, Point, Region, RegionId,
    UNGROUPED,
};
pub use render::{render_registry, Renderer, Rgb, RgbCanvas};
pub use session::{Command, Flow, InputEvent, Session};
pub use template::{Template, TemplatePlan};
pub use util::{GlyphGroupError, GlyphGroupResult};
