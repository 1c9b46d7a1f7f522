//! Two-phase ADD gesture.

use crate::region::{BoxRect, Point};

/// Sub-state of the ADD mode between a press and its release.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { start: Point },
}

impl DragState {
    /// Records the press corner, replacing any unfinished drag.
    pub fn begin(&mut self, start: Point) {
        *self = DragState::Dragging { start };
    }

    /// Ends the drag and returns the normalized box, if a drag was running.
    pub fn finish(&mut self, end: Point) -> Option<BoxRect> {
        match std::mem::take(self) {
            DragState::Dragging { start } => Some(BoxRect::from_corners(start, end)),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }
}
