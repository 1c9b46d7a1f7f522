//! Interaction modes and the pointer event vocabulary.
//!
//! The operator picks a mode with a single key; pointer presses are then
//! interpreted by that mode's handler. Modes never change on their own.

mod controller;
mod drag;

pub use controller::{EditContext, ModeController};
pub use drag::DragState;

use crate::region::{GroupId, Point, RegionId};

/// Pointer interpretation mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Highlight every region resembling the clicked one.
    #[default]
    Match,
    /// Remove the clicked region.
    Delete,
    /// Drag out a new region.
    Add,
    /// Highlight the clicked region's whole group.
    Select,
    /// Move the clicked region into the selected group.
    Group,
    /// Take the clicked region out of the selected group.
    Ungroup,
    /// Start a new group with the clicked region.
    New,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Match,
        Mode::Delete,
        Mode::Add,
        Mode::Select,
        Mode::Group,
        Mode::Ungroup,
        Mode::New,
    ];

    /// Mode bound to a key, if any.
    pub fn from_key(key: char) -> Option<Mode> {
        Mode::ALL.into_iter().find(|mode| mode.key() == key)
    }

    /// Key that selects this mode.
    pub fn key(self) -> char {
        match self {
            Mode::Match => 'm',
            Mode::Delete => 'd',
            Mode::Add => 'a',
            Mode::Select => 's',
            Mode::Group => 'g',
            Mode::Ungroup => 'u',
            Mode::New => 'n',
        }
    }

    /// Position in [`Mode::ALL`] and in the handler table.
    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

/// Pointer button transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Up,
}

/// A button press or release at an image coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: i32,
    pub y: i32,
}

impl PointerEvent {
    pub fn down(x: i32, y: i32) -> Self {
        Self {
            kind: PointerKind::Down,
            x,
            y,
        }
    }

    pub fn up(x: i32, y: i32) -> Self {
        Self {
            kind: PointerKind::Up,
            x,
            y,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// What a pointer event did to the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// The event had no effect in the current mode or state.
    Ignored,
    /// An ADD drag began at the point.
    DragStarted(Point),
    /// An ADD drag finished; `None` when the box was below the minimum size.
    Added(Option<RegionId>),
    /// A region was deleted.
    Removed(RegionId),
    /// Matching highlighted `active` regions for the seed at `seed`.
    Matched { seed: usize, active: usize },
    /// A group was highlighted; `group == 0` means the region was ungrouped.
    Selected { group: GroupId, count: usize },
    /// Region moved into `group`.
    Grouped { index: usize, group: GroupId },
    /// Region returned to the ungrouped pool.
    Ungrouped { index: usize },
    /// Region became the first member of a freshly minted group.
    NewGroup { index: usize, group: GroupId },
}

#[cfg(test)]
mod tests {
    use super::Mode;

    #[test]
    fn keys_round_trip_and_slots_are_dense() {
        for (slot, mode) in Mode::ALL.into_iter().enumerate() {
            assert_eq!(Mode::from_key(mode.key()), Some(mode));
            assert_eq!(mode.slot(), slot);
        }
        assert_eq!(Mode::from_key('q'), None);
    }
}
