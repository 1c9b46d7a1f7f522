//! Single-key command surface.

use crate::mode::Mode;

/// Threshold change applied by one press of `[` or `]`.
pub const THRESHOLD_STEP: f32 = 0.05;

/// Operator command bound to a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Switch pointer mode (`m`, `d`, `a`, `s`, `g`, `u`, `n`).
    SetMode(Mode),
    /// End the session (`q`).
    Quit,
    /// Write the snapshot (`x`).
    Save,
    /// Replace the registry with the snapshot (`l`).
    Load,
    /// Highlight every ungrouped region (`y`).
    ShowUngrouped,
    /// Run the automatic grouping pass (`z`).
    AutoGroup,
    /// Lower the match threshold (`[`).
    LowerThreshold,
    /// Raise the match threshold (`]`).
    RaiseThreshold,
}

impl Command {
    pub fn from_key(key: char) -> Option<Command> {
        if let Some(mode) = Mode::from_key(key) {
            return Some(Command::SetMode(mode));
        }
        match key {
            'q' => Some(Command::Quit),
            'x' => Some(Command::Save),
            'l' => Some(Command::Load),
            'y' => Some(Command::ShowUngrouped),
            'z' => Some(Command::AutoGroup),
            '[' => Some(Command::LowerThreshold),
            ']' => Some(Command::RaiseThreshold),
            _ => None,
        }
    }
}
