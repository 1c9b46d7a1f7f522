//! Textual input events for scripted sessions.
//!
//! One event per line: `key <c>`, `down <x> <y>` or `up <x> <y>`. Blank lines
//! and lines starting with `#` carry no event.

use std::str::FromStr;

use crate::mode::PointerEvent;
use crate::util::GlyphGroupError;

/// A keyboard or pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key(char),
    Pointer(PointerEvent),
}

impl InputEvent {
    /// Parses one script line; `Ok(None)` for blanks and comments.
    pub fn parse_line(line: &str) -> Result<Option<InputEvent>, GlyphGroupError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        line.parse().map(Some)
    }
}

impl FromStr for InputEvent {
    type Err = GlyphGroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| GlyphGroupError::InvalidEvent {
            reason: format!("{reason}: {s:?}"),
        };
        let mut parts = s.split_whitespace();
        let kind = parts.next().ok_or_else(|| invalid("empty event"))?;
        let event = match kind {
            "key" => {
                let token = parts.next().ok_or_else(|| invalid("missing key"))?;
                let mut chars = token.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => InputEvent::Key(c),
                    _ => return Err(invalid("key must be one character")),
                }
            }
            "down" | "up" => {
                let mut coord = || -> Result<i32, GlyphGroupError> {
                    parts
                        .next()
                        .ok_or_else(|| invalid("missing coordinate"))?
                        .parse()
                        .map_err(|_| invalid("bad coordinate"))
                };
                let x = coord()?;
                let y = coord()?;
                if kind == "down" {
                    InputEvent::Pointer(PointerEvent::down(x, y))
                } else {
                    InputEvent::Pointer(PointerEvent::up(x, y))
                }
            }
            _ => return Err(invalid("unknown event")),
        };
        if parts.next().is_some() {
            return Err(invalid("trailing input"));
        }
        Ok(event)
    }
}
