//! Error types for glyphgroup.

use thiserror::Error;

/// Result alias for glyphgroup operations.
pub type GlyphGroupResult<T> = std::result::Result<T, GlyphGroupError>;

/// Errors that can occur while editing regions or matching templates.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GlyphGroupError {
    /// No region contains the queried point.
    #[error("no region found at ({x}, {y})")]
    RegionNotFound { x: i32, y: i32 },
    /// A region index outside the registry was used.
    #[error("region index {index} out of range for {len} regions")]
    IndexOutOfRange { index: usize, len: usize },
    /// Image dimensions are zero or overflow.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer cannot hold the described image.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Requested window does not fit inside the image.
    #[error("roi ({x}, {y}, {width}x{height}) outside {img_width}x{img_height} image")]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Template cannot be correlated (e.g. zero variance).
    #[error("degenerate template: {reason}")]
    DegenerateTemplate { reason: &'static str },
    /// Every group id up to `u32::MAX` is already taken.
    #[error("no group id left after {max_group}")]
    GroupIdsExhausted { max_group: u32 },
    /// Snapshot content is malformed.
    #[error("snapshot error: {reason}")]
    Snapshot { reason: String },
    /// Filesystem failure.
    #[error("io error: {reason}")]
    Io { reason: String },
    /// Image decoding or encoding failure.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
    /// A scripted input line could not be parsed.
    #[error("invalid event: {reason}")]
    InvalidEvent { reason: String },
}

impl GlyphGroupError {
    /// Returns true for failures local to a single user action.
    ///
    /// Lookup misses and template soft failures leave the registry untouched,
    /// so an event loop can log them and keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::RegionNotFound { .. }
                | Self::DegenerateTemplate { .. }
                | Self::RoiOutOfBounds { .. }
        )
    }
}

impl From<std::io::Error> for GlyphGroupError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for GlyphGroupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Snapshot {
            reason: err.to_string(),
        }
    }
}
