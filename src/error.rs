//! The error taxonomy shared by both engines.
//!
//! Grounded on `geo_types::error::Error` / `geo::geometry::error::Error`: a
//! plain enum implementing [`std::error::Error`] and [`Display`], rather than
//! pulling in a derive-macro crate for what is a handful of variants.

use std::fmt;

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The kinds of failure either engine can report.
///
/// Variant names follow the taxonomy of kinds (not implementations) laid out
/// for this toolkit: a required input was missing, a value was out of
/// domain, a lookup found nothing, a grid coordinate was out of range, or an
/// internal consistency check tripped.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A required argument was absent (e.g. a `None`/null segment list).
    NullArgument { what: &'static str },
    /// A value was out of its domain: negative epsilon, a key outside
    /// quadtree bounds, a segment with coincident endpoints, a split
    /// location tag outside `{Start, Between, End}`, a node belonging to a
    /// different tree, non-positive bounds/capacity.
    InvalidArgument { message: String },
    /// A requested key does not exist (e.g. `move_key` with an unknown
    /// source key).
    NotFound { message: String },
    /// Grid coordinates fell outside the valid range for their level.
    IndexOutOfRange { level: u8, grid_x: u32, grid_y: u32 },
    /// An internal consistency check failed. The sweep-line algorithm as
    /// specified should never raise this in practice; it exists as a
    /// defensive backstop rather than a reachable outcome.
    InvalidState { message: String },
    /// A numeric conversion would overflow the target integer range.
    Overflow { message: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NullArgument { what } => write!(f, "missing required argument: {what}"),
            Error::InvalidArgument { message } => write!(f, "invalid argument: {message}"),
            Error::NotFound { message } => write!(f, "not found: {message}"),
            Error::IndexOutOfRange {
                level,
                grid_x,
                grid_y,
            } => write!(
                f,
                "grid coordinate ({grid_x}, {grid_y}) out of range at level {level}"
            ),
            Error::InvalidState { message } => write!(f, "invalid internal state: {message}"),
            Error::Overflow { message } => write!(f, "numeric overflow: {message}"),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        Error::InvalidState {
            message: message.into(),
        }
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound {
            message: message.into(),
        }
    }
}
