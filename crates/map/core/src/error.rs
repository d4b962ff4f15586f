//! Grid model errors.
//!
//! These indicate misuse of the grid model (bad dimensions, coordinates
//! outside the map, stale object handles). Callers are expected to surface
//! them rather than fall back to defaults.

use crate::grid::{ObjectId, Position};

pub type Result<T> = std::result::Result<T, GridError>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Width or height is not strictly positive (or too small for the request).
    #[error("invalid map dimensions {width}x{height}")]
    InvalidDimension { width: i64, height: i64 },

    /// Coordinate lies outside `[0, width) x [0, height)`.
    #[error("position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        position: Position,
        width: u32,
        height: u32,
    },

    /// Object handle does not refer to an object on this map.
    #[error("object {0} is not placed on this map")]
    NotFound(ObjectId),
}

impl GridError {
    /// Returns a static string identifier for this error variant.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDimension { .. } => "GRID_INVALID_DIMENSION",
            Self::OutOfBounds { .. } => "GRID_OUT_OF_BOUNDS",
            Self::NotFound(_) => "GRID_OBJECT_NOT_FOUND",
        }
    }
}
