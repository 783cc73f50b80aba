//! Error types for grid construction and coordinate mapping.

use cspace_core::Axis;
use std::fmt;

/// Errors arising from grid construction or coordinate queries.
#[derive(Debug, Clone, PartialEq)]
pub enum SpaceError {
    /// Attempted to construct a grid with a zero-length axis.
    EmptySpace,
    /// The total cell count does not fit in memory addressing.
    DimensionTooLarge {
        /// Requested shape.
        shape: [usize; 3],
    },
    /// A resolution is zero, negative or not finite.
    InvalidResolution {
        /// The offending axis.
        axis: Axis,
        /// The offending value.
        value: f64,
    },
    /// A physical coordinate maps outside the grid.
    ///
    /// Indicates an extent/resolution mismatch between the caller and
    /// the grid.
    CoordOutOfRange {
        /// Axis of the coordinate.
        axis: Axis,
        /// The offending value.
        value: f64,
        /// Human-readable description of the valid range.
        bounds: String,
    },
    /// Two grids (or a grid and a space) disagree on shape.
    ShapeMismatch {
        /// Shape that was expected.
        expected: [usize; 3],
        /// Shape that was found.
        found: [usize; 3],
    },
    /// A flat buffer does not match the declared shape.
    LengthMismatch {
        /// Number of elements the shape requires.
        expected: usize,
        /// Number of elements supplied.
        found: usize,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySpace => write!(f, "grid must have at least one cell per axis"),
            Self::DimensionTooLarge { shape } => {
                write!(f, "grid shape {shape:?} overflows the addressable cell count")
            }
            Self::InvalidResolution { axis, value } => {
                write!(f, "invalid {axis} resolution {value}")
            }
            Self::CoordOutOfRange {
                axis,
                value,
                bounds,
            } => write!(f, "{axis} coordinate {value} out of range: {bounds}"),
            Self::ShapeMismatch { expected, found } => {
                write!(f, "grid shape mismatch: expected {expected:?}, found {found:?}")
            }
            Self::LengthMismatch { expected, found } => {
                write!(f, "buffer holds {found} cells, shape requires {expected}")
            }
        }
    }
}

impl std::error::Error for SpaceError {}
