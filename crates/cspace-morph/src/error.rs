//! Error types for grid algorithms.

use cspace_space::SpaceError;
use std::error::Error;
use std::fmt;

/// Errors from morphology, labeling or distance computation.
#[derive(Debug, Clone, PartialEq)]
pub enum MorphError {
    /// Structuring-element radius was zero.
    InvalidRadius {
        /// The rejected radius.
        radius: usize,
    },
    /// Reduction factor was zero or larger than an axis.
    InvalidReduction {
        /// The rejected factor.
        reduction: usize,
        /// Shape of the grid being reduced.
        shape: [usize; 3],
    },
    /// Input grids did not agree with each other or with the space.
    Space(SpaceError),
}

impl fmt::Display for MorphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRadius { radius } => {
                write!(f, "structuring element radius must be >= 1, got {radius}")
            }
            Self::InvalidReduction { reduction, shape } => {
                write!(f, "cannot reduce grid {shape:?} by a factor of {reduction}")
            }
            Self::Space(e) => write!(f, "grid error: {e}"),
        }
    }
}

impl Error for MorphError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SpaceError> for MorphError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}
