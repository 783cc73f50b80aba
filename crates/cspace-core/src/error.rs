//! Error type for collision oracles.

use std::error::Error;
use std::fmt;

/// Errors raised by a [`CollisionOracle`](crate::CollisionOracle).
///
/// The space builder never masks these: the first failure aborts the
/// sweep and is returned to the caller together with the offending cell.
#[derive(Clone, Debug, PartialEq)]
pub enum OracleError {
    /// The load polygon or the maze wall polygons are degenerate.
    MalformedPolygon {
        /// Human-readable description of the defect.
        reason: String,
    },
    /// The oracle could not evaluate a pose for another reason.
    EvaluationFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedPolygon { reason } => write!(f, "malformed polygon: {reason}"),
            Self::EvaluationFailed { reason } => {
                write!(f, "collision evaluation failed: {reason}")
            }
        }
    }
}

impl Error for OracleError {}
