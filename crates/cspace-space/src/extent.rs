//! Physical extent and resolution of a configuration space.

use cspace_core::Axis;
use std::f64::consts::TAU;

/// Per-axis physical range `(min, max)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    /// Horizontal range.
    pub x: (f64, f64),
    /// Vertical range.
    pub y: (f64, f64),
    /// Angular range; always `(0, 2π)` for a valid space.
    pub theta: (f64, f64),
}

impl Extent {
    /// The only valid θ range.
    pub const FULL_TURN: (f64, f64) = (0.0, TAU);

    /// An extent with the given x and y ranges and a full θ turn.
    pub fn new(x: (f64, f64), y: (f64, f64)) -> Self {
        Self {
            x,
            y,
            theta: Self::FULL_TURN,
        }
    }

    /// Range along `axis`.
    pub fn get(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Theta => self.theta,
        }
    }

    /// Length of the range along `axis`.
    pub fn span(&self, axis: Axis) -> f64 {
        let (min, max) = self.get(axis);
        max - min
    }

    /// Whether θ covers exactly one full turn.
    pub fn theta_is_full_turn(&self) -> bool {
        self.theta == Self::FULL_TURN
    }
}

/// Physical length of one cell along each axis.
///
/// x and y share a linear resolution; θ has its own angular resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    /// Linear step shared by x and y.
    pub position: f64,
    /// Angular step in radians.
    pub theta: f64,
}

impl Resolution {
    /// Step along `axis`.
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X | Axis::Y => self.position,
            Axis::Theta => self.theta,
        }
    }
}
