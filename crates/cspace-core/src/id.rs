//! Strongly-typed identifiers: axes, cells, poses and region names.

use std::fmt;

/// Index of a grid cell as `[x, y, theta]`.
///
/// Cells are plain index triples; the owning `GridSpace` decides how the
/// axes wrap. Only the θ axis is periodic.
pub type Cell = [usize; 3];

/// One of the three configuration-space axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// Horizontal position of the load's centre of mass.
    X,
    /// Vertical position of the load's centre of mass.
    Y,
    /// Orientation of the load, periodic over `[0, 2π)`.
    Theta,
}

impl Axis {
    /// All axes in storage order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Theta];

    /// Position of this axis inside a [`Cell`].
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Theta => 2,
        }
    }

    /// Whether the axis wraps around (only θ does).
    pub fn is_periodic(self) -> bool {
        matches!(self, Self::Theta)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::Theta => write!(f, "theta"),
        }
    }
}

/// A physical pose of the load: position in maze units, angle in radians.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Pose {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Orientation in radians.
    pub theta: f64,
}

impl Pose {
    /// Create a pose from its three components.
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    /// Component along `axis`.
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Theta => self.theta,
        }
    }
}

/// Single-letter name of a canonical region (`'a'`, `'b'`, ...).
///
/// Names are ordered alphabetically; that order is the tie-break order
/// used when two regions are equally distant from a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionName(char);

impl RegionName {
    /// Maximum number of distinct names (`'a'..='z'`).
    pub const MAX_COUNT: usize = 26;

    /// The `index`-th name in alphabetical order, or `None` past `'z'`.
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= Self::MAX_COUNT {
            return None;
        }
        Some(Self((b'a' + index as u8) as char))
    }

    /// Parse a name from a lowercase ASCII letter.
    pub fn from_char(c: char) -> Option<Self> {
        c.is_ascii_lowercase().then_some(Self(c))
    }

    /// Position of this name in alphabetical order.
    pub fn index(self) -> usize {
        (self.0 as u8 - b'a') as usize
    }

    /// The underlying letter.
    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for RegionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
