//! Plain-data maze geometry.

use crate::traits::MazeGeometry;
use std::fmt;

/// Shape of the load carried through the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadShape {
    /// Special T shape used in the slit maze.
    Spt,
    /// T-shaped load.
    T,
    /// H-shaped load.
    H,
    /// I-shaped (bar) load.
    I,
}

impl LoadShape {
    /// Parse the short code used in artifact names (`"SPT"`, `"T"`, ...).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "SPT" => Some(Self::Spt),
            "T" => Some(Self::T),
            "H" => Some(Self::H),
            "I" => Some(Self::I),
            _ => None,
        }
    }

    /// Short code used in artifact names.
    pub fn code(self) -> &'static str {
        match self {
            Self::Spt => "SPT",
            Self::T => "T",
            Self::H => "H",
            Self::I => "I",
        }
    }
}

impl fmt::Display for LoadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Maze and load dimensions, already read from whatever source holds them.
///
/// # Examples
///
/// ```
/// use cspace_core::{LoadShape, MazeDimensions, MazeGeometry};
///
/// let maze = MazeDimensions {
///     slits: vec![10.0, 16.0],
///     arena_height: 8.0,
///     exit_size: 2.0,
///     average_radius: 1.5,
///     load_dimensions: vec![4.0, 2.0],
///     load_shape: LoadShape::Spt,
/// };
/// assert_eq!(maze.transition_gap(), 2.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MazeDimensions {
    /// x positions of the slit walls, ascending.
    pub slits: Vec<f64>,
    /// Arena height.
    pub arena_height: f64,
    /// Exit width.
    pub exit_size: f64,
    /// Average radius of the load.
    pub average_radius: f64,
    /// Load dimensions.
    pub load_dimensions: Vec<f64>,
    /// Load shape.
    pub load_shape: LoadShape,
}

impl MazeGeometry for MazeDimensions {
    fn slits(&self) -> &[f64] {
        &self.slits
    }

    fn arena_height(&self) -> f64 {
        self.arena_height
    }

    fn exit_size(&self) -> f64 {
        self.exit_size
    }

    fn average_radius(&self) -> f64 {
        self.average_radius
    }

    fn load_dimensions(&self) -> &[f64] {
        &self.load_dimensions
    }

    fn load_shape(&self) -> LoadShape {
        self.load_shape
    }
}
