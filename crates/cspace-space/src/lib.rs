//! Configuration-space grids for a rigid load in a maze.
//!
//! This crate defines [`GridSpace`], the single source of truth for
//! coordinate mapping and neighbourhoods over the (x, y, θ) lattice,
//! along with the dense [`Grid3`] storage every later stage reads and
//! writes.
//!
//! # Topology
//!
//! x and y are bounded ([`EdgeBehavior::Absorb`]): cells past the maze
//! walls simply do not exist. θ is periodic ([`EdgeBehavior::Wrap`]):
//! the cell after `nθ - 1` is `0`. Every stage that needs a neighbour or
//! an axis offset goes through [`GridSpace`] or [`resolve_axis`] so the
//! wrap rule lives in exactly one place.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod edge;
pub mod error;
pub mod extent;
pub mod grid;
pub mod space;

#[cfg(test)]
pub(crate) mod compliance;

pub use edge::{resolve_axis, EdgeBehavior};
pub use error::SpaceError;
pub use extent::{Extent, Resolution};
pub use grid::{BoolGrid, DistanceGrid, Grid3, LabelGrid, ThetaFace};
pub use space::{GridSpace, Neighbour, TrimWindow};
