//! Core types and traits for maze configuration-space labeling.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the workspace: cell and
//! pose types, region names, per-cell labels, the collision oracle and
//! maze geometry traits, and the oracle error type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod geometry;
pub mod id;
pub mod label;
pub mod traits;

pub use error::OracleError;
pub use geometry::{LoadShape, MazeDimensions};
pub use id::{Axis, Cell, Pose, RegionName};
pub use label::Label;
pub use traits::{CollisionOracle, MazeGeometry};
