//! Labeled configuration spaces for a rigid load moving through a slit
//! maze.
//!
//! This is the top-level facade crate that re-exports the public API of
//! every cspace sub-crate and adds [`Pipeline`], which runs the stages
//! end to end and caches their artifacts on disk.
//!
//! # Quick start
//!
//! ```no_run
//! use cspace::prelude::*;
//!
//! struct Walls;
//! impl CollisionOracle for Walls {
//!     fn is_free(&self, pose: &Pose) -> Result<bool, OracleError> {
//!         Ok(pose.y > 1.0 && pose.y < 7.0)
//!     }
//! }
//!
//! let maze = MazeDimensions {
//!     slits: vec![8.0, 14.0],
//!     arena_height: 8.0,
//!     exit_size: 2.0,
//!     average_radius: 1.0,
//!     load_dimensions: vec![4.0, 2.0],
//!     load_shape: LoadShape::Spt,
//! };
//! let key = MazeKey::new("ant", "XL", LoadShape::Spt, "MazeDimensions_ant");
//! let pipeline = Pipeline::new(PipelineConfig::default(), key, maze, &Walls)?;
//! let labeled = pipeline.load_or_compute_labeled()?;
//! for (name, centroid) in labeled.centroids() {
//!     println!("{name}: {centroid:?}");
//! }
//! # Ok::<(), PipelineError>(())
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `cspace-core` | Poses, region names, labels, oracle and geometry traits |
//! | [`space`] | `cspace-space` | `GridSpace`, `Grid3`, neighbourhoods |
//! | [`morph`] | `cspace-morph` | Erosion, dilation, components, geodesic distance |
//! | [`build`] | `cspace-build` | Collision sweep, build config, derived constants |
//! | [`label`] | `cspace-label` | Region selection and per-cell labeling |
//! | [`store`] | `cspace-store` | Artifact files and their layout |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod pipeline;

pub use pipeline::{LabeledSpace, Pipeline, PipelineConfig, PipelineError};

/// Core types and traits (`cspace-core`).
pub use cspace_core as types;

/// Grid geometry and storage (`cspace-space`).
///
/// [`space::GridSpace`] owns every coordinate mapping and neighbourhood
/// rule; [`space::Grid3`] is the dense storage all stages share.
pub use cspace_space as space;

/// Morphology, components and distance fields (`cspace-morph`).
pub use cspace_morph as morph;

/// Collision sweep and geometry-derived constants (`cspace-build`).
pub use cspace_build as build;

/// Region selection and labeling (`cspace-label`).
pub use cspace_label as label;

/// Artifact persistence (`cspace-store`).
pub use cspace_store as store;

/// Common imports for typical use.
///
/// ```rust
/// use cspace::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use cspace_core::{
        Axis, Cell, CollisionOracle, Label, LoadShape, MazeDimensions, MazeGeometry,
        OracleError, Pose, RegionName,
    };

    // Grids
    pub use cspace_space::{BoolGrid, GridSpace, LabelGrid};

    // Configuration
    pub use cspace_build::{BuildConfig, MazeKey};
    pub use cspace_label::{LabelConfig, SegmentConfig};

    // Pipeline
    pub use crate::pipeline::{LabeledSpace, Pipeline, PipelineConfig, PipelineError};
}
