//! Configuration-space construction from a collision oracle.
//!
//! [`SpaceBuilder`] sweeps every cell of a [`GridSpace`](cspace_space::GridSpace),
//! asking a [`CollisionOracle`](cspace_core::CollisionOracle) whether the
//! load fits at that pose, and [`compute_boundary`] marks free cells next
//! to an obstacle. [`BuildConfig`] and [`MazeKey`] carry everything that
//! used to be implied by which maze was being studied, including the
//! geometry-derived erosion radius and transition cutoff.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod builder;
pub mod config;

pub use builder::{compute_boundary, BuildError, SpaceBuilder};
pub use config::{
    erosion_radius_default, max_transition_distance, BuildConfig, ConfigError, MazeKey,
};
