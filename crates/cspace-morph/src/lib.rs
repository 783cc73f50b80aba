//! Grid algorithms over the configuration space.
//!
//! Every operation here takes immutable grids and returns new ones:
//!
//! 1. [`erode`] / [`dilate`]: cube morphology, erosion made seam-aware by
//!    a half-period θ roll.
//! 2. [`label_components`]: 6-connected components with the θ seam left
//!    open, so a region straddling it shows up as two pieces.
//! 3. [`geodesic_distance`]: masked shortest-path distance over the 26
//!    neighbourhood, periodic in θ.
//! 4. [`downsample`]: block-average reduction for inspection.
//! 5. [`DualGraph`]: weighted cell adjacency, over free space or a
//!    downsampled grid.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod components;
pub mod distance;
pub mod dual;
pub mod downsample;
pub mod error;
pub mod morphology;

pub use components::{label_components, Component, ComponentLabels};
pub use distance::geodesic_distance;
pub use dual::DualGraph;
pub use downsample::downsample;
pub use error::MorphError;
pub use morphology::{dilate, erode, erode_non_periodic, StructuringElement};
