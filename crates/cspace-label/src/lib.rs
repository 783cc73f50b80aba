//! Canonical regions and per-cell labels.
//!
//! The labeling pipeline, given the free space and its eroded copy:
//!
//! 1. [`ComponentSegmenter::segment`] picks the canonical regions out of
//!    the eroded space and re-joins those split by the θ seam.
//! 2. [`compute_distance_fields`] gives each [`Region`] its geodesic
//!    distance field through the dilated free space.
//! 3. [`Labeler::label_all`] assigns every cell `"0"`, a region letter or
//!    the two nearest region letters, then checks the result with
//!    [`check_integrity`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod labeler;
pub mod reference;
pub mod region;
pub mod segment;

pub use labeler::{
    check_integrity, compute_distance_fields, unexpected_labels, LabelConfig, LabelError,
    LabelParams, Labeler,
};
pub use reference::closest_regions_by_growing_ball;
pub use region::Region;
pub use segment::{ComponentSegmenter, SegmentConfig, SegmentError};
