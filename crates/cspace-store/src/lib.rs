//! Binary persistence for configuration-space artifacts.
//!
//! Three record kinds are stored, one per file:
//!
//! - [`SpaceRecord`]: the swept occupancy grid, its boundary, extent and
//!   resolution.
//! - [`LabeledRecord`]: the eroded grid, the canonical regions and the
//!   label grid.
//! - [`LabelsRecord`]: the label grid and the region names it uses, for
//!   consumers that need nothing else.
//!
//! [`ArtifactLayout`] decides where each record lives and
//! [`AtomicFile`] makes sure a reader never sees a half-written one.
//!
//! # Format
//!
//! ```text
//! [MAGIC "CSPC"] [VERSION u8] [KIND u8] [payload ...] [FNV-1a(payload) u64]
//! ```
//!
//! All integers are little-endian. Boolean grids are bit-packed, least
//! significant bit first, in storage order. Labels take two bytes per
//! cell.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod atomic;
pub mod codec;
pub mod error;
pub mod hash;
pub mod layout;
pub mod record;

pub use atomic::AtomicFile;
pub use error::StoreError;
pub use hash::checksum;
pub use layout::ArtifactLayout;
pub use record::{
    load_labeled, load_labels, load_space, save_labeled, save_labels, save_space, LabeledRecord,
    LabelsRecord, RecordKind, SpaceRecord, StoredRegion,
};

/// Magic bytes at the start of every artifact file.
pub const MAGIC: [u8; 4] = *b"CSPC";

/// Current binary format version.
pub const FORMAT_VERSION: u8 = 1;
