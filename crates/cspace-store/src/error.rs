//! Error types for artifact persistence.

use std::fmt;
use std::io;

use crate::record::RecordKind;

/// Errors that can occur while saving or loading an artifact.
#[derive(Debug)]
pub enum StoreError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// The file does not start with `b"CSPC"`.
    InvalidMagic,
    /// The format version is not supported by this build.
    UnsupportedVersion {
        /// The version found in the file.
        found: u8,
    },
    /// The file holds a different record kind than requested.
    WrongRecordKind {
        /// The kind the caller asked for.
        expected: RecordKind,
        /// The kind tag found in the file.
        found: u8,
    },
    /// The payload could not be decoded (truncated or inconsistent data).
    Malformed {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// The payload does not hash to the stored checksum.
    ChecksumMismatch {
        /// Checksum stored in the file.
        stored: u64,
        /// Checksum of the payload as read.
        computed: u64,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected b\"CSPC\")"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported format version {found}")
            }
            Self::WrongRecordKind { expected, found } => {
                write!(f, "expected a {expected} record, found kind tag {found}")
            }
            Self::Malformed { detail } => write!(f, "malformed artifact: {detail}"),
            Self::ChecksumMismatch { stored, computed } => write!(
                f,
                "checksum mismatch: stored={stored:#018x}, computed={computed:#018x}"
            ),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl StoreError {
    /// Whether this error means the artifact file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == io::ErrorKind::NotFound)
    }
}
