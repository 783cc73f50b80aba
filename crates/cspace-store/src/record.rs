//! Artifact records and their file framing.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use cspace_core::{Pose, RegionName};
use cspace_space::{BoolGrid, Extent, LabelGrid, Resolution};

use crate::atomic::AtomicFile;
use crate::codec::*;
use crate::error::StoreError;
use crate::hash::checksum;
use crate::{FORMAT_VERSION, MAGIC};

/// Which record a file holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordKind {
    /// [`SpaceRecord`].
    Space = 1,
    /// [`LabeledRecord`].
    Labeled = 2,
    /// [`LabelsRecord`].
    Labels = 3,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Space => "space",
            Self::Labeled => "labeled",
            Self::Labels => "labels",
        })
    }
}

/// The swept configuration space.
#[derive(Clone, Debug, PartialEq)]
pub struct SpaceRecord {
    /// `true` = collision free.
    pub occupancy: BoolGrid,
    /// Free cells adjacent to an occupied one.
    pub boundary: BoolGrid,
    /// Physical extent.
    pub extent: Extent,
    /// Cell size.
    pub resolution: Resolution,
}

/// A canonical region as persisted: no distance field.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredRegion {
    /// Single-letter name.
    pub name: RegionName,
    /// Membership mask.
    pub mask: BoolGrid,
    /// Physical centroid.
    pub centroid: Pose,
}

/// Everything the labeling stage produces.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledRecord {
    /// Erosion radius the record was computed with.
    pub erosion_radius: usize,
    /// Eroded free space.
    pub eroded: BoolGrid,
    /// Canonical regions in name order.
    pub regions: Vec<StoredRegion>,
    /// Per-cell labels.
    pub labels: LabelGrid,
}

/// Labels alone, with the region names they were drawn from.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelsRecord {
    /// Canonical region names in name order.
    pub names: Vec<RegionName>,
    /// Per-cell labels.
    pub labels: LabelGrid,
}

fn malformed(detail: impl Into<String>) -> StoreError {
    StoreError::Malformed {
        detail: detail.into(),
    }
}

fn read_region_name(r: &mut dyn Read) -> Result<RegionName, StoreError> {
    let tag = read_u8(r)?;
    RegionName::from_char(tag as char)
        .ok_or_else(|| malformed(format!("invalid region name byte {tag:#04x}")))
}

// ── Framing ─────────────────────────────────────────────────────

fn encode_framed(w: &mut dyn Write, kind: RecordKind, payload: &[u8]) -> Result<(), StoreError> {
    w.write_all(&MAGIC)?;
    write_u8(w, FORMAT_VERSION)?;
    write_u8(w, kind as u8)?;
    w.write_all(payload)?;
    write_u64_le(w, checksum(payload))?;
    Ok(())
}

/// Read and validate the header and checksum, returning the payload.
fn decode_framed(r: &mut dyn Read, kind: RecordKind) -> Result<Vec<u8>, StoreError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(StoreError::InvalidMagic);
    }
    let version = read_u8(r)?;
    if version != FORMAT_VERSION {
        return Err(StoreError::UnsupportedVersion { found: version });
    }
    let found = read_u8(r)?;
    if found != kind as u8 {
        return Err(StoreError::WrongRecordKind {
            expected: kind,
            found,
        });
    }

    let mut rest = Vec::new();
    r.read_to_end(&mut rest)?;
    let Some(split) = rest.len().checked_sub(8) else {
        return Err(malformed("file ends before the checksum"));
    };
    let stored = read_u64_le(&mut &rest[split..])?;
    rest.truncate(split);
    let computed = checksum(&rest);
    if stored != computed {
        return Err(StoreError::ChecksumMismatch { stored, computed });
    }
    Ok(rest)
}

fn expect_consumed(rest: &[u8]) -> Result<(), StoreError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(malformed(format!("{} trailing payload bytes", rest.len())))
    }
}

fn expect_shape(what: &str, found: [usize; 3], expected: [usize; 3]) -> Result<(), StoreError> {
    if found == expected {
        Ok(())
    } else {
        Err(malformed(format!(
            "{what} has shape {found:?}, expected {expected:?}"
        )))
    }
}

// ── SpaceRecord ─────────────────────────────────────────────────

/// Encode a [`SpaceRecord`] with header and checksum.
pub fn encode_space(w: &mut dyn Write, record: &SpaceRecord) -> Result<(), StoreError> {
    let mut payload = Vec::new();
    write_extent(&mut payload, &record.extent)?;
    write_resolution(&mut payload, &record.resolution)?;
    write_bool_grid(&mut payload, &record.occupancy)?;
    write_bool_grid(&mut payload, &record.boundary)?;
    encode_framed(w, RecordKind::Space, &payload)
}

/// Decode a [`SpaceRecord`].
pub fn decode_space(r: &mut dyn Read) -> Result<SpaceRecord, StoreError> {
    let payload = decode_framed(r, RecordKind::Space)?;
    let mut p = payload.as_slice();
    let extent = read_extent(&mut p)?;
    let resolution = read_resolution(&mut p)?;
    let occupancy = read_bool_grid(&mut p)?;
    let boundary = read_bool_grid(&mut p)?;
    expect_consumed(p)?;
    expect_shape("boundary", boundary.shape(), occupancy.shape())?;
    Ok(SpaceRecord {
        occupancy,
        boundary,
        extent,
        resolution,
    })
}

// ── LabeledRecord ───────────────────────────────────────────────

/// Encode a [`LabeledRecord`] with header and checksum.
pub fn encode_labeled(w: &mut dyn Write, record: &LabeledRecord) -> Result<(), StoreError> {
    let mut payload = Vec::new();
    let radius = u32::try_from(record.erosion_radius)
        .map_err(|_| malformed(format!("erosion radius {} exceeds u32", record.erosion_radius)))?;
    write_u32_le(&mut payload, radius)?;
    write_bool_grid(&mut payload, &record.eroded)?;
    let count = u8::try_from(record.regions.len())
        .map_err(|_| malformed(format!("{} regions", record.regions.len())))?;
    write_u8(&mut payload, count)?;
    for region in &record.regions {
        write_u8(&mut payload, region.name.as_char() as u8)?;
        write_pose(&mut payload, &region.centroid)?;
        write_bool_grid(&mut payload, &region.mask)?;
    }
    write_label_grid(&mut payload, &record.labels)?;
    encode_framed(w, RecordKind::Labeled, &payload)
}

/// Decode a [`LabeledRecord`].
pub fn decode_labeled(r: &mut dyn Read) -> Result<LabeledRecord, StoreError> {
    let payload = decode_framed(r, RecordKind::Labeled)?;
    let mut p = payload.as_slice();
    let erosion_radius = read_u32_le(&mut p)? as usize;
    let eroded = read_bool_grid(&mut p)?;
    let count = read_u8(&mut p)? as usize;
    let mut regions = Vec::with_capacity(count);
    for _ in 0..count {
        let name = read_region_name(&mut p)?;
        let centroid = read_pose(&mut p)?;
        let mask = read_bool_grid(&mut p)?;
        expect_shape("region mask", mask.shape(), eroded.shape())?;
        regions.push(StoredRegion {
            name,
            mask,
            centroid,
        });
    }
    let labels = read_label_grid(&mut p)?;
    expect_consumed(p)?;
    expect_shape("labels", labels.shape(), eroded.shape())?;
    Ok(LabeledRecord {
        erosion_radius,
        eroded,
        regions,
        labels,
    })
}

// ── LabelsRecord ────────────────────────────────────────────────

/// Encode a [`LabelsRecord`] with header and checksum.
pub fn encode_labels(w: &mut dyn Write, record: &LabelsRecord) -> Result<(), StoreError> {
    let mut payload = Vec::new();
    let count = u8::try_from(record.names.len())
        .map_err(|_| malformed(format!("{} region names", record.names.len())))?;
    write_u8(&mut payload, count)?;
    for name in &record.names {
        write_u8(&mut payload, name.as_char() as u8)?;
    }
    write_label_grid(&mut payload, &record.labels)?;
    encode_framed(w, RecordKind::Labels, &payload)
}

/// Decode a [`LabelsRecord`].
pub fn decode_labels(r: &mut dyn Read) -> Result<LabelsRecord, StoreError> {
    let payload = decode_framed(r, RecordKind::Labels)?;
    let mut p = payload.as_slice();
    let count = read_u8(&mut p)? as usize;
    let mut names = Vec::with_capacity(count);
    for _ in 0..count {
        names.push(read_region_name(&mut p)?);
    }
    let labels = read_label_grid(&mut p)?;
    expect_consumed(p)?;
    Ok(LabelsRecord { names, labels })
}

// ── Files ───────────────────────────────────────────────────────

fn save_with(
    path: &Path,
    kind: RecordKind,
    encode: impl FnOnce(&mut dyn Write) -> Result<(), StoreError>,
) -> Result<(), StoreError> {
    log::info!("saving {kind} record to {}", path.display());
    let mut file = AtomicFile::create(path)?;
    encode(&mut file)?;
    file.commit()
}

fn load_with<T>(
    path: &Path,
    kind: RecordKind,
    decode: impl FnOnce(&mut dyn Read) -> Result<T, StoreError>,
) -> Result<T, StoreError> {
    let mut reader = BufReader::new(File::open(path)?);
    log::info!("loading {kind} record from {}", path.display());
    decode(&mut reader)
}

/// Atomically write a [`SpaceRecord`] to `path`.
pub fn save_space(path: impl AsRef<Path>, record: &SpaceRecord) -> Result<(), StoreError> {
    save_with(path.as_ref(), RecordKind::Space, |w| encode_space(w, record))
}

/// Read a [`SpaceRecord`] from `path`.
pub fn load_space(path: impl AsRef<Path>) -> Result<SpaceRecord, StoreError> {
    load_with(path.as_ref(), RecordKind::Space, decode_space)
}

/// Atomically write a [`LabeledRecord`] to `path`.
pub fn save_labeled(path: impl AsRef<Path>, record: &LabeledRecord) -> Result<(), StoreError> {
    save_with(path.as_ref(), RecordKind::Labeled, |w| {
        encode_labeled(w, record)
    })
}

/// Read a [`LabeledRecord`] from `path`.
pub fn load_labeled(path: impl AsRef<Path>) -> Result<LabeledRecord, StoreError> {
    load_with(path.as_ref(), RecordKind::Labeled, decode_labeled)
}

/// Atomically write a [`LabelsRecord`] to `path`.
pub fn save_labels(path: impl AsRef<Path>, record: &LabelsRecord) -> Result<(), StoreError> {
    save_with(path.as_ref(), RecordKind::Labels, |w| encode_labels(w, record))
}

/// Read a [`LabelsRecord`] from `path`.
pub fn load_labels(path: impl AsRef<Path>) -> Result<LabelsRecord, StoreError> {
    load_with(path.as_ref(), RecordKind::Labels, decode_labels)
}
