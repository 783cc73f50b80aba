//! Saving and loading artifacts through the on-disk layout.

use std::fs;

use cspace_build::MazeKey;
use cspace_core::{Label, LoadShape, RegionName};
use cspace_space::{BoolGrid, Extent, LabelGrid, Resolution};
use cspace_store::{
    load_labels, load_space, save_labels, save_space, ArtifactLayout, LabelsRecord, SpaceRecord,
    StoreError,
};
use cspace_test_utils::scratch_dir;

fn layout(name: &str) -> ArtifactLayout {
    let key = MazeKey::new("ant", "Large", LoadShape::Spt, "MazeDimensions_ant");
    ArtifactLayout::new(scratch_dir(name), &key)
}

fn record() -> SpaceRecord {
    let mut occupancy = BoolGrid::filled([6, 5, 7], true);
    occupancy.force_walls();
    occupancy[[3, 2, 6]] = false;
    SpaceRecord {
        boundary: occupancy.clone(),
        occupancy,
        extent: Extent::new((0.0, 3.0), (0.0, 2.5)),
        resolution: Resolution {
            position: 0.5,
            theta: std::f64::consts::TAU / 7.0,
        },
    }
}

fn leftover_tmp_files(layout: &ArtifactLayout) -> usize {
    fs::read_dir(layout.dir())
        .unwrap()
        .filter(|e| {
            e.as_ref()
                .unwrap()
                .path()
                .extension()
                .is_some_and(|ext| ext == "tmp")
        })
        .count()
}

#[test]
fn saved_space_loads_back_identically() {
    let l = layout("space-roundtrip");
    let rec = record();
    save_space(l.space_path(), &rec).unwrap();
    assert_eq!(load_space(l.space_path()).unwrap(), rec);
    assert_eq!(leftover_tmp_files(&l), 0);
}

#[test]
fn resaving_is_byte_identical() {
    let l = layout("space-bytes");
    let rec = record();
    save_space(l.space_path(), &rec).unwrap();
    let first = fs::read(l.space_path()).unwrap();
    let loaded = load_space(l.space_path()).unwrap();
    save_space(l.space_path(), &loaded).unwrap();
    assert_eq!(fs::read(l.space_path()).unwrap(), first);
}

#[test]
fn corrupted_file_is_detected() {
    let l = layout("space-corrupt");
    save_space(l.space_path(), &record()).unwrap();
    let mut bytes = fs::read(l.space_path()).unwrap();
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0xff;
    fs::write(l.space_path(), &bytes).unwrap();
    assert!(matches!(
        load_space(l.space_path()),
        Err(StoreError::ChecksumMismatch { .. })
    ));
}

#[test]
fn missing_file_reports_not_found() {
    let l = layout("space-missing");
    let err = load_space(l.space_path()).unwrap_err();
    assert!(err.is_not_found(), "{err}");
}

#[test]
fn small_labels_file_sits_next_to_the_space() {
    let l = layout("labels-small");
    let a = RegionName::from_char('a').unwrap();
    let mut labels = LabelGrid::filled([2, 2, 2], Label::Occupied);
    labels[[1, 1, 1]] = Label::Region(a);
    let rec = LabelsRecord {
        names: vec![a],
        labels,
    };
    save_labels(l.labels_path(3), &rec).unwrap();
    assert_eq!(load_labels(l.labels_path(3)).unwrap(), rec);
    assert_eq!(l.labels_path(3).parent(), Some(l.dir()));
    assert!(matches!(
        load_space(l.labels_path(3)),
        Err(StoreError::WrongRecordKind { .. })
    ));
}
