//! Load-or-compute orchestration of every stage.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cspace_build::{compute_boundary, BuildConfig, BuildError, ConfigError, MazeKey, SpaceBuilder};
use cspace_core::{CollisionOracle, Label, MazeGeometry, Pose, RegionName};
use cspace_label::{
    check_integrity, compute_distance_fields, ComponentSegmenter, LabelConfig, LabelError,
    LabelParams, Labeler, Region, SegmentConfig, SegmentError,
};
use cspace_morph::{dilate, erode, MorphError};
use cspace_space::{BoolGrid, GridSpace, LabelGrid, SpaceError};
use cspace_store::{
    ArtifactLayout, LabeledRecord, LabelsRecord, SpaceRecord, StoreError, StoredRegion,
};
use indexmap::IndexMap;

// ── PipelineConfig ─────────────────────────────────────────────────

/// Configuration of a full labeling run.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Collision sweep parameters.
    pub build: BuildConfig,
    /// Region selection parameters.
    pub segment: SegmentConfig,
    /// Labeling parameters.
    pub label: LabelConfig,
    /// Root directory of the artifact layout.
    pub store_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            build: BuildConfig::default(),
            segment: SegmentConfig::default(),
            label: LabelConfig::default(),
            store_dir: PathBuf::from("configuration_spaces"),
        }
    }
}

impl PipelineConfig {
    /// Validate every stage's configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.build.validate()?;
        self.segment.validate()?;
        self.label.validate()
    }
}

// ── PipelineError ──────────────────────────────────────────────────

/// Errors from any stage of the pipeline.
#[derive(Debug)]
pub enum PipelineError {
    /// Invalid configuration or geometry.
    Config(ConfigError),
    /// The collision sweep failed.
    Build(BuildError),
    /// Erosion or dilation failed.
    Morph(MorphError),
    /// Region selection failed.
    Segment(SegmentError),
    /// Labeling or the integrity check failed.
    Label(LabelError),
    /// Reading or writing an artifact failed.
    Store(StoreError),
    /// A grid did not match the space.
    Space(SpaceError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Build(e) => write!(f, "build: {e}"),
            Self::Morph(e) => write!(f, "morphology: {e}"),
            Self::Segment(e) => write!(f, "segment: {e}"),
            Self::Label(e) => write!(f, "label: {e}"),
            Self::Store(e) => write!(f, "store: {e}"),
            Self::Space(e) => write!(f, "space: {e}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Build(e) => Some(e),
            Self::Morph(e) => Some(e),
            Self::Segment(e) => Some(e),
            Self::Label(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::Space(e) => Some(e),
        }
    }
}

macro_rules! from_error {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(impl From<$source> for PipelineError {
            fn from(e: $source) -> Self {
                Self::$variant(e)
            }
        })*
    };
}

from_error! {
    ConfigError => Config,
    BuildError => Build,
    MorphError => Morph,
    SegmentError => Segment,
    LabelError => Label,
    StoreError => Store,
    SpaceError => Space,
}

impl From<io::Error> for PipelineError {
    fn from(e: io::Error) -> Self {
        Self::Store(StoreError::Io(e))
    }
}

// ── LabeledSpace ───────────────────────────────────────────────────

/// The result of the labeling stage.
#[derive(Clone, Debug)]
pub struct LabeledSpace {
    space: GridSpace,
    erosion_radius: usize,
    eroded: BoolGrid,
    regions: Vec<Region>,
    labels: LabelGrid,
}

impl LabeledSpace {
    /// The grid the labels live on.
    pub fn space(&self) -> &GridSpace {
        &self.space
    }

    /// Erosion radius the regions were computed with.
    pub fn erosion_radius(&self) -> usize {
        self.erosion_radius
    }

    /// Eroded free space.
    pub fn eroded(&self) -> &BoolGrid {
        &self.eroded
    }

    /// Canonical regions in name order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Per-cell labels.
    pub fn labels(&self) -> &LabelGrid {
        &self.labels
    }

    /// Region name to physical centroid, in name order.
    pub fn centroids(&self) -> IndexMap<RegionName, Pose> {
        self.regions
            .iter()
            .map(|r| (r.name(), r.centroid()))
            .collect()
    }

    /// Label of the cell containing `pose`.
    pub fn label_at(&self, pose: &Pose) -> Result<Label, SpaceError> {
        Ok(self.labels[self.space.coords_to_cell(pose)?])
    }

    fn to_record(&self) -> LabeledRecord {
        LabeledRecord {
            erosion_radius: self.erosion_radius,
            eroded: self.eroded.clone(),
            regions: self
                .regions
                .iter()
                .map(|r| StoredRegion {
                    name: r.name(),
                    mask: r.mask().clone(),
                    centroid: r.centroid(),
                })
                .collect(),
            labels: self.labels.clone(),
        }
    }
}

// ── Pipeline ───────────────────────────────────────────────────────

/// Computes, caches and reloads the artifacts of one maze/load pair.
///
/// Every `load_or_compute_*` method first tries the artifact file and
/// falls back to computing (and saving) it when the file is absent or
/// was produced for a different grid.
pub struct Pipeline<'a, G: MazeGeometry, O: CollisionOracle + ?Sized> {
    config: PipelineConfig,
    key: MazeKey,
    geometry: G,
    oracle: &'a O,
    space: GridSpace,
    params: LabelParams,
    layout: ArtifactLayout,
}

/// `Ok(None)` when the file does not exist.
fn load_optional<T>(
    path: &Path,
    load: impl FnOnce(&Path) -> Result<T, StoreError>,
) -> Result<Option<T>, StoreError> {
    match load(path) {
        Ok(record) => Ok(Some(record)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

impl<'a, G: MazeGeometry, O: CollisionOracle + ?Sized> Pipeline<'a, G, O> {
    /// Validate `config`, derive the grid and resolve label parameters.
    pub fn new(
        config: PipelineConfig,
        key: MazeKey,
        geometry: G,
        oracle: &'a O,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        let space = config.build.derive_space(&geometry)?;
        let params = config.label.resolve(&space, &geometry, &key)?;
        let layout = ArtifactLayout::new(&config.store_dir, &key);
        log::info!(
            "pipeline for {key}: grid {:?}, erosion radius {}, transition cutoff {}",
            space.shape(),
            params.erosion_radius,
            params.max_transition_distance
        );
        Ok(Self {
            config,
            key,
            geometry,
            oracle,
            space,
            params,
            layout,
        })
    }

    /// The maze being labeled.
    pub fn key(&self) -> &MazeKey {
        &self.key
    }

    /// The maze geometry.
    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// The derived grid.
    pub fn space(&self) -> &GridSpace {
        &self.space
    }

    /// Resolved erosion radius and transition cutoff.
    pub fn params(&self) -> LabelParams {
        self.params
    }

    /// Artifact paths.
    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    /// The swept space, from disk if present.
    ///
    /// Walls are re-sealed after loading when `force_walls` is set.
    pub fn load_or_compute_space(&self) -> Result<SpaceRecord, PipelineError> {
        let path = self.layout.space_path();
        if let Some(mut record) = load_optional(&path, |p| cspace_store::load_space(p))? {
            if self.describes_this_grid(&record) {
                if !record.extent.theta_is_full_turn() {
                    log::warn!(
                        "{}: θ extent {:?} is not a full turn",
                        path.display(),
                        record.extent.theta
                    );
                }
                if self.config.build.force_walls {
                    record.occupancy.force_walls();
                }
                return Ok(record);
            }
            log::warn!(
                "{} holds a {:?} grid over {:?} at {:?}, expected {:?} over {:?} at {:?}; recomputing",
                path.display(),
                record.occupancy.shape(),
                record.extent,
                record.resolution,
                self.space.shape(),
                self.space.extent(),
                self.space.resolution()
            );
        }

        let free = SpaceBuilder::new(&self.space, self.oracle, &self.config.build)?.compute_space()?;
        let boundary = compute_boundary(&self.space, &free)?;
        let record = SpaceRecord {
            occupancy: free,
            boundary,
            extent: *self.space.extent(),
            resolution: *self.space.resolution(),
        };
        cspace_store::save_space(&path, &record)?;
        Ok(record)
    }

    /// Eroded space, regions and labels, from disk if present.
    pub fn load_or_compute_labeled(&self) -> Result<LabeledSpace, PipelineError> {
        let r = self.params.erosion_radius;
        let path = self.layout.labeled_path(r);
        if let Some(record) = load_optional(&path, |p| cspace_store::load_labeled(p))? {
            if record.erosion_radius == r && record.labels.shape() == self.space.shape() {
                return self.restore(record);
            }
            log::warn!("{} does not match this grid; recomputing", path.display());
        }

        let labeled = self.compute_labeled()?;
        cspace_store::save_labeled(&path, &labeled.to_record())?;
        cspace_store::save_labels(
            self.layout.labels_path(r),
            &LabelsRecord {
                names: labeled.regions.iter().map(Region::name).collect(),
                labels: labeled.labels.clone(),
            },
        )?;
        Ok(labeled)
    }

    /// Labels alone: the small artifact if present, else the full stage.
    ///
    /// A loaded grid must pass the same integrity check as a freshly
    /// computed one.
    pub fn load_labels(&self) -> Result<LabelGrid, PipelineError> {
        let path = self.layout.labels_path(self.params.erosion_radius);
        if let Some(record) = load_optional(&path, |p| cspace_store::load_labels(p))? {
            if record.labels.shape() == self.space.shape() {
                if record.names.is_empty() {
                    return Err(LabelError::NoRegions.into());
                }
                check_integrity(&record.labels, &record.names)?;
                return Ok(record.labels);
            }
            log::warn!("{} does not match this grid; recomputing", path.display());
        }
        Ok(self.load_or_compute_labeled()?.labels)
    }

    /// Delete the labeled artifacts so the next call recomputes them.
    /// The swept space is kept.
    pub fn invalidate(&self) -> Result<(), PipelineError> {
        let r = self.params.erosion_radius;
        for path in [self.layout.labeled_path(r), self.layout.labels_path(r)] {
            log::info!("invalidating {}", path.display());
            remove_if_present(&path)?;
        }
        Ok(())
    }

    /// Same shape, extent and resolution as the derived grid.
    fn describes_this_grid(&self, record: &SpaceRecord) -> bool {
        record.occupancy.shape() == self.space.shape()
            && record.extent == *self.space.extent()
            && record.resolution == *self.space.resolution()
    }

    fn compute_labeled(&self) -> Result<LabeledSpace, PipelineError> {
        let base = self.load_or_compute_space()?;
        let free = &base.occupancy;
        let r = self.params.erosion_radius;

        log::info!("eroding with radius {r}");
        let eroded = erode(free, r)?;
        let mut regions =
            ComponentSegmenter::new(self.config.segment.clone())?.segment(&eroded, &self.space)?;

        let passable = dilate(free, r)?;
        compute_distance_fields(&mut regions, &self.space, &passable)?;
        let labels = Labeler::new(
            &self.space,
            free,
            &regions,
            self.params.max_transition_distance,
        )?
        .label_all()?;

        Ok(LabeledSpace {
            space: self.space.clone(),
            erosion_radius: r,
            eroded,
            regions,
            labels,
        })
    }

    fn restore(&self, record: LabeledRecord) -> Result<LabeledSpace, PipelineError> {
        let mut regions = Vec::with_capacity(record.regions.len());
        for stored in record.regions {
            self.space.check_grid(&stored.mask)?;
            regions.push(Region::from_parts(stored.name, stored.mask, stored.centroid));
        }
        if regions.is_empty() {
            return Err(LabelError::NoRegions.into());
        }
        let names: Vec<RegionName> = regions.iter().map(Region::name).collect();
        check_integrity(&record.labels, &names)?;
        Ok(LabeledSpace {
            space: self.space.clone(),
            erosion_radius: record.erosion_radius,
            eroded: record.eroded,
            regions,
            labels: record.labels,
        })
    }
}
