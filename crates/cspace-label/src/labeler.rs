//! Per-cell labeling against the canonical regions.

use std::error::Error;
use std::fmt;

use cspace_build::{erosion_radius_default, max_transition_distance, ConfigError, MazeKey};
use cspace_core::{Cell, Label, MazeGeometry, RegionName};
use cspace_morph::MorphError;
use cspace_space::{BoolGrid, GridSpace, LabelGrid, SpaceError};
use indexmap::IndexSet;
use rayon::prelude::*;

use crate::region::Region;

// ── LabelConfig ────────────────────────────────────────────────────

/// Labeling parameters; `None` derives the value from the maze.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelConfig {
    /// Erosion radius in cells. Default: derived from the arena height.
    pub erosion_radius: Option<usize>,
    /// Transition cutoff in cells. Default: derived from the maze's
    /// transition gap and the erosion radius.
    pub max_transition_distance: Option<f64>,
}

/// Labeling parameters with every default resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelParams {
    /// Erosion (and passable-space dilation) radius in cells.
    pub erosion_radius: usize,
    /// Largest geodesic distance, in cells, still labeled as a transition.
    pub max_transition_distance: f64,
}

impl LabelConfig {
    /// Check explicit overrides.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.erosion_radius == Some(0) {
            return Err(ConfigError::ZeroErosionRadius);
        }
        if let Some(d) = self.max_transition_distance {
            if d.is_nan() || d < 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name: "max_transition_distance",
                    reason: format!("must be non-negative, got {d}"),
                });
            }
        }
        Ok(())
    }

    /// Fill in geometry-derived defaults.
    pub fn resolve(
        &self,
        space: &GridSpace,
        geometry: &impl MazeGeometry,
        key: &MazeKey,
    ) -> Result<LabelParams, ConfigError> {
        self.validate()?;
        let erosion_radius = match self.erosion_radius {
            Some(r) => r,
            None => erosion_radius_default(space, key)?,
        };
        let max_transition_distance = self
            .max_transition_distance
            .unwrap_or_else(|| max_transition_distance(space, geometry, erosion_radius));
        Ok(LabelParams {
            erosion_radius,
            max_transition_distance,
        })
    }
}

// ── LabelError ─────────────────────────────────────────────────────

/// Errors from labeling.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelError {
    /// A cell ended up with a label outside the region alphabet.
    IntegrityViolation {
        /// First offending cell in storage order.
        cell: Cell,
        /// Its label.
        label: Label,
    },
    /// No regions were supplied.
    NoRegions,
    /// A region's distance field has not been computed.
    MissingDistance {
        /// The region lacking a field.
        name: RegionName,
    },
    /// A grid did not match the space.
    Space(SpaceError),
    /// Distance computation failed.
    Morph(MorphError),
    /// The label configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntegrityViolation { cell, label } => {
                write!(f, "cell {cell:?} has invalid label {:?}", label.to_string())
            }
            Self::NoRegions => write!(f, "no regions to label against"),
            Self::MissingDistance { name } => {
                write!(f, "region {name} has no distance field")
            }
            Self::Space(e) => write!(f, "space: {e}"),
            Self::Morph(e) => write!(f, "distance field: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl Error for LabelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            Self::Morph(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SpaceError> for LabelError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

impl From<MorphError> for LabelError {
    fn from(e: MorphError) -> Self {
        Self::Morph(e)
    }
}

impl From<ConfigError> for LabelError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ── Distance fields ────────────────────────────────────────────────

/// Compute every region's distance field through `passable`, one rayon
/// task per region.
pub fn compute_distance_fields(
    regions: &mut [Region],
    space: &GridSpace,
    passable: &BoolGrid,
) -> Result<(), MorphError> {
    log::info!("computing distance fields for {} regions", regions.len());
    regions
        .par_iter_mut()
        .try_for_each(|r| r.compute_distance(space, passable))
}

// ── Labeler ────────────────────────────────────────────────────────

/// Assigns a [`Label`] to every cell.
///
/// For a cell that is free but outside every region, regions are ranked
/// by distance (ties by name) and the nearest one or two within
/// `max_transition_distance` name the cell. If none are that close, the
/// nearest two by uncapped distance are used instead.
pub struct Labeler<'a> {
    space: &'a GridSpace,
    free: &'a BoolGrid,
    regions: &'a [Region],
    max_distance: f64,
}

impl<'a> Labeler<'a> {
    /// Create a labeler; every region must carry its distance field.
    pub fn new(
        space: &'a GridSpace,
        free: &'a BoolGrid,
        regions: &'a [Region],
        max_distance: f64,
    ) -> Result<Self, LabelError> {
        space.check_grid(free)?;
        if regions.is_empty() {
            return Err(LabelError::NoRegions);
        }
        for r in regions {
            space.check_grid(r.mask())?;
            match r.distance() {
                Some(d) => space.check_grid(d)?,
                None => return Err(LabelError::MissingDistance { name: r.name() }),
            }
        }
        Ok(Self {
            space,
            free,
            regions,
            max_distance,
        })
    }

    /// Names of the regions, in order.
    pub fn names(&self) -> Vec<RegionName> {
        self.regions.iter().map(Region::name).collect()
    }

    /// Label of a single cell.
    pub fn label_cell(&self, cell: Cell) -> Label {
        if !self.free[cell] {
            return Label::Occupied;
        }
        if let Some(r) = self.regions.iter().find(|r| r.mask()[cell]) {
            return Label::Region(r.name());
        }

        let mut ranked: Vec<(f64, RegionName)> = self
            .regions
            .iter()
            .map(|r| {
                let d = r.distance().map_or(f64::INFINITY, |field| field[cell]);
                (d, r.name())
            })
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let near: Vec<RegionName> = ranked
            .iter()
            .filter(|(d, _)| d.is_finite() && *d <= self.max_distance)
            .take(2)
            .map(|&(_, n)| n)
            .collect();
        if !near.is_empty() {
            return Label::from_ranked(&near);
        }
        let fallback: Vec<RegionName> = ranked.iter().take(2).map(|&(_, n)| n).collect();
        Label::from_ranked(&fallback)
    }

    /// Label every cell, parallel over x-slices, then check the result.
    pub fn label_all(&self) -> Result<LabelGrid, LabelError> {
        log::info!(
            "labeling {} cells against {} regions",
            self.space.cell_count(),
            self.regions.len()
        );
        let mut labels = self.space.filled(Label::Unassigned);
        let slice_len = labels.x_slice_len();
        labels
            .as_mut_slice()
            .par_chunks_mut(slice_len)
            .enumerate()
            .for_each(|(x, chunk)| {
                for (i, label) in chunk.iter_mut().enumerate() {
                    *label = self.label_cell(self.free.cell_of(x * slice_len + i));
                }
            });
        check_integrity(&labels, &self.names())?;
        Ok(labels)
    }
}

fn is_valid(label: Label, names: &[RegionName]) -> bool {
    match label {
        Label::Occupied => true,
        Label::Region(a) => names.contains(&a),
        Label::Transition(a, b) => a != b && names.contains(&a) && names.contains(&b),
        Label::Unassigned => false,
    }
}

/// `Err(IntegrityViolation)` for the first cell whose label is not `"0"`,
/// one of `names` or two distinct members of `names`.
pub fn check_integrity(labels: &LabelGrid, names: &[RegionName]) -> Result<(), LabelError> {
    match labels.iter_cells().find(|(_, &l)| !is_valid(l, names)) {
        Some((cell, &label)) => Err(LabelError::IntegrityViolation { cell, label }),
        None => Ok(()),
    }
}

/// Every distinct invalid label, in order of first appearance.
pub fn unexpected_labels(labels: &LabelGrid, names: &[RegionName]) -> Vec<Label> {
    labels
        .as_slice()
        .iter()
        .copied()
        .filter(|&l| !is_valid(l, names))
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cspace_core::{LoadShape, MazeDimensions};
    use cspace_test_utils::fixtures::unit_space;

    fn n(c: char) -> RegionName {
        RegionName::from_char(c).unwrap()
    }

    /// A 1-D corridor along x with a region at each end.
    fn corridor(len: usize) -> (GridSpace, BoolGrid, Vec<Region>) {
        let s = unit_space([len, 1, 1]);
        let free = s.filled(true);
        let mut left = s.filled(false);
        left[[0, 0, 0]] = true;
        let mut right = s.filled(false);
        right[[len - 1, 0, 0]] = true;
        let mut regions = vec![
            Region::from_mask(n('a'), left, &s).unwrap(),
            Region::from_mask(n('b'), right, &s).unwrap(),
        ];
        compute_distance_fields(&mut regions, &s, &free).unwrap();
        (s, free, regions)
    }

    #[test]
    fn requires_distance_fields() {
        let s = unit_space([3, 1, 1]);
        let free = s.filled(true);
        let mut mask = s.filled(false);
        mask[[0, 0, 0]] = true;
        let regions = vec![Region::from_mask(n('a'), mask, &s).unwrap()];
        assert_eq!(
            Labeler::new(&s, &free, &regions, 10.0).err(),
            Some(LabelError::MissingDistance { name: n('a') })
        );
        assert_eq!(
            Labeler::new(&s, &free, &[], 10.0).err(),
            Some(LabelError::NoRegions)
        );
    }

    #[test]
    fn nearest_region_comes_first() {
        let (s, free, regions) = corridor(7);
        let labeler = Labeler::new(&s, &free, &regions, 100.0).unwrap();
        assert_eq!(labeler.label_cell([0, 0, 0]), Label::Region(n('a')));
        assert_eq!(labeler.label_cell([1, 0, 0]), Label::Transition(n('a'), n('b')));
        assert_eq!(labeler.label_cell([5, 0, 0]), Label::Transition(n('b'), n('a')));
        // Equidistant: name order breaks the tie.
        assert_eq!(labeler.label_cell([3, 0, 0]), Label::Transition(n('a'), n('b')));
    }

    #[test]
    fn cutoff_can_leave_a_single_letter() {
        let (s, free, regions) = corridor(9);
        let labeler = Labeler::new(&s, &free, &regions, 2.0).unwrap();
        assert_eq!(labeler.label_cell([2, 0, 0]), Label::Region(n('a')));
        assert_eq!(labeler.label_cell([7, 0, 0]), Label::Region(n('b')));
        // Nothing within 2 cells: fall back to the uncapped ranking.
        assert_eq!(labeler.label_cell([5, 0, 0]), Label::Transition(n('b'), n('a')));
    }

    #[test]
    fn occupied_cells_are_zero() {
        let (s, mut free, regions) = corridor(5);
        free[[2, 0, 0]] = false;
        let labeler = Labeler::new(&s, &free, &regions, 100.0).unwrap();
        let labels = labeler.label_all().unwrap();
        assert_eq!(labels[[2, 0, 0]], Label::Occupied);
        assert_eq!(labels[[2, 0, 0]].to_string(), "0");
    }

    #[test]
    fn integrity_rejects_unknown_and_repeated_names() {
        let s = unit_space([4, 1, 1]);
        let mut labels = s.filled(Label::Occupied);
        let names = [n('a'), n('b')];
        assert!(check_integrity(&labels, &names).is_ok());

        labels[[1, 0, 0]] = Label::Transition(n('a'), n('a'));
        labels[[2, 0, 0]] = Label::Region(n('c'));
        labels[[3, 0, 0]] = Label::Transition(n('a'), n('a'));
        assert_eq!(
            check_integrity(&labels, &names),
            Err(LabelError::IntegrityViolation {
                cell: [1, 0, 0],
                label: Label::Transition(n('a'), n('a')),
            })
        );
        assert_eq!(
            unexpected_labels(&labels, &names),
            vec![Label::Transition(n('a'), n('a')), Label::Region(n('c'))]
        );
    }

    #[test]
    fn unassigned_is_never_valid() {
        let s = unit_space([2, 1, 1]);
        let labels = s.filled(Label::Unassigned);
        assert!(check_integrity(&labels, &[n('a')]).is_err());
    }

    #[test]
    fn resolve_fills_defaults_from_geometry() {
        let maze = MazeDimensions {
            slits: vec![10.0, 16.0],
            arena_height: 21.322_222_2,
            exit_size: 3.0,
            average_radius: 1.0,
            load_dimensions: vec![4.0, 2.0],
            load_shape: LoadShape::Spt,
        };
        let space = GridSpace::from_geometry(&maze, 0.25).unwrap();
        let key = MazeKey::new("ant", "XL", LoadShape::Spt, "MazeDimensions_ant");
        let params = LabelConfig::default().resolve(&space, &maze, &key).unwrap();
        assert_eq!(params.erosion_radius, 4);
        assert_eq!(
            params.max_transition_distance,
            max_transition_distance(&space, &maze, 4)
        );

        let explicit = LabelConfig {
            erosion_radius: Some(2),
            max_transition_distance: Some(7.5),
        };
        let params = explicit.resolve(&space, &maze, &key).unwrap();
        assert_eq!(params.erosion_radius, 2);
        assert_eq!(params.max_transition_distance, 7.5);
    }

    #[test]
    fn rejects_zero_radius_override() {
        let cfg = LabelConfig {
            erosion_radius: Some(0),
            ..LabelConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroErosionRadius));
    }
}
