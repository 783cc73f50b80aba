//! Build configuration, maze identity and geometry-derived constants.

use std::error::Error;
use std::fmt;

use cspace_core::{Axis, LoadShape, MazeGeometry};
use cspace_space::{GridSpace, SpaceError};

/// Arena height divided by this gives the default erosion length.
///
/// Calibrated so the XL ant maze erodes by 0.9 cm; dividing the arena
/// height keeps the radius scale-free across maze sizes.
const EROSION_HEIGHT_DIVISOR: f64 = 21.322_222_2;

/// Extra erosion for human solvers in the two small mazes.
const HUMAN_SMALL_EROSION_BONUS: usize = 4;

// ── MazeKey ────────────────────────────────────────────────────────

/// Identifies one maze/load combination.
///
/// A key selects the geometry, the artifact file names and the small
/// adjustments some mazes need (see [`erosion_radius_default`]).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MazeKey {
    /// Who solved the maze (`"ant"`, `"human"`, ...).
    pub solver: String,
    /// Maze size name (`"XL"`, `"Small Far"`, ...).
    pub size: String,
    /// Load shape.
    pub shape: LoadShape,
    /// Geometry source tag, e.g. `"MazeDimensions_human"`.
    pub geometry: String,
}

impl MazeKey {
    /// Create a key from its parts.
    pub fn new(
        solver: impl Into<String>,
        size: impl Into<String>,
        shape: LoadShape,
        geometry: impl Into<String>,
    ) -> Self {
        Self {
            solver: solver.into(),
            size: size.into(),
            shape,
            geometry: geometry.into(),
        }
    }

    /// Whether this is one of the two small mazes sharing one geometry.
    pub fn is_small_variant(&self) -> bool {
        matches!(self.size.as_str(), "Small Far" | "Small Near")
    }

    /// Size name as it appears in file names.
    ///
    /// `"Small Far"` and `"Small Near"` have identical dimensions and
    /// share the `"Small"` artifacts.
    pub fn size_stem(&self) -> &str {
        if self.is_small_variant() {
            "Small"
        } else {
            &self.size
        }
    }
}

impl fmt::Display for MazeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.solver, self.size, self.shape, self.geometry
        )
    }
}

// ── BuildConfig ────────────────────────────────────────────────────

/// Parameters of the collision sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildConfig {
    /// Target linear cell size in maze units. Default: 0.1.
    pub linear_resolution: f64,
    /// Upper bound on the number of cells of one grid. Default: 2^31.
    pub max_cells: usize,
    /// Seal the four x/y boundary planes after sweeping. Default: true.
    pub force_walls: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            linear_resolution: 0.1,
            max_cells: 1 << 31,
            force_walls: true,
        }
    }
}

impl BuildConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.linear_resolution.is_finite() && self.linear_resolution > 0.0) {
            return Err(ConfigError::InvalidResolution {
                value: self.linear_resolution,
            });
        }
        if self.max_cells == 0 {
            return Err(ConfigError::GridTooLarge {
                cells: 0,
                max: self.max_cells,
            });
        }
        Ok(())
    }

    /// Derive the grid for `geometry`, rejecting grids over `max_cells`.
    pub fn derive_space(&self, geometry: &impl MazeGeometry) -> Result<GridSpace, ConfigError> {
        self.validate()?;
        validate_geometry(geometry)?;
        let space = GridSpace::from_geometry(geometry, self.linear_resolution)?;
        self.check_cell_budget(&space)?;
        log::debug!(
            "derived grid {:?} (resolution {:?})",
            space.shape(),
            space.resolution()
        );
        Ok(space)
    }

    /// `Err(GridTooLarge)` if `space` has more than `max_cells` cells.
    pub fn check_cell_budget(&self, space: &GridSpace) -> Result<(), ConfigError> {
        let cells = space.cell_count();
        if cells > self.max_cells {
            return Err(ConfigError::GridTooLarge {
                cells,
                max: self.max_cells,
            });
        }
        Ok(())
    }
}

fn validate_geometry(geometry: &impl MazeGeometry) -> Result<(), ConfigError> {
    if geometry.slits().is_empty() {
        return Err(ConfigError::MissingSlits);
    }
    let positive = |name: &str, v: f64| {
        if v.is_finite() && v > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidGeometry {
                reason: format!("{name} must be finite and positive, got {v}"),
            })
        }
    };
    positive("arena height", geometry.arena_height())?;
    positive("average radius", geometry.average_radius())?;
    positive("exit size", geometry.exit_size())?;
    if geometry.load_dimensions().is_empty() {
        return Err(ConfigError::InvalidGeometry {
            reason: "load has no dimensions".to_string(),
        });
    }
    Ok(())
}

// ── Derived constants ──────────────────────────────────────────────

/// Default erosion radius in cells.
///
/// The y index of `arena_height / 21.32`, plus 4 for human solvers in the
/// `"Small Far"` / `"Small Near"` mazes.
pub fn erosion_radius_default(space: &GridSpace, key: &MazeKey) -> Result<usize, ConfigError> {
    let (y_min, y_max) = space.extent().y;
    let length = y_min + (y_max - y_min) / EROSION_HEIGHT_DIVISOR;
    let mut radius = space.coord_to_index(Axis::Y, length)?;
    if key.solver == "human" && key.is_small_variant() {
        radius += HUMAN_SMALL_EROSION_BONUS;
    }
    if radius == 0 {
        return Err(ConfigError::ZeroErosionRadius);
    }
    Ok(radius)
}

/// Largest distance, in cells, at which a cell counts as a transition.
///
/// The maze's transition gap (see [`MazeGeometry::transition_gap`]) as an
/// x index, plus twice the erosion radius.
pub fn max_transition_distance(
    space: &GridSpace,
    geometry: &impl MazeGeometry,
    erosion_radius: usize,
) -> f64 {
    let (x_min, _) = space.extent().x;
    let gap = space.coord_to_index_clamped(Axis::X, x_min + geometry.transition_gap());
    (gap + 2 * erosion_radius) as f64
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating configuration or geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Linear resolution is NaN, infinite, zero or negative.
    InvalidResolution {
        /// The invalid value.
        value: f64,
    },
    /// The geometry has no slit walls.
    MissingSlits,
    /// A geometry dimension is unusable.
    InvalidGeometry {
        /// Which dimension and why.
        reason: String,
    },
    /// The derived erosion radius rounds to zero cells.
    ZeroErosionRadius,
    /// The grid would exceed the configured cell budget.
    GridTooLarge {
        /// Cells the grid would need.
        cells: usize,
        /// Configured maximum.
        max: usize,
    },
    /// A segmentation or labeling parameter is out of range.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the valid range.
        reason: String,
    },
    /// The derived grid is itself invalid.
    Space(SpaceError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidResolution { value } => {
                write!(f, "linear_resolution must be finite and positive, got {value}")
            }
            Self::MissingSlits => write!(f, "maze geometry has no slits"),
            Self::InvalidGeometry { reason } => write!(f, "invalid geometry: {reason}"),
            Self::ZeroErosionRadius => write!(f, "erosion radius rounds to zero cells"),
            Self::GridTooLarge { cells, max } => {
                write!(f, "grid of {cells} cells exceeds max_cells {max}")
            }
            Self::InvalidParameter { name, reason } => write!(f, "{name}: {reason}"),
            Self::Space(e) => write!(f, "space: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SpaceError> for ConfigError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cspace_core::MazeDimensions;

    fn maze(shape: LoadShape) -> MazeDimensions {
        MazeDimensions {
            slits: vec![10.0, 16.0],
            arena_height: 21.322_222_2,
            exit_size: 3.0,
            average_radius: 1.0,
            load_dimensions: vec![4.0, 2.0],
            load_shape: shape,
        }
    }

    fn key(solver: &str, size: &str) -> MazeKey {
        MazeKey::new(solver, size, LoadShape::Spt, "MazeDimensions_new")
    }

    #[test]
    fn default_config_is_valid() {
        assert!(BuildConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_resolution() {
        let cfg = BuildConfig {
            linear_resolution: -0.5,
            ..BuildConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidResolution { value: -0.5 })
        );
    }

    #[test]
    fn derive_space_enforces_cell_budget() {
        let cfg = BuildConfig {
            linear_resolution: 0.5,
            max_cells: 100,
            force_walls: true,
        };
        assert!(matches!(
            cfg.derive_space(&maze(LoadShape::Spt)),
            Err(ConfigError::GridTooLarge { max: 100, .. })
        ));
    }

    #[test]
    fn derive_space_rejects_missing_slits() {
        let mut m = maze(LoadShape::T);
        m.slits.clear();
        assert_eq!(
            BuildConfig::default().derive_space(&m),
            Err(ConfigError::MissingSlits)
        );
    }

    #[test]
    fn erosion_radius_scales_with_height() {
        let cfg = BuildConfig {
            linear_resolution: 0.25,
            ..BuildConfig::default()
        };
        let space = cfg.derive_space(&maze(LoadShape::Spt)).unwrap();
        // height / 21.32 = 1.0 maze unit; the y step is just under 0.25.
        let r = erosion_radius_default(&space, &key("ant", "XL")).unwrap();
        assert_eq!(r, 4);
        let human = erosion_radius_default(&space, &key("human", "Small Near")).unwrap();
        assert_eq!(human, r + 4);
        let ant_small = erosion_radius_default(&space, &key("ant", "Small Far")).unwrap();
        assert_eq!(ant_small, r);
    }

    #[test]
    fn coarse_grid_has_zero_erosion_radius() {
        let cfg = BuildConfig {
            linear_resolution: 5.0,
            ..BuildConfig::default()
        };
        let space = cfg.derive_space(&maze(LoadShape::Spt)).unwrap();
        assert_eq!(
            erosion_radius_default(&space, &key("ant", "XL")),
            Err(ConfigError::ZeroErosionRadius)
        );
    }

    #[test]
    fn transition_distance_adds_twice_the_radius() {
        let cfg = BuildConfig {
            linear_resolution: 0.25,
            ..BuildConfig::default()
        };
        let m = maze(LoadShape::Spt);
        let space = cfg.derive_space(&m).unwrap();
        let pos = space.resolution().position;
        // SPT gap: (16 - 10) / 3 = 2.0 maze units.
        let expected = (2.0 / pos).round() + 6.0;
        assert_eq!(max_transition_distance(&space, &m, 3), expected);
    }

    #[test]
    fn small_variants_share_a_stem() {
        assert_eq!(key("ant", "Small Far").size_stem(), "Small");
        assert_eq!(key("human", "Small Near").size_stem(), "Small");
        assert_eq!(key("ant", "Medium").size_stem(), "Medium");
    }
}
