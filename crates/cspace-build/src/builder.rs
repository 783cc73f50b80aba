//! Parallel collision sweep and boundary detection.

use std::error::Error;
use std::fmt;

use cspace_core::{Cell, CollisionOracle, OracleError};
use cspace_space::{BoolGrid, GridSpace, SpaceError};
use rayon::prelude::*;

use crate::config::{BuildConfig, ConfigError};

/// Errors from building a configuration space.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// The oracle failed on a cell.
    Oracle {
        /// The cell being tested.
        cell: Cell,
        /// The oracle's error.
        source: OracleError,
    },
    /// A mask or grid did not match the space.
    Space(SpaceError),
    /// The build configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Oracle { cell, source } => {
                write!(f, "collision oracle failed at cell {cell:?}: {source}")
            }
            Self::Space(e) => write!(f, "space: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl Error for BuildError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Oracle { source, .. } => Some(source),
            Self::Space(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

impl From<SpaceError> for BuildError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

impl From<ConfigError> for BuildError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Sweeps a [`GridSpace`] with a [`CollisionOracle`].
///
/// Each x-slice is evaluated on its own rayon task; the oracle is shared
/// by reference, which is why it must be `Sync`.
///
/// # Examples
///
/// ```
/// use cspace_build::{BuildConfig, SpaceBuilder};
/// use cspace_core::{CollisionOracle, OracleError, Pose};
/// use cspace_space::{Extent, GridSpace, Resolution};
///
/// struct LeftHalfFree;
///
/// impl CollisionOracle for LeftHalfFree {
///     fn is_free(&self, pose: &Pose) -> Result<bool, OracleError> {
///         Ok(pose.x < 5.0)
///     }
/// }
///
/// let space = GridSpace::new(
///     [10, 4, 4],
///     Extent::new((0.0, 10.0), (0.0, 4.0)),
///     Resolution { position: 1.0, theta: std::f64::consts::FRAC_PI_2 },
/// )
/// .unwrap();
/// let config = BuildConfig::default();
/// let free = SpaceBuilder::new(&space, &LeftHalfFree, &config)
///     .unwrap()
///     .compute_space()
///     .unwrap();
///
/// // x in 1..5, y in 1..3 after the walls are sealed.
/// assert_eq!(free.count_true(), 4 * 2 * 4);
/// ```
pub struct SpaceBuilder<'a, O: CollisionOracle + ?Sized> {
    space: &'a GridSpace,
    oracle: &'a O,
    config: &'a BuildConfig,
}

impl<'a, O: CollisionOracle + ?Sized> SpaceBuilder<'a, O> {
    /// Create a builder after validating `config` against `space`.
    pub fn new(
        space: &'a GridSpace,
        oracle: &'a O,
        config: &'a BuildConfig,
    ) -> Result<Self, BuildError> {
        config.validate()?;
        config.check_cell_budget(space)?;
        Ok(Self {
            space,
            oracle,
            config,
        })
    }

    /// Classify every cell as free (`true`) or occupied.
    pub fn compute_space(&self) -> Result<BoolGrid, BuildError> {
        log::info!("computing configuration space {:?}", self.space.shape());
        self.sweep(None)
    }

    /// Classify only the cells set in `mask`; all others stay occupied.
    pub fn compute_space_within(&self, mask: &BoolGrid) -> Result<BoolGrid, BuildError> {
        self.space.check_grid(mask)?;
        log::info!(
            "computing configuration space {:?} within a mask of {} cells",
            self.space.shape(),
            mask.count_true()
        );
        self.sweep(Some(mask))
    }

    fn sweep(&self, mask: Option<&BoolGrid>) -> Result<BoolGrid, BuildError> {
        let mut grid = self.space.filled(false);
        let slice_len = grid.x_slice_len();
        let nt = self.space.shape()[2];
        grid.as_mut_slice()
            .par_chunks_mut(slice_len)
            .enumerate()
            .try_for_each(|(x, chunk)| -> Result<(), BuildError> {
                for (i, value) in chunk.iter_mut().enumerate() {
                    let flat = x * slice_len + i;
                    if mask.is_some_and(|m| !m.as_slice()[flat]) {
                        continue;
                    }
                    let cell = [x, i / nt, i % nt];
                    *value = self.is_free(cell)?;
                }
                Ok(())
            })?;
        if self.config.force_walls {
            grid.force_walls();
        }
        log::debug!("{} of {} cells free", grid.count_true(), grid.len());
        Ok(grid)
    }

    fn is_free(&self, cell: Cell) -> Result<bool, BuildError> {
        let pose = self.space.cell_to_pose(cell);
        let wrap = |source| BuildError::Oracle { cell, source };
        if self.oracle.bounding_box_free(&pose).map_err(wrap)? {
            return Ok(true);
        }
        self.oracle.is_free(&pose).map_err(wrap)
    }
}

/// Free cells with at least one occupied 26-neighbour.
///
/// Neighbours past the x/y walls are ignored; θ wraps.
pub fn compute_boundary(space: &GridSpace, free: &BoolGrid) -> Result<BoolGrid, SpaceError> {
    space.check_grid(free)?;
    let mut boundary = space.filled(false);
    let slice_len = boundary.x_slice_len();
    boundary
        .as_mut_slice()
        .par_chunks_mut(slice_len)
        .enumerate()
        .for_each(|(x, chunk)| {
            for (i, value) in chunk.iter_mut().enumerate() {
                let cell = free.cell_of(x * slice_len + i);
                *value = free[cell] && space.neighbours26(cell).iter().any(|&nb| !free[nb]);
            }
        });
    Ok(boundary)
}
