//! Test utilities and mock types for cspace development.
//!
//! Provides mock implementations of [`CollisionOracle`] and a small
//! reference maze geometry. Synthetic grids for the labeling scenarios
//! live in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use cspace_core::{CollisionOracle, LoadShape, MazeDimensions, OracleError, Pose};
use cspace_space::{BoolGrid, GridSpace};

/// Axis-aligned box in pose space. θ bounds do not wrap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoseBox {
    pub min: Pose,
    pub max: Pose,
}

impl PoseBox {
    pub fn new(min: Pose, max: Pose) -> Self {
        Self { min, max }
    }

    /// A box spanning every orientation.
    pub fn all_angles(x: (f64, f64), y: (f64, f64)) -> Self {
        Self {
            min: Pose::new(x.0, y.0, f64::NEG_INFINITY),
            max: Pose::new(x.1, y.1, f64::INFINITY),
        }
    }

    pub fn contains(&self, pose: &Pose) -> bool {
        (self.min.x..=self.max.x).contains(&pose.x)
            && (self.min.y..=self.max.y).contains(&pose.y)
            && (self.min.theta..=self.max.theta).contains(&pose.theta)
    }
}

/// Oracle under which a pose is free only inside one of its pockets.
///
/// Counts exact evaluations so tests can see whether a cached artifact
/// was used instead of a fresh sweep.
pub struct PocketOracle {
    pockets: Vec<PoseBox>,
    exact_calls: AtomicUsize,
}

impl PocketOracle {
    pub fn new(pockets: Vec<PoseBox>) -> Self {
        Self {
            pockets,
            exact_calls: AtomicUsize::new(0),
        }
    }

    pub fn exact_calls(&self) -> usize {
        self.exact_calls.load(Ordering::Relaxed)
    }
}

impl CollisionOracle for PocketOracle {
    fn is_free(&self, pose: &Pose) -> Result<bool, OracleError> {
        self.exact_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.pockets.iter().any(|p| p.contains(pose)))
    }
}

/// Oracle that answers from a precomputed grid.
pub struct GridOracle {
    space: GridSpace,
    free: BoolGrid,
}

impl GridOracle {
    pub fn new(space: GridSpace, free: BoolGrid) -> Self {
        Self { space, free }
    }
}

impl CollisionOracle for GridOracle {
    fn is_free(&self, pose: &Pose) -> Result<bool, OracleError> {
        let cell = self
            .space
            .coords_to_cell(pose)
            .map_err(|e| OracleError::EvaluationFailed {
                reason: e.to_string(),
            })?;
        Ok(self.free[cell])
    }
}

/// Oracle that fails for every pose at or beyond `fail_from_x`.
pub struct FailingOracle {
    pub fail_from_x: f64,
}

impl CollisionOracle for FailingOracle {
    fn is_free(&self, pose: &Pose) -> Result<bool, OracleError> {
        if pose.x >= self.fail_from_x {
            return Err(OracleError::MalformedPolygon {
                reason: format!("load outline self-intersects at x = {}", pose.x),
            });
        }
        Ok(true)
    }
}

/// A small slit maze: three chambers, 8 units tall, 19 units long.
pub fn small_maze() -> MazeDimensions {
    MazeDimensions {
        slits: vec![8.0, 14.0],
        arena_height: 8.0,
        exit_size: 2.0,
        average_radius: 1.0,
        load_dimensions: vec![4.0, 2.0],
        load_shape: LoadShape::Spt,
    }
}

/// A fresh, empty scratch directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "cspace-test-{name}-{}-{n}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}
