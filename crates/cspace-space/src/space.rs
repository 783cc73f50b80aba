//! The (x, y, θ) lattice: coordinate mapping and neighbourhoods.

use crate::edge::{resolve_axis, EdgeBehavior};
use crate::error::SpaceError;
use crate::extent::{Extent, Resolution};
use crate::grid::Grid3;
use cspace_core::{Axis, Cell, MazeGeometry, Pose};
use smallvec::SmallVec;
use std::f64::consts::TAU;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

/// A neighbouring cell together with the index offset that reaches it.
///
/// The offset is the unwrapped step (each component in `-1..=1`), so the
/// Euclidean step length in index units is `|offset|` even when the θ
/// index wrapped across the seam.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighbour {
    /// The neighbouring cell.
    pub cell: Cell,
    /// Step taken from the centre cell, per axis.
    pub offset: [i32; 3],
}

impl Neighbour {
    /// Euclidean length of the step: 1, √2 or √3.
    pub fn step_length(&self) -> f64 {
        let sq: i32 = self.offset.iter().map(|o| o * o).sum();
        f64::from(sq).sqrt()
    }
}

/// Discretization of the configuration space of one load in one maze.
///
/// Owns the grid shape, the physical extent and the per-axis resolution.
/// All coordinate conversions and neighbour queries go through here.
///
/// # Examples
///
/// ```
/// use cspace_space::{Extent, GridSpace, Resolution};
/// use std::f64::consts::TAU;
///
/// let space = GridSpace::new(
///     [10, 5, 8],
///     Extent::new((0.0, 10.0), (0.0, 5.0)),
///     Resolution { position: 1.0, theta: TAU / 8.0 },
/// )
/// .unwrap();
///
/// // θ wraps: the lowest orientation cell neighbours the highest.
/// let n = space.neighbours26([4, 2, 0]);
/// assert!(n.contains(&[4, 2, 7]));
/// assert_eq!(n.len(), 26);
/// ```
#[derive(Debug)]
pub struct GridSpace {
    shape: [usize; 3],
    extent: Extent,
    resolution: Resolution,
    out_of_range: AtomicU64,
}

impl GridSpace {
    /// Create a space from an explicit shape, extent and resolution.
    pub fn new(
        shape: [usize; 3],
        extent: Extent,
        resolution: Resolution,
    ) -> Result<Self, SpaceError> {
        if shape.contains(&0) {
            return Err(SpaceError::EmptySpace);
        }
        if shape
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n))
            .is_none()
        {
            return Err(SpaceError::DimensionTooLarge { shape });
        }
        for axis in Axis::ALL {
            let value = resolution.get(axis);
            if !(value.is_finite() && value > 0.0) {
                return Err(SpaceError::InvalidResolution { axis, value });
            }
        }
        Ok(Self {
            shape,
            extent,
            resolution,
            out_of_range: AtomicU64::new(0),
        })
    }

    /// Derive the space of a maze from its geometry.
    ///
    /// y is split into `ceil(h / linear_resolution)` cells and x reuses
    /// the resulting step. θ gets `ceil(2π r / linear_resolution)` cells
    /// for average load radius `r`, so an angular step sweeps roughly
    /// one linear step at the rim.
    pub fn from_geometry(
        geometry: &impl MazeGeometry,
        linear_resolution: f64,
    ) -> Result<Self, SpaceError> {
        if !(linear_resolution.is_finite() && linear_resolution > 0.0) {
            return Err(SpaceError::InvalidResolution {
                axis: Axis::X,
                value: linear_resolution,
            });
        }
        let height = geometry.arena_height();
        let x_max = geometry.slits().last().copied().unwrap_or(0.0)
            + geometry
                .load_dimensions()
                .iter()
                .copied()
                .fold(0.0, f64::max)
            + 1.0;

        let ny = (height / linear_resolution).ceil() as usize;
        if ny == 0 {
            return Err(SpaceError::EmptySpace);
        }
        let position = height / ny as f64;
        let nt = ((TAU * geometry.average_radius() / linear_resolution).ceil() as usize).max(1);
        let nx = (x_max / position).ceil() as usize;

        Self::new(
            [nx, ny, nt],
            Extent::new((0.0, x_max), (0.0, height)),
            Resolution {
                position,
                theta: TAU / nt as f64,
            },
        )
    }

    /// `[nx, ny, nθ]`.
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Number of cells along `axis`.
    pub fn len(&self, axis: Axis) -> usize {
        self.shape[axis.index()]
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.shape.iter().product()
    }

    /// Physical extent.
    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    /// Per-axis resolution.
    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    /// Edge behaviour of `axis`: θ wraps, x and y absorb.
    pub fn edge(axis: Axis) -> EdgeBehavior {
        if axis.is_periodic() {
            EdgeBehavior::Wrap
        } else {
            EdgeBehavior::Absorb
        }
    }

    fn raw_index(&self, axis: Axis, value: f64) -> f64 {
        let (min, max) = self.extent.get(axis);
        let offset = if axis.is_periodic() {
            (value - min).rem_euclid(max - min)
        } else {
            value - min
        };
        (offset / self.resolution.get(axis)).round()
    }

    /// Index of the cell containing `value` along `axis`.
    ///
    /// A value rounding to exactly `len` on a bounded axis maps to the
    /// last cell; anything further out is `CoordOutOfRange`. θ is reduced
    /// modulo its span and never fails for a finite value.
    pub fn coord_to_index(&self, axis: Axis, value: f64) -> Result<usize, SpaceError> {
        let n = self.len(axis);
        let out_of_range = || {
            let (min, max) = self.extent.get(axis);
            SpaceError::CoordOutOfRange {
                axis,
                value,
                bounds: format!("[{min}, {max}] over {n} cells"),
            }
        };
        if !value.is_finite() {
            return Err(out_of_range());
        }
        let raw = self.raw_index(axis, value);
        if axis.is_periodic() {
            return resolve_axis(raw as i64, n, EdgeBehavior::Wrap).ok_or_else(out_of_range);
        }
        if raw == n as f64 {
            return Ok(n - 1);
        }
        if raw < 0.0 || raw > n as f64 {
            return Err(out_of_range());
        }
        resolve_axis(raw as i64, n, EdgeBehavior::Absorb).ok_or_else(out_of_range)
    }

    /// Like [`coord_to_index`](Self::coord_to_index) but clamps bounded
    /// axes instead of failing.
    ///
    /// Every clamp is counted; the first one per space is logged.
    pub fn coord_to_index_clamped(&self, axis: Axis, value: f64) -> usize {
        match self.coord_to_index(axis, value) {
            Ok(i) => i,
            Err(e) => {
                if self.out_of_range.fetch_add(1, Ordering::Relaxed) == 0 {
                    log::warn!("{e}; clamping to the grid");
                }
                let raw = if value.is_nan() {
                    0
                } else {
                    self.raw_index(axis, value) as i64
                };
                let edge = match Self::edge(axis) {
                    EdgeBehavior::Absorb => EdgeBehavior::Clamp,
                    other => other,
                };
                resolve_axis(raw, self.len(axis), edge).unwrap_or(0)
            }
        }
    }

    /// Number of clamped mappings performed so far.
    pub fn out_of_range_count(&self) -> u64 {
        self.out_of_range.load(Ordering::Relaxed)
    }

    /// Physical coordinate of the centre of cell `index` along `axis`.
    pub fn index_to_coord(&self, axis: Axis, index: usize) -> f64 {
        self.extent.get(axis).0 + index as f64 * self.resolution.get(axis)
    }

    /// Pose at the centre of `cell`.
    pub fn cell_to_pose(&self, cell: Cell) -> Pose {
        Pose::new(
            self.index_to_coord(Axis::X, cell[0]),
            self.index_to_coord(Axis::Y, cell[1]),
            self.index_to_coord(Axis::Theta, cell[2]),
        )
    }

    /// Cell containing `pose`.
    pub fn coords_to_cell(&self, pose: &Pose) -> Result<Cell, SpaceError> {
        Ok([
            self.coord_to_index(Axis::X, pose.x)?,
            self.coord_to_index(Axis::Y, pose.y)?,
            self.coord_to_index(Axis::Theta, pose.theta)?,
        ])
    }

    fn theta_offsets(&self) -> &'static [i64] {
        match self.shape[2] {
            1 => &[0],
            2 => &[0, 1],
            _ => &[-1, 0, 1],
        }
    }

    /// The Moore (26-cell) neighbourhood of `cell` with step offsets.
    ///
    /// x/y neighbours past the walls are dropped; θ wraps. For `nθ < 3`
    /// the wrapped θ steps would revisit the same cell, so only distinct
    /// non-self cells are returned.
    pub fn neighbourhood26(&self, cell: Cell) -> SmallVec<[Neighbour; 26]> {
        let [nx, ny, nt] = self.shape;
        let mut out = SmallVec::new();
        for dx in -1i64..=1 {
            let Some(x) = resolve_axis(cell[0] as i64 + dx, nx, EdgeBehavior::Absorb) else {
                continue;
            };
            for dy in -1i64..=1 {
                let Some(y) = resolve_axis(cell[1] as i64 + dy, ny, EdgeBehavior::Absorb) else {
                    continue;
                };
                for &dt in self.theta_offsets() {
                    if dx == 0 && dy == 0 && dt == 0 {
                        continue;
                    }
                    let Some(t) = resolve_axis(cell[2] as i64 + dt, nt, EdgeBehavior::Wrap) else {
                        continue;
                    };
                    out.push(Neighbour {
                        cell: [x, y, t],
                        offset: [dx as i32, dy as i32, dt as i32],
                    });
                }
            }
        }
        out
    }

    /// Cells of [`neighbourhood26`](Self::neighbourhood26).
    pub fn neighbours26(&self, cell: Cell) -> SmallVec<[Cell; 26]> {
        self.neighbourhood26(cell)
            .into_iter()
            .map(|n| n.cell)
            .collect()
    }

    /// The face (6-cell) neighbourhood of `cell`.
    ///
    /// `theta_edge` selects whether θ wraps ([`EdgeBehavior::Wrap`]) or
    /// stops at the seam ([`EdgeBehavior::Absorb`]).
    pub fn neighbours6(&self, cell: Cell, theta_edge: EdgeBehavior) -> SmallVec<[Cell; 6]> {
        let mut out: SmallVec<[Cell; 6]> = SmallVec::new();
        for axis in Axis::ALL {
            let i = axis.index();
            let edge = if axis.is_periodic() {
                theta_edge
            } else {
                EdgeBehavior::Absorb
            };
            for d in [-1i64, 1] {
                if let Some(v) = resolve_axis(cell[i] as i64 + d, self.shape[i], edge) {
                    let mut nb = cell;
                    nb[i] = v;
                    if nb != cell && !out.contains(&nb) {
                        out.push(nb);
                    }
                }
            }
        }
        out
    }

    /// Every cell in storage order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let [nx, ny, nt] = self.shape;
        (0..nx).flat_map(move |x| (0..ny).flat_map(move |y| (0..nt).map(move |t| [x, y, t])))
    }

    /// A grid of this space's shape filled with `value`.
    pub fn filled<T: Clone>(&self, value: T) -> Grid3<T> {
        Grid3::filled(self.shape, value)
    }

    /// `Err(ShapeMismatch)` unless `grid` matches this space.
    pub fn check_grid<T>(&self, grid: &Grid3<T>) -> Result<(), SpaceError> {
        if grid.shape() == self.shape {
            Ok(())
        } else {
            Err(SpaceError::ShapeMismatch {
                expected: self.shape,
                found: grid.shape(),
            })
        }
    }
}

impl GridSpace {
    /// The part of this space inside the physical box `x` × `y`.
    ///
    /// Returns the trimmed space and the x/y index window it covers in
    /// this one; θ is never trimmed. Bounds are clipped to the extent, and
    /// the new extent starts on a cell centre of this space, so kept cells
    /// keep their physical coordinates. `Err(EmptySpace)` if the box
    /// misses the grid.
    pub fn trim(&self, x: (f64, f64), y: (f64, f64)) -> Result<(GridSpace, TrimWindow), SpaceError> {
        let window = TrimWindow {
            x: self.trim_axis(Axis::X, x),
            y: self.trim_axis(Axis::Y, y),
        };
        if window.x.is_empty() || window.y.is_empty() {
            return Err(SpaceError::EmptySpace);
        }
        let extent = Extent {
            x: self.trimmed_range(Axis::X, &window.x),
            y: self.trimmed_range(Axis::Y, &window.y),
            theta: self.extent.theta,
        };
        let shape = [window.x.len(), window.y.len(), self.shape[2]];
        log::debug!("trimmed {:?} grid to {shape:?}", self.shape);
        Ok((GridSpace::new(shape, extent, self.resolution)?, window))
    }

    fn trim_axis(&self, axis: Axis, (lo, hi): (f64, f64)) -> Range<usize> {
        let min = self.extent.get(axis).0;
        let step = self.resolution.get(axis);
        let n = self.len(axis) as f64;
        let start = ((lo - min) / step).floor().clamp(0.0, n) as usize;
        let end = (((hi - min) / step).floor() + 1.0).clamp(0.0, n) as usize;
        start..end.max(start)
    }

    fn trimmed_range(&self, axis: Axis, cells: &Range<usize>) -> (f64, f64) {
        let (min, max) = self.extent.get(axis);
        let step = self.resolution.get(axis);
        (
            self.index_to_coord(axis, cells.start),
            (min + cells.end as f64 * step).min(max),
        )
    }
}

/// x/y index window kept by [`GridSpace::trim`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrimWindow {
    /// Kept x indices.
    pub x: Range<usize>,
    /// Kept y indices.
    pub y: Range<usize>,
}

impl Clone for GridSpace {
    fn clone(&self) -> Self {
        Self {
            shape: self.shape,
            extent: self.extent,
            resolution: self.resolution,
            out_of_range: AtomicU64::new(self.out_of_range_count()),
        }
    }
}

impl PartialEq for GridSpace {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape
            && self.extent == other.extent
            && self.resolution == other.resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use cspace_core::{LoadShape, MazeDimensions};

    fn space(shape: [usize; 3]) -> GridSpace {
        GridSpace::new(
            shape,
            Extent::new((0.0, shape[0] as f64), (0.0, shape[1] as f64)),
            Resolution {
                position: 1.0,
                theta: TAU / shape[2] as f64,
            },
        )
        .unwrap()
    }

    // ── Construction ────────────────────────────────────────────

    #[test]
    fn rejects_empty_axis() {
        let err = GridSpace::new(
            [3, 0, 4],
            Extent::new((0.0, 1.0), (0.0, 1.0)),
            Resolution {
                position: 1.0,
                theta: 1.0,
            },
        )
        .unwrap_err();
        assert_eq!(err, SpaceError::EmptySpace);
    }

    #[test]
    fn rejects_non_positive_resolution() {
        let err = GridSpace::new(
            [3, 3, 4],
            Extent::new((0.0, 1.0), (0.0, 1.0)),
            Resolution {
                position: 0.0,
                theta: 1.0,
            },
        )
        .unwrap_err();
        assert!(matches!(err, SpaceError::InvalidResolution { axis: Axis::X, .. }));
    }

    #[test]
    fn from_geometry_derives_shape() {
        let maze = MazeDimensions {
            slits: vec![10.0, 16.0],
            arena_height: 8.0,
            exit_size: 2.0,
            average_radius: 1.0,
            load_dimensions: vec![4.0, 2.0],
            load_shape: LoadShape::Spt,
        };
        let s = GridSpace::from_geometry(&maze, 0.5).unwrap();
        // x_max = 16 + 4 + 1 = 21 at pos 0.5.
        assert_eq!(s.shape(), [42, 16, 13]);
        assert_eq!(s.extent().x, (0.0, 21.0));
        assert!((s.resolution().theta - TAU / 13.0).abs() < 1e-12);
        assert!(s.extent().theta_is_full_turn());
    }

    // ── Coordinate mapping ──────────────────────────────────────

    #[test]
    fn coord_to_index_rounds_to_nearest() {
        let s = space([10, 5, 8]);
        assert_eq!(s.coord_to_index(Axis::X, 3.4).unwrap(), 3);
        assert_eq!(s.coord_to_index(Axis::X, 3.6).unwrap(), 4);
        assert_eq!(s.coord_to_index(Axis::Y, 0.0).unwrap(), 0);
    }

    #[test]
    fn coord_at_upper_bound_clamps_to_last_cell() {
        let s = space([10, 5, 8]);
        assert_eq!(s.coord_to_index(Axis::X, 10.0).unwrap(), 9);
        assert_eq!(s.coord_to_index(Axis::Y, 5.2).unwrap(), 4);
    }

    #[test]
    fn coord_far_out_of_range_fails() {
        let s = space([10, 5, 8]);
        assert!(matches!(
            s.coord_to_index(Axis::X, 12.0),
            Err(SpaceError::CoordOutOfRange { axis: Axis::X, .. })
        ));
        assert!(s.coord_to_index(Axis::Y, -1.0).is_err());
        assert!(s.coord_to_index(Axis::X, f64::NAN).is_err());
    }

    #[test]
    fn theta_reduces_modulo_full_turn() {
        let s = space([10, 5, 8]);
        let step = TAU / 8.0;
        assert_eq!(s.coord_to_index(Axis::Theta, TAU).unwrap(), 0);
        assert_eq!(s.coord_to_index(Axis::Theta, -step).unwrap(), 7);
        assert_eq!(s.coord_to_index(Axis::Theta, 3.0 * TAU + 2.0 * step).unwrap(), 2);
        // Just below a full turn rounds up to nθ and wraps to 0.
        assert_eq!(s.coord_to_index(Axis::Theta, TAU - 0.1 * step).unwrap(), 0);
    }

    #[test]
    fn index_to_coord_is_inverse_on_centres() {
        let s = space([10, 5, 8]);
        for axis in Axis::ALL {
            for i in 0..s.len(axis) {
                let v = s.index_to_coord(axis, i);
                assert_eq!(s.coord_to_index(axis, v).unwrap(), i, "{axis} {i}");
            }
        }
    }

    #[test]
    fn pose_round_trip() {
        let s = space([6, 4, 5]);
        let cell = [5, 1, 4];
        assert_eq!(s.coords_to_cell(&s.cell_to_pose(cell)).unwrap(), cell);
    }

    #[test]
    fn clamped_mapping_counts_each_clamp() {
        let s = space([10, 5, 8]);
        assert_eq!(s.coord_to_index_clamped(Axis::X, 50.0), 9);
        assert_eq!(s.coord_to_index_clamped(Axis::Y, -7.0), 0);
        assert_eq!(s.coord_to_index_clamped(Axis::X, 4.0), 4);
        assert_eq!(s.out_of_range_count(), 2);
        assert_eq!(s.clone().out_of_range_count(), 2);
    }

    // ── Neighbour tests ─────────────────────────────────────────

    #[test]
    fn interior_has_26_neighbours() {
        let s = space([5, 5, 8]);
        assert_eq!(s.neighbours26([2, 2, 4]).len(), 26);
    }

    #[test]
    fn theta_seam_cells_are_neighbours() {
        let s = space([5, 5, 8]);
        assert!(s.neighbours26([2, 2, 0]).contains(&[2, 2, 7]));
        assert!(s.neighbours26([2, 2, 7]).contains(&[2, 2, 0]));
        assert!(s.neighbours26([1, 3, 7]).contains(&[2, 2, 0]));
    }

    #[test]
    fn walls_absorb_neighbours() {
        let s = space([5, 5, 8]);
        // Corner in x/y: 2 * 2 * 3 - 1.
        let n = s.neighbours26([0, 0, 3]);
        assert_eq!(n.len(), 11);
        assert!(n.iter().all(|c| c[0] <= 1 && c[1] <= 1));
    }

    #[test]
    fn short_theta_axis_has_no_duplicates() {
        assert_eq!(space([5, 5, 1]).neighbours26([2, 2, 0]).len(), 8);
        assert_eq!(space([5, 5, 2]).neighbours26([2, 2, 0]).len(), 17);
        assert_eq!(space([5, 5, 2]).neighbours6([2, 2, 1], EdgeBehavior::Wrap).len(), 5);
        assert_eq!(space([5, 5, 1]).neighbours6([2, 2, 0], EdgeBehavior::Wrap).len(), 4);
    }

    #[test]
    fn neighbours6_theta_edge_choice() {
        let s = space([3, 3, 6]);
        let wrapped = s.neighbours6([1, 1, 0], EdgeBehavior::Wrap);
        let absorbed = s.neighbours6([1, 1, 0], EdgeBehavior::Absorb);
        assert!(wrapped.contains(&[1, 1, 5]));
        assert!(!absorbed.contains(&[1, 1, 5]));
        assert_eq!(wrapped.len(), 6);
        assert_eq!(absorbed.len(), 5);
    }

    #[test]
    fn seam_offsets_are_unit_steps() {
        let s = space([3, 3, 6]);
        let across = s
            .neighbourhood26([1, 1, 5])
            .into_iter()
            .find(|n| n.cell == [1, 1, 0])
            .unwrap();
        assert_eq!(across.offset, [0, 0, 1]);
        assert_eq!(across.step_length(), 1.0);
    }

    // ── Trim ────────────────────────────────────────────────────

    #[test]
    fn trim_keeps_cell_coordinates() {
        let s = space([10, 8, 4]);
        let (t, window) = s.trim((2.5, 6.2), (-3.0, 3.0)).unwrap();
        assert_eq!(window.x, 2..7);
        assert_eq!(window.y, 0..4);
        assert_eq!(t.shape(), [5, 4, 4]);
        assert_eq!(t.extent().x, (2.0, 7.0));
        assert_eq!(t.extent().y, (0.0, 4.0));
        assert_eq!(t.extent().theta, s.extent().theta);
        assert_eq!(t.cell_to_pose([0, 3, 1]), s.cell_to_pose([2, 3, 1]));
        assert_eq!(t.coords_to_cell(&Pose::new(6.0, 1.0, 0.0)).unwrap(), [4, 1, 0]);
    }

    #[test]
    fn trim_clips_to_the_extent() {
        let s = space([10, 8, 4]);
        let (t, window) = s.trim((-5.0, 50.0), (7.0, 9.0)).unwrap();
        assert_eq!(window.x, 0..10);
        assert_eq!(window.y, 7..8);
        assert_eq!(t.extent().x, (0.0, 10.0));
        assert_eq!(t.extent().y, (7.0, 8.0));
    }

    #[test]
    fn trim_outside_the_grid_is_empty() {
        let s = space([10, 8, 4]);
        assert_eq!(s.trim((20.0, 30.0), (0.0, 8.0)).unwrap_err(), SpaceError::EmptySpace);
        assert_eq!(s.trim((6.0, 2.0), (0.0, 8.0)).unwrap_err(), SpaceError::EmptySpace);
    }

    // ── Compliance ──────────────────────────────────────────────

    #[test]
    fn compliance_small_spaces() {
        for shape in [[3, 3, 1], [3, 4, 2], [4, 3, 3], [3, 3, 7]] {
            let s = space(shape);
            compliance::assert_neighbours_symmetric(&s);
            compliance::assert_neighbours_in_bounds(&s);
            compliance::assert_no_self_neighbour(&s);
            compliance::assert_offsets_resolve(&s);
            compliance::assert_cells_complete(&s);
        }
    }
}
