//! Dense three-dimensional grid storage.
//!
//! Cells are stored row-major with θ varying fastest:
//! `flat = (x * ny + y) * nθ + θ`. One x-slice (all y and θ for a fixed
//! x) is therefore a contiguous run of `ny * nθ` elements, which is what
//! the parallel stages split on.

use crate::error::SpaceError;
use crate::space::TrimWindow;
use cspace_core::{Cell, Label};
use std::ops::{Index, IndexMut};

/// Occupancy or mask grid: `true` = free / member.
pub type BoolGrid = Grid3<bool>;

/// Real-valued field; `f64::INFINITY` marks unreachable cells.
pub type DistanceGrid = Grid3<f64>;

/// Per-cell symbolic labels.
pub type LabelGrid = Grid3<Label>;

/// One of the two θ boundary faces of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ThetaFace {
    /// The `θ = 0` face.
    Bottom,
    /// The `θ = nθ - 1` face.
    Top,
}

/// A dense `[nx, ny, nθ]` array.
///
/// # Examples
///
/// ```
/// use cspace_space::Grid3;
///
/// let mut g = Grid3::filled([2, 3, 4], false);
/// g[[1, 2, 3]] = true;
/// assert_eq!(g.count_true(), 1);
/// assert_eq!(g.cell_of(g.flat_index([1, 2, 3])), [1, 2, 3]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Grid3<T> {
    shape: [usize; 3],
    data: Vec<T>,
}

fn checked_len(shape: [usize; 3]) -> Result<usize, SpaceError> {
    if shape.contains(&0) {
        return Err(SpaceError::EmptySpace);
    }
    shape[0]
        .checked_mul(shape[1])
        .and_then(|n| n.checked_mul(shape[2]))
        .ok_or(SpaceError::DimensionTooLarge { shape })
}

impl<T: Clone> Grid3<T> {
    /// A grid of `shape` with every cell set to `value`.
    ///
    /// # Panics
    ///
    /// Panics if an axis has length zero or the cell count overflows
    /// `usize`. Use [`try_filled`](Self::try_filled) for untrusted shapes;
    /// a shape taken from a [`GridSpace`](crate::GridSpace) never panics.
    pub fn filled(shape: [usize; 3], value: T) -> Self {
        match Self::try_filled(shape, value) {
            Ok(grid) => grid,
            Err(e) => panic!("Grid3::filled: {e}"),
        }
    }

    /// Fallible form of [`filled`](Self::filled).
    pub fn try_filled(shape: [usize; 3], value: T) -> Result<Self, SpaceError> {
        let len = checked_len(shape)?;
        Ok(Self {
            shape,
            data: vec![value; len],
        })
    }

    /// The cells inside `window`, every θ kept.
    ///
    /// `Err(ShapeMismatch)` if the window reaches past this grid,
    /// `Err(EmptySpace)` if it is empty.
    pub fn crop(&self, window: &TrimWindow) -> Result<Self, SpaceError> {
        let [nx, ny, nt] = self.shape;
        if window.x.end > nx || window.y.end > ny {
            return Err(SpaceError::ShapeMismatch {
                expected: self.shape,
                found: [window.x.end, window.y.end, nt],
            });
        }
        let shape = [window.x.len(), window.y.len(), nt];
        let mut data = Vec::with_capacity(checked_len(shape)?);
        for x in window.x.clone() {
            let row = (x * ny + window.y.start) * nt;
            data.extend_from_slice(&self.data[row..row + window.y.len() * nt]);
        }
        Ok(Self { shape, data })
    }

    /// Copy with the θ axis cyclically shifted by `shift` cells.
    ///
    /// Element at θ index `t` moves to `(t + shift) mod nθ`.
    pub fn roll_theta(&self, shift: isize) -> Self {
        let nt = self.shape[2];
        let s = shift.rem_euclid(nt as isize) as usize;
        let mut data = self.data.clone();
        if s != 0 {
            for (dst, src) in data.chunks_mut(nt).zip(self.data.chunks(nt)) {
                dst[s..].clone_from_slice(&src[..nt - s]);
                dst[..s].clone_from_slice(&src[nt - s..]);
            }
        }
        Self {
            shape: self.shape,
            data,
        }
    }
}

impl<T> Grid3<T> {
    /// Wrap an existing flat buffer.
    pub fn from_vec(shape: [usize; 3], data: Vec<T>) -> Result<Self, SpaceError> {
        let expected = checked_len(shape)?;
        if data.len() != expected {
            return Err(SpaceError::LengthMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// `[nx, ny, nθ]`.
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`: construction rejects empty shapes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of elements in one x-slice (`ny * nθ`).
    pub fn x_slice_len(&self) -> usize {
        self.shape[1] * self.shape[2]
    }

    /// Flat storage index of `cell`.
    #[inline]
    pub fn flat_index(&self, cell: Cell) -> usize {
        (cell[0] * self.shape[1] + cell[1]) * self.shape[2] + cell[2]
    }

    /// Cell at flat storage index `flat`.
    #[inline]
    pub fn cell_of(&self, flat: usize) -> Cell {
        let nt = self.shape[2];
        let ny = self.shape[1];
        [flat / (ny * nt), (flat / nt) % ny, flat % nt]
    }

    /// Element at `cell`, or `None` if out of bounds.
    pub fn get(&self, cell: Cell) -> Option<&T> {
        if cell.iter().zip(self.shape).all(|(&c, n)| c < n) {
            self.data.get(self.flat_index(cell))
        } else {
            None
        }
    }

    /// Flat element slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable flat element slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the grid, returning its flat buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Iterate `(cell, value)` pairs in storage order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Cell, &T)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (self.cell_of(i), v))
    }

    /// Element-wise transform into a new grid of the same shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid3<U> {
        Grid3 {
            shape: self.shape,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Element-wise combination of two same-shape grids.
    pub fn zip_with<U, V>(
        &self,
        other: &Grid3<U>,
        mut f: impl FnMut(&T, &U) -> V,
    ) -> Result<Grid3<V>, SpaceError> {
        self.check_same_shape(other)?;
        Ok(Grid3 {
            shape: self.shape,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| f(a, b))
                .collect(),
        })
    }

    /// `Err(ShapeMismatch)` unless `other` has the same shape.
    pub fn check_same_shape<U>(&self, other: &Grid3<U>) -> Result<(), SpaceError> {
        if self.shape == other.shape {
            Ok(())
        } else {
            Err(SpaceError::ShapeMismatch {
                expected: self.shape,
                found: other.shape,
            })
        }
    }
}

impl Grid3<bool> {
    /// Number of `true` cells.
    pub fn count_true(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// Set the four x/y boundary planes to `false` (sealed maze walls).
    ///
    /// θ is periodic, so its faces are left untouched.
    pub fn force_walls(&mut self) {
        let [nx, ny, nt] = self.shape;
        let slice = ny * nt;
        self.data[..slice].fill(false);
        self.data[(nx - 1) * slice..].fill(false);
        for x in 0..nx {
            let base = x * slice;
            self.data[base..base + nt].fill(false);
            let top = base + (ny - 1) * nt;
            self.data[top..top + nt].fill(false);
        }
    }

    /// Whether every `true` cell of `self` is also `true` in `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.shape == other.shape
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(&a, &b)| !a || b)
    }

    /// Element-wise logical OR.
    pub fn or(&self, other: &Self) -> Result<Self, SpaceError> {
        self.zip_with(other, |&a, &b| a || b)
    }

    /// Element-wise logical NOT.
    pub fn not(&self) -> Self {
        self.map(|&v| !v)
    }

    /// Whether any `true` cell lies on the given θ face.
    pub fn touches_theta_face(&self, face: ThetaFace) -> bool {
        let nt = self.shape[2];
        let t = match face {
            ThetaFace::Bottom => 0,
            ThetaFace::Top => nt - 1,
        };
        self.data.chunks(nt).any(|line| line[t])
    }
}

impl<T> Index<Cell> for Grid3<T> {
    type Output = T;

    fn index(&self, cell: Cell) -> &T {
        &self.data[self.flat_index(cell)]
    }
}

impl<T> IndexMut<Cell> for Grid3<T> {
    fn index_mut(&mut self, cell: Cell) -> &mut T {
        let i = self.flat_index(cell);
        &mut self.data[i]
    }
}
