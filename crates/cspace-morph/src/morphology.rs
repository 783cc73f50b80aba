//! Binary erosion and dilation with a cubic structuring element.
//!
//! - **Erode**: a cell stays set only if *every* cell of the cube anchored
//!   on it is set.
//! - **Dilate**: a cell becomes set if *any* cell of the reflected cube
//!   anchored on it is set.
//!
//! Cells past any grid face count as unset. The cube is separable, so each
//! operation runs as three one-axis passes, each parallel over x-slices.
//!
//! [`erode`] is periodic in θ: it erodes the grid as stored and a copy
//! rolled by half a turn, un-rolls the second result and ORs the two.
//! [`dilate`] is a single non-periodic pass, so near the θ seam it grows
//! less than a periodic dilation would but never cuts a region.

use crate::error::MorphError;
use cspace_space::{resolve_axis, BoolGrid, EdgeBehavior, Grid3};
use rayon::prelude::*;
use std::ops::RangeInclusive;

/// A solid cube of `side` cells per axis.
///
/// The anchor sits at `side / 2`, so for even sides the cube reaches one
/// cell further towards negative offsets when eroding.
///
/// # Examples
///
/// ```
/// use cspace_morph::StructuringElement;
///
/// let se = StructuringElement::new(4).unwrap();
/// assert_eq!(se.erosion_offsets(), -2..=1);
/// assert_eq!(se.dilation_offsets(), -1..=2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StructuringElement {
    side: usize,
}

impl StructuringElement {
    /// A cube of side `radius`. Radius 1 is the identity element.
    pub fn new(radius: usize) -> Result<Self, MorphError> {
        if radius == 0 {
            return Err(MorphError::InvalidRadius { radius });
        }
        Ok(Self { side: radius })
    }

    /// Cube side length.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Per-axis offsets probed when eroding.
    pub fn erosion_offsets(&self) -> RangeInclusive<i64> {
        let side = self.side as i64;
        let anchor = side / 2;
        -anchor..=side - 1 - anchor
    }

    /// Per-axis offsets probed when dilating (the reflected cube).
    pub fn dilation_offsets(&self) -> RangeInclusive<i64> {
        let r = self.erosion_offsets();
        -*r.end()..=-*r.start()
    }
}

#[derive(Clone, Copy)]
enum Reduce {
    All,
    Any,
}

fn axis_pass(src: &BoolGrid, axis: usize, offsets: RangeInclusive<i64>, reduce: Reduce) -> BoolGrid {
    let shape = src.shape();
    let slice_len = src.x_slice_len();
    let mut out = Grid3::filled(shape, false);
    out.as_mut_slice()
        .par_chunks_mut(slice_len)
        .enumerate()
        .for_each(|(x, chunk)| {
            for (i, value) in chunk.iter_mut().enumerate() {
                let cell = src.cell_of(x * slice_len + i);
                let mut probe = offsets.clone().map(|d| {
                    resolve_axis(cell[axis] as i64 + d, shape[axis], EdgeBehavior::Absorb)
                        .is_some_and(|j| {
                            let mut c = cell;
                            c[axis] = j;
                            src[c]
                        })
                });
                *value = match reduce {
                    Reduce::All => probe.all(|b| b),
                    Reduce::Any => probe.any(|b| b),
                };
            }
        });
    out
}

fn separable(grid: &BoolGrid, offsets: RangeInclusive<i64>, reduce: Reduce) -> BoolGrid {
    let mut out = axis_pass(grid, 0, offsets.clone(), reduce);
    for axis in 1..3 {
        out = axis_pass(&out, axis, offsets.clone(), reduce);
    }
    out
}

/// Erode once without regard for the θ seam.
pub fn erode_non_periodic(grid: &BoolGrid, radius: usize) -> Result<BoolGrid, MorphError> {
    let se = StructuringElement::new(radius)?;
    Ok(separable(grid, se.erosion_offsets(), Reduce::All))
}

/// Erode `grid`, treating θ as periodic.
///
/// The result is always a subset of `grid`.
pub fn erode(grid: &BoolGrid, radius: usize) -> Result<BoolGrid, MorphError> {
    let half = (grid.shape()[2] / 2) as isize;
    log::debug!("eroding {:?} grid with radius {radius}", grid.shape());
    let direct = erode_non_periodic(grid, radius)?;
    let rolled = erode_non_periodic(&grid.roll_theta(half), radius)?.roll_theta(-half);
    Ok(direct.or(&rolled)?)
}

/// Dilate `grid` in a single non-periodic pass.
///
/// The result is always a superset of `grid`.
pub fn dilate(grid: &BoolGrid, radius: usize) -> Result<BoolGrid, MorphError> {
    let se = StructuringElement::new(radius)?;
    log::debug!("dilating {:?} grid with radius {radius}", grid.shape());
    Ok(separable(grid, se.dilation_offsets(), Reduce::Any))
}
