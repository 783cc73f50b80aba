//! Block-average resolution reduction.

use crate::error::MorphError;
use cspace_space::{BoolGrid, Grid3};

/// Reduce `grid` by `reduction` along every axis.
///
/// Each axis is first truncated to a multiple of `reduction`; each output
/// cell is then the fraction of set cells in its `reduction³` block.
pub fn downsample(grid: &BoolGrid, reduction: usize) -> Result<Grid3<f64>, MorphError> {
    let shape = grid.shape();
    if reduction == 0 || shape.iter().any(|&n| n < reduction) {
        return Err(MorphError::InvalidReduction { reduction, shape });
    }
    let out_shape = shape.map(|n| n / reduction);
    let mut out = Grid3::try_filled(out_shape, 0.0)?;
    for x in 0..out_shape[0] * reduction {
        for y in 0..out_shape[1] * reduction {
            for t in 0..out_shape[2] * reduction {
                if grid[[x, y, t]] {
                    out[[x / reduction, y / reduction, t / reduction]] += 1.0;
                }
            }
        }
    }
    let block = (reduction * reduction * reduction) as f64;
    for v in out.as_mut_slice() {
        *v /= block;
    }
    Ok(out)
}
