//! Synthetic configuration spaces with known regions.
//!
//! All fixtures use a unit position step and `nθ` evenly spaced angles,
//! so cell indices and physical x/y coordinates coincide.

use std::f64::consts::TAU;

use cspace_space::{BoolGrid, Extent, GridSpace, Resolution};

/// A space of `shape` with unit position resolution and a full θ turn.
pub fn unit_space(shape: [usize; 3]) -> GridSpace {
    GridSpace::new(
        shape,
        Extent::new((0.0, shape[0] as f64), (0.0, shape[1] as f64)),
        Resolution {
            position: 1.0,
            theta: TAU / shape[2] as f64,
        },
    )
    .expect("fixture space")
}

/// A free grid together with the masks of the regions it should yield.
pub struct Scenario {
    pub space: GridSpace,
    pub free: BoolGrid,
    /// Expected region masks, in naming order.
    pub regions: Vec<BoolGrid>,
}

fn fill(grid: &mut BoolGrid, x: impl Iterator<Item = usize> + Clone, y: impl Iterator<Item = usize> + Clone, t: &[usize]) {
    for xi in x {
        for yi in y.clone() {
            for &ti in t {
                grid[[xi, yi, ti]] = true;
            }
        }
    }
}

/// Two 2×2×2 blocks beside a θ-wrapping corridor on a 10×10×8 grid.
///
/// Block `a` spans x 2..=3, block `b` x 6..=7, both at y 2..=3 and
/// θ 3..=4. The corridor fills y 5..=6 for every θ and reaches down to
/// y = 4 at every θ except 3 and 4, so it touches each block only
/// diagonally: the three pieces are separate face-connected components,
/// but geodesic paths run between them. The corridor is the largest
/// component.
pub fn two_block_scenario() -> Scenario {
    let space = unit_space([10, 10, 8]);
    let all_theta: Vec<usize> = (0..8).collect();
    let bridge_theta: Vec<usize> = (0..8).filter(|t| !(3..=4).contains(t)).collect();

    let mut a = space.filled(false);
    fill(&mut a, 2..=3, 2..=3, &[3, 4]);
    let mut b = space.filled(false);
    fill(&mut b, 6..=7, 2..=3, &[3, 4]);

    let mut free = space.filled(false);
    fill(&mut free, 1..=8, 5..=6, &all_theta);
    fill(&mut free, 1..=8, 4..=4, &bridge_theta);
    let free = free.or(&a).and_then(|g| g.or(&b)).expect("same shape");

    Scenario {
        space,
        free,
        regions: vec![a, b],
    }
}

/// One 3×3×4 block straddling the θ seam (θ 6, 7, 0, 1) plus a
/// background slab, on a 10×10×8 grid.
///
/// Face-connected labeling with the seam open sees the block as two
/// halves with identical x centroids.
pub fn seam_block_scenario() -> Scenario {
    let space = unit_space([10, 10, 8]);
    let all_theta: Vec<usize> = (0..8).collect();

    let mut block = space.filled(false);
    fill(&mut block, 3..=5, 2..=4, &[6, 7, 0, 1]);

    let mut free = space.filled(false);
    fill(&mut free, 1..=8, 7..=8, &all_theta);
    let free = free.or(&block).expect("same shape");

    Scenario {
        space,
        free,
        regions: vec![block],
    }
}

/// `count` isolated chambers in a row above a background slab.
///
/// Chamber `k` covers x `2 + 3k ..= 3 + 3k`, y 2..=3 and θ
/// `1 ..= 1 + k % 6` on an 8-angle grid, so chamber sizes repeat with
/// period six and no chamber touches a θ face.
pub fn chambers(count: usize) -> Scenario {
    let nx = 3 * count + 3;
    let space = unit_space([nx, 8, 8]);
    let all_theta: Vec<usize> = (0..8).collect();

    let mut free = space.filled(false);
    fill(&mut free, 1..=nx - 2, 5..=6, &all_theta);

    let mut regions = Vec::with_capacity(count);
    for k in 0..count {
        let theta: Vec<usize> = (1..=1 + k % 6).collect();
        let mut chamber = space.filled(false);
        fill(&mut chamber, 2 + 3 * k..=3 + 3 * k, 2..=3, &theta);
        free = free.or(&chamber).expect("same shape");
        regions.push(chamber);
    }

    Scenario {
        space,
        free,
        regions,
    }
}
