//! Benchmark profiles for the cspace labeling pipeline.
//!
//! - [`reference_profile`]: a 96×32×32 three-chamber maze (~98K cells)
//! - [`stress_profile`]: the same maze at 192×64×64 (~786K cells)
//! - [`random_occupancy`]: seeded uniform noise, for worst-case labeling
//!
//! All randomness comes from a seeded `ChaCha8Rng`, so a profile is the
//! same grid on every run and every platform.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::f64::consts::TAU;

use cspace_space::{BoolGrid, Extent, GridSpace, Resolution};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Erosion radius that closes the slit gaps of the profiles.
pub const PROFILE_EROSION_RADIUS: usize = 5;

/// A space of `shape` with unit position step and a full θ turn.
pub fn unit_space(shape: [usize; 3]) -> GridSpace {
    GridSpace::new(
        shape,
        Extent::new((0.0, shape[0] as f64), (0.0, shape[1] as f64)),
        Resolution {
            position: 1.0,
            theta: TAU / shape[2] as f64,
        },
    )
    .expect("profile shape is non-empty")
}

/// A space and its occupancy.
pub struct Profile {
    /// The grid.
    pub space: GridSpace,
    /// `true` = free.
    pub free: BoolGrid,
}

/// Two slit walls split x into thirds. Each wall has a three-cell gap
/// whose height follows the load angle. A sprinkling of single-cell
/// obstacles (`noise` per free cell) roughens the chambers.
fn slit_maze(shape: [usize; 3], noise: f64, seed: u64) -> Profile {
    let space = unit_space(shape);
    let [nx, ny, nt] = shape;
    let walls = [nx / 3, 2 * nx / 3];
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut free = space.filled(true);
    for t in 0..nt {
        let swing = (ny / 4) as f64 * (TAU * t as f64 / nt as f64).sin();
        let centre = (ny as f64 / 2.0 + swing).round() as usize;
        for &wx in &walls {
            for x in wx..wx + 2 {
                for y in 0..ny {
                    if y + 1 < centre || y > centre + 1 {
                        free[[x, y, t]] = false;
                    }
                }
            }
        }
    }
    for v in free.as_mut_slice() {
        if *v && rng.random_bool(noise) {
            *v = false;
        }
    }
    free.force_walls();
    Profile { space, free }
}

/// Build the reference profile: 96×32×32 cells.
pub fn reference_profile(seed: u64) -> Profile {
    slit_maze([96, 32, 32], 0.002, seed)
}

/// Build the stress profile: 192×64×64 cells.
pub fn stress_profile(seed: u64) -> Profile {
    slit_maze([192, 64, 64], 0.002, seed)
}

/// Uniform noise: each cell free with probability `free_fraction`.
pub fn random_occupancy(shape: [usize; 3], free_fraction: f64, seed: u64) -> Profile {
    let space = unit_space(shape);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut free = space.filled(false);
    for v in free.as_mut_slice() {
        *v = rng.random_bool(free_fraction);
    }
    free.force_walls();
    Profile { space, free }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_are_deterministic() {
        assert_eq!(reference_profile(7).free, reference_profile(7).free);
        assert_ne!(reference_profile(7).free, reference_profile(8).free);
    }

    #[test]
    fn slit_gaps_are_open() {
        let p = slit_maze([30, 16, 8], 0.0, 0);
        // θ = 0: no swing, gap centred at y = 8.
        assert!(p.free[[10, 8, 0]]);
        assert!(p.free[[10, 7, 0]] && p.free[[10, 9, 0]]);
        assert!(!p.free[[10, 6, 0]] && !p.free[[10, 10, 0]]);
        assert!(p.free[[5, 5, 0]]);
    }

    #[test]
    fn random_occupancy_respects_fraction() {
        let p = random_occupancy([20, 20, 20], 0.5, 1);
        let fraction = p.free.count_true() as f64 / p.free.len() as f64;
        // Walls take about a quarter of a 20³ grid.
        assert!((0.3..0.45).contains(&fraction));
    }
}
