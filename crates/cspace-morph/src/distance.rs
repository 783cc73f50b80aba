//! Masked geodesic distance over the 26-neighbourhood.

use crate::error::MorphError;
use cspace_space::{BoolGrid, DistanceGrid, GridSpace};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Priority-queue entry.
#[derive(Clone, Copy, Debug)]
struct State {
    cost: f64,
    flat: usize,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; flat index breaks ties deterministically.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.flat.cmp(&self.flat))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest-path distance from `seeds` to every cell, in index units.
///
/// Paths move between 26-neighbours of `space` (θ periodic) with step
/// length 1, √2 or √3 and may only enter cells set in `passable`. Seed
/// cells are 0; cells outside `passable` or cut off from every seed are
/// `f64::INFINITY`.
///
/// # Examples
///
/// ```
/// use cspace_morph::geodesic_distance;
/// use cspace_space::{Extent, GridSpace, Resolution};
///
/// let space = GridSpace::new(
///     [5, 1, 1],
///     Extent::new((0.0, 5.0), (0.0, 1.0)),
///     Resolution { position: 1.0, theta: std::f64::consts::TAU },
/// )
/// .unwrap();
/// let mut seeds = space.filled(false);
/// seeds[[0, 0, 0]] = true;
/// let passable = space.filled(true);
///
/// let d = geodesic_distance(&space, &seeds, &passable).unwrap();
/// assert_eq!(d[[4, 0, 0]], 4.0);
/// ```
pub fn geodesic_distance(
    space: &GridSpace,
    seeds: &BoolGrid,
    passable: &BoolGrid,
) -> Result<DistanceGrid, MorphError> {
    space.check_grid(seeds)?;
    space.check_grid(passable)?;

    let mut dist = space.filled(f64::INFINITY);
    let mut heap = BinaryHeap::new();
    for (flat, _) in seeds.as_slice().iter().enumerate().filter(|(_, &s)| s) {
        dist.as_mut_slice()[flat] = 0.0;
        heap.push(State { cost: 0.0, flat });
    }

    while let Some(State { cost, flat }) = heap.pop() {
        if cost > dist.as_slice()[flat] {
            continue;
        }
        for nb in space.neighbourhood26(dist.cell_of(flat)) {
            if !passable[nb.cell] {
                continue;
            }
            let next = cost + nb.step_length();
            let slot = &mut dist[nb.cell];
            if next < *slot {
                *slot = next;
                heap.push(State {
                    cost: next,
                    flat: seeds.flat_index(nb.cell),
                });
            }
        }
    }
    Ok(dist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cspace_space::{Extent, Resolution};
    use std::f64::consts::{SQRT_2, TAU};

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

    #[test]
    fn no_seeds_means_everything_unreachable() {
        let s = space([3, 3, 3]);
        let d = geodesic_distance(&s, &s.filled(false), &s.filled(true)).unwrap();
        assert!(d.as_slice().iter().all(|v| v.is_infinite()));
    }

    #[test]
    fn diagonal_steps_are_euclidean() {
        let s = space([4, 4, 5]);
        let mut seeds = s.filled(false);
        seeds[[0, 0, 0]] = true;
        let d = geodesic_distance(&s, &seeds, &s.filled(true)).unwrap();
        assert_eq!(d[[1, 0, 0]], 1.0);
        assert!((d[[1, 1, 0]] - SQRT_2).abs() < 1e-12);
        assert!((d[[1, 1, 1]] - 3f64.sqrt()).abs() < 1e-12);
        assert!((d[[3, 1, 0]] - (2.0 + SQRT_2)).abs() < 1e-12);
    }

    #[test]
    fn theta_wraps_across_the_seam() {
        let s = space([1, 1, 10]);
        let mut seeds = s.filled(false);
        seeds[[0, 0, 0]] = true;
        let d = geodesic_distance(&s, &seeds, &s.filled(true)).unwrap();
        assert_eq!(d[[0, 0, 9]], 1.0);
        assert_eq!(d[[0, 0, 5]], 5.0);
        assert_eq!(d[[0, 0, 7]], 3.0);
    }

    #[test]
    fn blocked_cells_are_infinite_and_detoured() {
        let s = space([5, 3, 1]);
        let mut seeds = s.filled(false);
        seeds[[0, 1, 0]] = true;
        let mut passable = s.filled(true);
        // Wall at x = 2 except a gap at y = 0.
        passable[[2, 1, 0]] = false;
        passable[[2, 2, 0]] = false;
        let d = geodesic_distance(&s, &seeds, &passable).unwrap();
        assert!(d[[2, 1, 0]].is_infinite());
        // Through the gap: (0,1) -> (1,0) -> (2,0) -> (3,1) -> (4,1).
        assert!((d[[4, 1, 0]] - (2.0 * SQRT_2 + 2.0)).abs() < 1e-12);
    }

    #[test]
    fn isolated_pocket_is_unreachable() {
        let s = space([5, 1, 1]);
        let mut seeds = s.filled(false);
        seeds[[0, 0, 0]] = true;
        let mut passable = s.filled(true);
        passable[[2, 0, 0]] = false;
        let d = geodesic_distance(&s, &seeds, &passable).unwrap();
        assert_eq!(d[[1, 0, 0]], 1.0);
        assert!(d[[3, 0, 0]].is_infinite());
        assert!(d[[4, 0, 0]].is_infinite());
    }
}
