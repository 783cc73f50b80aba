//! Slow labeler used to cross-check the distance-field labeler.

use cspace_core::{Cell, RegionName};
use cspace_space::GridSpace;

use crate::region::Region;

/// Index-space Euclidean distance between two cells, wrapping θ.
fn wrapped_distance(space: &GridSpace, a: Cell, b: Cell) -> f64 {
    let nt = space.shape()[2];
    let dx = a[0].abs_diff(b[0]) as f64;
    let dy = a[1].abs_diff(b[1]) as f64;
    let dt = a[2].abs_diff(b[2]);
    let dt = dt.min(nt - dt) as f64;
    (dx * dx + dy * dy + dt * dt).sqrt()
}

/// The (up to) two regions a ball around `cell` reaches first.
///
/// The ball's radius grows one cell at a time from 1 to `max_radius`.
/// At each radius the regions it overlaps, in name order, are appended
/// to the result until two are found. Obstacles are ignored, so this
/// agrees with the geodesic labeler only where free space is convex
/// enough around the cell.
pub fn closest_regions_by_growing_ball(
    space: &GridSpace,
    regions: &[Region],
    cell: Cell,
    max_radius: usize,
) -> Vec<RegionName> {
    // Smallest ball radius that reaches each region.
    let mut reach: Vec<(usize, RegionName)> = regions
        .iter()
        .filter_map(|r| {
            r.mask()
                .iter_cells()
                .filter(|(_, &m)| m)
                .map(|(c, _)| wrapped_distance(space, cell, c))
                .min_by(f64::total_cmp)
                .map(|d| ((d.ceil() as usize).max(1), r.name()))
        })
        .filter(|&(radius, _)| radius <= max_radius)
        .collect();
    reach.sort();
    reach.into_iter().take(2).map(|(_, name)| name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cspace_test_utils::fixtures::unit_space;

    fn n(c: char) -> RegionName {
        RegionName::from_char(c).unwrap()
    }

    fn point_region(space: &GridSpace, name: char, cell: Cell) -> Region {
        let mut mask = space.filled(false);
        mask[cell] = true;
        Region::from_mask(n(name), mask, space).unwrap()
    }

    #[test]
    fn nearest_first_then_name_order() {
        let s = unit_space([12, 3, 4]);
        let regions = vec![
            point_region(&s, 'a', [1, 1, 0]),
            point_region(&s, 'b', [9, 1, 0]),
            point_region(&s, 'c', [7, 1, 0]),
        ];
        assert_eq!(
            closest_regions_by_growing_ball(&s, &regions, [8, 1, 0], 20),
            vec![n('b'), n('c')]
        );
        assert_eq!(
            closest_regions_by_growing_ball(&s, &regions, [2, 1, 0], 20),
            vec![n('a'), n('c')]
        );
    }

    #[test]
    fn theta_wraps() {
        let s = unit_space([3, 3, 16]);
        let regions = vec![
            point_region(&s, 'a', [1, 1, 8]),
            point_region(&s, 'b', [1, 1, 15]),
        ];
        // 15 is one step from 0 across the seam; 8 is eight steps away.
        assert_eq!(
            closest_regions_by_growing_ball(&s, &regions, [1, 1, 0], 20),
            vec![n('b'), n('a')]
        );
    }

    #[test]
    fn radius_limit_drops_far_regions() {
        let s = unit_space([12, 3, 4]);
        let regions = vec![
            point_region(&s, 'a', [1, 1, 0]),
            point_region(&s, 'b', [10, 1, 0]),
        ];
        assert_eq!(
            closest_regions_by_growing_ball(&s, &regions, [2, 1, 0], 3),
            vec![n('a')]
        );
        assert!(closest_regions_by_growing_ball(&s, &regions, [6, 1, 0], 2).is_empty());
    }
}
