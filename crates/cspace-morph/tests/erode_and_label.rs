//! Erosion followed by component labeling, as the segmenter uses them.

use cspace_morph::{dilate, erode, geodesic_distance, label_components};
use cspace_space::{Extent, GridSpace, Resolution};
use std::f64::consts::TAU;

fn space() -> GridSpace {
    GridSpace::new(
        [12, 6, 6],
        Extent::new((0.0, 12.0), (0.0, 6.0)),
        Resolution {
            position: 1.0,
            theta: TAU / 6.0,
        },
    )
    .unwrap()
}

/// Two square chambers joined by a one-cell bridge at y = 3.
fn dumbbell(space: &GridSpace) -> cspace_space::BoolGrid {
    let mut g = space.filled(false);
    for cell in space.cells() {
        let [x, y, _] = cell;
        let chamber = (1..11).contains(&x) && (1..5).contains(&y) && !(5..7).contains(&x);
        let bridge = (5..7).contains(&x) && y == 3;
        g[cell] = chamber || bridge;
    }
    g
}

#[test]
fn erosion_cuts_the_bridge() {
    let s = space();
    let free = dumbbell(&s);
    assert_eq!(label_components(&free, &s).unwrap().components().len(), 1);

    let eroded = erode(&free, 3).unwrap();
    let labels = label_components(&eroded, &s).unwrap();
    let comps = labels.components();
    assert_eq!(comps.len(), 2);
    assert!(comps.iter().all(|c| c.voxels == 24));
    assert!(comps[0].centroid.x < comps[1].centroid.x);
}

#[test]
fn distance_crosses_the_bridge_inside_dilated_space() {
    let s = space();
    let free = dumbbell(&s);
    let eroded = erode(&free, 3).unwrap();
    let labels = label_components(&eroded, &s).unwrap();
    let passable = dilate(&free, 3).unwrap();

    let d = geodesic_distance(&s, &labels.mask(0), &passable).unwrap();
    assert_eq!(d[[3, 3, 0]], 0.0);
    assert!(d[[8, 3, 0]].is_finite());
    assert!(d[[8, 3, 0]] > d[[5, 3, 0]]);
}
