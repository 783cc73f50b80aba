//! Canonical regions of the configuration space.

use std::f64::consts::TAU;

use cspace_core::{Axis, Pose, RegionName};
use cspace_morph::{geodesic_distance, MorphError};
use cspace_space::{BoolGrid, DistanceGrid, GridSpace, SpaceError, ThetaFace};

/// A named, connected chunk of the eroded free space.
///
/// Regions are created by the segmenter. The only mutations afterwards are
/// the seam merge, which happens before naming, and attaching the distance
/// field.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    name: RegionName,
    mask: BoolGrid,
    centroid: Pose,
    voxels: usize,
    distance: Option<DistanceGrid>,
}

impl Region {
    /// Build a region from its mask, computing the centroid.
    ///
    /// The θ component of the centroid is the circular mean of the
    /// member cells' angles.
    pub fn from_mask(name: RegionName, mask: BoolGrid, space: &GridSpace) -> Result<Self, SpaceError> {
        space.check_grid(&mask)?;
        let (centroid, voxels) = centroid_of(&mask, space);
        Ok(Self {
            name,
            mask,
            centroid,
            voxels,
            distance: None,
        })
    }

    /// Rebuild a region from persisted parts, trusting the stored centroid.
    pub fn from_parts(name: RegionName, mask: BoolGrid, centroid: Pose) -> Self {
        let voxels = mask.count_true();
        Self {
            name,
            mask,
            centroid,
            voxels,
            distance: None,
        }
    }

    /// Single-letter name.
    pub fn name(&self) -> RegionName {
        self.name
    }

    /// Membership mask.
    pub fn mask(&self) -> &BoolGrid {
        &self.mask
    }

    /// Physical centroid.
    pub fn centroid(&self) -> Pose {
        self.centroid
    }

    /// Number of member cells.
    pub fn voxels(&self) -> usize {
        self.voxels
    }

    /// Whether any member cell lies on `face`.
    pub fn touches(&self, face: ThetaFace) -> bool {
        self.mask.touches_theta_face(face)
    }

    /// Distance field, once computed.
    pub fn distance(&self) -> Option<&DistanceGrid> {
        self.distance.as_ref()
    }

    /// Compute and store the geodesic distance from this region through
    /// `passable`.
    pub fn compute_distance(&mut self, space: &GridSpace, passable: &BoolGrid) -> Result<(), MorphError> {
        self.distance = Some(geodesic_distance(space, &self.mask, passable)?);
        Ok(())
    }
}

fn centroid_of(mask: &BoolGrid, space: &GridSpace) -> (Pose, usize) {
    let (mut n, mut sx, mut sy, mut sc, mut ss) = (0usize, 0.0, 0.0, 0.0, 0.0);
    for (cell, _) in mask.iter_cells().filter(|(_, &m)| m) {
        let pose = space.cell_to_pose(cell);
        n += 1;
        sx += pose.x;
        sy += pose.y;
        sc += pose.theta.cos();
        ss += pose.theta.sin();
    }
    if n == 0 {
        return (Pose::default(), 0);
    }
    let theta = if sc.hypot(ss) < 1e-12 {
        space.extent().get(Axis::Theta).0
    } else {
        ss.atan2(sc).rem_euclid(TAU)
    };
    (Pose::new(sx / n as f64, sy / n as f64, theta), n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cspace_test_utils::fixtures::unit_space;

    fn name(c: char) -> RegionName {
        RegionName::from_char(c).unwrap()
    }

    #[test]
    fn centroid_straddling_seam_is_near_zero() {
        let s = unit_space([4, 4, 8]);
        let mut mask = s.filled(false);
        mask[[1, 2, 7]] = true;
        mask[[1, 2, 0]] = true;
        mask[[2, 2, 0]] = true;
        mask[[2, 2, 7]] = true;
        let r = Region::from_mask(name('a'), mask, &s).unwrap();
        assert_eq!(r.voxels(), 4);
        let c = r.centroid();
        assert!((c.x - 1.5).abs() < 1e-12);
        assert!((c.y - 2.0).abs() < 1e-12);
        // Halfway between 7/8 turn and 0 is 15/16 of a turn.
        assert!((c.theta - 15.0 * TAU / 16.0).abs() < 1e-9);
        assert!(r.touches(ThetaFace::Bottom) && r.touches(ThetaFace::Top));
    }

    #[test]
    fn distance_is_absent_until_computed() {
        let s = unit_space([3, 3, 3]);
        let mut mask = s.filled(false);
        mask[[1, 1, 1]] = true;
        let mut r = Region::from_mask(name('b'), mask, &s).unwrap();
        assert!(r.distance().is_none());
        r.compute_distance(&s, &s.filled(true)).unwrap();
        let d = r.distance().unwrap();
        assert_eq!(d[[1, 1, 1]], 0.0);
        assert_eq!(d[[1, 1, 2]], 1.0);
    }

    #[test]
    fn mask_shape_is_checked() {
        let s = unit_space([3, 3, 3]);
        let mask = unit_space([3, 3, 4]).filled(true);
        assert!(Region::from_mask(name('a'), mask, &s).is_err());
    }
}
