//! Face-connected component labeling.
//!
//! Components are found with the θ seam *open*: cells at `θ = 0` and
//! `θ = nθ - 1` are not connected here. A region crossing the seam is
//! reported as two components, each touching one θ face, and it is up to
//! the caller to decide whether to re-join them.

use crate::error::MorphError;
use cspace_core::{Axis, Pose};
use cspace_space::{BoolGrid, EdgeBehavior, Grid3, GridSpace, ThetaFace};
use std::collections::VecDeque;
use std::f64::consts::TAU;

/// One connected component, in discovery order.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    /// Position in discovery order (storage-order scan).
    pub id: usize,
    /// Number of cells.
    pub voxels: usize,
    /// Physical centroid; θ is the circular mean in `[0, 2π)`.
    pub centroid: Pose,
    /// Whether any cell lies on `θ = 0`.
    pub touches_bottom: bool,
    /// Whether any cell lies on `θ = nθ - 1`.
    pub touches_top: bool,
}

impl Component {
    /// Whether the component touches `face`.
    pub fn touches(&self, face: ThetaFace) -> bool {
        match face {
            ThetaFace::Bottom => self.touches_bottom,
            ThetaFace::Top => self.touches_top,
        }
    }

    /// The single θ face this component touches, if it touches exactly one.
    pub fn single_theta_face(&self) -> Option<ThetaFace> {
        match (self.touches_bottom, self.touches_top) {
            (true, false) => Some(ThetaFace::Bottom),
            (false, true) => Some(ThetaFace::Top),
            _ => None,
        }
    }
}

/// A component id per cell plus per-component statistics.
#[derive(Clone, Debug)]
pub struct ComponentLabels {
    ids: Grid3<Option<u32>>,
    components: Vec<Component>,
}

impl ComponentLabels {
    /// Components in discovery order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Component id of every cell, `None` for unset cells.
    pub fn ids(&self) -> &Grid3<Option<u32>> {
        &self.ids
    }

    /// Boolean mask of component `id`.
    pub fn mask(&self, id: usize) -> BoolGrid {
        self.ids.map(|&c| c == Some(id as u32))
    }
}

#[derive(Default)]
struct Accumulator {
    voxels: usize,
    sum_x: f64,
    sum_y: f64,
    sum_cos: f64,
    sum_sin: f64,
    bottom: bool,
    top: bool,
}

/// Label the 6-connected components of `grid`.
pub fn label_components(grid: &BoolGrid, space: &GridSpace) -> Result<ComponentLabels, MorphError> {
    space.check_grid(grid)?;
    let nt = space.len(Axis::Theta);
    let mut ids: Grid3<Option<u32>> = space.filled(None);
    let mut components = Vec::new();
    let mut queue = VecDeque::new();

    for start in 0..grid.len() {
        if !grid.as_slice()[start] || ids.as_slice()[start].is_some() {
            continue;
        }
        let id = components.len() as u32;
        let mut acc = Accumulator::default();
        ids.as_mut_slice()[start] = Some(id);
        queue.push_back(grid.cell_of(start));

        while let Some(cell) = queue.pop_front() {
            acc.voxels += 1;
            acc.sum_x += space.index_to_coord(Axis::X, cell[0]);
            acc.sum_y += space.index_to_coord(Axis::Y, cell[1]);
            let theta = space.index_to_coord(Axis::Theta, cell[2]);
            acc.sum_cos += theta.cos();
            acc.sum_sin += theta.sin();
            acc.bottom |= cell[2] == 0;
            acc.top |= cell[2] == nt - 1;

            for nb in space.neighbours6(cell, EdgeBehavior::Absorb) {
                if grid[nb] && ids[nb].is_none() {
                    ids[nb] = Some(id);
                    queue.push_back(nb);
                }
            }
        }

        let n = acc.voxels as f64;
        let theta = if acc.sum_cos.hypot(acc.sum_sin) < 1e-12 {
            0.0
        } else {
            acc.sum_sin.atan2(acc.sum_cos).rem_euclid(TAU)
        };
        components.push(Component {
            id: id as usize,
            voxels: acc.voxels,
            centroid: Pose::new(acc.sum_x / n, acc.sum_y / n, theta),
            touches_bottom: acc.bottom,
            touches_top: acc.top,
        });
    }

    log::debug!("found {} connected components", components.len());
    Ok(ComponentLabels { ids, components })
}
