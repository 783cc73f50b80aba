//! Weighted cell-adjacency graph of a configuration space.

use crate::error::MorphError;
use cspace_core::Cell;
use cspace_space::{BoolGrid, Grid3, GridSpace};

/// Cells joined to their Moore neighbours, θ periodic.
///
/// Every cell carries a value in `0..=1`: `1` for free space, `0` for
/// occupied, fractions for a downsampled grid. Two neighbours share an
/// edge when the product `m` of their values is non-zero; its weight is
/// `1 - m`, so a step between fully free cells costs nothing.
///
/// Adjacency is stored compactly: the neighbours of flat cell `i` are
/// `adjacency[offsets[i]..offsets[i + 1]]`.
///
/// # Examples
///
/// ```
/// use cspace_morph::DualGraph;
/// use cspace_space::{Extent, GridSpace, Resolution};
///
/// let space = GridSpace::new(
///     [1, 1, 4],
///     Extent::new((0.0, 1.0), (0.0, 1.0)),
///     Resolution { position: 1.0, theta: std::f64::consts::FRAC_PI_2 },
/// )
/// .unwrap();
/// let graph = DualGraph::from_occupancy(&space, &space.filled(true)).unwrap();
/// // A ring of four cells.
/// assert_eq!(graph.edge_count(), 4);
/// assert_eq!(graph.weight([0, 0, 0], [0, 0, 3]), Some(0.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DualGraph {
    shape: [usize; 3],
    offsets: Vec<usize>,
    adjacency: Vec<(Cell, f64)>,
}

impl DualGraph {
    /// Build the graph of `values` over `space`.
    pub fn new(space: &GridSpace, values: &Grid3<f64>) -> Result<Self, MorphError> {
        space.check_grid(values)?;
        let mut offsets = Vec::with_capacity(values.len() + 1);
        let mut adjacency = Vec::new();
        offsets.push(0);
        for (cell, &v) in values.iter_cells() {
            if v != 0.0 {
                for nb in space.neighbours26(cell) {
                    let m = v * values[nb];
                    if m != 0.0 {
                        adjacency.push((nb, 1.0 - m));
                    }
                }
            }
            offsets.push(adjacency.len());
        }
        log::debug!(
            "dual graph over {:?}: {} edges",
            space.shape(),
            adjacency.len() / 2
        );
        Ok(Self {
            shape: space.shape(),
            offsets,
            adjacency,
        })
    }

    /// Build the graph of a free-space grid: free cells weigh `1`.
    pub fn from_occupancy(space: &GridSpace, free: &BoolGrid) -> Result<Self, MorphError> {
        Self::new(space, &free.map(|&b| if b { 1.0 } else { 0.0 }))
    }

    fn flat(&self, cell: Cell) -> usize {
        (cell[0] * self.shape[1] + cell[1]) * self.shape[2] + cell[2]
    }

    /// One node per cell, connected or not.
    pub fn node_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.len() / 2
    }

    /// Neighbours of `cell` with edge weights.
    pub fn neighbours(&self, cell: Cell) -> &[(Cell, f64)] {
        let i = self.flat(cell);
        &self.adjacency[self.offsets[i]..self.offsets[i + 1]]
    }

    /// Weight of the edge `a`–`b`, if there is one.
    pub fn weight(&self, a: Cell, b: Cell) -> Option<f64> {
        self.neighbours(a)
            .iter()
            .find(|(c, _)| *c == b)
            .map(|&(_, w)| w)
    }

    /// Every edge once, as `(a, b, weight)` with `a` before `b` in
    /// storage order.
    pub fn edges(&self) -> impl Iterator<Item = (Cell, Cell, f64)> + '_ {
        (0..self.node_count()).flat_map(move |i| {
            let [_, ny, nt] = self.shape;
            let a = [i / (ny * nt), (i / nt) % ny, i % nt];
            self.adjacency[self.offsets[i]..self.offsets[i + 1]]
                .iter()
                .filter(move |(b, _)| self.flat(*b) > i)
                .map(move |&(b, w)| (a, b, w))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cspace_space::{Extent, Resolution};

    fn space(shape: [usize; 3]) -> GridSpace {
        GridSpace::new(
            shape,
            Extent::new((0.0, shape[0] as f64), (0.0, shape[1] as f64)),
            Resolution {
                position: 1.0,
                theta: std::f64::consts::TAU / shape[2] as f64,
            },
        )
        .unwrap()
    }

    #[test]
    fn occupied_cells_are_isolated() {
        let s = space([3, 3, 3]);
        let mut free = s.filled(true);
        free[[1, 1, 1]] = false;
        let g = DualGraph::from_occupancy(&s, &free).unwrap();
        assert_eq!(g.node_count(), 27);
        assert!(g.neighbours([1, 1, 1]).is_empty());
        assert_eq!(g.weight([0, 0, 0], [1, 1, 1]), None);
        // Corner: 2×2 in x/y over 3 θ layers, minus itself and the centre.
        assert_eq!(g.neighbours([0, 0, 0]).len(), 2 * 2 * 3 - 1 - 1);
    }

    #[test]
    fn fractional_values_set_the_weight() {
        let s = space([2, 1, 3]);
        let mut v = s.filled(1.0);
        v[[0, 0, 0]] = 0.5;
        v[[1, 0, 0]] = 0.5;
        let g = DualGraph::new(&s, &v).unwrap();
        assert_eq!(g.weight([0, 0, 0], [1, 0, 0]), Some(0.75));
        assert_eq!(g.weight([1, 0, 0], [0, 0, 0]), Some(0.75));
        assert_eq!(g.weight([0, 0, 0], [0, 0, 1]), Some(0.5));
        assert_eq!(g.weight([0, 0, 1], [1, 0, 2]), Some(0.0));
    }

    #[test]
    fn edges_are_listed_once_and_cross_the_seam() {
        let s = space([2, 2, 5]);
        let g = DualGraph::from_occupancy(&s, &s.filled(true)).unwrap();
        let edges: Vec<_> = g.edges().collect();
        assert_eq!(edges.len(), g.edge_count());
        let degree_sum: usize = s.cells().map(|c| g.neighbours(c).len()).sum();
        assert_eq!(degree_sum, 2 * edges.len());
        assert!(edges.contains(&([0, 0, 0], [0, 0, 4], 0.0)));
    }

    #[test]
    fn mismatched_grid_is_rejected() {
        let s = space([2, 2, 5]);
        let v = Grid3::filled([2, 2, 4], 1.0);
        assert!(matches!(DualGraph::new(&s, &v), Err(MorphError::Space(_))));
    }
}
