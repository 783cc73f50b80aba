//! Neighbourhood invariant checks shared by the space tests.

use crate::edge::resolve_axis;
use crate::space::GridSpace;
use cspace_core::Axis;
use indexmap::IndexSet;

/// Assert that `b in N(a)` implies `a in N(b)`, for both neighbourhoods.
pub fn assert_neighbours_symmetric(space: &GridSpace) {
    for cell in space.cells() {
        for nb in space.neighbours26(cell) {
            assert!(
                space.neighbours26(nb).contains(&cell),
                "26-neighbour symmetry violated: {nb:?} in N({cell:?}) but not the reverse"
            );
        }
        for edge in [crate::EdgeBehavior::Wrap, crate::EdgeBehavior::Absorb] {
            for nb in space.neighbours6(cell, edge) {
                assert!(
                    space.neighbours6(nb, edge).contains(&cell),
                    "6-neighbour symmetry violated ({edge:?}): {nb:?} / {cell:?}"
                );
            }
        }
    }
}

/// Assert that every neighbour lies inside the grid.
pub fn assert_neighbours_in_bounds(space: &GridSpace) {
    let shape = space.shape();
    for cell in space.cells() {
        for nb in space.neighbours26(cell) {
            assert!(
                nb.iter().zip(shape).all(|(&v, n)| v < n),
                "neighbour {nb:?} of {cell:?} outside shape {shape:?}"
            );
        }
    }
}

/// Assert that no cell lists itself and no neighbour appears twice.
pub fn assert_no_self_neighbour(space: &GridSpace) {
    for cell in space.cells() {
        let n = space.neighbours26(cell);
        assert!(!n.contains(&cell), "{cell:?} is its own neighbour");
        let unique: IndexSet<_> = n.iter().collect();
        assert_eq!(unique.len(), n.len(), "duplicate neighbours of {cell:?}");
    }
}

/// Assert that applying a neighbour's offset to the centre reaches it.
pub fn assert_offsets_resolve(space: &GridSpace) {
    let shape = space.shape();
    for cell in space.cells() {
        for nb in space.neighbourhood26(cell) {
            for axis in Axis::ALL {
                let i = axis.index();
                let resolved = resolve_axis(
                    cell[i] as i64 + i64::from(nb.offset[i]),
                    shape[i],
                    GridSpace::edge(axis),
                );
                assert_eq!(resolved, Some(nb.cell[i]), "{cell:?} -> {nb:?}");
            }
        }
    }
}

/// Assert that `cells()` visits exactly `cell_count` distinct cells in
/// storage order.
pub fn assert_cells_complete(space: &GridSpace) {
    let grid = space.filled(());
    let cells: IndexSet<_> = space.cells().collect();
    assert_eq!(cells.len(), space.cell_count());
    for (flat, cell) in cells.iter().enumerate() {
        assert_eq!(grid.flat_index(*cell), flat);
    }
}
