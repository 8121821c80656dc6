//! Gravitational slope failure (avalanching).
//!
//! A neighbor standing more than `thresh` above a cell (`thresh·√2` on diagonals) is cut
//! down to exactly that height. One ascending sweep per step: low cells go first so the
//! steep neighbors above them are clamped against already-settled ground. A cascade that
//! spans many cells is only partly relaxed in one sweep and finishes over later steps.

use std::f64::consts::SQRT_2;

use crate::field::Field2;
use crate::lattice::Lattice;
use crate::order::cells_ascending;

/// Default repose gradient; `thresh = DEFAULT_REPOSE_SLOPE · Δx` (≈30°).
pub const DEFAULT_REPOSE_SLOPE: f64 = 0.58;

/// Clamp every neighbor of `(i, j)` that exceeds the stable height difference.
/// Returns how many neighbors were lowered.
pub fn avalanche_cell(lattice: &Lattice, topo: &mut Field2, i: usize, j: usize, thresh: f64) -> usize {
    let h = topo.get(i, j);
    let mut clamped = 0;
    for nb in lattice.neighbors(i, j) {
        let limit = if nb.dir.is_diagonal() { thresh * SQRT_2 } else { thresh };
        let hn = topo.at_mut(nb.i, nb.j);
        if *hn - h > limit {
            *hn = h + limit;
            clamped += 1;
        }
    }
    clamped
}

/// One relaxation pass over every cell in ascending order of the pre-sweep elevation.
/// Returns the total number of clamps applied.
pub fn avalanche_sweep(lattice: &Lattice, topo: &mut Field2, thresh: f64) -> usize {
    let order = cells_ascending(topo);
    order.into_iter().map(|(i, j)| avalanche_cell(lattice, topo, i, j, thresh)).sum()
}
