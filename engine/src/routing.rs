//! Multiple-flow-direction (MFD) discharge routing.
//!
//! Each cell splits its discharge among all strictly lower neighbors in proportion to
//! `drop^p` (p = 1.1 by default), diagonal drops scaled by `1/√2` before exponentiation.
//! Cells are visited from highest to lowest so that a cell's discharge is complete before
//! it is handed on; visiting out of order silently breaks conservation.

use std::f64::consts::FRAC_1_SQRT_2;

use crate::field::Field2;
use crate::lattice::{Dir, Lattice};
use crate::order::elevation_order;

/// Default MFD weight exponent.
pub const DEFAULT_FLOW_EXPONENT: f64 = 1.1;

/// Per-cell fraction of discharge sent in each of the eight [`Dir`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowFractions {
    /// Cells along x
    pub nx: usize,
    /// Cells along y
    pub ny: usize,
    /// Fractions indexed by flat cell id, then by `Dir::index()`
    pub frac: Vec<[f64; 8]>,
}

impl FlowFractions {
    /// All-zero fractions for an `nx × ny` lattice.
    pub fn new(nx: usize, ny: usize) -> Self {
        Self { nx, ny, frac: vec![[0.0; 8]; nx * ny] }
    }

    /// Fractions leaving `(i, j)`.
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> &[f64; 8] {
        &self.frac[j * self.nx + i]
    }

    /// Fraction leaving `(i, j)` toward `dir`.
    #[inline]
    pub fn toward(&self, i: usize, j: usize, dir: Dir) -> f64 {
        self.at(i, j)[dir.index()]
    }

    /// Sum of outgoing fractions at `(i, j)`: 0 for a sink, 1 otherwise.
    pub fn outgoing(&self, i: usize, j: usize) -> f64 {
        self.at(i, j).iter().sum()
    }
}

/// Route the discharge currently held at `(i, j)` to its downhill neighbors.
///
/// Recomputes the cell's eight fractions, then adds `flow[i][j] · fraction` to each
/// receiver. A cell with no lower neighbor keeps all fractions at zero.
pub fn route_cell(
    lattice: &Lattice,
    topo: &Field2,
    flow: &mut Field2,
    fractions: &mut FlowFractions,
    i: usize,
    j: usize,
    exponent: f64,
) {
    let h = topo.get(i, j);
    let mut weights = [0.0f64; 8];
    let mut targets = [(0usize, 0usize); 8];
    let mut tot = 0.0f64;
    for nb in lattice.neighbors(i, j) {
        let hn = topo.get(nb.i, nb.j);
        if h > hn {
            let mut drop = h - hn;
            if nb.dir.is_diagonal() {
                drop *= FRAC_1_SQRT_2;
            }
            let w = drop.powf(exponent);
            weights[nb.dir.index()] = w;
            targets[nb.dir.index()] = (nb.i, nb.j);
            tot += w;
        }
    }

    let k = topo.idx(i, j);
    let out = &mut fractions.frac[k];
    if tot <= 0.0 {
        *out = [0.0; 8];
        return;
    }
    let q = flow.data[k];
    for d in 0..8 {
        let f = weights[d] / tot;
        out[d] = f;
        if f > 0.0 {
            let (ti, tj) = targets[d];
            *flow.at_mut(ti, tj) += q * f;
        }
    }
}

/// Reset `flow` to one unit per cell and route the whole lattice, highest cell first.
pub fn accumulate_flow(
    lattice: &Lattice,
    topo: &Field2,
    flow: &mut Field2,
    fractions: &mut FlowFractions,
    exponent: f64,
) {
    flow.fill(1.0);
    let nx = lattice.nx;
    for k in elevation_order(&topo.data).into_iter().rev() {
        route_cell(lattice, topo, flow, fractions, k % nx, k / nx, exponent);
    }
}
