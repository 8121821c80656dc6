//! Fluvial incision by the stream-power law.
//!
//! Incision per step: `Δh = dt · K · sqrt(Q) · Δx · S`, where `Q` is routed discharge
//! (unit seed per cell) and `S` the steepest downhill gradient. Only interior cells erode;
//! the border ring acts as fixed base level. Elevation never drops below 0.
//!
//! Cells are updated in place, x-major then y, so a cell's slope sees neighbors that have
//! already been lowered this pass.

use std::f64::consts::FRAC_1_SQRT_2;

use crate::field::Field2;
use crate::lattice::Lattice;

/// Magnitude of the steepest downhill gradient at `(i, j)`, divided by `dx`.
///
/// Diagonal differences are scaled by `1/√2`. Returns 0 when no neighbor is lower.
pub fn channel_slope(lattice: &Lattice, topo: &Field2, i: usize, j: usize, dx: f64) -> f64 {
    let h = topo.get(i, j);
    let mut down = 0.0f64;
    for nb in lattice.neighbors(i, j) {
        let mut d = topo.get(nb.i, nb.j) - h;
        if nb.dir.is_diagonal() {
            d *= FRAC_1_SQRT_2;
        }
        if d < down {
            down = d;
        }
    }
    down.abs() / dx
}

/// Apply one step of stream-power incision to every interior cell.
///
/// Writes the slope used at each interior cell into `slope` and returns the largest
/// erosion-rate coefficient `K · sqrt(Q) · Δx` seen, which drives timestep control.
pub fn apply_stream_power(
    lattice: &Lattice,
    topo: &mut Field2,
    flow: &Field2,
    erodibility: &Field2,
    slope: &mut Field2,
    timestep: f64,
    dx: f64,
) -> f64 {
    let mut max_rate = 0.0f64;
    for i in 1..lattice.nx.saturating_sub(1) {
        for j in 1..lattice.ny.saturating_sub(1) {
            let s = channel_slope(lattice, topo, i, j, dx);
            slope.set(i, j, s);
            let rate = erodibility.get(i, j) * flow.get(i, j).sqrt() * dx;
            let h = topo.at_mut(i, j);
            *h -= timestep * rate * s;
            if *h < 0.0 {
                *h = 0.0;
            }
            if rate > max_rate {
                max_rate = rate;
            }
        }
    }
    max_rate
}
