//! Implicit hillslope diffusion by alternating-direction sweeps.
//!
//! One sweep solves a tridiagonal system along every y-line (neighbors in x taken
//! explicitly from the current surface), then along every x-line using the intermediate
//! result. The right-hand side is anchored on `topo_old`, and the border ring is pinned to
//! `topo_old` throughout. Implicit in each direction, so any diffusivity is stable.
//!
//! Not part of the default step; the model uses it to pre-condition an initial drainage
//! network ([`init_diffusion`]) and callers may invoke it between steps.

use serde::{Deserialize, Serialize};

use crate::field::Field2;
use crate::lattice::Lattice;
use crate::tridiag::tridag;

/// Parameters for [`hillslope_diffusion`] and [`init_diffusion`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffusionParams {
    /// Diffusivity D (length²/time); enters as `D / Δx²`.
    pub diffusivity: f64,
    /// ADI sweeps per call (each sweep = one y pass + one x pass).
    pub sweeps: u32,
    /// Number of diffuse-then-raise passes in [`init_diffusion`].
    pub init_passes: u32,
    /// Interior raise applied after each [`init_diffusion`] pass.
    pub init_raise: f64,
}

impl Default for DiffusionParams {
    fn default() -> Self {
        Self { diffusivity: 1.0e7, sweeps: 5, init_passes: 10, init_raise: 0.1 }
    }
}

/// Coefficient bands for one axis: interior rows `-t, 4t+1, -t`, boundary rows identity.
fn bands(n: usize, term: f64) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let mut a = vec![-term; n];
    let mut b = vec![4.0 * term + 1.0; n];
    let mut c = vec![-term; n];
    if n > 0 {
        b[0] = 1.0;
        c[0] = 0.0;
        a[0] = 0.0;
        b[n - 1] = 1.0;
        a[n - 1] = 0.0;
        c[n - 1] = 0.0;
    }
    (a, b, c)
}

/// Run `p.sweeps` ADI sweeps over `topo` in place.
pub fn hillslope_diffusion(
    lattice: &Lattice,
    topo: &mut Field2,
    topo_old: &Field2,
    p: &DiffusionParams,
    dx: f64,
) {
    let (nx, ny) = (lattice.nx, lattice.ny);
    if nx == 0 || ny == 0 {
        return;
    }
    let term = p.diffusivity / (dx * dx);
    let (ax, bx, cx) = bands(nx, term);
    let (ay, by, cy) = bands(ny, term);
    let mut rx = vec![0.0f64; nx];
    let mut ux = vec![0.0f64; nx];
    let mut ry = vec![0.0f64; ny];
    let mut uy = vec![0.0f64; ny];

    for _ in 0..p.sweeps {
        // y-lines, x neighbors explicit
        for i in 0..nx {
            if i == 0 || i == nx - 1 {
                for j in 0..ny {
                    topo.set(i, j, topo_old.get(i, j));
                }
                continue;
            }
            let (iu, id) = (lattice.iup[i], lattice.idown[i]);
            for j in 0..ny {
                ry[j] = if j == 0 || j == ny - 1 {
                    topo_old.get(i, j)
                } else {
                    term * (topo.get(iu, j) + topo.get(id, j)) + topo_old.get(i, j)
                };
            }
            tridag(&ay, &by, &cy, &ry, &mut uy);
            for j in 0..ny {
                topo.set(i, j, uy[j]);
            }
        }

        // x-lines, y neighbors explicit
        for j in 0..ny {
            if j == 0 || j == ny - 1 {
                for i in 0..nx {
                    topo.set(i, j, topo_old.get(i, j));
                }
                continue;
            }
            let (ju, jd) = (lattice.jup[j], lattice.jdown[j]);
            for i in 0..nx {
                rx[i] = if i == 0 || i == nx - 1 {
                    topo_old.get(i, j)
                } else {
                    term * (topo.get(i, ju) + topo.get(i, jd)) + topo_old.get(i, j)
                };
            }
            tridag(&ax, &bx, &cx, &rx, &mut ux);
            for i in 0..nx {
                topo.set(i, j, ux[i]);
            }
        }
    }
}

/// Build a smooth, gently raised surface for initial flow routing.
///
/// Repeats `p.init_passes` times: diffuse, then raise every interior cell of both
/// `topo` and `topo_old` by `p.init_raise`.
pub fn init_diffusion(lattice: &Lattice, topo: &mut Field2, topo_old: &mut Field2, p: &DiffusionParams, dx: f64) {
    for _ in 0..p.init_passes {
        hillslope_diffusion(lattice, topo, topo_old, p, dx);
        for i in 1..lattice.nx.saturating_sub(1) {
            for j in 1..lattice.ny.saturating_sub(1) {
                *topo.at_mut(i, j) += p.init_raise;
                *topo_old.at_mut(i, j) += p.init_raise;
            }
        }
    }
}
