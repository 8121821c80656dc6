//! Simulation state owned by one landscape model.
//!
//! Persistent fields (`topo`, `topo_old`, `uplift`, `erodibility`) survive across steps.
//! Transient fields (`flow`, `fractions`, `slope`) are overwritten every step and only
//! kept here so they can be inspected after a step without reallocating.

use crate::field::Field2;
use crate::lattice::Lattice;
use crate::routing::FlowFractions;

/// All grids touched by a step, plus the lattice they live on.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    /// Neighbor tables for the lattice
    pub lattice: Lattice,
    /// Current elevation; never negative after erosion
    pub topo: Field2,
    /// Baseline for rollback and the diffusion right-hand side
    pub topo_old: Field2,
    /// Uplift rate per cell (length/time)
    pub uplift: Field2,
    /// Stream-power coefficient K per cell
    pub erodibility: Field2,
    /// Routed discharge from the last step (unit seed per cell)
    pub flow: Field2,
    /// Outgoing MFD fractions from the last step
    pub fractions: FlowFractions,
    /// Channel slope used by the last incision pass (interior cells only)
    pub slope: Field2,
}

impl SimulationState {
    /// Fresh state over `topo`: baseline equals `topo`, zero uplift, uniform erodibility `k`.
    pub fn new(topo: Field2, k: f64) -> Self {
        let (nx, ny) = (topo.nx, topo.ny);
        Self {
            lattice: Lattice::new(nx, ny),
            topo_old: topo.clone(),
            topo,
            uplift: Field2::zeros(nx, ny),
            erodibility: Field2::filled(nx, ny, k),
            flow: Field2::filled(nx, ny, 1.0),
            fractions: FlowFractions::new(nx, ny),
            slope: Field2::zeros(nx, ny),
        }
    }

    /// Add `U · dt` to every interior cell of both `topo` and `topo_old`.
    pub fn apply_uplift(&mut self, dt: f64) {
        for i in 1..self.lattice.nx.saturating_sub(1) {
            for j in 1..self.lattice.ny.saturating_sub(1) {
                let du = self.uplift.get(i, j) * dt;
                *self.topo.at_mut(i, j) += du;
                *self.topo_old.at_mut(i, j) += du;
            }
        }
    }

    /// Undo a rejected step on interior cells: `topo = topo_old − U · dt_retry`.
    ///
    /// `topo_old` already holds the pre-step surface plus the full uplift of the rejected
    /// step, so this leaves the surface raised by the difference between the two uplifts.
    /// Avalanching, pit filling and routing from the rejected step are not undone.
    pub fn rollback(&mut self, dt_retry: f64) {
        for i in 1..self.lattice.nx.saturating_sub(1) {
            for j in 1..self.lattice.ny.saturating_sub(1) {
                let v = self.topo_old.get(i, j) - self.uplift.get(i, j) * dt_retry;
                self.topo.set(i, j, v);
            }
        }
    }

    /// Accept the step: the current surface becomes the next baseline.
    pub fn commit(&mut self) {
        self.topo_old.copy_from(&self.topo);
    }
}
