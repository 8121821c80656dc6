//! One landscape-evolution step over a [`SimulationState`].
//!
//! Order:
//! 1) avalanche every cell, lowest first
//! 2) snapshot `topo` into `topo_old`
//! 3) fill depressions
//! 4) route discharge, highest first
//! 5) uplift interior cells (mirrored into `topo_old`)
//! 6) stream-power incision, recording the erosion-rate bound
//! 7) accept and commit, or reject and roll back uplift/incision
//!
//! The clock lives with the caller; this module only reports what happened.

use tracing::trace;

use crate::avalanche::avalanche_sweep;
use crate::config::ModelParams;
use crate::erosion::apply_stream_power;
use crate::fill::DepressionFiller;
use crate::routing::accumulate_flow;
use crate::state::SimulationState;
use crate::timestep::TimestepDecision;

/// What one call to [`advance`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Accept/reject verdict and the timestep for the next call
    pub decision: TimestepDecision,
    /// Largest `K·sqrt(Q)·Δx` over interior cells
    pub max_rate: f64,
    /// Neighbors lowered by the avalanche sweep
    pub avalanche_clamps: usize,
    /// Cells raised by depression filling
    pub filled_cells: usize,
}

/// Advance `state` by one attempted step of length `timestep`.
pub fn advance<F: DepressionFiller + ?Sized>(
    state: &mut SimulationState,
    filler: &F,
    p: &ModelParams,
    dx: f64,
    timestep: f64,
) -> StepOutcome {
    let thresh = p.repose_slope * dx;

    let avalanche_clamps = avalanche_sweep(&state.lattice, &mut state.topo, thresh);
    trace!(avalanche_clamps, "avalanche sweep done");

    state.topo_old.copy_from(&state.topo);

    let filled_cells = filler.fill(&state.lattice, &mut state.topo);
    trace!(filled_cells, "depressions filled");

    accumulate_flow(&state.lattice, &state.topo, &mut state.flow, &mut state.fractions, p.flow_exponent);
    trace!("discharge routed");

    state.apply_uplift(timestep);

    let max_rate = apply_stream_power(
        &state.lattice,
        &mut state.topo,
        &state.flow,
        &state.erodibility,
        &mut state.slope,
        timestep,
        dx,
    );

    let decision = p.control.assess(max_rate, dx, timestep);
    match decision {
        TimestepDecision::Reject { next } => state.rollback(next),
        TimestepDecision::Accept { .. } => state.commit(),
    }
    StepOutcome { decision, max_rate, avalanche_clamps, filled_cells }
}
