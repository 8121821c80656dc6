//! The landscape model: geometry, parameters, simulation state and clock.
//!
//! Call sequence: [`StreamPower::new`] → [`StreamPower::init`] → [`StreamPower::set_topo`]
//! (+ `set_uplift*`, `set_erodibility*`) → repeated [`StreamPower::step`] or one
//! [`StreamPower::run`] → [`StreamPower::topo`].
//!
//! A model is driven by one thread at a time; reads of the surface happen between steps.

use tracing::{debug, info};

use crate::config::{GridGeometry, ModelParams};
use crate::diffusion;
use crate::error::{ModelError, ModelResult};
use crate::field::Field2;
use crate::fill::{DepressionFiller, PriorityFlood};
use crate::state::SimulationState;
use crate::stepper::{self, StepOutcome};
use crate::timestep::TimestepDecision;

/// Simulation clock information.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    /// Simulated time reached by accepted steps.
    pub time: f64,
    /// Timestep the next call to `step` will attempt.
    pub timestep: f64,
    /// Number of `step` calls so far (accepted or not).
    pub step_idx: u64,
}

/// Result of one call to [`StreamPower::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepStats {
    /// Step index after increment.
    pub step_idx: u64,
    /// Simulated time after the step.
    pub time: f64,
    /// Timestep that was attempted.
    pub timestep: f64,
    /// Timestep the next call will attempt.
    pub next_timestep: f64,
    /// Largest erosion-rate coefficient `K·sqrt(Q)·Δx` seen.
    pub max_rate: f64,
    /// False when the step was rolled back for stability.
    pub accepted: bool,
}

/// Summary of a [`StreamPower::run`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// Steps attempted.
    pub steps: u64,
    /// Steps rolled back.
    pub rejected: u64,
    /// Simulated time at the end.
    pub time: f64,
    /// True if the callback stopped the run before `duration`.
    pub cancelled: bool,
}

/// Stream-power landscape evolution model.
pub struct StreamPower<F: DepressionFiller = PriorityFlood> {
    params: ModelParams,
    geometry: Option<GridGeometry>,
    state: Option<SimulationState>,
    filler: F,
    clock: Clock,
}

impl StreamPower<PriorityFlood> {
    /// Model with the default priority-flood filler.
    pub fn new(params: ModelParams) -> ModelResult<Self> {
        Self::with_filler(params, PriorityFlood)
    }
}

impl<F: DepressionFiller> StreamPower<F> {
    /// Model with a caller-supplied depression filler.
    pub fn with_filler(params: ModelParams, filler: F) -> ModelResult<Self> {
        params.validate()?;
        let clock = Clock { time: 0.0, timestep: params.timestep, step_idx: 0 };
        Ok(Self { params, geometry: None, state: None, filler, clock })
    }

    /// Configure lattice geometry. Discards any loaded surface.
    pub fn init(&mut self, geometry: GridGeometry) -> ModelResult<()> {
        geometry.validate()?;
        self.geometry = Some(geometry);
        self.state = None;
        Ok(())
    }

    /// Copy an initial surface (`[x][y]` rows) into the model and build neighbor tables.
    ///
    /// Uplift starts at zero and erodibility at `params.k`.
    pub fn set_topo(&mut self, topo: &[Vec<f64>]) -> ModelResult<()> {
        let g = self.geometry.ok_or(ModelError::NotInitialized("init must precede set_topo"))?;
        let field = Field2::from_rows(topo, g.nx, g.ny, "topo")?;
        self.state = Some(SimulationState::new(field, self.params.k));
        Ok(())
    }

    /// Set a spatially varying uplift rate.
    pub fn set_uplift(&mut self, uplift: &[Vec<f64>]) -> ModelResult<()> {
        let st = self.state_mut("set_topo must precede set_uplift")?;
        st.uplift = Field2::from_rows(uplift, st.lattice.nx, st.lattice.ny, "uplift")?;
        Ok(())
    }

    /// Set the same uplift rate on every cell.
    pub fn set_uplift_uniform(&mut self, u: f64) -> ModelResult<()> {
        self.state_mut("set_topo must precede set_uplift_uniform")?.uplift.fill(u);
        Ok(())
    }

    /// Set a spatially varying erodibility K.
    pub fn set_erodibility(&mut self, k: &[Vec<f64>]) -> ModelResult<()> {
        let st = self.state_mut("set_topo must precede set_erodibility")?;
        st.erodibility = Field2::from_rows(k, st.lattice.nx, st.lattice.ny, "erodibility")?;
        Ok(())
    }

    /// Set the same erodibility K on every cell.
    pub fn set_erodibility_uniform(&mut self, k: f64) -> ModelResult<()> {
        self.state_mut("set_topo must precede set_erodibility_uniform")?.erodibility.fill(k);
        Ok(())
    }

    /// Copy of the current surface as `[x][y]` rows.
    pub fn topo(&self) -> ModelResult<Vec<Vec<f64>>> {
        Ok(self.state_ref("set_topo must precede topo")?.topo.to_rows())
    }

    /// Discharge routed by the last step (`[x][y]` rows; all ones before any step).
    pub fn flow(&self) -> ModelResult<Vec<Vec<f64>>> {
        Ok(self.state_ref("set_topo must precede flow")?.flow.to_rows())
    }

    /// Channel slope used by the last incision pass; zero on the border ring.
    pub fn slope(&self) -> ModelResult<Vec<Vec<f64>>> {
        Ok(self.state_ref("set_topo must precede slope")?.slope.to_rows())
    }

    /// Advance by the current adaptive timestep.
    ///
    /// A rejected step leaves `time` unchanged and halves the timestep; see
    /// [`SimulationState::rollback`] for what is and is not undone.
    pub fn step(&mut self) -> ModelResult<StepStats> {
        let dx = self.geometry.map(|g| g.cell_size).ok_or(ModelError::NotInitialized("init must precede step"))?;
        let dt = self.clock.timestep;
        let st = self.state.as_mut().ok_or(ModelError::NotInitialized("set_topo must precede step"))?;
        let StepOutcome { decision, max_rate, .. } = stepper::advance(st, &self.filler, &self.params, dx, dt);

        self.clock.step_idx += 1;
        self.clock.timestep = decision.next();
        match decision {
            TimestepDecision::Reject { next } => {
                debug!(step = self.clock.step_idx, max_rate, from = dt, to = next, "step rejected, timestep reduced");
            }
            TimestepDecision::Accept { next, grew } => {
                self.clock.time += dt;
                if grew {
                    debug!(from = dt, to = next, "timestep grown");
                }
                debug!(step = self.clock.step_idx, time = self.clock.time, timestep = dt, max_rate, "step accepted");
            }
        }
        Ok(StepStats {
            step_idx: self.clock.step_idx,
            time: self.clock.time,
            timestep: dt,
            next_timestep: self.clock.timestep,
            max_rate,
            accepted: decision.accepted(),
        })
    }

    /// Step until `time >= duration` or `keep_going` returns false.
    ///
    /// `keep_going` sees the clock before every step, the first included, and is the
    /// cooperative cancellation point.
    pub fn run<C: FnMut(&Clock) -> bool>(&mut self, mut keep_going: C) -> ModelResult<RunSummary> {
        let duration = self.params.duration;
        info!(time = self.clock.time, duration, timestep = self.clock.timestep, "run started");
        let mut summary = RunSummary { steps: 0, rejected: 0, time: self.clock.time, cancelled: false };
        while self.clock.time < duration {
            if !keep_going(&self.clock) {
                summary.cancelled = true;
                break;
            }
            let stats = self.step()?;
            summary.steps += 1;
            if !stats.accepted {
                summary.rejected += 1;
            }
        }
        summary.time = self.clock.time;
        if summary.cancelled {
            info!(time = summary.time, steps = summary.steps, "run cancelled");
        } else {
            info!(time = summary.time, steps = summary.steps, rejected = summary.rejected, "run finished");
        }
        Ok(summary)
    }

    /// Smooth the loaded surface into a gently raised, well-drained starting shape.
    pub fn init_diffusion(&mut self) -> ModelResult<()> {
        let dx = self.cell_size()?;
        let p = self.params.diffusion;
        let st = self.state_mut("set_topo must precede init_diffusion")?;
        diffusion::init_diffusion(&st.lattice, &mut st.topo, &mut st.topo_old, &p, dx);
        Ok(())
    }

    /// One call of implicit hillslope diffusion against the current baseline.
    pub fn hillslope_diffusion(&mut self) -> ModelResult<()> {
        let dx = self.cell_size()?;
        let p = self.params.diffusion;
        let st = self.state_mut("set_topo must precede hillslope_diffusion")?;
        diffusion::hillslope_diffusion(&st.lattice, &mut st.topo, &st.topo_old, &p, dx);
        Ok(())
    }

    /// Fraction of `duration` simulated so far, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.params.duration <= 0.0 {
            return 1.0;
        }
        (self.clock.time / self.params.duration).clamp(0.0, 1.0)
    }

    /// Simulated time.
    pub fn time(&self) -> f64 {
        self.clock.time
    }

    /// Timestep the next step will attempt.
    pub fn timestep(&self) -> f64 {
        self.clock.timestep
    }

    /// Target simulated time for [`StreamPower::run`].
    pub fn duration(&self) -> f64 {
        self.params.duration
    }

    /// Full clock.
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Parameters in use.
    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    /// Geometry set by [`StreamPower::init`].
    pub fn geometry(&self) -> Option<&GridGeometry> {
        self.geometry.as_ref()
    }

    /// Simulation state, once a surface is loaded.
    pub fn state(&self) -> Option<&SimulationState> {
        self.state.as_ref()
    }

    fn cell_size(&self) -> ModelResult<f64> {
        self.geometry.map(|g| g.cell_size).ok_or(ModelError::NotInitialized("init has not been called"))
    }

    fn state_ref(&self, what: &'static str) -> ModelResult<&SimulationState> {
        self.state.as_ref().ok_or(ModelError::NotInitialized(what))
    }

    fn state_mut(&mut self, what: &'static str) -> ModelResult<&mut SimulationState> {
        self.state.as_mut().ok_or(ModelError::NotInitialized(what))
    }
}
