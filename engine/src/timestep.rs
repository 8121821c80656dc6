//! Adaptive timestep control for the explicit incision update.
//!
//! The erosion-rate bound `r = max(K·sqrt(Q)·Δx)` plays the role of a wave speed. With
//! `C = r·dt/Δx`:
//! - `C > reject_cfl` (0.3): the step is rejected and `dt` is multiplied by `shrink_factor`.
//! - `C < grow_cfl` (0.03): the step is kept and `dt` is multiplied by `grow_factor`.
//! - otherwise the step is kept and `dt` is unchanged.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Thresholds and factors of the controller.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestepControl {
    /// Courant-like number above which a step is rejected.
    pub reject_cfl: f64,
    /// Courant-like number below which the timestep grows.
    pub grow_cfl: f64,
    /// Factor applied to `dt` on rejection.
    pub shrink_factor: f64,
    /// Factor applied to `dt` when the step was comfortably stable.
    pub grow_factor: f64,
}

impl Default for TimestepControl {
    fn default() -> Self {
        Self { reject_cfl: 0.3, grow_cfl: 0.03, shrink_factor: 0.5, grow_factor: 1.2 }
    }
}

/// Outcome of assessing one completed step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimestepDecision {
    /// Too aggressive; roll back and retry with `next` next time.
    Reject {
        /// Reduced timestep
        next: f64,
    },
    /// Accepted; use `next` for the following step.
    Accept {
        /// Timestep for the following step (grown or unchanged)
        next: f64,
        /// Whether `next` is larger than the step just taken
        grew: bool,
    },
}

impl TimestepDecision {
    /// True for [`TimestepDecision::Accept`].
    pub fn accepted(&self) -> bool {
        matches!(self, TimestepDecision::Accept { .. })
    }

    /// Timestep to use for the next call.
    pub fn next(&self) -> f64 {
        match *self {
            TimestepDecision::Reject { next } | TimestepDecision::Accept { next, .. } => next,
        }
    }
}

impl TimestepControl {
    /// Courant-like number of a step.
    pub fn courant(max_rate: f64, dx: f64, timestep: f64) -> f64 {
        max_rate * timestep / dx
    }

    /// Reject controllers that could stall the clock or never settle.
    ///
    /// Requires `0 < grow_cfl <= reject_cfl`, `0 < shrink_factor < 1` and
    /// `grow_factor >= 1`, all finite.
    pub fn validate(&self) -> ModelResult<()> {
        let finite = |name: &'static str, value: f64| {
            if value.is_finite() {
                Ok(())
            } else {
                Err(ModelError::InvalidParameter { name, value })
            }
        };
        finite("control.reject_cfl", self.reject_cfl)?;
        finite("control.grow_cfl", self.grow_cfl)?;
        finite("control.shrink_factor", self.shrink_factor)?;
        finite("control.grow_factor", self.grow_factor)?;
        if self.grow_cfl <= 0.0 {
            return Err(ModelError::InvalidParameter { name: "control.grow_cfl", value: self.grow_cfl });
        }
        if self.reject_cfl < self.grow_cfl {
            return Err(ModelError::InvalidParameter { name: "control.reject_cfl", value: self.reject_cfl });
        }
        if !(self.shrink_factor > 0.0 && self.shrink_factor < 1.0) {
            return Err(ModelError::InvalidParameter { name: "control.shrink_factor", value: self.shrink_factor });
        }
        if self.grow_factor < 1.0 {
            return Err(ModelError::InvalidParameter { name: "control.grow_factor", value: self.grow_factor });
        }
        Ok(())
    }

    /// Decide whether the step taken with `timestep` stands, and what comes next.
    pub fn assess(&self, max_rate: f64, dx: f64, timestep: f64) -> TimestepDecision {
        if max_rate > self.reject_cfl * dx / timestep {
            TimestepDecision::Reject { next: timestep * self.shrink_factor }
        } else if max_rate < self.grow_cfl * dx / timestep {
            TimestepDecision::Accept { next: timestep * self.grow_factor, grew: true }
        } else {
            TimestepDecision::Accept { next: timestep, grew: false }
        }
    }
}
