//! Configuration types for the landscape model.
//!
//! `GridGeometry` mirrors what a host GIS hands over (lattice size, lower-left corner,
//! cell size, no-data marker). `ModelParams` carries every tunable of the step; the
//! defaults are the classic stream-power setup. Both are plain serde structs so a
//! driver can load them from whatever format it already speaks.

use serde::{Deserialize, Serialize};

use crate::avalanche::DEFAULT_REPOSE_SLOPE;
use crate::diffusion::DiffusionParams;
use crate::error::{ModelError, ModelResult};
use crate::routing::DEFAULT_FLOW_EXPONENT;
use crate::timestep::TimestepControl;

/// Lattice geometry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    /// Cells along x
    pub nx: usize,
    /// Cells along y
    pub ny: usize,
    /// x of the lower-left corner
    #[serde(default)]
    pub xllcorner: f64,
    /// y of the lower-left corner
    #[serde(default)]
    pub yllcorner: f64,
    /// Cell spacing Δx (same units as elevation)
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
    /// No-data marker carried through for the host; the core never interprets it
    #[serde(default = "default_nodata")]
    pub nodata: f64,
}

fn default_cell_size() -> f64 {
    200.0
}
fn default_nodata() -> f64 {
    -9999.0
}

impl GridGeometry {
    /// Geometry with the given size and default corner, spacing and no-data value.
    pub fn new(nx: usize, ny: usize) -> Self {
        Self { nx, ny, xllcorner: 0.0, yllcorner: 0.0, cell_size: default_cell_size(), nodata: default_nodata() }
    }

    /// Same geometry with a different cell size.
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Reject lattices without interior cells and non-physical spacing.
    pub fn validate(&self) -> ModelResult<()> {
        if self.nx < 3 || self.ny < 3 {
            return Err(ModelError::InvalidGeometry(format!(
                "lattice {}x{} has no interior (need at least 3x3)",
                self.nx, self.ny
            )));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ModelError::InvalidGeometry(format!("cell size {} must be finite and > 0", self.cell_size)));
        }
        Ok(())
    }

    /// Total number of cells.
    pub fn cells(&self) -> usize {
        self.nx * self.ny
    }
}

/// Parameters that control time stepping and the surface processes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    /// Initial timestep (kyr); adapted after every step.
    pub timestep: f64,
    /// Simulated time at which [`crate::model::StreamPower::run`] stops (kyr).
    pub duration: f64,
    /// Default erodibility K applied to every cell until a field is set (kyr⁻¹).
    pub k: f64,
    /// Stable gradient for avalanching; threshold height is `repose_slope · Δx`.
    pub repose_slope: f64,
    /// Exponent of the MFD slope weighting.
    pub flow_exponent: f64,
    /// Hillslope diffusion settings.
    pub diffusion: DiffusionParams,
    /// Adaptive timestep thresholds.
    pub control: TimestepControl,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            timestep: 1.0,
            duration: 1.0,
            k: 0.05,
            repose_slope: DEFAULT_REPOSE_SLOPE,
            flow_exponent: DEFAULT_FLOW_EXPONENT,
            diffusion: DiffusionParams::default(),
            control: TimestepControl::default(),
        }
    }
}

impl ModelParams {
    /// Reject values that would make the step meaningless from the outset.
    pub fn validate(&self) -> ModelResult<()> {
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(ModelError::InvalidParameter { name: "timestep", value: self.timestep });
        }
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(ModelError::InvalidParameter { name: "duration", value: self.duration });
        }
        if !self.k.is_finite() {
            return Err(ModelError::InvalidParameter { name: "k", value: self.k });
        }
        if !(self.repose_slope.is_finite() && self.repose_slope >= 0.0) {
            return Err(ModelError::InvalidParameter { name: "repose_slope", value: self.repose_slope });
        }
        if !(self.flow_exponent.is_finite() && self.flow_exponent > 0.0) {
            return Err(ModelError::InvalidParameter { name: "flow_exponent", value: self.flow_exponent });
        }
        let d = self.diffusion.diffusivity;
        if !(d.is_finite() && d >= 0.0) {
            return Err(ModelError::InvalidParameter { name: "diffusion.diffusivity", value: d });
        }
        self.control.validate()
    }
}
