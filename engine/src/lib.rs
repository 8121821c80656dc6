//! Stream-power landscape evolution engine.
//!
//! Each step avalanches over-steep slopes, fills closed depressions, routes discharge
//! with multiple flow directions, applies tectonic uplift and erodes channels by the
//! stream-power law, then adapts the timestep to the observed erosion rate.
//! Hillslope diffusion (ADI) is available for pre-conditioning and explicit coupling.
//!
//! Boundaries are clamped, not periodic: the border ring is fixed base level.
#![deny(missing_docs)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::dbg_macro, clippy::large_enum_variant)]

pub mod avalanche;
pub mod config;
pub mod diffusion;
pub mod erosion;
pub mod error;
pub mod field;
pub mod fill;
pub mod lattice;
pub mod model;
pub mod order;
pub mod random;
pub mod routing;
pub mod state;
pub mod stepper;
pub mod timestep;
pub mod tridiag;

pub use config::{GridGeometry, ModelParams};
pub use error::{ModelError, ModelResult};
pub use field::Field2;
pub use model::{Clock, RunSummary, StepStats, StreamPower};

/// Returns the engine version string from Cargo metadata.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
