//! Errors reported at the model's input boundary.
//!
//! The numerical kernels never fail; these variants only cover caller-supplied
//! geometry, parameters and arrays that are checked before any state is touched.

/// Result alias used by the model entry points.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors from configuring or loading the landscape model.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ModelError {
    /// Lattice too small to have an interior, or a cell size that is not finite and positive.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// A supplied 2D array does not match the configured `nx × ny` lattice.
    #[error("{field}: expected {expected} entries, got {actual}")]
    DimensionMismatch {
        /// Which input was malformed
        field: &'static str,
        /// Expected length along the offending axis
        expected: usize,
        /// Actual length found
        actual: usize,
    },
    /// An operation was called before the state it depends on exists.
    #[error("model not initialized: {0}")]
    NotInitialized(&'static str),
    /// A scalar parameter is outside its admissible range.
    #[error("invalid parameter {name}={value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
    },
}
