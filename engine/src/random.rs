//! Seeded random initial surfaces.

use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Amplitude applied to the unit normal draw.
const AMPLITUDE: f64 = 0.5;

/// Gaussian roughness `0.5 · N(0, 1)` per cell, as nested `[x][y]` rows.
///
/// Deterministic for a given seed; fill order is x-major.
pub fn random_field(nx: usize, ny: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..nx)
        .map(|_| {
            (0..ny)
                .map(|_| {
                    let z: f64 = rng.sample(StandardNormal);
                    AMPLITUDE * z
                })
                .collect()
        })
        .collect()
}
