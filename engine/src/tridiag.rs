//! Thomas-algorithm solve of a tridiagonal system.
//!
//! Equation i: `a[i]·u[i-1] + b[i]·u[i] + c[i]·u[i+1] = r[i]`, with `a[0]` and `c[n-1]`
//! ignored. No pivoting: the caller guarantees a diagonally dominant system, otherwise a
//! zero pivot yields inf/NaN in `u`.

/// Solve the system in place into `u`. `n` is taken from `u.len()`.
pub fn tridag(a: &[f64], b: &[f64], c: &[f64], r: &[f64], u: &mut [f64]) {
    let n = u.len();
    if n == 0 {
        return;
    }
    debug_assert!(a.len() >= n && b.len() >= n && c.len() >= n && r.len() >= n);
    let mut gam = vec![0.0f64; n];
    let mut bet = b[0];
    u[0] = r[0] / bet;
    // Forward elimination
    for j in 1..n {
        gam[j] = c[j - 1] / bet;
        bet = b[j] - a[j] * gam[j];
        u[j] = (r[j] - a[j] * u[j - 1]) / bet;
    }
    // Back substitution, all the way down to row 0
    for j in (0..n - 1).rev() {
        u[j] -= gam[j + 1] * u[j + 1];
    }
}
