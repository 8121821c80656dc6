//! Elevation-ordered cell permutation.
//!
//! Sorting by elevation stands in for a topological order of the drainage graph:
//! walking the permutation forward visits low cells first (avalanching), walking it
//! in reverse visits high cells first (flow routing). Ties keep their flat-index order,
//! which no downstream computation depends on.

use crate::field::Field2;

/// Permutation `p` of `0..values.len()` with `values[p[k]] <= values[p[k+1]]`.
pub fn elevation_order(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    order
}

/// Ascending permutation of a field's cells, decoded to `(i, j)` pairs.
pub fn cells_ascending(topo: &Field2) -> Vec<(usize, usize)> {
    let nx = topo.nx;
    elevation_order(&topo.data).into_iter().map(|k| (k % nx, k / nx)).collect()
}
