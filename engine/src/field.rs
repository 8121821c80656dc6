//! Dense scalar raster addressed as `[x][y]`.
//!
//! Storage is a single `Vec<f64>` flattened as `j * nx + i`, the same ordering the
//! elevation sort uses, so a permutation index decodes as `(idx % nx, idx / nx)`.

use crate::error::{ModelError, ModelResult};

/// One real-valued field over an `nx × ny` lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct Field2 {
    /// Cells along x
    pub nx: usize,
    /// Cells along y
    pub ny: usize,
    /// Values flattened as `j * nx + i`, length `nx * ny`
    pub data: Vec<f64>,
}

impl Field2 {
    /// Create a field filled with `value`.
    pub fn filled(nx: usize, ny: usize, value: f64) -> Self {
        Self { nx, ny, data: vec![value; nx * ny] }
    }

    /// Create a zeroed field.
    pub fn zeros(nx: usize, ny: usize) -> Self {
        Self::filled(nx, ny, 0.0)
    }

    /// Build from nested `[x][y]` rows, checking every length against `nx × ny`.
    pub fn from_rows(rows: &[Vec<f64>], nx: usize, ny: usize, field: &'static str) -> ModelResult<Self> {
        if rows.len() != nx {
            return Err(ModelError::DimensionMismatch { field, expected: nx, actual: rows.len() });
        }
        let mut out = Self::zeros(nx, ny);
        for (i, col) in rows.iter().enumerate() {
            if col.len() != ny {
                return Err(ModelError::DimensionMismatch { field, expected: ny, actual: col.len() });
            }
            for (j, &v) in col.iter().enumerate() {
                out.data[j * nx + i] = v;
            }
        }
        Ok(out)
    }

    /// Copy out as nested `[x][y]` rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.nx).map(|i| (0..self.ny).map(|j| self.get(i, j)).collect()).collect()
    }

    /// Flat index of `(i, j)`.
    #[inline]
    pub fn idx(&self, i: usize, j: usize) -> usize {
        j * self.nx + i
    }

    /// Value at `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[j * self.nx + i]
    }

    /// Overwrite the value at `(i, j)`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, v: f64) {
        let k = self.idx(i, j);
        self.data[k] = v;
    }

    /// Mutable reference to the value at `(i, j)`.
    #[inline]
    pub fn at_mut(&mut self, i: usize, j: usize) -> &mut f64 {
        let k = self.idx(i, j);
        &mut self.data[k]
    }

    /// Set every cell to `v`.
    pub fn fill(&mut self, v: f64) {
        self.data.fill(v);
    }

    /// Copy all values from `other`; both fields must share a shape.
    pub fn copy_from(&mut self, other: &Field2) {
        self.data.copy_from_slice(&other.data);
    }

    /// Smallest value in the field (`+inf` when empty).
    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest value in the field (`-inf` when empty).
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}
