//! Column-major (Fortran-order) reshaping helpers.
//!
//! Single-output services see one flat target vector in which output 0's
//! samples come first, then output 1's, and so on.

use crate::error::{MultiStackError, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Flatten a matrix in Fortran order: `flat[j * n_rows + i] == matrix[[i, j]]`.
pub fn flatten_fortran(matrix: &ArrayView2<f64>) -> Array1<f64> {
    let (n_rows, n_cols) = matrix.dim();
    let mut flat = Array1::zeros(n_rows * n_cols);

    for j in 0..n_cols {
        for i in 0..n_rows {
            flat[j * n_rows + i] = matrix[[i, j]];
        }
    }

    flat
}

/// Rebuild an `n x n_cols` matrix from a Fortran-ordered vector.
///
/// Fails with `ShapeMismatch` when `n_cols` is zero or does not divide the
/// vector length.
pub fn unflatten_fortran(flat: &ArrayView1<f64>, n_cols: usize) -> Result<Array2<f64>> {
    if n_cols == 0 || flat.len() % n_cols != 0 {
        return Err(MultiStackError::shape(
            format!("length divisible by {}", n_cols),
            format!("length {}", flat.len()),
        ));
    }

    let n_rows = flat.len() / n_cols;
    Ok(Array2::from_shape_fn((n_rows, n_cols), |(i, j)| {
        flat[j * n_rows + i]
    }))
}
