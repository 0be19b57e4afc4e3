//! Feature matrix representations.
//!
//! The encoder is written once against the `Matrix` trait and runs on either
//! a `DenseMatrix` or a `CsrMatrix`. `FeatureMatrix` is the tagged form that
//! crosses the public API, and `MatrixPayload` is its serialized boundary.

mod dense;
mod sparse;

pub use dense::DenseMatrix;
pub use sparse::CsrMatrix;

use crate::error::{MultiStackError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operations the stacking transform needs from a matrix representation.
pub trait Matrix: Sized {
    /// `(n_rows, n_cols)`.
    fn shape(&self) -> (usize, usize);

    /// Stack blocks on top of each other. All blocks must share a column count.
    fn vertical_concat(blocks: &[&Self]) -> Result<Self>;

    /// Append `right` to the right of `self`. Row counts must match.
    fn horizontal_concat(&self, right: &Self) -> Result<Self>;

    /// An `(block_rows * n_blocks) x n_blocks` matrix whose column `j` is one
    /// on rows `j * block_rows .. (j + 1) * block_rows` and zero elsewhere.
    fn block_diagonal_ones(block_rows: usize, n_blocks: usize) -> Self;

    /// Number of rows.
    fn nrows(&self) -> usize {
        self.shape().0
    }

    /// Number of columns.
    fn ncols(&self) -> usize {
        self.shape().1
    }

    /// Repeat the whole matrix vertically `times` times.
    fn repeat_rows(&self, times: usize) -> Result<Self> {
        let blocks = vec![self; times];
        Self::vertical_concat(&blocks)
    }
}

/// Storage layout tag, as it appears at the serialization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixFormat {
    Dense,
    /// Compressed sparse row.
    Csr,
    /// Compressed sparse column.
    Csc,
}

impl MatrixFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatrixFormat::Dense => "dense",
            MatrixFormat::Csr => "csr",
            MatrixFormat::Csc => "csc",
        }
    }
}

impl fmt::Display for MatrixFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatrixFormat {
    type Err = MultiStackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dense" => Ok(MatrixFormat::Dense),
            "csr" => Ok(MatrixFormat::Csr),
            "csc" => Ok(MatrixFormat::Csc),
            other => Err(MultiStackError::UnsupportedRepresentation(format!(
                "'{}' is neither dense nor a supported sparse layout (csr, csc)",
                other
            ))),
        }
    }
}

/// A feature matrix in one of the supported representations.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureMatrix {
    Dense(DenseMatrix),
    Sparse(CsrMatrix),
}

impl FeatureMatrix {
    pub fn shape(&self) -> (usize, usize) {
        match self {
            FeatureMatrix::Dense(m) => m.shape(),
            FeatureMatrix::Sparse(m) => m.shape(),
        }
    }

    pub fn nrows(&self) -> usize {
        self.shape().0
    }

    pub fn ncols(&self) -> usize {
        self.shape().1
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, FeatureMatrix::Sparse(_))
    }

    /// In-memory layout. Sparse matrices are always held as CSR.
    pub fn format(&self) -> MatrixFormat {
        match self {
            FeatureMatrix::Dense(_) => MatrixFormat::Dense,
            FeatureMatrix::Sparse(_) => MatrixFormat::Csr,
        }
    }

    /// Materialize as a dense array. Intended for inspection and small inputs.
    pub fn to_dense(&self) -> Array2<f64> {
        match self {
            FeatureMatrix::Dense(m) => m.as_array().clone(),
            FeatureMatrix::Sparse(m) => m.to_dense(),
        }
    }

    /// Append `right` column-wise. Both sides must use the same representation.
    pub fn horizontal_concat(&self, right: &FeatureMatrix) -> Result<FeatureMatrix> {
        match (self, right) {
            (FeatureMatrix::Dense(l), FeatureMatrix::Dense(r)) => {
                Ok(FeatureMatrix::Dense(l.horizontal_concat(r)?))
            }
            (FeatureMatrix::Sparse(l), FeatureMatrix::Sparse(r)) => {
                Ok(FeatureMatrix::Sparse(l.horizontal_concat(r)?))
            }
            (l, r) => Err(mixed_representation(l, r)),
        }
    }

    /// Stack `bottom` under `self`. Both sides must use the same representation.
    pub fn vertical_concat(&self, bottom: &FeatureMatrix) -> Result<FeatureMatrix> {
        match (self, bottom) {
            (FeatureMatrix::Dense(t), FeatureMatrix::Dense(b)) => {
                Ok(FeatureMatrix::Dense(DenseMatrix::vertical_concat(&[t, b])?))
            }
            (FeatureMatrix::Sparse(t), FeatureMatrix::Sparse(b)) => {
                Ok(FeatureMatrix::Sparse(CsrMatrix::vertical_concat(&[t, b])?))
            }
            (t, b) => Err(mixed_representation(t, b)),
        }
    }
}

fn mixed_representation(a: &FeatureMatrix, b: &FeatureMatrix) -> MultiStackError {
    MultiStackError::UnsupportedRepresentation(format!(
        "cannot combine {} and {} matrices",
        a.format(),
        b.format()
    ))
}

impl From<Array2<f64>> for FeatureMatrix {
    fn from(data: Array2<f64>) -> Self {
        FeatureMatrix::Dense(DenseMatrix::new(data))
    }
}

impl From<DenseMatrix> for FeatureMatrix {
    fn from(m: DenseMatrix) -> Self {
        FeatureMatrix::Dense(m)
    }
}

impl From<CsrMatrix> for FeatureMatrix {
    fn from(m: CsrMatrix) -> Self {
        FeatureMatrix::Sparse(m)
    }
}

/// Serialized matrix, tagged with its storage layout.
///
/// - `dense`: `data` holds `rows * cols` values in row-major order.
/// - `csr`: `indptr` has `rows + 1` entries, `indices` are column indices.
/// - `csc`: `indptr` has `cols + 1` entries, `indices` are row indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixPayload {
    pub format: String,
    pub shape: (usize, usize),
    pub data: Vec<f64>,
    #[serde(default)]
    pub indices: Vec<usize>,
    #[serde(default)]
    pub indptr: Vec<usize>,
}

impl MatrixPayload {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl TryFrom<MatrixPayload> for FeatureMatrix {
    type Error = MultiStackError;

    fn try_from(payload: MatrixPayload) -> Result<Self> {
        let (n_rows, n_cols) = payload.shape;
        match payload.format.parse::<MatrixFormat>()? {
            MatrixFormat::Dense => Ok(FeatureMatrix::Dense(DenseMatrix::from_shape_vec(
                n_rows,
                n_cols,
                payload.data,
            )?)),
            MatrixFormat::Csr => Ok(FeatureMatrix::Sparse(CsrMatrix::new(
                n_rows,
                n_cols,
                payload.indptr,
                payload.indices,
                payload.data,
            )?)),
            MatrixFormat::Csc => Ok(FeatureMatrix::Sparse(CsrMatrix::from_csc(
                n_rows,
                n_cols,
                payload.indptr,
                payload.indices,
                payload.data,
            )?)),
        }
    }
}

impl From<&FeatureMatrix> for MatrixPayload {
    fn from(matrix: &FeatureMatrix) -> Self {
        match matrix {
            FeatureMatrix::Dense(m) => MatrixPayload {
                format: MatrixFormat::Dense.to_string(),
                shape: m.shape(),
                data: m.as_array().iter().copied().collect(),
                indices: Vec::new(),
                indptr: Vec::new(),
            },
            FeatureMatrix::Sparse(m) => MatrixPayload {
                format: MatrixFormat::Csr.to_string(),
                shape: m.shape(),
                data: m.values().to_vec(),
                indices: m.col_indices().to_vec(),
                indptr: m.row_ptrs().to_vec(),
            },
        }
    }
}
