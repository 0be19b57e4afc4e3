//! Compressed Sparse Row (CSR) matrix.
//!
//! Stacking only ever appends rows and columns, so every operation here works
//! on the compressed arrays directly and never materializes zeros.

use super::Matrix;
use crate::error::{MultiStackError, Result};
use ndarray::{Array2, ArrayView2};

/// Compressed Sparse Row matrix of `f64` values.
///
/// # Structure
///
/// - `values`: Non-zero values, stored row by row
/// - `col_indices`: Column index for each value
/// - `row_ptrs`: Starting index in values/col_indices for each row
///
/// For row `i`, the values are `values[row_ptrs[i]..row_ptrs[i+1]]`
/// with corresponding columns `col_indices[row_ptrs[i]..row_ptrs[i+1]]`.
///
/// # Example
///
/// ```
/// use multistack::matrix::CsrMatrix;
/// use ndarray::array;
///
/// let dense = array![[1.0, 0.0, 2.0], [0.0, 3.0, 0.0]];
/// let csr = CsrMatrix::from_dense(&dense.view());
///
/// assert_eq!(csr.nnz(), 3);
/// let row0: Vec<_> = csr.row(0).collect();
/// assert_eq!(row0, vec![(0, 1.0), (2, 2.0)]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    values: Vec<f64>,
    col_indices: Vec<usize>,
    /// Length is num_rows + 1, with row_ptrs[num_rows] = nnz.
    row_ptrs: Vec<usize>,
    num_rows: usize,
    num_cols: usize,
}

impl CsrMatrix {
    /// Create a CSR matrix from its raw parts, validating the structure.
    pub fn new(
        num_rows: usize,
        num_cols: usize,
        row_ptrs: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<f64>,
    ) -> Result<Self> {
        validate_compressed("row", num_rows, num_cols, &row_ptrs, &col_indices, &values)?;
        Ok(Self {
            values,
            col_indices,
            row_ptrs,
            num_rows,
            num_cols,
        })
    }

    /// Create a CSR matrix from a dense matrix, dropping exact zeros.
    ///
    /// NaN values ARE stored (they are not equal to zero).
    pub fn from_dense(dense: &ArrayView2<f64>) -> Self {
        let (num_rows, num_cols) = dense.dim();
        let mut values = Vec::new();
        let mut col_indices = Vec::new();
        let mut row_ptrs = Vec::with_capacity(num_rows + 1);
        row_ptrs.push(0);

        for row in dense.rows() {
            for (col, &val) in row.iter().enumerate() {
                if val != 0.0 {
                    values.push(val);
                    col_indices.push(col);
                }
            }
            row_ptrs.push(values.len());
        }

        Self {
            values,
            col_indices,
            row_ptrs,
            num_rows,
            num_cols,
        }
    }

    /// Create a CSR matrix from Compressed Sparse Column parts.
    ///
    /// The conversion counts entries per row and scatters them, so the
    /// column-compressed input is never densified.
    pub fn from_csc(
        num_rows: usize,
        num_cols: usize,
        col_ptrs: Vec<usize>,
        row_indices: Vec<usize>,
        values: Vec<f64>,
    ) -> Result<Self> {
        validate_compressed("column", num_cols, num_rows, &col_ptrs, &row_indices, &values)?;

        // First pass: count entries per row
        let mut row_ptrs = zeroed_pointers(num_rows)?;
        for &row in &row_indices {
            row_ptrs[row + 1] += 1;
        }
        for i in 0..num_rows {
            row_ptrs[i + 1] += row_ptrs[i];
        }

        // Second pass: scatter column by column so each row stays sorted by column.
        // row_ptrs[row] is the write cursor, which leaves it at the start of row + 1.
        let nnz = values.len();
        let mut out_values = vec![0.0; nnz];
        let mut out_cols = vec![0usize; nnz];
        for col in 0..num_cols {
            for idx in col_ptrs[col]..col_ptrs[col + 1] {
                let row = row_indices[idx];
                let dest = row_ptrs[row];
                out_values[dest] = values[idx];
                out_cols[dest] = col;
                row_ptrs[row] += 1;
            }
        }
        for i in (1..=num_rows).rev() {
            row_ptrs[i] = row_ptrs[i - 1];
        }
        row_ptrs[0] = 0;

        Ok(Self {
            values: out_values,
            col_indices: out_cols,
            row_ptrs,
            num_rows,
            num_cols,
        })
    }

    /// Create a CSR matrix from `(row, col, value)` triplets.
    ///
    /// Duplicate coordinates are kept as separate entries; `get` and
    /// `to_dense` sum them.
    pub fn from_triplets(
        num_rows: usize,
        num_cols: usize,
        triplets: &[(usize, usize, f64)],
    ) -> Result<Self> {
        if let Some(&(r, c, _)) = triplets
            .iter()
            .find(|&&(r, c, _)| r >= num_rows || c >= num_cols)
        {
            return Err(MultiStackError::InvalidInput(format!(
                "triplet ({}, {}) outside shape ({}, {})",
                r, c, num_rows, num_cols
            )));
        }

        let mut sorted = triplets.to_vec();
        sorted.sort_by_key(|&(r, c, _)| (r, c));

        let mut row_ptrs = zeroed_pointers(num_rows)?;
        for &(r, _, _) in &sorted {
            row_ptrs[r + 1] += 1;
        }
        for i in 0..num_rows {
            row_ptrs[i + 1] += row_ptrs[i];
        }

        Ok(Self {
            values: sorted.iter().map(|t| t.2).collect(),
            col_indices: sorted.iter().map(|t| t.1).collect(),
            row_ptrs,
            num_rows,
            num_cols,
        })
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Iterate over the stored `(col, value)` pairs of a row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= num_rows`.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.row_ptrs[row]..self.row_ptrs[row + 1];
        self.col_indices[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Value at `(row, col)`, zero when not stored. `None` if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.num_rows || col >= self.num_cols {
            return None;
        }
        Some(self.row(row).filter(|&(c, _)| c == col).map(|(_, v)| v).sum())
    }

    pub fn row_ptrs(&self) -> &[usize] {
        &self.row_ptrs
    }

    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Materialize as a dense array.
    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros((self.num_rows, self.num_cols));
        for i in 0..self.num_rows {
            for (col, val) in self.row(i) {
                dense[[i, col]] += val;
            }
        }
        dense
    }
}

impl Matrix for CsrMatrix {
    fn shape(&self) -> (usize, usize) {
        (self.num_rows, self.num_cols)
    }

    fn vertical_concat(blocks: &[&Self]) -> Result<Self> {
        let Some(first) = blocks.first() else {
            return Err(MultiStackError::shape(
                "at least one block",
                "no blocks",
            ));
        };
        let num_cols = first.num_cols;
        if let Some(bad) = blocks.iter().find(|b| b.num_cols != num_cols) {
            return Err(MultiStackError::shape(
                format!("{} columns", num_cols),
                format!("{} columns", bad.num_cols),
            ));
        }

        let num_rows = blocks.iter().map(|b| b.num_rows).sum();
        let nnz = blocks.iter().map(|b| b.nnz()).sum();
        let mut values = Vec::with_capacity(nnz);
        let mut col_indices = Vec::with_capacity(nnz);
        let mut row_ptrs = Vec::with_capacity(num_rows + 1);
        row_ptrs.push(0);

        for block in blocks {
            let offset = values.len();
            values.extend_from_slice(&block.values);
            col_indices.extend_from_slice(&block.col_indices);
            row_ptrs.extend(block.row_ptrs[1..].iter().map(|&p| p + offset));
        }

        Ok(Self {
            values,
            col_indices,
            row_ptrs,
            num_rows,
            num_cols,
        })
    }

    fn horizontal_concat(&self, right: &Self) -> Result<Self> {
        if self.num_rows != right.num_rows {
            return Err(MultiStackError::shape(
                format!("{} rows", self.num_rows),
                format!("{} rows", right.num_rows),
            ));
        }

        let nnz = self.nnz() + right.nnz();
        let mut values = Vec::with_capacity(nnz);
        let mut col_indices = Vec::with_capacity(nnz);
        let mut row_ptrs = Vec::with_capacity(self.num_rows + 1);
        row_ptrs.push(0);

        for i in 0..self.num_rows {
            for (col, val) in self.row(i) {
                col_indices.push(col);
                values.push(val);
            }
            for (col, val) in right.row(i) {
                col_indices.push(self.num_cols + col);
                values.push(val);
            }
            row_ptrs.push(values.len());
        }

        Ok(Self {
            values,
            col_indices,
            row_ptrs,
            num_rows: self.num_rows,
            num_cols: self.num_cols + right.num_cols,
        })
    }

    fn block_diagonal_ones(block_rows: usize, n_blocks: usize) -> Self {
        let num_rows = block_rows * n_blocks;
        Self {
            values: vec![1.0; num_rows],
            col_indices: (0..n_blocks)
                .flat_map(|j| std::iter::repeat_n(j, block_rows))
                .collect(),
            row_ptrs: (0..=num_rows).collect(),
            num_rows,
            num_cols: n_blocks,
        }
    }
}

/// A zeroed pointer array of length `num_rows + 1`.
///
/// The row count may come from untrusted input, so an impossible allocation is
/// reported instead of aborting.
fn zeroed_pointers(num_rows: usize) -> Result<Vec<usize>> {
    let len = num_rows.checked_add(1).ok_or_else(|| {
        MultiStackError::InvalidInput(format!("row count {} is too large", num_rows))
    })?;
    let mut ptrs = Vec::new();
    ptrs.try_reserve_exact(len).map_err(|e| {
        MultiStackError::InvalidInput(format!("cannot allocate {} row pointers: {}", len, e))
    })?;
    ptrs.resize(len, 0);
    Ok(ptrs)
}

/// Check the invariants shared by CSR and CSC parts.
///
/// `major` is the compressed dimension (rows for CSR), `minor` the one the
/// indices point into.
fn validate_compressed(
    axis: &str,
    major: usize,
    minor: usize,
    ptrs: &[usize],
    indices: &[usize],
    values: &[f64],
) -> Result<()> {
    let expected = major.checked_add(1).ok_or_else(|| {
        MultiStackError::InvalidInput(format!("{} dimension {} is too large", axis, major))
    })?;
    if ptrs.len() != expected {
        return Err(MultiStackError::InvalidInput(format!(
            "{} pointer array has length {}, expected {}",
            axis,
            ptrs.len(),
            expected
        )));
    }
    if indices.len() != values.len() {
        return Err(MultiStackError::InvalidInput(format!(
            "{} indices and {} values",
            indices.len(),
            values.len()
        )));
    }
    if ptrs[0] != 0 || ptrs[major] != values.len() {
        return Err(MultiStackError::InvalidInput(format!(
            "{} pointers must start at 0 and end at {}",
            axis,
            values.len()
        )));
    }
    if ptrs.windows(2).any(|w| w[0] > w[1]) {
        return Err(MultiStackError::InvalidInput(format!(
            "{} pointers must be non-decreasing",
            axis
        )));
    }
    if let Some(&bad) = indices.iter().find(|&&idx| idx >= minor) {
        return Err(MultiStackError::InvalidInput(format!(
            "index {} out of bounds for dimension {}",
            bad, minor
        )));
    }
    Ok(())
}
