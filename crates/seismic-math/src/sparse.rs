// ─────────────────────────────────────────────────────────────────────
// SCPN Seismic Core — Sparse Operators
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Compressed sparse row matrix for the discretized wave operators.
//!
//! The operators are assembled row by row and never change sparsity
//! afterwards, so the builder only supports sequential row pushes.

use ndarray::{Array2, ArrayView2};
use seismic_types::error::{SeismicError, SeismicResult};

/// Row-major CSR matrix.
#[derive(Debug, Clone)]
pub struct CsrMatrix {
    nrows: usize,
    ncols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    vals: Vec<f64>,
}

impl CsrMatrix {
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn nnz(&self) -> usize {
        self.vals.len()
    }

    /// Entries of one row as (column, value) pairs.
    pub fn row(&self, r: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let lo = self.row_ptr[r];
        let hi = self.row_ptr[r + 1];
        self.col_idx[lo..hi]
            .iter()
            .copied()
            .zip(self.vals[lo..hi].iter().copied())
    }

    /// y = A · x for a rank-2 operand (one column per forcing batch
    /// slot; a rank-1 state is simply a single-column x).
    pub fn apply(&self, x: ArrayView2<'_, f64>, y: &mut Array2<f64>) {
        debug_assert_eq!(x.nrows(), self.ncols);
        debug_assert_eq!(y.nrows(), self.nrows);
        debug_assert_eq!(y.ncols(), x.ncols());
        y.fill(0.0);
        let k = x.ncols();
        for r in 0..self.nrows {
            for idx in self.row_ptr[r]..self.row_ptr[r + 1] {
                let c = self.col_idx[idx];
                let v = self.vals[idx];
                for j in 0..k {
                    y[[r, j]] += v * x[[c, j]];
                }
            }
        }
    }

    /// A · B for a dense right operand; used by the basis projection.
    pub fn matmul_dense(&self, b: &Array2<f64>) -> SeismicResult<Array2<f64>> {
        if b.nrows() != self.ncols {
            return Err(SeismicError::ShapeMismatch(format!(
                "sparse ({} x {}) times dense ({} x {})",
                self.nrows,
                self.ncols,
                b.nrows(),
                b.ncols()
            )));
        }
        let mut out = Array2::zeros((self.nrows, b.ncols()));
        self.apply(b.view(), &mut out);
        Ok(out)
    }

    /// Dense copy, for small operators in tests and diagnostics.
    pub fn to_dense(&self) -> Array2<f64> {
        let mut out = Array2::zeros((self.nrows, self.ncols));
        for r in 0..self.nrows {
            for (c, v) in self.row(r) {
                out[[r, c]] += v;
            }
        }
        out
    }
}

/// Sequential row-by-row CSR assembler.
#[derive(Debug)]
pub struct CsrBuilder {
    ncols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    vals: Vec<f64>,
}

impl CsrBuilder {
    pub fn new(ncols: usize) -> Self {
        CsrBuilder {
            ncols,
            row_ptr: vec![0],
            col_idx: Vec::new(),
            vals: Vec::new(),
        }
    }

    /// Append the next row. Column indices must be in range; duplicate
    /// columns within a row are allowed and sum on apply.
    pub fn push_row(&mut self, entries: &[(usize, f64)]) {
        for &(c, v) in entries {
            debug_assert!(c < self.ncols, "column {} out of {}", c, self.ncols);
            self.col_idx.push(c);
            self.vals.push(v);
        }
        self.row_ptr.push(self.col_idx.len());
    }

    pub fn finish(self) -> CsrMatrix {
        CsrMatrix {
            nrows: self.row_ptr.len() - 1,
            ncols: self.ncols,
            row_ptr: self.row_ptr,
            col_idx: self.col_idx,
            vals: self.vals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn small() -> CsrMatrix {
        // [ 2  0 -1 ]
        // [ 0  3  0 ]
        let mut b = CsrBuilder::new(3);
        b.push_row(&[(0, 2.0), (2, -1.0)]);
        b.push_row(&[(1, 3.0)]);
        b.finish()
    }

    #[test]
    fn test_apply_matches_dense() {
        let a = small();
        let x = array![[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]];
        let mut y = Array2::zeros((2, 2));
        a.apply(x.view(), &mut y);
        let expected = a.to_dense().dot(&x);
        for r in 0..2 {
            for c in 0..2 {
                assert!((y[[r, c]] - expected[[r, c]]).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn test_matmul_dense_shape_check() {
        let a = small();
        let bad = Array2::<f64>::zeros((4, 2));
        assert!(a.matmul_dense(&bad).is_err());
    }

    #[test]
    fn test_duplicate_columns_sum() {
        let mut b = CsrBuilder::new(2);
        b.push_row(&[(0, 1.0), (0, 2.0)]);
        let a = b.finish();
        assert!((a.to_dense()[[0, 0]] - 3.0).abs() < 1e-15);
    }
}
