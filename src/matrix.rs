//! Dense matrices and elementwise operations
//!
//! [`Matrix`] is the validated form of a wire matrix: non-empty, rectangular,
//! stored row-major in a single buffer. Operations never mutate their
//! operands; each returns a freshly allocated result.
//!
//! # Example
//!
//! ```
//! use matcalc::Matrix;
//!
//! let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
//! let b = Matrix::from_rows(&[vec![5.0, 6.0], vec![7.0, 8.0]]).unwrap();
//!
//! let c = a.matmul(&b).unwrap();
//! assert_eq!(c.to_rows(), vec![vec![19.0, 22.0], vec![43.0, 50.0]]);
//! ```

use crate::error::{BinaryOp, MatrixError, Result, ShapeError};
use crate::shape::{self, Dimensions, Rows};
use crate::{Backend, OpComplexity};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// A validated 2D matrix with row-major storage
///
/// Data is stored in row-major format (C-style): consecutive elements in
/// memory belong to the same row, and the row stride equals [`cols`](Self::cols).
///
/// # Storage Layout
///
/// For a 2x3 matrix:
/// ```text
/// [[a, b, c],
///  [d, e, f]]
/// ```
/// Data is stored as: [a, b, c, d, e, f]
///
/// # Invariant
///
/// `rows > 0`, `cols > 0` and `data.len() == rows * cols`. Every constructor
/// enforces this, so operations never re-check it.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Creates a matrix from a row-major buffer
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if either dimension is zero or if
    /// `data.len() != rows * cols`
    ///
    /// # Example
    ///
    /// ```
    /// use matcalc::Matrix;
    ///
    /// let m = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    /// assert_eq!(m.get(1, 0), Some(&3.0));
    /// ```
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::InvalidInput(format!(
                "matrix dimensions must be non-zero, got {rows}x{cols}"
            )));
        }
        if data.len() != rows * cols {
            return Err(MatrixError::InvalidInput(format!(
                "data length {} does not match matrix dimensions {}x{} (expected {})",
                data.len(),
                rows,
                cols,
                rows * cols
            )));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Creates a matrix from wire rows after validating their shape
    ///
    /// # Errors
    ///
    /// Returns the validator's [`ShapeError`] for empty or jagged input
    ///
    /// # Example
    ///
    /// ```
    /// use matcalc::{Matrix, ShapeError};
    ///
    /// let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0]]).unwrap();
    /// assert_eq!(m.shape(), (1, 3));
    ///
    /// let rows: Vec<Vec<f64>> = vec![];
    /// assert_eq!(Matrix::from_rows(&rows), Err(ShapeError::EmptyRows));
    /// ```
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> std::result::Result<Self, ShapeError> {
        let dims = shape::validate(rows)?;
        let mut data = Vec::with_capacity(dims.len());
        for row in rows {
            data.extend_from_slice(row.as_ref());
        }
        Ok(Matrix {
            rows: dims.rows,
            cols: dims.cols,
            data,
        })
    }

    /// Creates an `n×n` identity matrix
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for `n == 0`
    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Self::from_vec(n, n, vec![0.0; n * n])?;
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        Ok(m)
    }

    /// Zero-filled result buffer; callers guarantee non-zero dimensions
    pub(crate) fn zeros(rows: usize, cols: usize) -> Self {
        debug_assert!(rows > 0 && cols > 0);
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Returns the number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the shape as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the dimensions
    pub fn dims(&self) -> Dimensions {
        Dimensions {
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Gets a reference to an element at (row, col)
    ///
    /// Returns `None` if indices are out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<&f64> {
        if row >= self.rows || col >= self.cols {
            None
        } else {
            self.data.get(row * self.cols + col)
        }
    }

    /// Returns row `i` as a slice, or `None` if out of bounds
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        (i < self.rows).then(|| &self.data[i * self.cols..(i + 1) * self.cols])
    }

    /// Iterates over rows as slices
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.cols)
    }

    /// Returns a reference to the underlying row-major data
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Copies the matrix back into wire rows
    pub fn to_rows(&self) -> Rows {
        self.iter_rows().map(<[f64]>::to_vec).collect()
    }

    /// True when every cell differs from `other` by at most `tol`
    ///
    /// Matrices of different shape are never approximately equal.
    pub fn approx_eq(&self, other: &Matrix, tol: f64) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).abs() <= tol)
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Elementwise addition
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` unless both matrices have the same shape
    ///
    /// # Example
    ///
    /// ```
    /// use matcalc::Matrix;
    ///
    /// let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    /// let b = Matrix::from_rows(&[vec![5.0, 6.0], vec![7.0, 8.0]]).unwrap();
    /// assert_eq!(a.add(&b).unwrap().to_rows(), vec![vec![6.0, 8.0], vec![10.0, 12.0]]);
    /// ```
    #[cfg_attr(feature = "tracing", instrument(skip(self, other), fields(dims = %format!("{}x{} + {}x{}", self.rows, self.cols, other.rows, other.cols))))]
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.add_with(other, Backend::select_for(OpComplexity::Low, self.data.len()))
    }

    /// Elementwise addition on an explicit backend
    pub fn add_with(&self, other: &Matrix, backend: Backend) -> Result<Matrix> {
        self.check_same_shape(other, BinaryOp::Add)?;
        let mut result = Matrix::zeros(self.rows, self.cols);
        backend.add(&self.data, &other.data, &mut result.data);
        Ok(result)
    }

    /// Elementwise subtraction (`self - other`)
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` unless both matrices have the same shape
    #[cfg_attr(feature = "tracing", instrument(skip(self, other), fields(dims = %format!("{}x{} - {}x{}", self.rows, self.cols, other.rows, other.cols))))]
    pub fn sub(&self, other: &Matrix) -> Result<Matrix> {
        self.sub_with(other, Backend::select_for(OpComplexity::Low, self.data.len()))
    }

    /// Elementwise subtraction on an explicit backend
    pub fn sub_with(&self, other: &Matrix, backend: Backend) -> Result<Matrix> {
        self.check_same_shape(other, BinaryOp::Subtract)?;
        let mut result = Matrix::zeros(self.rows, self.cols);
        backend.sub(&self.data, &other.data, &mut result.data);
        Ok(result)
    }

    /// Matrix multiplication (matmul)
    ///
    /// Computes `C = A × B` where A is `m×n`, B is `n×p`, and C is `m×p`.
    /// Each cell is the plain dot product summed in ascending `k`.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `self.cols != other.rows`
    ///
    /// # Example
    ///
    /// ```
    /// use matcalc::Matrix;
    ///
    /// let row = Matrix::from_rows(&[vec![1.0, 2.0, 3.0]]).unwrap();
    /// let col = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0]]).unwrap();
    /// assert_eq!(row.matmul(&col).unwrap().to_rows(), vec![vec![14.0]]);
    /// ```
    #[cfg_attr(feature = "tracing", instrument(skip(self, other), fields(dims = %format!("{}x{} @ {}x{}", self.rows, self.cols, other.rows, other.cols))))]
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix> {
        let work = self.rows * self.cols * other.cols;
        self.matmul_with(other, Backend::select_for(OpComplexity::High, work))
    }

    /// Matrix multiplication on an explicit backend
    pub fn matmul_with(&self, other: &Matrix, backend: Backend) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(MatrixError::DimensionMismatch {
                op: BinaryOp::Multiply,
                left: self.dims(),
                right: other.dims(),
            });
        }
        let mut result = Matrix::zeros(self.rows, other.cols);
        backend.matmul(
            &self.data,
            &other.data,
            &mut result.data,
            self.rows,
            self.cols,
            other.cols,
        );
        Ok(result)
    }

    fn check_same_shape(&self, other: &Matrix, op: BinaryOp) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(MatrixError::DimensionMismatch {
                op,
                left: self.dims(),
                right: other.dims(),
            });
        }
        Ok(())
    }
}

impl TryFrom<&[Vec<f64>]> for Matrix {
    type Error = ShapeError;

    fn try_from(rows: &[Vec<f64>]) -> std::result::Result<Self, Self::Error> {
        Matrix::from_rows(rows)
    }
}

impl From<&Matrix> for Rows {
    fn from(m: &Matrix) -> Self {
        m.to_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[f64]]) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    // ========================================================================
    // Construction
    // ========================================================================

    #[test]
    fn test_matrix_from_vec() {
        let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.get(0, 2), Some(&3.0));
        assert_eq!(m.get(1, 0), Some(&4.0));
    }

    #[test]
    fn test_matrix_from_vec_invalid_size() {
        let result = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(MatrixError::InvalidInput(_))));
    }

    #[test]
    fn test_matrix_from_vec_zero_dimension() {
        assert!(Matrix::from_vec(0, 3, vec![]).is_err());
        assert!(Matrix::from_vec(3, 0, vec![]).is_err());
    }

    #[test]
    fn test_matrix_from_rows_rejects_jagged() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert_eq!(
            Matrix::from_rows(&rows),
            Err(ShapeError::Jagged {
                row: 1,
                actual: 1,
                expected: 2
            })
        );
    }

    #[test]
    fn test_matrix_identity() {
        let i = Matrix::identity(3).unwrap();
        for r in 0..3 {
            for c in 0..3 {
                let expected = if r == c { 1.0 } else { 0.0 };
                assert_eq!(i.get(r, c), Some(&expected));
            }
        }
        assert!(Matrix::identity(0).is_err());
    }

    #[test]
    fn test_matrix_get_out_of_bounds() {
        let m = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.get(0, 2), None);
        assert_eq!(m.row(2), None);
    }

    #[test]
    fn test_matrix_rows_round_trip() {
        let rows = vec![vec![1.5, -2.25], vec![1e-300, 7.0e10]];
        let m = Matrix::from_rows(&rows).unwrap();
        assert_eq!(m.to_rows(), rows);
        assert_eq!(m.row(1), Some(&[1e-300, 7.0e10][..]));
    }

    // ========================================================================
    // Elementwise
    // ========================================================================

    #[test]
    fn test_add_basic() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = m(&[&[5.0, 6.0], &[7.0, 8.0]]);
        assert_eq!(a.add(&b).unwrap(), m(&[&[6.0, 8.0], &[10.0, 12.0]]));
    }

    #[test]
    fn test_sub_basic() {
        let a = m(&[&[6.0, 8.0], &[10.0, 12.0]]);
        let b = m(&[&[5.0, 6.0], &[7.0, 8.0]]);
        assert_eq!(a.sub(&b).unwrap(), m(&[&[1.0, 2.0], &[3.0, 4.0]]));
    }

    #[test]
    fn test_add_does_not_mutate_operands() {
        let a = m(&[&[1.0, 2.0]]);
        let b = m(&[&[3.0, 4.0]]);
        let (a0, b0) = (a.clone(), b.clone());
        let _ = a.add(&b).unwrap();
        let _ = a.sub(&b).unwrap();
        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn test_add_dimension_mismatch() {
        let a = m(&[&[1.0, 2.0]]);
        let b = m(&[&[1.0, 2.0, 3.0]]);
        let err = a.add(&b).unwrap_err();
        assert_eq!(
            err,
            MatrixError::DimensionMismatch {
                op: BinaryOp::Add,
                left: Dimensions { rows: 1, cols: 2 },
                right: Dimensions { rows: 1, cols: 3 },
            }
        );
    }

    #[test]
    fn test_sub_dimension_mismatch_transposed_shape() {
        // Same cell count, different shape
        let a = m(&[&[1.0, 2.0]]);
        let b = m(&[&[1.0], &[2.0]]);
        let err = a.sub(&b).unwrap_err();
        assert_eq!(
            err.to_string(),
            "subtract: requires same dimensions, got 1x2 and 2x1"
        );
    }

    // ========================================================================
    // Matmul
    // ========================================================================

    #[test]
    fn test_matmul_basic() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = m(&[&[5.0, 6.0], &[7.0, 8.0]]);
        // [[1, 2],   [[5, 6],   [[19, 22],
        //  [3, 4]] ×  [7, 8]] =  [43, 50]]
        assert_eq!(a.matmul(&b).unwrap(), m(&[&[19.0, 22.0], &[43.0, 50.0]]));
    }

    #[test]
    fn test_matmul_identity() {
        let a = m(&[&[1.5, -2.0, 3.0], &[4.0, 0.5, -6.0]]);
        let i = Matrix::identity(3).unwrap();
        assert_eq!(a.matmul(&i).unwrap(), a);
        let i2 = Matrix::identity(2).unwrap();
        assert_eq!(i2.matmul(&a).unwrap(), a);
    }

    #[test]
    fn test_matmul_non_square() {
        // 2×3 · 3×2 = 2×2
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let b = m(&[&[7.0, 8.0], &[9.0, 10.0], &[11.0, 12.0]]);
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.shape(), (2, 2));
        assert_eq!(c, m(&[&[58.0, 64.0], &[139.0, 154.0]]));
    }

    #[test]
    fn test_matmul_row_times_column() {
        let a = m(&[&[1.0, 2.0, 3.0]]);
        let b = m(&[&[1.0], &[2.0], &[3.0]]);
        assert_eq!(a.matmul(&b).unwrap(), m(&[&[14.0]]));
    }

    #[test]
    fn test_matmul_dimension_mismatch() {
        let a = m(&[&[1.0, 2.0]]);
        let b = m(&[&[1.0, 2.0, 3.0]]);
        let err = a.matmul(&b).unwrap_err();
        assert_eq!(
            err.to_string(),
            "multiply: requires A.cols == B.rows, got 1x2 · 1x3"
        );
    }

    #[test]
    fn test_explicit_backends_agree() {
        let a = m(&[&[0.1, 0.2, 0.3], &[0.4, 0.5, 0.6]]);
        let b = m(&[&[0.7, 0.8], &[0.9, 1.0], &[1.1, 1.2]]);
        let scalar = a.matmul_with(&b, Backend::Scalar).unwrap();
        for &backend in Backend::available() {
            assert_eq!(a.matmul_with(&b, backend).unwrap(), scalar);
        }
    }

    #[test]
    fn test_approx_eq() {
        let a = m(&[&[1.0, 2.0]]);
        let b = m(&[&[1.0 + 1e-12, 2.0]]);
        assert!(a.approx_eq(&b, 1e-9));
        assert!(!a.approx_eq(&b, 0.0));
        assert!(!a.approx_eq(&m(&[&[1.0], &[2.0]]), 1.0));
    }
}
