//! Kernel entry points over wire rows
//!
//! These are the functions boundary adapters call. Each validates its
//! operands independently, tagging any shape error with the operand it came
//! from, and then runs the pure computation on [`Matrix`].
//!
//! ```
//! use matcalc::ops;
//!
//! let err = ops::multiply(&[vec![1.0, 2.0]], &[vec![1.0], vec![2.0], vec![3.0]]).unwrap_err();
//! assert_eq!(err.to_string(), "multiply: requires A.cols == B.rows, got 1x2 · 3x1");
//!
//! let err = ops::rref(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
//! assert_eq!(err.to_string(), "A: row 1 has length 1 (expected 2)");
//! ```

use crate::error::{BinaryOp, MatrixError, Operand, Result};
use crate::rref::{RrefTrace, MAX_TRACE_CELLS};
use crate::Matrix;

/// Validates one operand, tagging failures with `operand`
pub fn operand<R: AsRef<[f64]>>(operand: Operand, rows: &[R]) -> Result<Matrix> {
    Matrix::from_rows(rows).map_err(|e| MatrixError::shape(operand, e))
}

/// Elementwise `A + B`
pub fn add<R: AsRef<[f64]>>(a: &[R], b: &[R]) -> Result<Matrix> {
    BinaryOp::Add.apply(a, b)
}

/// Elementwise `A - B`
pub fn subtract<R: AsRef<[f64]>>(a: &[R], b: &[R]) -> Result<Matrix> {
    BinaryOp::Subtract.apply(a, b)
}

/// Matrix product `A × B`
pub fn multiply<R: AsRef<[f64]>>(a: &[R], b: &[R]) -> Result<Matrix> {
    BinaryOp::Multiply.apply(a, b)
}

/// Row-reduced echelon form of `A`
///
/// Fails only when `A` is not a valid matrix.
pub fn rref<R: AsRef<[f64]>>(a: &[R]) -> Result<Matrix> {
    Ok(operand(Operand::A, a)?.rref())
}

/// Row-reduced echelon form of `A` with every row operation recorded
///
/// # Errors
///
/// Besides shape errors, returns `TooLarge` when `A` has more than
/// [`MAX_TRACE_CELLS`] cells.
pub fn rref_steps<R: AsRef<[f64]>>(a: &[R]) -> Result<RrefTrace> {
    let m = operand(Operand::A, a)?;
    let dims = m.dims();
    if dims.len() > MAX_TRACE_CELLS {
        return Err(MatrixError::TooLarge {
            operand: Operand::A,
            dims,
            limit: MAX_TRACE_CELLS,
        });
    }
    Ok(m.rref_trace())
}

impl BinaryOp {
    /// Validates both operands and applies the operation
    ///
    /// A is validated before B, so when both are malformed the error names A.
    pub fn apply<R: AsRef<[f64]>>(self, a: &[R], b: &[R]) -> Result<Matrix> {
        let a = operand(Operand::A, a)?;
        let b = operand(Operand::B, b)?;
        self.apply_matrices(&a, &b)
    }

    /// Applies the operation to already validated matrices
    pub fn apply_matrices(self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
        match self {
            BinaryOp::Add => a.add(b),
            BinaryOp::Subtract => a.sub(b),
            BinaryOp::Multiply => a.matmul(b),
        }
    }
}
