//! Row-reduced echelon form via Gauss-Jordan elimination
//!
//! Reduction works on a private copy of the input and always succeeds for a
//! valid [`Matrix`]: singular, rank-deficient and non-square inputs simply
//! produce zero rows and free columns.
//!
//! # Algorithm
//!
//! For each column, left to right, while unreduced rows remain:
//!
//! 1. pick the remaining row with the largest magnitude in the column
//!    (partial pivoting; ties go to the lowest row index)
//! 2. if that magnitude is below the pivot tolerance, skip the column
//! 3. swap the pivot row into place and divide it by the pivot
//! 4. eliminate the column from every other row, above and below, skipping
//!    rows whose factor is below the pivot tolerance
//!
//! A final pass snaps every cell below the cleanup tolerance to exactly `0.0`.
//!
//! # Example
//!
//! ```
//! use matcalc::Matrix;
//!
//! // Rank-deficient: the second row is twice the first
//! let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![2.0, 4.0]]).unwrap();
//! assert_eq!(m.rref().to_rows(), vec![vec![1.0, 2.0], vec![0.0, 0.0]]);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Matrix;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Magnitude below which a pivot candidate or elimination factor counts as zero
pub const PIVOT_TOLERANCE: f64 = 1e-10;

/// Magnitude below which a final cell is snapped to exactly zero
pub const CLEANUP_TOLERANCE: f64 = 1e-12;

/// Largest input, in cells, accepted by [`ops::rref_steps`](crate::ops::rref_steps)
///
/// Every recorded step holds a full snapshot, so trace memory grows with
/// `steps × cells` (roughly the fourth power of the side of a square input).
/// 400 cells keeps a 20x20 trace near 1.3 MB.
pub const MAX_TRACE_CELLS: usize = 400;

/// Thresholds used by the elimination
///
/// The pivot threshold is looser than the cleanup threshold: a column is only
/// skipped when no remaining entry is clearly nonzero, while residue is only
/// erased when it is clearly rounding noise.
///
/// # Examples
///
/// ```
/// use matcalc::Tolerance;
///
/// let tol = Tolerance::default();
/// assert_eq!(tol.pivot, 1e-10);
/// assert_eq!(tol.cleanup, 1e-12);
///
/// let loose = Tolerance::new().with_pivot(1e-6).with_cleanup(1e-9);
/// assert_eq!(loose.pivot, 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Pivot acceptance and elimination-skip threshold
    pub pivot: f64,
    /// Final cleanup threshold
    pub cleanup: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            pivot: PIVOT_TOLERANCE,
            cleanup: CLEANUP_TOLERANCE,
        }
    }
}

impl Tolerance {
    /// Default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pivot acceptance threshold (negative values clamp to 0)
    pub fn with_pivot(mut self, pivot: f64) -> Self {
        self.pivot = pivot.max(0.0);
        self
    }

    /// Set the cleanup threshold (negative values clamp to 0)
    pub fn with_cleanup(mut self, cleanup: f64) -> Self {
        self.cleanup = cleanup.max(0.0);
        self
    }
}

/// One elementary row operation; row indices are 0-based
///
/// `Display` renders 1-based labels the way the operations are written by
/// hand: `R1 <-> R2`, `R1 <- R1 / 2`, `R2 <- R2 - 3 * R1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowOp {
    /// Exchange rows `a` and `b`
    Swap {
        /// Pivot position
        a: usize,
        /// Row the pivot came from
        b: usize,
    },
    /// Divide `row` by `pivot`
    Scale {
        /// Row being normalized
        row: usize,
        /// Value the row was divided by
        pivot: f64,
    },
    /// `target <- target - factor * source`
    Eliminate {
        /// Row being cleared
        target: usize,
        /// Pivot row
        source: usize,
        /// Multiple of the pivot row subtracted
        factor: f64,
    },
}

impl fmt::Display for RowOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RowOp::Swap { a, b } => write!(f, "R{} <-> R{}", a + 1, b + 1),
            RowOp::Scale { row, pivot } => write!(f, "R{0} <- R{0} / {1}", row + 1, pivot),
            RowOp::Eliminate {
                target,
                source,
                factor,
            } => {
                let sign = if factor < 0.0 { '+' } else { '-' };
                write!(
                    f,
                    "R{0} <- R{0} {1} {2} * R{3}",
                    target + 1,
                    sign,
                    factor.abs(),
                    source + 1
                )
            }
        }
    }
}

/// A row operation and the matrix right after it was applied
#[derive(Debug, Clone, PartialEq)]
pub struct RrefStep {
    /// Operation applied
    pub op: RowOp,
    /// Matrix state after the operation
    pub snapshot: Matrix,
}

/// Result of a recorded reduction
#[derive(Debug, Clone, PartialEq)]
pub struct RrefTrace {
    result: Matrix,
    steps: Vec<RrefStep>,
    pivots: Vec<(usize, usize)>,
}

impl RrefTrace {
    /// Reduced matrix; identical to [`Matrix::rref`] on the same input
    pub fn result(&self) -> &Matrix {
        &self.result
    }

    /// Consumes the trace, keeping only the reduced matrix
    pub fn into_result(self) -> Matrix {
        self.result
    }

    /// Row operations in application order
    pub fn steps(&self) -> &[RrefStep] {
        &self.steps
    }

    /// `(row, col)` of every pivot, in column order
    pub fn pivots(&self) -> &[(usize, usize)] {
        &self.pivots
    }

    /// Columns that received a pivot
    pub fn pivot_columns(&self) -> Vec<usize> {
        self.pivots.iter().map(|&(_, col)| col).collect()
    }

    /// Number of pivots found
    pub fn rank(&self) -> usize {
        self.pivots.len()
    }
}

impl Matrix {
    /// Row-reduced echelon form with the default [`Tolerance`]
    ///
    /// # Example
    ///
    /// ```
    /// use matcalc::Matrix;
    ///
    /// // Partial pivoting keeps row 0 (|2| > |1|) as the first pivot
    /// let m = Matrix::from_rows(&[vec![2.0, 4.0], vec![1.0, 3.0]]).unwrap();
    /// assert_eq!(m.rref().to_rows(), vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    /// ```
    #[cfg_attr(feature = "tracing", instrument(skip(self), fields(dims = %format!("{}x{}", self.rows(), self.cols()))))]
    pub fn rref(&self) -> Matrix {
        self.rref_with(Tolerance::default())
    }

    /// Row-reduced echelon form with custom thresholds
    pub fn rref_with(&self, tol: Tolerance) -> Matrix {
        let mut work = self.clone();
        reduce(&mut work, tol, |_, _| {});
        work
    }

    /// Row-reduced echelon form, recording every row operation
    ///
    /// Scaling is only recorded when the pivot is not already exactly 1.
    ///
    /// # Example
    ///
    /// ```
    /// use matcalc::{Matrix, RowOp};
    ///
    /// let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![2.0, 4.0]]).unwrap();
    /// let trace = m.rref_trace();
    /// assert_eq!(trace.rank(), 1);
    /// assert_eq!(trace.steps()[0].op, RowOp::Swap { a: 0, b: 1 });
    /// assert_eq!(trace.steps()[0].op.to_string(), "R1 <-> R2");
    /// ```
    #[cfg_attr(feature = "tracing", instrument(skip(self), fields(dims = %format!("{}x{}", self.rows(), self.cols()))))]
    pub fn rref_trace(&self) -> RrefTrace {
        self.rref_trace_with(Tolerance::default())
    }

    /// Recorded reduction with custom thresholds
    pub fn rref_trace_with(&self, tol: Tolerance) -> RrefTrace {
        let mut work = self.clone();
        let mut steps = Vec::new();
        let pivots = reduce(&mut work, tol, |op, state| {
            steps.push(RrefStep {
                op,
                snapshot: state.clone(),
            });
        });
        RrefTrace {
            result: work,
            steps,
            pivots,
        }
    }
}

/// Gauss-Jordan elimination in place; returns pivot positions
///
/// `observe` sees each operation together with the matrix right after it.
fn reduce<F>(m: &mut Matrix, tol: Tolerance, mut observe: F) -> Vec<(usize, usize)>
where
    F: FnMut(RowOp, &Matrix),
{
    let rows = m.rows();
    let cols = m.cols();
    let mut pivots = Vec::with_capacity(rows.min(cols));
    let mut row = 0;

    for col in 0..cols {
        if row >= rows {
            break;
        }

        let (piv, max_abs) = pivot_candidate(m.as_slice(), cols, row, rows, col);
        if max_abs == 0.0 || max_abs < tol.pivot {
            #[cfg(feature = "tracing")]
            tracing::debug!(col, row, max_abs, "no usable pivot, skipping column");
            continue;
        }

        if piv != row {
            swap_rows(m.data_mut(), cols, row, piv);
            observe(RowOp::Swap { a: row, b: piv }, m);
        }

        let p = m.as_slice()[row * cols + col];
        for v in &mut m.data_mut()[row * cols + col..(row + 1) * cols] {
            *v /= p;
        }
        if p != 1.0 {
            observe(RowOp::Scale { row, pivot: p }, m);
        }
        debug_assert!(!p.is_finite() || m.as_slice()[row * cols + col] == 1.0);

        let pivot_tail: Vec<f64> = m.as_slice()[row * cols + col..(row + 1) * cols].to_vec();
        for i in (0..rows).filter(|&i| i != row) {
            let factor = m.as_slice()[i * cols + col];
            if factor == 0.0 || factor.abs() < tol.pivot {
                continue;
            }
            let target = &mut m.data_mut()[i * cols + col..(i + 1) * cols];
            for (t, &pv) in target.iter_mut().zip(&pivot_tail) {
                *t -= factor * pv;
            }
            observe(
                RowOp::Eliminate {
                    target: i,
                    source: row,
                    factor,
                },
                m,
            );
        }

        pivots.push((row, col));
        row += 1;
    }

    for v in m.data_mut() {
        if v.abs() < tol.cleanup {
            *v = 0.0;
        }
    }

    pivots
}

/// Row in `[start, end)` with the largest `|m[i][col]|`; first wins on ties
fn pivot_candidate(
    data: &[f64],
    cols: usize,
    start: usize,
    end: usize,
    col: usize,
) -> (usize, f64) {
    let mut best = start;
    let mut max_abs = data[start * cols + col].abs();
    for i in start + 1..end {
        let v = data[i * cols + col].abs();
        if v > max_abs {
            max_abs = v;
            best = i;
        }
    }
    (best, max_abs)
}

fn swap_rows(data: &mut [f64], cols: usize, a: usize, b: usize) {
    let (lo, hi) = (a.min(b), a.max(b));
    let (head, tail) = data.split_at_mut(hi * cols);
    head[lo * cols..(lo + 1) * cols].swap_with_slice(&mut tail[..cols]);
}
