//! Shape validation for wire-format matrices
//!
//! A wire matrix is a plain sequence of rows. It only becomes a
//! [`Matrix`](crate::Matrix) after [`validate`] confirms it is non-empty and
//! rectangular.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ShapeError;

/// Unvalidated row-major wire form: may be empty or jagged
pub type Rows = Vec<Vec<f64>>;

/// Dimensions of a validated matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
}

impl Dimensions {
    /// Number of cells (`rows * cols`)
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Always false for dimensions produced by [`validate`]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when rows == cols
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Confirms `rows` is non-empty and rectangular and returns its dimensions
///
/// Checks run in order: zero rows, zero-length first row, then every row
/// against the first row's length. The first violation wins.
///
/// # Example
///
/// ```
/// use matcalc::shape::{validate, Dimensions};
/// use matcalc::ShapeError;
///
/// let dims = validate(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
/// assert_eq!(dims, Dimensions { rows: 2, cols: 2 });
///
/// let err = validate(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
/// assert_eq!(err, ShapeError::Jagged { row: 1, actual: 1, expected: 2 });
/// ```
pub fn validate<R: AsRef<[f64]>>(rows: &[R]) -> Result<Dimensions, ShapeError> {
    let first = rows.first().ok_or(ShapeError::EmptyRows)?;
    let cols = first.as_ref().len();
    if cols == 0 {
        return Err(ShapeError::EmptyColumns);
    }
    check_rectangular(rows)?;
    Ok(Dimensions {
        rows: rows.len(),
        cols,
    })
}

/// Rejects rows whose length differs from row 0
///
/// Empty input and an empty first row pass; [`validate`] reports those as
/// `EmptyRows` / `EmptyColumns`, which take precedence over `Jagged`.
pub(crate) fn check_rectangular<R: AsRef<[f64]>>(rows: &[R]) -> Result<(), ShapeError> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    let expected = first.as_ref().len();
    if expected == 0 {
        return Ok(());
    }
    match rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.as_ref().len() != expected)
    {
        Some((row, r)) => Err(ShapeError::Jagged {
            row,
            actual: r.as_ref().len(),
            expected,
        }),
        None => Ok(()),
    }
}
