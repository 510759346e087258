//! Boundary adapters between foreign representations and the kernel
//!
//! Every adapter decodes through the same strict walk: the outer value must be
//! array-like, every row must be array-like, every cell must be a number, and
//! all rows must share one length. Decoding fails on the first malformed
//! element and never coerces. An empty outer array decodes to the zero-row
//! wire matrix, which the shape validator then rejects with a shape error
//! rather than an index error.
//!
//! # Adapters
//!
//! - [`json`]: `serde_json::Value` and the HTTP request/response bodies
//! - `js`: browser values through wasm-bindgen (feature `wasm`)
//! - `dense`: `nalgebra::DMatrix<f64>` (feature `nalgebra`)

use std::borrow::Cow;

use crate::error::DecodeError;
use crate::shape::{self, Rows};

pub mod json;

#[cfg(feature = "wasm")]
pub mod js;

#[cfg(feature = "nalgebra")]
pub mod dense;

/// An untyped foreign value that may hold a matrix
pub trait ForeignValue: Clone {
    /// Human-readable kind used in error messages ("null", "string", ...)
    fn kind(&self) -> String;

    /// Elements when the value is array-like, `None` otherwise
    fn elements(&self) -> Option<Cow<'_, [Self]>>;

    /// The value as a number, `None` when it is not numeric
    fn number(&self) -> Option<f64>;
}

/// Decodes a foreign array-of-arrays into wire rows
///
/// # Errors
///
/// - `NotAnArray` when the outer value is not array-like
/// - `RowNotAnArray` naming the first non-array row
/// - `NotANumber` naming the first non-numeric cell
/// - `Shape(Jagged)` naming the first row whose length differs from row 0
pub fn decode<V: ForeignValue>(value: &V) -> Result<Rows, DecodeError> {
    let outer = value.elements().ok_or_else(|| DecodeError::NotAnArray {
        found: value.kind(),
    })?;

    let mut rows = Vec::with_capacity(outer.len());
    for (i, row) in outer.iter().enumerate() {
        let cells = row.elements().ok_or_else(|| DecodeError::RowNotAnArray {
            row: i,
            found: row.kind(),
        })?;
        let decoded = cells
            .iter()
            .enumerate()
            .map(|(j, cell)| {
                cell.number().ok_or_else(|| DecodeError::NotANumber {
                    row: i,
                    col: j,
                    found: cell.kind(),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;
        rows.push(decoded);
    }

    shape::check_rectangular(&rows)?;
    Ok(rows)
}
