//! Error types for matcalc operations
//!
//! Every message has the shape `<context>: <detail>` once it reaches a caller.
//! Callers classifying failures by string rely on that structure.

use std::fmt;

use thiserror::Error;

use crate::shape::Dimensions;

/// Result type for matcalc operations
pub type Result<T> = std::result::Result<T, MatrixError>;

/// Which operand of a request an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// Left (or only) operand
    A,
    /// Right operand
    B,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::A => f.write_str("A"),
            Operand::B => f.write_str("B"),
        }
    }
}

/// Two-operand kernel operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Elementwise addition
    Add,
    /// Elementwise subtraction
    Subtract,
    /// Matrix product
    Multiply,
}

impl BinaryOp {
    /// Shape requirement reported when the operands do not fit
    pub fn requirement(self) -> &'static str {
        match self {
            BinaryOp::Add | BinaryOp::Subtract => "same dimensions",
            BinaryOp::Multiply => "A.cols == B.rows",
        }
    }

    fn joiner(self) -> &'static str {
        match self {
            BinaryOp::Add | BinaryOp::Subtract => "and",
            BinaryOp::Multiply => "·",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOp::Add => f.write_str("add"),
            BinaryOp::Subtract => f.write_str("subtract"),
            BinaryOp::Multiply => f.write_str("multiply"),
        }
    }
}

/// Rectangularity violations found by the shape validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// The matrix has no rows at all
    #[error("matrix has zero rows")]
    EmptyRows,

    /// The first row is empty
    #[error("matrix has zero columns")]
    EmptyColumns,

    /// A row's length differs from the first row's length
    #[error("row {row} has length {actual} (expected {expected})")]
    Jagged {
        /// Index of the offending row
        row: usize,
        /// Its length
        actual: usize,
        /// Length of row 0
        expected: usize,
    },
}

/// Malformed foreign input rejected at a boundary adapter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The outer value is not array-like
    #[error("expected array, got {found}")]
    NotAnArray {
        /// Kind of value that was supplied
        found: String,
    },

    /// A row is not array-like
    #[error("row {row} is not an array (got {found})")]
    RowNotAnArray {
        /// Index of the offending row
        row: usize,
        /// Kind of value that was supplied
        found: String,
    },

    /// A cell is not a number
    #[error("cell ({row},{col}) is not a number (got {found})")]
    NotANumber {
        /// Row of the offending cell
        row: usize,
        /// Column of the offending cell
        col: usize,
        /// Kind of value that was supplied
        found: String,
    },

    /// Rows of differing length on the wire
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Errors that can occur during matcalc operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    /// An operand is not a valid matrix
    #[error("{operand}: {source}")]
    Shape {
        /// Operand that failed validation
        operand: Operand,
        /// What was wrong with it
        source: ShapeError,
    },

    /// An operand could not be decoded from its foreign representation
    #[error("{operand}: {source}")]
    Decode {
        /// Operand that failed to decode
        operand: Operand,
        /// What was wrong with it
        source: DecodeError,
    },

    /// Operand shapes are incompatible for the operation
    #[error("{op}: requires {}, got {left} {} {right}", .op.requirement(), .op.joiner())]
    DimensionMismatch {
        /// Operation that was attempted
        op: BinaryOp,
        /// Shape of A
        left: Dimensions,
        /// Shape of B
        right: Dimensions,
    },

    /// Operand is too large for a recorded reduction
    #[error("{operand}: {dims} matrix exceeds the {limit}-cell limit for recorded steps")]
    TooLarge {
        /// Operand that was rejected
        operand: Operand,
        /// Its shape
        dims: Dimensions,
        /// Maximum accepted cell count
        limit: usize,
    },

    /// Invalid raw input to a constructor
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Request body is not valid JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
}

impl MatrixError {
    /// Tags a shape error with the operand it came from
    pub fn shape(operand: Operand, source: ShapeError) -> Self {
        MatrixError::Shape { operand, source }
    }

    /// Tags a decode error with the operand it came from
    pub fn decode(operand: Operand, source: DecodeError) -> Self {
        MatrixError::Decode { operand, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(rows: usize, cols: usize) -> Dimensions {
        Dimensions { rows, cols }
    }

    #[test]
    fn test_shape_error_messages() {
        assert_eq!(ShapeError::EmptyRows.to_string(), "matrix has zero rows");
        assert_eq!(ShapeError::EmptyColumns.to_string(), "matrix has zero columns");
        let err = ShapeError::Jagged {
            row: 2,
            actual: 1,
            expected: 3,
        };
        assert_eq!(err.to_string(), "row 2 has length 1 (expected 3)");
    }

    #[test]
    fn test_shape_error_tagged_with_operand() {
        let err = MatrixError::shape(Operand::B, ShapeError::EmptyColumns);
        assert_eq!(err.to_string(), "B: matrix has zero columns");
    }

    #[test]
    fn test_decode_error_messages() {
        let err = MatrixError::decode(
            Operand::A,
            DecodeError::NotANumber {
                row: 1,
                col: 0,
                found: "string".to_string(),
            },
        );
        assert_eq!(err.to_string(), "A: cell (1,0) is not a number (got string)");

        let err = DecodeError::NotAnArray {
            found: "null".to_string(),
        };
        assert_eq!(err.to_string(), "expected array, got null");
    }

    #[test]
    fn test_decode_error_jagged_is_transparent() {
        let err: DecodeError = ShapeError::Jagged {
            row: 1,
            actual: 3,
            expected: 2,
        }
        .into();
        assert_eq!(err.to_string(), "row 1 has length 3 (expected 2)");
    }

    #[test]
    fn test_too_large_message() {
        let err = MatrixError::TooLarge {
            operand: Operand::A,
            dims: dims(21, 20),
            limit: 400,
        };
        assert_eq!(
            err.to_string(),
            "A: 21x20 matrix exceeds the 400-cell limit for recorded steps"
        );
    }

    #[test]
    fn test_dimension_mismatch_add() {
        let err = MatrixError::DimensionMismatch {
            op: BinaryOp::Add,
            left: dims(1, 2),
            right: dims(1, 3),
        };
        assert_eq!(
            err.to_string(),
            "add: requires same dimensions, got 1x2 and 1x3"
        );
    }

    #[test]
    fn test_dimension_mismatch_multiply() {
        let err = MatrixError::DimensionMismatch {
            op: BinaryOp::Multiply,
            left: dims(2, 3),
            right: dims(2, 3),
        };
        assert_eq!(
            err.to_string(),
            "multiply: requires A.cols == B.rows, got 2x3 · 2x3"
        );
    }

    #[test]
    fn test_invalid_json_error() {
        let err = MatrixError::InvalidJson("EOF while parsing".to_string());
        assert_eq!(err.to_string(), "invalid JSON: EOF while parsing");
    }

    #[test]
    fn test_error_equality() {
        let a = MatrixError::shape(Operand::A, ShapeError::EmptyRows);
        let b = MatrixError::shape(Operand::A, ShapeError::EmptyRows);
        assert_eq!(a, b);
        assert_ne!(a, MatrixError::shape(Operand::B, ShapeError::EmptyRows));
    }
}
