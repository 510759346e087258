//! JSON boundary: request decoding and response encoding
//!
//! Request bodies carry operands under `"A"` and `"B"`; responses always carry
//! both `"result"` and `"error"`, exactly one of them non-null.
//!
//! ```
//! use matcalc::bridge::json::{respond_binary, MatrixResponse};
//! use matcalc::BinaryOp;
//!
//! let resp = respond_binary(BinaryOp::Add, br#"{"A": [[1, 2]], "B": [[1, 2, 3]]}"#);
//! assert_eq!(resp.result, None);
//! assert_eq!(
//!     resp.error.as_deref(),
//!     Some("add: requires same dimensions, got 1x2 and 1x3")
//! );
//! ```
//!
//! Numbers are written with shortest round-trip formatting and parsed with
//! `float_roundtrip`, so every finite `f64` survives encode/decode unchanged.
//! JSON has no spelling for non-finite values; they are written as `null`.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ForeignValue;
use crate::error::{BinaryOp, MatrixError, Operand, Result};
use crate::rref::{RowOp, RrefTrace};
use crate::shape::Rows;
use crate::{ops, Matrix};

impl ForeignValue for Value {
    fn kind(&self) -> String {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
        .to_string()
    }

    fn elements(&self) -> Option<Cow<'_, [Self]>> {
        self.as_array().map(|a| Cow::Borrowed(a.as_slice()))
    }

    fn number(&self) -> Option<f64> {
        self.as_f64()
    }
}

/// Decodes one operand, tagging failures with `operand`
pub fn decode_operand(operand: Operand, value: &Value) -> Result<Rows> {
    super::decode(value).map_err(|e| MatrixError::decode(operand, e))
}

/// Body of a two-operand request: `{ "A": [[...]], "B": [[...]] }`
///
/// Operands stay untyped until [`decode_operand`] walks them, so malformed
/// cells are reported by position instead of by serde.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BinaryRequest {
    /// Left operand
    #[serde(rename = "A", default)]
    pub a: Value,
    /// Right operand
    #[serde(rename = "B", default)]
    pub b: Value,
}

/// Body of a one-operand request: `{ "A": [[...]] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnaryRequest {
    /// The operand
    #[serde(rename = "A", default)]
    pub a: Value,
}

/// Response body: `{ "result": [[...]] | null, "error": "..." | null }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixResponse {
    /// Result matrix on success
    pub result: Option<Rows>,
    /// Error message on failure
    pub error: Option<String>,
}

impl MatrixResponse {
    /// Successful response; this is the JSON encoding of a [`Matrix`]
    pub fn ok(matrix: &Matrix) -> Self {
        Self {
            result: Some(matrix.to_rows()),
            error: None,
        }
    }

    /// Failed response
    pub fn err(error: &MatrixError) -> Self {
        Self {
            result: None,
            error: Some(error.to_string()),
        }
    }

    /// True when `result` is populated
    pub fn is_ok(&self) -> bool {
        self.result.is_some()
    }
}

impl From<Result<Matrix>> for MatrixResponse {
    fn from(outcome: Result<Matrix>) -> Self {
        match outcome {
            Ok(m) => Self::ok(&m),
            Err(e) => Self::err(&e),
        }
    }
}

/// One recorded row operation on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepBody {
    /// Human-readable operation, e.g. `R1 <-> R2`
    pub description: String,
    /// Structured operation
    pub op: RowOp,
    /// Matrix right after the operation
    pub matrix: Rows,
}

/// Response body for a recorded reduction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RrefStepsResponse {
    /// Reduced matrix on success
    pub result: Option<Rows>,
    /// Row operations in order (empty on failure)
    pub steps: Vec<StepBody>,
    /// Number of pivots on success
    pub rank: Option<usize>,
    /// Pivot columns on success
    pub pivot_columns: Option<Vec<usize>>,
    /// Error message on failure
    pub error: Option<String>,
}

impl From<Result<RrefTrace>> for RrefStepsResponse {
    fn from(outcome: Result<RrefTrace>) -> Self {
        match outcome {
            Ok(trace) => Self {
                result: Some(trace.result().to_rows()),
                steps: trace
                    .steps()
                    .iter()
                    .map(|s| StepBody {
                        description: s.op.to_string(),
                        op: s.op,
                        matrix: s.snapshot.to_rows(),
                    })
                    .collect(),
                rank: Some(trace.rank()),
                pivot_columns: Some(trace.pivot_columns()),
                error: None,
            },
            Err(e) => Self {
                result: None,
                steps: Vec::new(),
                rank: None,
                pivot_columns: None,
                error: Some(e.to_string()),
            },
        }
    }
}

fn parse<T: for<'de> Deserialize<'de>>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| MatrixError::InvalidJson(e.to_string()))
}

/// Parses a two-operand body and applies `op`
pub fn evaluate_binary(op: BinaryOp, body: &[u8]) -> Result<Matrix> {
    let req: BinaryRequest = parse(body)?;
    let a = decode_operand(Operand::A, &req.a)?;
    let b = decode_operand(Operand::B, &req.b)?;
    op.apply(&a, &b)
}

/// Parses a one-operand body and reduces it
pub fn evaluate_rref(body: &[u8]) -> Result<Matrix> {
    let req: UnaryRequest = parse(body)?;
    ops::rref(&decode_operand(Operand::A, &req.a)?)
}

/// Parses a one-operand body and reduces it with steps recorded
pub fn evaluate_rref_steps(body: &[u8]) -> Result<RrefTrace> {
    let req: UnaryRequest = parse(body)?;
    ops::rref_steps(&decode_operand(Operand::A, &req.a)?)
}

/// Full two-operand round trip: body in, response out
pub fn respond_binary(op: BinaryOp, body: &[u8]) -> MatrixResponse {
    evaluate_binary(op, body).into()
}

/// Full RREF round trip: body in, response out
pub fn respond_rref(body: &[u8]) -> MatrixResponse {
    evaluate_rref(body).into()
}

/// Full recorded-RREF round trip: body in, response out
pub fn respond_rref_steps(body: &[u8]) -> RrefStepsResponse {
    evaluate_rref_steps(body).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, ShapeError};
    use serde_json::json;

    // ========================================================================
    // Decoding
    // ========================================================================

    #[test]
    fn test_decode_integers_and_floats() {
        let rows = decode_operand(Operand::A, &json!([[1, 2.5], [-3, 4e-3]])).unwrap();
        assert_eq!(rows, vec![vec![1.0, 2.5], vec![-3.0, 0.004]]);
    }

    #[test]
    fn test_decode_empty_outer_array() {
        let rows = decode_operand(Operand::A, &json!([])).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_decode_rejects_non_array() {
        let err = decode_operand(Operand::B, &json!({"rows": []})).unwrap_err();
        assert_eq!(
            err,
            MatrixError::decode(
                Operand::B,
                DecodeError::NotAnArray {
                    found: "object".to_string()
                }
            )
        );
        assert_eq!(err.to_string(), "B: expected array, got object");
    }

    #[test]
    fn test_decode_rejects_non_array_row() {
        let err = decode_operand(Operand::A, &json!([[1, 2], 3])).unwrap_err();
        assert_eq!(err.to_string(), "A: row 1 is not an array (got number)");
    }

    #[test]
    fn test_decode_rejects_string_cell() {
        let err = decode_operand(Operand::A, &json!([[1, 2], [3, "4"]])).unwrap_err();
        assert_eq!(err.to_string(), "A: cell (1,1) is not a number (got string)");
    }

    #[test]
    fn test_decode_rejects_null_cell() {
        let err = decode_operand(Operand::A, &json!([[null]])).unwrap_err();
        assert_eq!(err.to_string(), "A: cell (0,0) is not a number (got null)");
    }

    #[test]
    fn test_decode_rejects_jagged() {
        let err = decode_operand(Operand::A, &json!([[1, 2], [3, 4], [5]])).unwrap_err();
        assert_eq!(
            err,
            MatrixError::decode(
                Operand::A,
                DecodeError::Shape(ShapeError::Jagged {
                    row: 2,
                    actual: 1,
                    expected: 2
                })
            )
        );
        assert_eq!(err.to_string(), "A: row 2 has length 1 (expected 2)");
    }

    // ========================================================================
    // Encoding
    // ========================================================================

    #[test]
    fn test_ok_response_preserves_values_exactly() {
        let values = vec![
            vec![0.1, 1.0 / 3.0, -2.5e-308],
            vec![f64::MAX, f64::MIN_POSITIVE, 123456789.123456789],
        ];
        let m = Matrix::from_rows(&values).unwrap();
        let text = serde_json::to_string(&MatrixResponse::ok(&m)).unwrap();
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(decode_operand(Operand::A, &back["result"]).unwrap(), values);
    }

    #[test]
    fn test_ok_response_writes_non_finite_as_null() {
        let m = Matrix::from_rows(&[vec![f64::INFINITY, 1.0]]).unwrap();
        let value = serde_json::to_value(MatrixResponse::ok(&m)).unwrap();
        assert_eq!(value["result"], json!([[null, 1.0]]));
    }

    #[test]
    fn test_response_round_trips_floats() {
        let m = Matrix::from_rows(&[vec![0.1 + 0.2, std::f64::consts::PI]]).unwrap();
        let text = serde_json::to_string(&MatrixResponse::ok(&m)).unwrap();
        let back: MatrixResponse = serde_json::from_str(&text).unwrap();
        assert_eq!(back.result, Some(m.to_rows()));
    }

    #[test]
    fn test_response_always_has_both_keys() {
        let ok = serde_json::to_value(MatrixResponse::ok(&Matrix::identity(1).unwrap())).unwrap();
        assert_eq!(ok, json!({"result": [[1.0]], "error": null}));
        let invalid = MatrixError::InvalidJson("x".into());
        let err = serde_json::to_value(MatrixResponse::err(&invalid)).unwrap();
        assert_eq!(err, json!({"result": null, "error": "invalid JSON: x"}));
    }

    // ========================================================================
    // Request handling
    // ========================================================================

    #[test]
    fn test_respond_binary_success() {
        let body = br#"{"A": [[1,2],[3,4]], "B": [[5,6],[7,8]]}"#;
        let resp = respond_binary(BinaryOp::Multiply, body);
        assert!(resp.is_ok());
        assert_eq!(resp.result, Some(vec![vec![19.0, 22.0], vec![43.0, 50.0]]));
        assert_eq!(resp.error, None);
    }

    #[test]
    fn test_respond_binary_invalid_json() {
        let resp = respond_binary(BinaryOp::Add, b"{\"A\": [[1]");
        assert!(!resp.is_ok());
        assert!(resp.error.unwrap().starts_with("invalid JSON: "));
    }

    #[test]
    fn test_respond_binary_missing_operand() {
        let resp = respond_binary(BinaryOp::Subtract, br#"{"A": [[1]]}"#);
        assert_eq!(resp.error.as_deref(), Some("B: expected array, got null"));
    }

    #[test]
    fn test_respond_binary_zero_rows_is_shape_error() {
        let resp = respond_binary(BinaryOp::Add, br#"{"A": [], "B": [[1]]}"#);
        assert_eq!(resp.error.as_deref(), Some("A: matrix has zero rows"));
    }

    #[test]
    fn test_respond_rref() {
        let resp = respond_rref(br#"{"A": [[2, 4], [1, 3]]}"#);
        assert_eq!(resp.result, Some(vec![vec![1.0, 0.0], vec![0.0, 1.0]]));
    }

    #[test]
    fn test_respond_rref_empty_row() {
        let resp = respond_rref(br#"{"A": [[]]}"#);
        assert_eq!(resp.error.as_deref(), Some("A: matrix has zero columns"));
    }

    #[test]
    fn test_respond_rref_steps() {
        let resp = respond_rref_steps(br#"{"A": [[1, 2], [2, 4]]}"#);
        assert_eq!(resp.result, Some(vec![vec![1.0, 2.0], vec![0.0, 0.0]]));
        assert_eq!(resp.rank, Some(1));
        assert_eq!(resp.pivot_columns, Some(vec![0]));
        assert_eq!(resp.steps[0].description, "R1 <-> R2");
        assert_eq!(resp.steps[0].matrix, vec![vec![2.0, 4.0], vec![1.0, 2.0]]);
        assert_eq!(resp.error, None);
    }

    #[test]
    fn test_respond_rref_steps_error() {
        let resp = respond_rref_steps(br#"{"A": "nope"}"#);
        assert_eq!(resp.error.as_deref(), Some("A: expected array, got string"));
        assert!(resp.steps.is_empty());
        assert_eq!(resp.rank, None);
    }

    #[test]
    fn test_empty_first_row_reported_before_jagged() {
        let kernel = ops::rref(&[vec![], vec![1.0]]).unwrap_err().to_string();
        assert_eq!(kernel, "A: matrix has zero columns");

        let resp = respond_rref(br#"{"A": [[], [1]]}"#);
        assert_eq!(resp.error.as_deref(), Some(kernel.as_str()));

        let resp = respond_binary(BinaryOp::Add, br#"{"A": [[1]], "B": [[], [1]]}"#);
        assert_eq!(resp.error.as_deref(), Some("B: matrix has zero columns"));
    }

    #[test]
    fn test_respond_rref_steps_rejects_oversized_input() {
        let rows = vec![vec![1.0; 21]; 20];
        let body = serde_json::to_vec(&json!({ "A": rows })).unwrap();
        let resp = respond_rref_steps(&body);
        assert_eq!(
            resp.error.as_deref(),
            Some("A: 20x21 matrix exceeds the 400-cell limit for recorded steps")
        );
        assert!(resp.steps.is_empty());
        assert!(respond_rref(&body).is_ok());
    }
}
