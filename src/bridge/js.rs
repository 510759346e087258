//! Browser boundary through wasm-bindgen
//!
//! Exports `matrixAdd`, `matrixSubtract`, `matrixMultiply` and `matrixRref`.
//! Each takes untyped JS values and returns a plain object
//! `{ result: number[][] | null, error: string | null }`; kernel errors are
//! reported in `error`, never thrown.

use std::borrow::Cow;

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;

use super::ForeignValue;
use crate::error::{BinaryOp, MatrixError, Operand, Result};
use crate::shape::Rows;
use crate::{ops, Matrix};

impl ForeignValue for JsValue {
    fn kind(&self) -> String {
        if self.is_null() {
            "null".to_string()
        } else if Array::is_array(self) {
            "array".to_string()
        } else {
            self.js_typeof()
                .as_string()
                .unwrap_or_else(|| "unknown".to_string())
        }
    }

    fn elements(&self) -> Option<Cow<'_, [Self]>> {
        if Array::is_array(self) {
            Some(Cow::Owned(Array::from(self).iter().collect()))
        } else {
            None
        }
    }

    fn number(&self) -> Option<f64> {
        self.as_f64()
    }
}

fn decode_operand(operand: Operand, value: &JsValue) -> Result<Rows> {
    super::decode(value).map_err(|e| MatrixError::decode(operand, e))
}

/// Encodes a matrix as a JS array of number arrays
pub fn encode(matrix: &Matrix) -> Array {
    matrix
        .iter_rows()
        .map(|row| {
            row.iter()
                .map(|&v| JsValue::from_f64(v))
                .collect::<Array>()
        })
        .collect()
}

fn response(outcome: Result<Matrix>) -> std::result::Result<JsValue, JsValue> {
    let obj = Object::new();
    let (result, error) = match outcome {
        Ok(m) => (encode(&m).into(), JsValue::NULL),
        Err(e) => (JsValue::NULL, JsValue::from_str(&e.to_string())),
    };
    Reflect::set(&obj, &JsValue::from_str("result"), &result)?;
    Reflect::set(&obj, &JsValue::from_str("error"), &error)?;
    Ok(obj.into())
}

fn binary(op: BinaryOp, a: &JsValue, b: &JsValue) -> Result<Matrix> {
    let a = decode_operand(Operand::A, a)?;
    let b = decode_operand(Operand::B, b)?;
    op.apply(&a, &b)
}

/// `A + B`
#[wasm_bindgen(js_name = matrixAdd)]
pub fn matrix_add(a: JsValue, b: JsValue) -> std::result::Result<JsValue, JsValue> {
    response(binary(BinaryOp::Add, &a, &b))
}

/// `A - B`
#[wasm_bindgen(js_name = matrixSubtract)]
pub fn matrix_subtract(a: JsValue, b: JsValue) -> std::result::Result<JsValue, JsValue> {
    response(binary(BinaryOp::Subtract, &a, &b))
}

/// `A × B`
#[wasm_bindgen(js_name = matrixMultiply)]
pub fn matrix_multiply(a: JsValue, b: JsValue) -> std::result::Result<JsValue, JsValue> {
    response(binary(BinaryOp::Multiply, &a, &b))
}

/// Row-reduced echelon form of `A`
#[wasm_bindgen(js_name = matrixRref)]
pub fn matrix_rref(a: JsValue) -> std::result::Result<JsValue, JsValue> {
    response(decode_operand(Operand::A, &a).and_then(|rows| ops::rref(&rows)))
}
