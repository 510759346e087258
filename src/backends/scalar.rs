//! Scalar backend implementation
//!
//! This is the portable baseline that works on all platforms, including
//! `wasm32`. It uses simple loops and is the reference every other backend
//! must match.

use super::{dot_cell, DenseBackend};

/// Scalar backend (portable, single-threaded)
pub struct ScalarBackend;

impl DenseBackend for ScalarBackend {
    fn add(a: &[f64], b: &[f64], out: &mut [f64]) {
        debug_assert_eq!(a.len(), b.len());
        debug_assert_eq!(a.len(), out.len());
        for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
            *o = x + y;
        }
    }

    fn sub(a: &[f64], b: &[f64], out: &mut [f64]) {
        debug_assert_eq!(a.len(), b.len());
        debug_assert_eq!(a.len(), out.len());
        for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
            *o = x - y;
        }
    }

    fn matmul(a: &[f64], b: &[f64], out: &mut [f64], m: usize, k: usize, n: usize) {
        debug_assert_eq!(a.len(), m * k);
        debug_assert_eq!(b.len(), k * n);
        debug_assert_eq!(out.len(), m * n);
        for i in 0..m {
            let a_row = &a[i * k..(i + 1) * k];
            for j in 0..n {
                out[i * n + j] = dot_cell(a_row, b, n, j);
            }
        }
    }
}
