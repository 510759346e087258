//! Rayon backend
//!
//! Splits the output buffer into disjoint chunks and fills them on the rayon
//! pool. Each output cell is computed exactly as in the scalar backend, so
//! results do not depend on thread count or scheduling.

use rayon::prelude::*;

use super::{dot_cell, DenseBackend};

/// Elementwise chunk size
const ELEMENTWISE_CHUNK: usize = 4096;

/// Multi-threaded backend (feature `parallel`)
pub struct ParallelBackend;

impl DenseBackend for ParallelBackend {
    fn add(a: &[f64], b: &[f64], out: &mut [f64]) {
        debug_assert_eq!(a.len(), b.len());
        debug_assert_eq!(a.len(), out.len());
        out.par_chunks_mut(ELEMENTWISE_CHUNK)
            .zip(a.par_chunks(ELEMENTWISE_CHUNK))
            .zip(b.par_chunks(ELEMENTWISE_CHUNK))
            .for_each(|((o, x), y)| {
                for ((o, &x), &y) in o.iter_mut().zip(x).zip(y) {
                    *o = x + y;
                }
            });
    }

    fn sub(a: &[f64], b: &[f64], out: &mut [f64]) {
        debug_assert_eq!(a.len(), b.len());
        debug_assert_eq!(a.len(), out.len());
        out.par_chunks_mut(ELEMENTWISE_CHUNK)
            .zip(a.par_chunks(ELEMENTWISE_CHUNK))
            .zip(b.par_chunks(ELEMENTWISE_CHUNK))
            .for_each(|((o, x), y)| {
                for ((o, &x), &y) in o.iter_mut().zip(x).zip(y) {
                    *o = x - y;
                }
            });
    }

    fn matmul(a: &[f64], b: &[f64], out: &mut [f64], m: usize, k: usize, n: usize) {
        debug_assert_eq!(a.len(), m * k);
        debug_assert_eq!(b.len(), k * n);
        debug_assert_eq!(out.len(), m * n);
        // Rows of the output are independent: row i only reads row i of A.
        out.par_chunks_mut(n)
            .zip(a.par_chunks(k))
            .for_each(|(out_row, a_row)| {
                for (j, cell) in out_row.iter_mut().enumerate() {
                    *cell = dot_cell(a_row, b, n, j);
                }
            });
    }
}
