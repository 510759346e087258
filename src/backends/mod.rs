//! Compute backends for dense row-major buffers
//!
//! A [`Matrix`](crate::Matrix) stores its cells in one contiguous buffer with
//! a row stride equal to its column count. Backends operate on those buffers
//! directly and never see shape validation: callers guarantee the lengths.
//!
//! # Backends
//!
//! - `scalar`: portable baseline, plain loops
//! - `parallel`: rayon, splits the output by rows (feature `parallel`)
//!
//! Every backend sums dot products in ascending `k`, so all of them produce
//! bit-identical results for the same inputs.

pub mod scalar;

#[cfg(feature = "parallel")]
pub mod parallel;

/// Operations a dense backend must provide
///
/// All slices are row-major. Implementations may assume:
/// - `a`, `b` and `out` have equal length for `add` / `sub`
/// - `a.len() == m * k`, `b.len() == k * n`, `out.len() == m * n` for `matmul`
pub trait DenseBackend {
    /// Elementwise addition: out[i] = a[i] + b[i]
    fn add(a: &[f64], b: &[f64], out: &mut [f64]);

    /// Elementwise subtraction: out[i] = a[i] - b[i]
    fn sub(a: &[f64], b: &[f64], out: &mut [f64]);

    /// Matrix product of an `m×k` and a `k×n` buffer into an `m×n` buffer
    fn matmul(a: &[f64], b: &[f64], out: &mut [f64], m: usize, k: usize, n: usize);
}

/// One output cell of a matrix product: Σ_k a[i][k] · b[k][j]
#[inline]
pub(crate) fn dot_cell(a_row: &[f64], b: &[f64], n: usize, j: usize) -> f64 {
    a_row
        .iter()
        .enumerate()
        .fold(0.0, |acc, (kk, &a_ik)| acc + a_ik * b[kk * n + j])
}

impl crate::Backend {
    pub(crate) fn add(self, a: &[f64], b: &[f64], out: &mut [f64]) {
        match self {
            crate::Backend::Scalar => scalar::ScalarBackend::add(a, b, out),
            crate::Backend::Parallel => {
                #[cfg(feature = "parallel")]
                parallel::ParallelBackend::add(a, b, out);
                #[cfg(not(feature = "parallel"))]
                scalar::ScalarBackend::add(a, b, out);
            }
        }
    }

    pub(crate) fn sub(self, a: &[f64], b: &[f64], out: &mut [f64]) {
        match self {
            crate::Backend::Scalar => scalar::ScalarBackend::sub(a, b, out),
            crate::Backend::Parallel => {
                #[cfg(feature = "parallel")]
                parallel::ParallelBackend::sub(a, b, out);
                #[cfg(not(feature = "parallel"))]
                scalar::ScalarBackend::sub(a, b, out);
            }
        }
    }

    pub(crate) fn matmul(
        self,
        a: &[f64],
        b: &[f64],
        out: &mut [f64],
        m: usize,
        k: usize,
        n: usize,
    ) {
        match self {
            crate::Backend::Scalar => scalar::ScalarBackend::matmul(a, b, out, m, k, n),
            crate::Backend::Parallel => {
                #[cfg(feature = "parallel")]
                parallel::ParallelBackend::matmul(a, b, out, m, k, n);
                #[cfg(not(feature = "parallel"))]
                scalar::ScalarBackend::matmul(a, b, out, m, k, n);
            }
        }
    }
}
