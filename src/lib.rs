//! matcalc: a small dense-matrix kernel
//!
//! **matcalc** implements elementwise addition and subtraction, matrix
//! multiplication and reduction to row-reduced echelon form (Gauss-Jordan
//! elimination with partial pivoting) over `f64` matrices, plus the adapters
//! that bridge those operations to JSON, browser and HTTP callers.
//!
//! # Design Principles
//!
//! - **Validate once**: wire rows become a [`Matrix`] only after the shape
//!   validator accepts them; a `Matrix` is always non-empty and rectangular
//! - **Pure and stateless**: every operation works on a private copy and
//!   returns a fresh result, so calls may run in parallel without locking
//! - **Errors are data**: failures come back as [`MatrixError`] values whose
//!   messages read `<context>: <detail>`
//! - **Same answer everywhere**: every backend produces bit-identical results
//!
//! # Quick Start
//!
//! ```rust
//! use matcalc::ops;
//!
//! let sum = ops::add(&[vec![1.0, 2.0], vec![3.0, 4.0]], &[vec![5.0, 6.0], vec![7.0, 8.0]]).unwrap();
//! assert_eq!(sum.to_rows(), vec![vec![6.0, 8.0], vec![10.0, 12.0]]);
//!
//! let reduced = ops::rref(&[vec![2.0, 4.0], vec![1.0, 3.0]]).unwrap();
//! assert_eq!(reduced.to_rows(), vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
//!
//! let err = ops::add(&[vec![1.0, 2.0]], &[vec![1.0, 2.0, 3.0]]).unwrap_err();
//! assert_eq!(err.to_string(), "add: requires same dimensions, got 1x2 and 1x3");
//! ```
//!
//! # Features
//!
//! - `parallel`: rayon backend for large workloads
//! - `tracing`: spans on kernel operations
//! - `nalgebra`: conversions to and from `nalgebra::DMatrix<f64>`
//! - `wasm`: wasm-bindgen exports for browser callers
//! - `server`: axum HTTP routes and the `matcalc-server` binary

pub mod backends;
pub mod bridge;
pub mod error;
pub mod matrix;
pub mod ops;
pub mod rref;
pub mod shape;

#[cfg(feature = "server")]
pub mod server;

pub use error::{BinaryOp, DecodeError, MatrixError, Operand, Result, ShapeError};
pub use matrix::Matrix;
pub use rref::{
    RowOp, RrefStep, RrefTrace, Tolerance, CLEANUP_TOLERANCE, MAX_TRACE_CELLS, PIVOT_TOLERANCE,
};
pub use shape::{Dimensions, Rows};

/// Backend execution target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Single-threaded loops
    Scalar,
    /// Rayon thread pool
    Parallel,
}

impl Backend {
    /// Best backend for an operation of the given complexity and size
    ///
    /// `work` is the number of multiply-adds (or cell updates) the operation
    /// performs. Falls back to `Scalar` when the `parallel` feature is off.
    pub fn select_for(complexity: OpComplexity, work: usize) -> Self {
        if cfg!(feature = "parallel") && work >= complexity.parallel_threshold() {
            Backend::Parallel
        } else {
            Backend::Scalar
        }
    }

    /// Backends compiled into this build
    pub fn available() -> &'static [Backend] {
        #[cfg(feature = "parallel")]
        {
            &[Backend::Scalar, Backend::Parallel]
        }
        #[cfg(not(feature = "parallel"))]
        {
            &[Backend::Scalar]
        }
    }
}

/// Operation complexity for parallel dispatch eligibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OpComplexity {
    /// Elementwise operations (add, sub) - memory bound, parallel only when huge
    Low = 0,
    /// Matrix products - compute bound, parallel pays off early
    High = 1,
}

impl OpComplexity {
    /// Minimum workload before rayon overhead is worth paying
    pub fn parallel_threshold(self) -> usize {
        match self {
            OpComplexity::Low => 1 << 20,
            OpComplexity::High => 1 << 16,
        }
    }
}
