//! # matbench: growable matrix storage and dense multiplication benchmarks
//!
//! This crate measures what matrix storage layout and multiplication
//! algorithm cost, by timing the same products on different substrates.
//!
//! ## Overview
//!
//! - **Growable backends** ([`SparseMatrix`], [`DenseRowMatrix`]) implement the
//!   [`Storage`] trait. A matrix has no declared size: writing a cell through
//!   [`Storage::get_or_insert`] creates it and extends the extents.
//! - **Generic product** ([`product`]) multiplies two matrices of the same
//!   backend through the access-or-create path, ignoring sparsity.
//! - **Flat buffers** ([`FlatMatrix`]) hold a fixed-size row-major matrix and
//!   are multiplied by three timed strategies: naive, naive with a register
//!   accumulator, and an optimized GEMM routine.
//! - **Driver** ([`Benchmark`]) fills banded and random operands, runs every
//!   backend/strategy/precision combination and reports the timings.
//!
//! ## Usage
//!
//! ```
//! use matbench::{fill_banded, product, SparseMatrix, Storage};
//!
//! let mut a = SparseMatrix::<f64>::new();
//! let mut b = SparseMatrix::<f64>::new();
//! fill_banded(&mut a, 3);
//! fill_banded(&mut b, 3);
//!
//! let c = product(&mut a, &mut b);
//! assert_eq!(c.value(0, 0), 5.0);
//! assert_eq!(c.value(0, 2), 1.0);
//! ```
//!
//! Timing a flat-buffer strategy:
//!
//! ```
//! use matbench::{FlatMatrix, MonotonicClock, NdarrayGemm, Strategy};
//!
//! let a = FlatMatrix::from_fn(4, 4, |i, j| (i + j) as f32);
//! let mut c = FlatMatrix::zeros(4, 4);
//! let elapsed = Strategy::Vendor
//!     .run(&NdarrayGemm, &a, &a, &mut c, &MonotonicClock::new())
//!     .unwrap();
//! # let _ = elapsed;
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod flat;
pub mod matrix;
pub mod scalar;
pub mod timing;
pub mod utils;

// Re-export primary components
pub use config::BenchConfig;
pub use driver::{rng_for, BenchError, BenchReport, Benchmark};
pub use error::{MatrixError, Result};
pub use flat::{
    multiply_accumulate, multiply_naive, multiply_vendor, FlatMatrix, Gemm, Layout, NdarrayGemm,
    Strategy, Transpose,
};
pub use matrix::{
    fill_banded, fill_banded_far_column, fill_random, product, product_values, try_product,
    try_product_values, DenseRowMatrix, Element, Fill, SparseMatrix, Storage, StorageKind,
};
pub use scalar::{Precision, Scalar};
pub use timing::{timed, Clock, FakeClock, MonotonicClock, Operation, TimingSample};
pub use utils::{from_ndarray, from_sprs, to_ndarray, to_sprs};

/// Version information for the matbench library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
