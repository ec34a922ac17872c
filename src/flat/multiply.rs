//! Timed dense multiplication strategies on flat buffers
//!
//! Every strategy validates shapes first and then times only the
//! multiplication itself. The output matrix is owned by the caller and must
//! already be `a.nrows() x b.ncols()`.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::error::{MatrixError, Result};
use crate::flat::gemm::{Gemm, Layout, Transpose};
use crate::flat::FlatMatrix;
use crate::scalar::Scalar;
use crate::timing::{timed, Clock};

/// Dense multiplication algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Triple loop accumulating into the output buffer
    Naive,
    /// Triple loop accumulating into a local, one store per output cell
    Accumulator,
    /// Delegates to a [`Gemm`] routine
    Vendor,
}

impl Strategy {
    /// All strategies in report order
    pub const ALL: [Strategy; 3] = [Strategy::Naive, Strategy::Accumulator, Strategy::Vendor];

    /// Label used in report lines
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Naive => "naive",
            Strategy::Accumulator => "accumulator",
            Strategy::Vendor => "gemm",
        }
    }

    /// Runs this strategy, returning the time spent multiplying
    pub fn run<T, G, C>(
        &self,
        gemm: &G,
        a: &FlatMatrix<T>,
        b: &FlatMatrix<T>,
        c: &mut FlatMatrix<T>,
        clock: &C,
    ) -> Result<Duration>
    where
        T: Scalar,
        G: Gemm + ?Sized,
        C: Clock + ?Sized,
    {
        match self {
            Strategy::Naive => multiply_naive(a, b, c, clock),
            Strategy::Accumulator => multiply_accumulate(a, b, c, clock),
            Strategy::Vendor => multiply_vendor(gemm, a, b, c, clock),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn check_shapes<T>(a: &FlatMatrix<T>, b: &FlatMatrix<T>, c: &FlatMatrix<T>) -> Result<()> {
    if a.ncols() != b.nrows() {
        return Err(MatrixError::ShapeMismatch {
            left_cols: a.ncols(),
            right_rows: b.nrows(),
        });
    }
    if c.shape() != (a.nrows(), b.ncols()) {
        return Err(MatrixError::OutputShape {
            expected_rows: a.nrows(),
            expected_cols: b.ncols(),
            actual_rows: c.nrows(),
            actual_cols: c.ncols(),
        });
    }
    Ok(())
}

/// `C += A * B` with a read-modify-write of `C` on every inner step
///
/// Pass a zeroed `C` to get the plain product.
pub fn multiply_naive<T, C>(
    a: &FlatMatrix<T>,
    b: &FlatMatrix<T>,
    c: &mut FlatMatrix<T>,
    clock: &C,
) -> Result<Duration>
where
    T: Scalar,
    C: Clock + ?Sized,
{
    check_shapes(a, b, c)?;
    debug!(precision = %T::PRECISION, rows = a.nrows(), "naive multiplication");

    let (rows, cols, inners) = (a.nrows(), b.ncols(), a.ncols());
    let (a, b) = (a.as_slice(), b.as_slice());
    let out = c.as_mut_slice();

    let ((), elapsed) = timed(clock, || {
        for row in 0..rows {
            for col in 0..cols {
                for inner in 0..inners {
                    out[row * cols + col] += a[row * inners + inner] * b[inner * cols + col];
                }
            }
        }
    });

    Ok(elapsed)
}

/// `C = A * B` accumulating each output cell in a local before storing it
pub fn multiply_accumulate<T, C>(
    a: &FlatMatrix<T>,
    b: &FlatMatrix<T>,
    c: &mut FlatMatrix<T>,
    clock: &C,
) -> Result<Duration>
where
    T: Scalar,
    C: Clock + ?Sized,
{
    check_shapes(a, b, c)?;
    debug!(precision = %T::PRECISION, rows = a.nrows(), "accumulator multiplication");

    let (rows, cols, inners) = (a.nrows(), b.ncols(), a.ncols());
    let (a, b) = (a.as_slice(), b.as_slice());
    let out = c.as_mut_slice();

    let ((), elapsed) = timed(clock, || {
        for row in 0..rows {
            for col in 0..cols {
                let mut acc = T::zero();
                for inner in 0..inners {
                    acc += a[row * inners + inner] * b[inner * cols + col];
                }
                out[row * cols + col] = acc;
            }
        }
    });

    Ok(elapsed)
}

/// `C = A * B` through a [`Gemm`] routine
///
/// Row-major, no transposition, `alpha = 1`, `beta = 0`: the previous
/// content of `C` is overwritten.
pub fn multiply_vendor<T, G, C>(
    gemm: &G,
    a: &FlatMatrix<T>,
    b: &FlatMatrix<T>,
    c: &mut FlatMatrix<T>,
    clock: &C,
) -> Result<Duration>
where
    T: Scalar,
    G: Gemm + ?Sized,
    C: Clock + ?Sized,
{
    check_shapes(a, b, c)?;
    debug!(precision = %T::PRECISION, rows = a.nrows(), "gemm multiplication");

    let (m, n, k) = (a.nrows(), b.ncols(), a.ncols());
    // Leading dimensions of empty row-major operands are clamped to 1
    let (lda, ldb, ldc) = (k.max(1), n.max(1), n.max(1));

    let (result, elapsed) = timed(clock, || {
        gemm.gemm(
            Layout::RowMajor,
            Transpose::NoTrans,
            Transpose::NoTrans,
            m,
            n,
            k,
            T::one(),
            a.as_slice(),
            lda,
            b.as_slice(),
            ldb,
            T::zero(),
            c.as_mut_slice(),
            ldc,
        )
    });
    result?;

    Ok(elapsed)
}
