//! General matrix-matrix multiply (GEMM) collaborator
//!
//! [`Gemm`] mirrors the CBLAS `?gemm` calling convention:
//! `C = alpha * op(A) * op(B) + beta * C` on raw strided buffers. The
//! shipped implementation, [`NdarrayGemm`], hands the call to
//! `ndarray::linalg::general_mat_mul`, which dispatches `f32`/`f64` to the
//! optimized `matrixmultiply` kernels.

use ndarray::linalg::general_mat_mul;
use ndarray::{ArrayView2, ArrayViewMut2, ShapeBuilder};

use crate::error::{MatrixError, Result};
use crate::scalar::Scalar;

/// Memory order of the operand buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Consecutive elements of a row are adjacent; `ld` is the row stride
    RowMajor,
    /// Consecutive elements of a column are adjacent; `ld` is the column stride
    ColMajor,
}

/// Whether an operand is used as stored or transposed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transpose {
    NoTrans,
    Trans,
}

/// An optimized GEMM routine
pub trait Gemm {
    /// Computes `C = alpha * op(A) * op(B) + beta * C`
    ///
    /// `op(A)` is `m x k`, `op(B)` is `k x n` and `C` is `m x n`. `lda`,
    /// `ldb` and `ldc` are the leading dimensions of the stored buffers.
    #[allow(clippy::too_many_arguments)]
    fn gemm<T: Scalar>(
        &self,
        layout: Layout,
        trans_a: Transpose,
        trans_b: Transpose,
        m: usize,
        n: usize,
        k: usize,
        alpha: T,
        a: &[T],
        lda: usize,
        b: &[T],
        ldb: usize,
        beta: T,
        c: &mut [T],
        ldc: usize,
    ) -> Result<()>;
}

/// [`Gemm`] backed by `ndarray`'s `general_mat_mul`
#[derive(Debug, Clone, Copy, Default)]
pub struct NdarrayGemm;

impl NdarrayGemm {
    pub fn new() -> Self {
        NdarrayGemm
    }
}

/// Stored shape of an operand before the transpose is applied
fn stored_shape(trans: Transpose, rows: usize, cols: usize) -> (usize, usize) {
    match trans {
        Transpose::NoTrans => (rows, cols),
        Transpose::Trans => (cols, rows),
    }
}

/// Checks a leading dimension the way CBLAS does
fn check_ld(name: &str, layout: Layout, rows: usize, cols: usize, ld: usize) -> Result<()> {
    let minor = match layout {
        Layout::RowMajor => cols,
        Layout::ColMajor => rows,
    };
    if ld < minor.max(1) {
        return Err(MatrixError::Gemm(format!(
            "{} = {} is smaller than {}",
            name,
            ld,
            minor.max(1)
        )));
    }
    Ok(())
}

fn strides(layout: Layout, ld: usize) -> (usize, usize) {
    match layout {
        Layout::RowMajor => (ld, 1),
        Layout::ColMajor => (1, ld),
    }
}

fn view<'a, T>(
    name: &str,
    layout: Layout,
    (rows, cols): (usize, usize),
    ld: usize,
    data: &'a [T],
) -> Result<ArrayView2<'a, T>> {
    ArrayView2::from_shape((rows, cols).strides(strides(layout, ld)), data)
        .map_err(|err| MatrixError::Gemm(format!("{}: {}", name, err)))
}

impl Gemm for NdarrayGemm {
    fn gemm<T: Scalar>(
        &self,
        layout: Layout,
        trans_a: Transpose,
        trans_b: Transpose,
        m: usize,
        n: usize,
        k: usize,
        alpha: T,
        a: &[T],
        lda: usize,
        b: &[T],
        ldb: usize,
        beta: T,
        c: &mut [T],
        ldc: usize,
    ) -> Result<()> {
        let a_shape = stored_shape(trans_a, m, k);
        let b_shape = stored_shape(trans_b, k, n);
        check_ld("lda", layout, a_shape.0, a_shape.1, lda)?;
        check_ld("ldb", layout, b_shape.0, b_shape.1, ldb)?;
        check_ld("ldc", layout, m, n, ldc)?;

        if m == 0 || n == 0 {
            return Ok(());
        }

        let mut c_view = ArrayViewMut2::from_shape((m, n).strides(strides(layout, ldc)), c)
            .map_err(|err| MatrixError::Gemm(format!("c: {}", err)))?;

        if k == 0 {
            // Empty inner dimension: the product term vanishes
            c_view.map_inplace(|v| *v = if beta.is_zero() { T::zero() } else { *v * beta });
            return Ok(());
        }

        let a_view = view("a", layout, a_shape, lda, a)?;
        let b_view = view("b", layout, b_shape, ldb, b)?;
        let a_view = match trans_a {
            Transpose::NoTrans => a_view,
            Transpose::Trans => a_view.reversed_axes(),
        };
        let b_view = match trans_b {
            Transpose::NoTrans => b_view,
            Transpose::Trans => b_view.reversed_axes(),
        };

        general_mat_mul(alpha, &a_view, &b_view, beta, &mut c_view);
        Ok(())
    }
}
