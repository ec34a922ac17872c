//! Matrix product over any growable backend
//!
//! The product ignores sparsity: it walks the full
//! `rows_a x cols_b x cols_a` index space and reads and accumulates every
//! term through [`Storage::get_or_insert`], so the cost measured is the cost
//! of the backend's access path. Reading an operand cell that was never
//! written creates it, so after a product every row of `a` and every column
//! of `b` that the product visited is fully populated.
//!
//! [`product_values`] is the read-only variant: operands are read through
//! [`Storage::value`] and left untouched.

use tracing::warn;

use crate::error::{MatrixError, Result};
use crate::matrix::Storage;

fn check_shapes<M: Storage>(a: &M, b: &M) -> Result<()> {
    if a.cols() != b.rows() {
        return Err(MatrixError::ShapeMismatch {
            left_cols: a.cols(),
            right_rows: b.rows(),
        });
    }
    Ok(())
}

fn or_empty<M: Storage>(result: Result<M>) -> M {
    match result {
        Ok(c) => c,
        Err(err) => {
            warn!(%err, "returning an empty product");
            M::default()
        }
    }
}

/// Computes `C = A * B`, returning an empty matrix when the shapes disagree
///
/// Operands are read through the access-or-create path and grow accordingly.
/// A shape mismatch is reported through a `tracing` warning rather than an
/// error; callers detect it with [`Storage::is_empty`].
///
/// # Examples
///
/// ```
/// use matbench::{fill_banded, product, SparseMatrix, Storage};
///
/// let mut a = SparseMatrix::<f64>::new();
/// let mut b = SparseMatrix::<f64>::new();
/// fill_banded(&mut a, 2);
/// fill_banded(&mut b, 2);
///
/// let c = product(&mut a, &mut b);
/// assert_eq!(c.value(0, 0), 5.0);
/// assert_eq!(c.value(0, 1), -4.0);
/// ```
pub fn product<M: Storage>(a: &mut M, b: &mut M) -> M {
    or_empty(try_product(a, b))
}

/// Computes `C = A * B`, failing with [`MatrixError::ShapeMismatch`] when
/// `a.cols() != b.rows()`
pub fn try_product<M: Storage>(a: &mut M, b: &mut M) -> Result<M> {
    check_shapes(a, b)?;

    let (rows, cols, inners) = (a.rows(), b.cols(), a.cols());
    let mut c = M::default();
    for i in 0..rows {
        for j in 0..cols {
            for r in 0..inners {
                let term = *a.get_or_insert(i, r) * *b.get_or_insert(r, j);
                *c.get_or_insert(i, j) += term;
            }
        }
    }

    Ok(c)
}

/// Computes `C = A * B` without touching the operands
///
/// Absent operand cells read as zero. Shape mismatches behave as in
/// [`product`].
pub fn product_values<M: Storage>(a: &M, b: &M) -> M {
    or_empty(try_product_values(a, b))
}

/// Read-only counterpart of [`try_product`]
pub fn try_product_values<M: Storage>(a: &M, b: &M) -> Result<M> {
    check_shapes(a, b)?;

    let mut c = M::default();
    for i in 0..a.rows() {
        for j in 0..b.cols() {
            for r in 0..a.cols() {
                *c.get_or_insert(i, j) += a.value(i, r) * b.value(r, j);
            }
        }
    }

    Ok(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{fill_banded, DenseRowMatrix, SparseMatrix};

    fn second_difference<M: Storage<Value = f64>>() -> M {
        let mut m = M::default();
        *m.get_or_insert(0, 0) = -2.0;
        *m.get_or_insert(0, 1) = 1.0;
        *m.get_or_insert(1, 0) = 1.0;
        *m.get_or_insert(1, 1) = -2.0;
        m
    }

    fn assert_squared<M>()
    where
        M: Storage<Value = f64> + PartialEq + std::fmt::Debug,
    {
        let mut a: M = second_difference();
        let mut b: M = second_difference();
        let c = product(&mut a, &mut b);

        assert_eq!(c.rows(), 2);
        assert_eq!(c.cols(), 2);
        assert_eq!(*c.get(0, 0).unwrap(), 5.0);
        assert_eq!(*c.get(0, 1).unwrap(), -4.0);
        assert_eq!(*c.get(1, 0).unwrap(), -4.0);
        assert_eq!(*c.get(1, 1).unwrap(), 5.0);

        assert_eq!(product_values(&a, &b), c);
    }

    #[test]
    fn test_sparse_square() {
        assert_squared::<SparseMatrix<f64>>();
    }

    #[test]
    fn test_dense_square() {
        assert_squared::<DenseRowMatrix<f64>>();
    }

    #[test]
    fn test_rectangular_product() {
        // A = [1 2 3], B = [4; 5; 6]
        let mut a = SparseMatrix::<i64>::new();
        let mut b = SparseMatrix::<i64>::new();
        for k in 0..3 {
            *a.get_or_insert(0, k) = k as i64 + 1;
            *b.get_or_insert(k, 0) = k as i64 + 4;
        }

        let c = product(&mut a, &mut b);
        assert_eq!(c.rows(), 1);
        assert_eq!(c.cols(), 1);
        assert_eq!(*c.get(0, 0).unwrap(), 32);
    }

    #[test]
    fn test_operands_fill_in_during_product() {
        let mut a = SparseMatrix::<f64>::new();
        let mut b = SparseMatrix::<f64>::new();
        fill_banded(&mut a, 5);
        fill_banded(&mut b, 5);
        assert_eq!(a.nonzeros(), 13);

        let c = product(&mut a, &mut b);

        // Every cell of both operands was read through the access-or-create path
        assert_eq!(a.nonzeros(), 25);
        assert_eq!(b.nonzeros(), 25);
        assert_eq!(c.nonzeros(), 25);
        assert_eq!(*a.get(0, 4).unwrap(), 0.0);
        assert_eq!(c.value(2, 2), 6.0);
    }

    #[test]
    fn test_dense_operand_rows_reach_full_width() {
        let mut a = DenseRowMatrix::<f64>::new();
        let mut b = DenseRowMatrix::<f64>::new();
        fill_banded(&mut a, 5);
        fill_banded(&mut b, 5);
        assert_eq!(a.growth_events(), 10);

        product(&mut a, &mut b);

        for i in 0..5 {
            assert_eq!(a.row(i).len(), 5);
            assert_eq!(b.row(i).len(), 5);
        }
        // Rows 0, 1 and 2 of `a` grow one column per read past their end
        assert_eq!(a.growth_events(), 16);
    }

    #[test]
    fn test_read_only_product_leaves_operands() {
        // Only the diagonal is stored; the product still visits every cell
        let mut a = SparseMatrix::<f64>::new();
        *a.get_or_insert(0, 0) = 2.0;
        *a.get_or_insert(1, 1) = 3.0;

        let c = product_values(&a, &a);
        assert_eq!(c.nonzeros(), 4);
        assert_eq!(*c.get(0, 1).unwrap(), 0.0);
        assert_eq!(*c.get(1, 1).unwrap(), 9.0);
        assert_eq!(a.nonzeros(), 2);
    }

    #[test]
    fn test_shape_mismatch_returns_empty() {
        let mut a = DenseRowMatrix::<f32>::new();
        let mut b = DenseRowMatrix::<f32>::new();
        a.get_or_insert(1, 2);
        b.get_or_insert(1, 1);
        let (a_events, b_events) = (a.growth_events(), b.growth_events());

        let c = product(&mut a, &mut b);
        assert_eq!(c.rows(), 0);
        assert_eq!(c.cols(), 0);
        assert!(c.is_empty());
        // Nothing is read before the shapes are checked
        assert_eq!(a.growth_events(), a_events);
        assert_eq!(b.growth_events(), b_events);

        let expected = Err(MatrixError::ShapeMismatch {
            left_cols: 3,
            right_rows: 2,
        });
        assert_eq!(try_product(&mut a, &mut b), expected);
        assert_eq!(try_product_values(&a, &b), expected);
        assert!(product_values(&a, &b).is_empty());
    }

    #[test]
    fn test_empty_operands() {
        let mut a = SparseMatrix::<f64>::new();
        let mut b = SparseMatrix::<f64>::new();
        assert!(product(&mut a, &mut b).is_empty());
    }
}
