//! Flat row-major matrices for the dense multiplication shoot-out
//!
//! Unlike the growable backends, a [`FlatMatrix`] has fixed dimensions and one
//! contiguous, cache-line aligned buffer. The multiplication strategies in
//! [`multiply`] write into a caller-owned output of the right size.

pub mod gemm;
pub mod multiply;

use std::io::{self, Write};
use std::ops::{Index, IndexMut};

use aligned_vec::AVec;
use ndarray::{ArrayView2, ArrayViewMut2};

use crate::error::{MatrixError, Result};
use crate::matrix::{write_row, Storage};
use crate::scalar::Scalar;

pub use gemm::{Gemm, Layout, NdarrayGemm, Transpose};
pub use multiply::{multiply_accumulate, multiply_naive, multiply_vendor, Strategy};

/// Alignment of flat buffers in bytes
pub const BUFFER_ALIGN: usize = 64;

/// A dense matrix in one contiguous row-major buffer
#[derive(Debug, Clone)]
pub struct FlatMatrix<T> {
    n_rows: usize,
    n_cols: usize,
    data: AVec<T>,
}

impl<T: Scalar> FlatMatrix<T> {
    /// Creates a zero-filled `rows x cols` matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            n_rows: rows,
            n_cols: cols,
            data: AVec::from_iter(BUFFER_ALIGN, (0..rows * cols).map(|_| T::zero())),
        }
    }

    /// Creates a matrix from row-major values
    pub fn from_row_major(rows: usize, cols: usize, values: &[T]) -> Result<Self> {
        if values.len() != rows * cols {
            return Err(MatrixError::BufferLength {
                expected: rows * cols,
                actual: values.len(),
            });
        }

        Ok(Self {
            n_rows: rows,
            n_cols: cols,
            data: AVec::from_iter(BUFFER_ALIGN, values.iter().copied()),
        })
    }

    /// Creates a matrix whose cell `(i, j)` is `f(i, j)`
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let cells = (0..rows).flat_map(|i| (0..cols).map(move |j| (i, j)));
        Self {
            n_rows: rows,
            n_cols: cols,
            data: AVec::from_iter(BUFFER_ALIGN, cells.map(|(i, j)| f(i, j))),
        }
    }

    /// Copies a growable matrix into a flat buffer of its current extents
    ///
    /// Cells the source never stored become zero.
    pub fn from_storage<M>(source: &M) -> Self
    where
        M: Storage<Value = T>,
    {
        Self::from_fn(source.rows(), source.cols(), |i, j| source.value(i, j))
    }

    /// Largest absolute element-wise difference, `None` when shapes differ
    pub fn max_abs_diff(&self, other: &Self) -> Option<T> {
        if self.shape() != other.shape() {
            return None;
        }

        Some(
            self.data
                .iter()
                .zip(other.data.iter())
                .fold(T::zero(), |acc, (&x, &y)| acc.max((x - y).abs())),
        )
    }

    /// True when every element agrees within the precision's tolerance,
    /// scaled by the magnitude of the compared values
    pub fn approx_eq(&self, other: &Self) -> bool {
        if self.shape() != other.shape() {
            return false;
        }

        self.data.iter().zip(other.data.iter()).all(|(&x, &y)| {
            let scale = T::one().max(x.abs()).max(y.abs());
            (x - y).abs() <= T::TOLERANCE * scale
        })
    }

    /// Sets every element to zero
    pub fn clear(&mut self) {
        self.data.iter_mut().for_each(|v| *v = T::zero());
    }
}

impl<T> FlatMatrix<T> {
    /// Number of rows
    pub fn nrows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns
    pub fn ncols(&self) -> usize {
        self.n_cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Row-major values
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable row-major values
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Pointer to the first element, for foreign GEMM routines
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    /// Mutable pointer to the first element, for foreign GEMM routines
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_mut_ptr()
    }

    /// Borrows the buffer as an `ndarray` view
    pub fn view(&self) -> ArrayView2<'_, T> {
        // The buffer always holds exactly `rows * cols` values
        ArrayView2::from_shape((self.n_rows, self.n_cols), &self.data)
            .unwrap_or_else(|_| unreachable!("flat buffer length matches its shape"))
    }

    /// Borrows the buffer as a mutable `ndarray` view
    pub fn view_mut(&mut self) -> ArrayViewMut2<'_, T> {
        ArrayViewMut2::from_shape((self.n_rows, self.n_cols), &mut self.data)
            .unwrap_or_else(|_| unreachable!("flat buffer length matches its shape"))
    }

    /// Writes the header line followed by one line per row
    pub fn print<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()>
    where
        T: std::fmt::Display,
    {
        writeln!(
            out,
            "nrows: {} | ncols: {} | nnz: {}",
            self.n_rows,
            self.n_cols,
            self.data.len()
        )?;
        if self.n_cols == 0 {
            return Ok(());
        }
        for row in self.data.chunks(self.n_cols) {
            write_row(out, row)?;
        }
        Ok(())
    }
}

impl<T: PartialEq> PartialEq for FlatMatrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.as_slice() == other.as_slice()
    }
}

impl<T> Index<(usize, usize)> for FlatMatrix<T> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        assert!(
            i < self.n_rows && j < self.n_cols,
            "index ({}, {}) out of bounds for {} x {} matrix",
            i,
            j,
            self.n_rows,
            self.n_cols
        );
        &self.data[i * self.n_cols + j]
    }
}

impl<T> IndexMut<(usize, usize)> for FlatMatrix<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        assert!(
            i < self.n_rows && j < self.n_cols,
            "index ({}, {}) out of bounds for {} x {} matrix",
            i,
            j,
            self.n_rows,
            self.n_cols
        );
        &mut self.data[i * self.n_cols + j]
    }
}
