//! Sparse backend: one ordered map of columns per row

use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::error::{MatrixError, Result};
use crate::matrix::{write_row, Element, Storage, StorageKind};

/// A matrix stored as an ordered map per row
///
/// Only cells that have been touched through [`Storage::get_or_insert`]
/// occupy memory, and `nonzeros` counts exactly those cells.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix<T> {
    data: Vec<BTreeMap<usize, T>>,
    n_cols: usize,
    n_nonzeros: usize,
}

impl<T> SparseMatrix<T> {
    /// Creates an empty matrix
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            n_cols: 0,
            n_nonzeros: 0,
        }
    }

    /// Iterates over the stored `(column, value)` pairs of row `i` in column order
    ///
    /// Rows beyond the current extent yield nothing.
    pub fn row_iter(&self, i: usize) -> impl Iterator<Item = (usize, &T)> {
        self.data
            .get(i)
            .into_iter()
            .flat_map(|row| row.iter().map(|(&j, v)| (j, v)))
    }

    /// Iterates over every stored `(row, column, value)` triplet in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.data
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.iter().map(move |(&j, v)| (i, j, v)))
    }
}

impl<T> Default for SparseMatrix<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> Storage for SparseMatrix<T> {
    type Value = T;

    const KIND: StorageKind = StorageKind::SparseMap;

    fn rows(&self) -> usize {
        self.data.len()
    }

    fn cols(&self) -> usize {
        self.n_cols
    }

    fn nonzeros(&self) -> usize {
        self.n_nonzeros
    }

    fn get_or_insert(&mut self, i: usize, j: usize) -> &mut T {
        if self.data.len() <= i {
            self.data.resize_with(i + 1, BTreeMap::new);
        }

        let n_cols = &mut self.n_cols;
        let n_nonzeros = &mut self.n_nonzeros;
        self.data[i].entry(j).or_insert_with(|| {
            *n_cols = (*n_cols).max(j + 1);
            *n_nonzeros += 1;
            T::zero()
        })
    }

    fn get(&self, i: usize, j: usize) -> Result<&T> {
        self.data
            .get(i)
            .and_then(|row| row.get(&j))
            .ok_or(MatrixError::OutOfRange {
                row: i,
                col: j,
                rows: self.rows(),
                cols: self.n_cols,
            })
    }

    fn value(&self, i: usize, j: usize) -> T {
        self.data
            .get(i)
            .and_then(|row| row.get(&j))
            .copied()
            .unwrap_or_else(T::zero)
    }

    fn write_rows<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        for row in &self.data {
            write_row(out, row.values())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_matrix_is_empty() {
        let m = SparseMatrix::<f64>::new();
        assert_eq!(m.rows(), 0);
        assert_eq!(m.cols(), 0);
        assert_eq!(m.nonzeros(), 0);
        assert!(m.is_empty());
    }

    #[test]
    fn test_access_grows_extents() {
        let mut m = SparseMatrix::<f64>::new();
        *m.get_or_insert(2, 4) = 3.0;

        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 5);
        assert_eq!(m.nonzeros(), 1);
        assert_eq!(*m.get(2, 4).unwrap(), 3.0);

        // Intermediate rows exist but hold nothing
        assert_eq!(m.row_iter(0).count(), 0);
        assert_eq!(m.row_iter(1).count(), 0);
    }

    #[test]
    fn test_repeated_access_does_not_recount() {
        let mut m = SparseMatrix::<f64>::new();
        *m.get_or_insert(1, 1) = 7.0;
        let first = *m.get_or_insert(1, 1);
        let second = *m.get_or_insert(1, 1);

        assert_eq!(first, 7.0);
        assert_eq!(second, 7.0);
        assert_eq!(m.nonzeros(), 1);
    }

    #[test]
    fn test_cols_only_grow() {
        let mut m = SparseMatrix::<i32>::new();
        m.get_or_insert(0, 5);
        m.get_or_insert(1, 2);

        assert_eq!(m.cols(), 6);
        assert_eq!(m.nonzeros(), 2);
    }

    #[test]
    fn test_get_missing_cell_fails() {
        let mut m = SparseMatrix::<f64>::new();
        m.get_or_insert(0, 0);

        assert_eq!(
            m.get(0, 1),
            Err(MatrixError::OutOfRange {
                row: 0,
                col: 1,
                rows: 1,
                cols: 1
            })
        );
        assert!(m.get(3, 0).is_err());
        assert_eq!(m.value(0, 1), 0.0);
    }

    #[test]
    fn test_row_iter_is_ordered() {
        let mut m = SparseMatrix::<i32>::new();
        *m.get_or_insert(0, 3) = 3;
        *m.get_or_insert(0, 0) = 1;
        *m.get_or_insert(0, 1) = 2;

        let row: Vec<_> = m.row_iter(0).collect();
        assert_eq!(row, vec![(0, &1), (1, &2), (3, &3)]);
    }

    #[test]
    fn test_write_rows_skips_absent_cells() {
        let mut m = SparseMatrix::<f64>::new();
        *m.get_or_insert(0, 0) = 1.0;
        *m.get_or_insert(0, 2) = 2.0;
        *m.get_or_insert(2, 1) = 0.5;

        let mut out = Vec::new();
        m.write_rows(&mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "1.00 2.00\n\n0.50\n");
    }
}
