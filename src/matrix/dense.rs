//! Dense-row backend: one resizable vector of values per row

use std::io::{self, Write};

use crate::error::{MatrixError, Result};
use crate::matrix::{write_row, Element, Storage, StorageKind};

/// A matrix stored as a vector of zero-filled rows
///
/// Rows grow independently, so rows may have different lengths; `cols` is
/// the longest row seen. The non-zero counter of this backend counts how many
/// times a row had to be extended, not how many cells hold a value.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseRowMatrix<T> {
    data: Vec<Vec<T>>,
    n_cols: usize,
    growth_events: usize,
}

impl<T> DenseRowMatrix<T> {
    /// Creates an empty matrix
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            n_cols: 0,
            growth_events: 0,
        }
    }

    /// Number of times a row was resized to reach a new column
    ///
    /// This is what [`Storage::nonzeros`] reports for this backend.
    pub fn growth_events(&self) -> usize {
        self.growth_events
    }

    /// The values of row `i`, or an empty slice beyond the row extent
    pub fn row(&self, i: usize) -> &[T] {
        self.data.get(i).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl<T> Default for DenseRowMatrix<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> Storage for DenseRowMatrix<T> {
    type Value = T;

    const KIND: StorageKind = StorageKind::DenseRows;

    fn rows(&self) -> usize {
        self.data.len()
    }

    fn cols(&self) -> usize {
        self.n_cols
    }

    fn nonzeros(&self) -> usize {
        self.growth_events
    }

    fn get_or_insert(&mut self, i: usize, j: usize) -> &mut T {
        if self.data.len() <= i {
            self.data.resize_with(i + 1, Vec::new);
        }

        let row = &mut self.data[i];
        if row.len() <= j {
            row.resize(j + 1, T::zero());
            self.n_cols = self.n_cols.max(j + 1);
            self.growth_events += 1;
        }
        &mut row[j]
    }

    fn get(&self, i: usize, j: usize) -> Result<&T> {
        self.data
            .get(i)
            .and_then(|row| row.get(j))
            .ok_or(MatrixError::OutOfRange {
                row: i,
                col: j,
                rows: self.rows(),
                cols: self.n_cols,
            })
    }

    fn value(&self, i: usize, j: usize) -> T {
        self.row(i).get(j).copied().unwrap_or_else(T::zero)
    }

    fn write_rows<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        for row in &self.data {
            write_row(out, row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_zero_fills_row() {
        let mut m = DenseRowMatrix::<f64>::new();
        *m.get_or_insert(1, 3) = 4.0;

        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 4);
        assert_eq!(m.row(0), &[] as &[f64]);
        assert_eq!(m.row(1), &[0.0, 0.0, 0.0, 4.0]);
    }

    #[test]
    fn test_counter_tracks_growth_events() {
        let mut m = DenseRowMatrix::<f64>::new();
        *m.get_or_insert(0, 4) = 1.0; // one growth covers five cells
        *m.get_or_insert(0, 2) = 1.0; // inside the row, no growth
        *m.get_or_insert(0, 5) = 1.0; // grows again

        assert_eq!(m.growth_events(), 2);
        assert_eq!(m.nonzeros(), 2);
        assert_eq!(m.cols(), 6);
    }

    #[test]
    fn test_cols_keep_longest_row() {
        let mut m = DenseRowMatrix::<i32>::new();
        m.get_or_insert(0, 5);
        m.get_or_insert(1, 1);

        assert_eq!(m.cols(), 6);
        assert_eq!(m.row(1).len(), 2);
    }

    #[test]
    fn test_get_beyond_row_fails() {
        let mut m = DenseRowMatrix::<f64>::new();
        m.get_or_insert(0, 5);
        m.get_or_insert(1, 1);

        assert_eq!(*m.get(1, 0).unwrap(), 0.0);
        assert!(m.get(1, 2).is_err());
        assert!(m.get(2, 0).is_err());
        assert_eq!(m.value(1, 4), 0.0);
    }

    #[test]
    fn test_write_rows_prints_every_cell() {
        let mut m = DenseRowMatrix::<f32>::new();
        *m.get_or_insert(0, 1) = 1.0;
        *m.get_or_insert(1, 0) = -2.0;

        let mut out = Vec::new();
        m.print(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "nrows: 2 | ncols: 2 | nnz: 2\n0.00 1.00\n-2.00\n"
        );
    }
}
