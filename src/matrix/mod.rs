//! Growable matrix storage and the operations built on top of it
//!
//! Both backends implement [`Storage`]: the extent of a matrix is never
//! declared up front, it grows as cells are touched through
//! [`Storage::get_or_insert`]. Read-only access goes through
//! [`Storage::get`], which fails on cells that were never written, or
//! [`Storage::value`], which reads absent cells as zero.

pub mod dense;
pub mod fill;
pub mod product;
pub mod sparse;

use std::fmt::{self, Debug, Display};
use std::io::{self, Write};
use std::ops::AddAssign;

use num_traits::{Num, Zero};

use crate::error::Result;

pub use dense::DenseRowMatrix;
pub use fill::{fill_banded, fill_banded_far_column, fill_random, Fill};
pub use product::{product, product_values, try_product, try_product_values};
pub use sparse::SparseMatrix;

/// Numeric element stored in a growable matrix
pub trait Element: Copy + Num + AddAssign + Display + Debug {}

impl<T> Element for T where T: Copy + Num + AddAssign + Display + Debug {}

/// Which backend a matrix uses, as shown in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// Ordered map of columns per row
    SparseMap,
    /// Resizable vector of values per row
    DenseRows,
}

impl StorageKind {
    /// Label used in report lines
    pub fn label(&self) -> &'static str {
        match self {
            StorageKind::SparseMap => "Vector/Map",
            StorageKind::DenseRows => "Vector/Vector",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shared contract of the growable matrix backends
pub trait Storage: Default {
    /// Element type
    type Value: Element;

    /// Backend identity
    const KIND: StorageKind;

    /// Number of rows touched so far
    fn rows(&self) -> usize;

    /// Column extent: one past the largest column touched so far
    fn cols(&self) -> usize;

    /// Non-zero counter as reported by the backend
    ///
    /// The sparse backend counts distinct cells; the dense-row backend counts
    /// row growth events. See [`DenseRowMatrix::growth_events`].
    fn nonzeros(&self) -> usize;

    /// Mutable access that never fails
    ///
    /// Creates the cell (zero) and extends the extents when `(i, j)` has not
    /// been touched before.
    fn get_or_insert(&mut self, i: usize, j: usize) -> &mut Self::Value;

    /// Read-only access to a cell that has been written
    fn get(&self, i: usize, j: usize) -> Result<&Self::Value>;

    /// Reads a cell without growing the matrix; absent cells read as zero
    fn value(&self, i: usize, j: usize) -> Self::Value {
        self.get(i, j)
            .copied()
            .unwrap_or_else(|_| Self::Value::zero())
    }

    /// True when nothing has ever been touched
    fn is_empty(&self) -> bool {
        self.rows() == 0 && self.cols() == 0
    }

    /// Writes the stored rows, one line per row, values formatted to two decimals
    fn write_rows<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()>;

    /// Writes the header line followed by the rows
    fn print<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "nrows: {} | ncols: {} | nnz: {}",
            self.rows(),
            self.cols(),
            self.nonzeros()
        )?;
        self.write_rows(out)
    }
}

/// Writes one row of values separated by single spaces
pub(crate) fn write_row<'a, T, W, I>(out: &mut W, values: I) -> io::Result<()>
where
    T: Display + 'a,
    W: Write + ?Sized,
    I: IntoIterator<Item = &'a T>,
{
    let mut first = true;
    for value in values {
        if !first {
            out.write_all(b" ")?;
        }
        write!(out, "{:.2}", value)?;
        first = false;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(StorageKind::SparseMap.to_string(), "Vector/Map");
        assert_eq!(StorageKind::DenseRows.to_string(), "Vector/Vector");
    }

    #[test]
    fn test_print_header() {
        let mut m = SparseMatrix::<f64>::new();
        *m.get_or_insert(0, 1) = 1.5;
        *m.get_or_insert(1, 0) = -2.0;

        let mut out = Vec::new();
        m.print(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text, "nrows: 2 | ncols: 2 | nnz: 2\n1.50\n-2.00\n");
    }

    #[test]
    fn test_value_reads_zero_without_growing() {
        let m = DenseRowMatrix::<f32>::new();
        assert_eq!(m.value(4, 4), 0.0);
        assert!(m.is_empty());
    }
}
