//! Conversions between the growable backends and external matrix libraries

use ndarray::{Array2, ArrayView2};
use sprs::{CsMat, TriMat};

use crate::matrix::{Element, SparseMatrix, Storage};

/// Converts the sparse backend to an sprs CSR matrix
///
/// Every stored cell becomes an explicit entry, including stored zeros.
pub fn to_sprs<T>(matrix: &SparseMatrix<T>) -> CsMat<T>
where
    T: Element,
{
    let mut triplets = TriMat::new((matrix.rows(), matrix.cols()));
    for (i, j, &v) in matrix.iter() {
        triplets.add_triplet(i, j, v);
    }
    triplets.to_csr()
}

/// Converts an sprs matrix to the sparse backend
///
/// The result only grows as far as the stored entries reach, so trailing
/// empty rows or columns of `matrix` are not represented.
pub fn from_sprs<T>(matrix: &CsMat<T>) -> SparseMatrix<T>
where
    T: Element,
{
    let mut out = SparseMatrix::new();
    for (&v, (i, j)) in matrix.iter() {
        *out.get_or_insert(i, j) = v;
    }
    out
}

/// Copies any backend into a dense `ndarray` matrix of its current extents
///
/// Absent cells become zero.
pub fn to_ndarray<M: Storage>(matrix: &M) -> Array2<M::Value> {
    Array2::from_shape_fn((matrix.rows(), matrix.cols()), |(i, j)| matrix.value(i, j))
}

/// Builds a backend by writing every cell of a dense view
pub fn from_ndarray<M: Storage>(view: ArrayView2<'_, M::Value>) -> M {
    let mut out = M::default();
    for ((i, j), &v) in view.indexed_iter() {
        *out.get_or_insert(i, j) = v;
    }
    out
}
