//! Population patterns for the benchmark matrices
//!
//! Every fill writes through [`Storage::get_or_insert`], so both backends go
//! through their growth path in the same way.

use std::fmt;

use num_traits::{One, Zero};
use rand::Rng;

use crate::matrix::Storage;
use crate::scalar::Scalar;

/// Upper bound (exclusive) of the random fill
pub const RANDOM_FILL_MAX: f64 = 100.0;

/// Number of distinct integer draws behind the random fill
///
/// 24 bits keeps every scaled value strictly below [`RANDOM_FILL_MAX`] after
/// rounding to `f32`.
pub const RANDOM_RESOLUTION: u32 = 1 << 24;

/// Population pattern for a benchmark matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fill {
    /// Tridiagonal second-difference operator
    Banded,
    /// [`Fill::Banded`] plus explicit zeros in the last column
    BandedFarColumn,
    /// Every cell uniform in `[0, 100)`
    Random,
}

impl Fill {
    /// Label used in report lines
    pub fn label(&self) -> &'static str {
        match self {
            Fill::Banded | Fill::BandedFarColumn => "default",
            Fill::Random => "random",
        }
    }

    /// Populates an `order x order` matrix with this pattern
    pub fn apply<M, R>(&self, x: &mut M, order: usize, rng: &mut R)
    where
        M: Storage,
        M::Value: Scalar,
        R: Rng + ?Sized,
    {
        match self {
            Fill::Banded => fill_banded(x, order),
            Fill::BandedFarColumn => fill_banded_far_column(x, order),
            Fill::Random => fill_random(x, order, order, rng),
        }
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Writes the `m x m` discrete second-difference operator
///
/// Diagonal `-2`, first off-diagonals `1`. The boundary rows only have one
/// neighbour. `m == 0` writes nothing and `m == 1` writes only `(0, 0)`.
pub fn fill_banded<M: Storage>(x: &mut M, m: usize) {
    if m == 0 {
        return;
    }
    let one = M::Value::one();
    let minus_two = M::Value::zero() - one - one;

    if m == 1 {
        *x.get_or_insert(0, 0) = minus_two;
        return;
    }

    *x.get_or_insert(m - 1, m - 2) = one;
    *x.get_or_insert(m - 1, m - 1) = minus_two;
    *x.get_or_insert(0, 0) = minus_two;
    *x.get_or_insert(0, 1) = one;
    for i in 1..m - 1 {
        *x.get_or_insert(i, i) = minus_two;
        *x.get_or_insert(i, i - 1) = one;
        *x.get_or_insert(i, i + 1) = one;
    }
}

/// [`fill_banded`] preceded by zero writes in column `m - 1`
///
/// Row 0 always gets the zero; rows `1..m - 2` get it too. On the dense-row
/// backend this grows those rows to full width up front. On the sparse
/// backend it stores explicit zeros.
pub fn fill_banded_far_column<M: Storage>(x: &mut M, m: usize) {
    if m < 2 {
        fill_banded(x, m);
        return;
    }

    let zero = M::Value::zero();
    *x.get_or_insert(0, m - 1) = zero;
    for i in 1..m - 2 {
        *x.get_or_insert(i, m - 1) = zero;
    }
    fill_banded(x, m);
}

/// Fills every cell of an `m x n` matrix with a value uniform in `[0, 100)`
///
/// Values are scaled from an integer draw in `0..RANDOM_RESOLUTION`.
pub fn fill_random<M, R>(x: &mut M, m: usize, n: usize, rng: &mut R)
where
    M: Storage,
    M::Value: Scalar,
    R: Rng + ?Sized,
{
    let scale = RANDOM_FILL_MAX / RANDOM_RESOLUTION as f64;
    for i in 0..m {
        for j in 0..n {
            let draw = rng.gen_range(0..RANDOM_RESOLUTION) as f64;
            *x.get_or_insert(i, j) = M::Value::from_f64(draw * scale);
        }
    }
}
