//! Scalar precisions used by the flat buffers and the random fill

use std::fmt;

use ndarray::LinalgScalar;
use num_traits::Float;

use crate::matrix::Element;

/// Floating-point precision of a benchmark run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    /// `f32`
    Single,
    /// `f64`
    Double,
}

impl Precision {
    /// Name used in report lines
    pub fn name(&self) -> &'static str {
        match self {
            Precision::Single => "float",
            Precision::Double => "double",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A floating-point element usable by every backend, fill and strategy
pub trait Scalar: Element + Float + LinalgScalar + Default + Send + Sync {
    /// Precision tag for reports
    const PRECISION: Precision;

    /// Tolerance used when comparing results of different strategies,
    /// relative to the magnitude of the compared values
    const TOLERANCE: Self;

    /// Lossy conversion from `f64`
    fn from_f64(value: f64) -> Self;

    /// Widening conversion to `f64`
    fn as_f64(self) -> f64;
}

impl Scalar for f32 {
    const PRECISION: Precision = Precision::Single;
    const TOLERANCE: f32 = 1e-4;

    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Scalar for f64 {
    const PRECISION: Precision = Precision::Double;
    const TOLERANCE: f64 = 1e-10;

    fn from_f64(value: f64) -> Self {
        value
    }

    fn as_f64(self) -> f64 {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_names() {
        assert_eq!(<f64 as Scalar>::PRECISION.to_string(), "double");
        assert_eq!(<f32 as Scalar>::PRECISION.to_string(), "float");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(<f32 as Scalar>::from_f64(2.5), 2.5f32);
        assert_eq!(0.5f32.as_f64(), 0.5f64);
    }
}
