//! Error types for matrix access and multiplication

use thiserror::Error;

/// Errors raised by matrix access and the multiplication routines
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// Read-only access to a cell that was never written
    #[error("index ({row}, {col}) is out of range for a {rows} x {cols} matrix")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Inner dimensions of a product disagree
    #[error("matrices cannot be multiplied: left has {left_cols} columns, right has {right_rows} rows")]
    ShapeMismatch { left_cols: usize, right_rows: usize },

    /// Output buffer does not match the product shape
    #[error("output buffer is {actual_rows} x {actual_cols}, expected {expected_rows} x {expected_cols}")]
    OutputShape {
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    /// A flat buffer does not hold `rows * cols` values
    #[error("buffer holds {actual} values, expected {expected}")]
    BufferLength { expected: usize, actual: usize },

    /// The GEMM routine rejected its arguments
    #[error("gemm call failed: {0}")]
    Gemm(String),
}

/// Result type for matrix operations
pub type Result<T> = std::result::Result<T, MatrixError>;
