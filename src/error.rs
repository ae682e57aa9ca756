//! Errors reported by the matrix kernels.

use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LinalgError>;

/// The number of rows and columns of a matrix operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Shape {
    pub n_rows: usize,
    pub n_cols: usize,
}

/// Reasons a matrix operation can refuse to produce a result.
///
/// Whenever one of these is returned, the destination operand has not been
/// written to.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum LinalgError {
    #[error("Dimension mismatch in {operation}: expected {expected}, got {actual}")]
    DimensionMismatch {
        operation: &'static str,
        expected: Shape,
        actual: Shape,
    },
    #[error("Matrix is singular or ill-conditioned (determinant {determinant:e})")]
    Singular { determinant: f64 },
}

impl Shape {
    pub const fn new(n_rows: usize, n_cols: usize) -> Self {
        Self { n_rows, n_cols }
    }

    /// The number of elements a matrix of this shape holds, or [`None`] if
    /// the count does not fit in a `usize`.
    pub const fn checked_n_elements(&self) -> Option<usize> {
        self.n_rows.checked_mul(self.n_cols)
    }

    pub const fn transposed(&self) -> Self {
        Self::new(self.n_cols, self.n_rows)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.n_rows, self.n_cols)
    }
}

impl LinalgError {
    pub(crate) fn dimension_mismatch(
        operation: &'static str,
        expected: Shape,
        actual: Shape,
    ) -> Self {
        log::debug!("Rejected {operation}: expected {expected} operand, got {actual}");
        Self::DimensionMismatch {
            operation,
            expected,
            actual,
        }
    }

    pub(crate) fn singular(determinant: f64) -> Self {
        log::debug!("Rejected inversion of matrix with determinant {determinant:e}");
        Self::Singular { determinant }
    }
}

/// Returns a [`LinalgError::DimensionMismatch`] unless the two shapes are
/// equal.
pub(crate) fn ensure_shape(
    operation: &'static str,
    expected: Shape,
    actual: Shape,
) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(LinalgError::dimension_mismatch(operation, expected, actual))
    }
}
