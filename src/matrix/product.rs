//! Matrix products.

use super::Matrix;
use crate::{
    error::{Result, Shape, ensure_shape},
    num::Float,
};

impl<F: Float, S: AsRef<[F]>> Matrix<F, S> {
    /// Computes `result = self * rhs`.
    ///
    /// # Errors
    /// Returns [`LinalgError::DimensionMismatch`](crate::LinalgError) unless
    /// `rhs` has `self.n_cols()` rows and `result` has `self.n_rows()` rows
    /// and `rhs.n_cols()` columns.
    pub fn multiply_into<T, U>(
        &self,
        rhs: &Matrix<F, T>,
        result: &mut Matrix<F, U>,
    ) -> Result<()>
    where
        T: AsRef<[F]>,
        U: AsMut<[F]>,
    {
        ensure_shape("multiply", Shape::new(self.n_cols, rhs.n_cols), rhs.shape())?;
        ensure_shape("multiply", Shape::new(self.n_rows, rhs.n_cols), result.shape())?;

        let lhs_data = self.as_slice();
        let rhs_data = rhs.as_slice();
        let result_data = result.data.as_mut();

        for row in 0..self.n_rows {
            for col in 0..rhs.n_cols {
                result_data[row * rhs.n_cols + col] = accumulate_products(
                    lhs_data,
                    row * self.n_cols,
                    1,
                    rhs_data,
                    col,
                    rhs.n_cols,
                    self.n_cols,
                );
            }
        }
        Ok(())
    }

    /// Computes `result = transpose(self) * rhs` without forming the
    /// transpose.
    ///
    /// # Errors
    /// Returns [`LinalgError::DimensionMismatch`](crate::LinalgError) unless
    /// `rhs` has `self.n_rows()` rows and `result` has `self.n_cols()` rows
    /// and `rhs.n_cols()` columns.
    pub fn transpose_multiply_into<T, U>(
        &self,
        rhs: &Matrix<F, T>,
        result: &mut Matrix<F, U>,
    ) -> Result<()>
    where
        T: AsRef<[F]>,
        U: AsMut<[F]>,
    {
        ensure_shape("transpose multiply", Shape::new(self.n_rows, rhs.n_cols), rhs.shape())?;
        ensure_shape("transpose multiply", Shape::new(self.n_cols, rhs.n_cols), result.shape())?;

        let lhs_data = self.as_slice();
        let rhs_data = rhs.as_slice();
        let result_data = result.data.as_mut();

        for row in 0..self.n_cols {
            for col in 0..rhs.n_cols {
                result_data[row * rhs.n_cols + col] = accumulate_products(
                    lhs_data,
                    row,
                    self.n_cols,
                    rhs_data,
                    col,
                    rhs.n_cols,
                    self.n_rows,
                );
            }
        }
        Ok(())
    }

    /// Computes `result = self * transpose(rhs)` without forming the
    /// transpose.
    ///
    /// # Errors
    /// Returns [`LinalgError::DimensionMismatch`](crate::LinalgError) unless
    /// `rhs` has `self.n_cols()` columns and `result` has `self.n_rows()` rows
    /// and `rhs.n_rows()` columns.
    pub fn multiply_transpose_into<T, U>(
        &self,
        rhs: &Matrix<F, T>,
        result: &mut Matrix<F, U>,
    ) -> Result<()>
    where
        T: AsRef<[F]>,
        U: AsMut<[F]>,
    {
        ensure_shape("multiply transpose", Shape::new(rhs.n_rows, self.n_cols), rhs.shape())?;
        ensure_shape("multiply transpose", Shape::new(self.n_rows, rhs.n_rows), result.shape())?;

        let lhs_data = self.as_slice();
        let rhs_data = rhs.as_slice();
        let result_data = result.data.as_mut();

        for row in 0..self.n_rows {
            for col in 0..rhs.n_rows {
                result_data[row * rhs.n_rows + col] = accumulate_products(
                    lhs_data,
                    row * self.n_cols,
                    1,
                    rhs_data,
                    col * rhs.n_cols,
                    1,
                    self.n_cols,
                );
            }
        }
        Ok(())
    }
}

/// Sums `len` products of elements taken from `lhs` and `rhs` at the given
/// start offsets and strides.
///
/// Every product routine goes through here, so products of transposed
/// operands accumulate in exactly the same order as the plain product.
#[inline]
pub(super) fn accumulate_products<F: Float>(
    lhs: &[F],
    lhs_start: usize,
    lhs_stride: usize,
    rhs: &[F],
    rhs_start: usize,
    rhs_stride: usize,
    len: usize,
) -> F {
    (0..len).fold(F::ZERO, |sum, k| {
        sum + lhs[lhs_start + k * lhs_stride] * rhs[rhs_start + k * rhs_stride]
    })
}
