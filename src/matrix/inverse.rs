//! Closed-form inversion of small square matrices.

use super::Matrix;
use crate::{
    error::{LinalgError, Result, Shape, ensure_shape},
    num::Float,
};

/// The largest dimension [`Matrix::inverse_into`] handles.
pub const MAX_INVERTIBLE_DIMENSION: usize = 3;

impl<F: Float, S: AsRef<[F]>> Matrix<F, S> {
    /// Writes the inverse of this 1x1, 2x2 or 3x3 matrix into `result`,
    /// treating the matrix as singular when the magnitude of its determinant
    /// does not exceed [`Float::SINGULARITY_THRESHOLD`].
    ///
    /// # Errors
    /// See [`Self::inverse_into_with_threshold`].
    pub fn inverse_into<T: AsMut<[F]>>(&self, result: &mut Matrix<F, T>) -> Result<()> {
        self.inverse_into_with_threshold(result, F::SINGULARITY_THRESHOLD)
    }

    /// Writes the inverse of this 1x1, 2x2 or 3x3 matrix into `result`,
    /// treating the matrix as singular when the magnitude of its determinant
    /// does not exceed `threshold`.
    ///
    /// The threshold is absolute, so it should be chosen with the scale of the
    /// matrix elements in mind.
    ///
    /// # Errors
    /// Returns [`LinalgError::DimensionMismatch`] if the matrix is not square,
    /// is larger than 3x3, or `result` has a different shape, and
    /// [`LinalgError::Singular`] if the determinant is too small or not
    /// finite. `result` is not modified in either case.
    pub fn inverse_into_with_threshold<T: AsMut<[F]>>(
        &self,
        result: &mut Matrix<F, T>,
        threshold: F,
    ) -> Result<()> {
        let n = self.n_rows;
        ensure_shape("inverse", Shape::new(n, n), self.shape())?;
        if n > MAX_INVERTIBLE_DIMENSION {
            return Err(LinalgError::dimension_mismatch(
                "inverse",
                Shape::new(MAX_INVERTIBLE_DIMENSION, MAX_INVERTIBLE_DIMENSION),
                self.shape(),
            ));
        }
        ensure_shape("inverse", self.shape(), result.shape())?;

        let mut inverse = [F::ZERO; MAX_INVERTIBLE_DIMENSION * MAX_INVERTIBLE_DIMENSION];
        let inverse = &mut inverse[..n * n];

        let determinant = match n {
            1 => invert_1x1(self.as_slice(), inverse, threshold),
            2 => invert_2x2(self.as_slice(), inverse, threshold),
            _ => invert_3x3(self.as_slice(), inverse, threshold),
        }
        .map_err(|determinant| LinalgError::singular(determinant.to_f64().unwrap_or(f64::NAN)))?;

        log::trace!("Inverted {n}x{n} matrix with determinant {determinant:e}");

        result.data.as_mut().copy_from_slice(inverse);
        Ok(())
    }

    /// Measures how far the matrix is from the identity as the sum of squared
    /// deviations of each element from its identity value. A perfect identity
    /// gives zero.
    ///
    /// Intended for square matrices. For non-square matrices, the expected
    /// ones lie along the leading diagonal up to the smaller dimension, as for
    /// [`Matrix::set_identity`].
    pub fn identity_error(&self) -> F {
        let mut error = F::ZERO;
        for row in 0..self.n_rows {
            for (col, &value) in self.row(row).iter().enumerate() {
                let expected = if row == col { F::ONE } else { F::ZERO };
                let deviation = value - expected;
                error = error + deviation * deviation;
            }
        }
        error
    }
}

/// Returns the determinant if it is safe to divide by, and otherwise the
/// rejected determinant as the error.
fn checked_determinant<F: Float>(determinant: F, threshold: F) -> std::result::Result<F, F> {
    // Written so that a NaN determinant is also rejected
    if determinant.abs() > threshold && determinant.is_finite() {
        Ok(determinant)
    } else {
        Err(determinant)
    }
}

fn invert_1x1<F: Float>(m: &[F], inverse: &mut [F], threshold: F) -> std::result::Result<F, F> {
    let determinant = checked_determinant(m[0], threshold)?;
    inverse[0] = determinant.recip();
    Ok(determinant)
}

fn invert_2x2<F: Float>(m: &[F], inverse: &mut [F], threshold: F) -> std::result::Result<F, F> {
    let [a, b, c, d] = [m[0], m[1], m[2], m[3]];

    let determinant = checked_determinant(a * d - b * c, threshold)?;
    let inverse_determinant = determinant.recip();

    inverse[0] = d * inverse_determinant;
    inverse[1] = -b * inverse_determinant;
    inverse[2] = -c * inverse_determinant;
    inverse[3] = a * inverse_determinant;

    Ok(determinant)
}

fn invert_3x3<F: Float>(m: &[F], inverse: &mut [F], threshold: F) -> std::result::Result<F, F> {
    let [a, b, c, d, e, f, g, h, i] = [m[0], m[1], m[2], m[3], m[4], m[5], m[6], m[7], m[8]];

    // Cofactors of the first row
    let cofactor_00 = e * i - f * h;
    let cofactor_01 = f * g - d * i;
    let cofactor_02 = d * h - e * g;

    let determinant =
        checked_determinant(a * cofactor_00 + b * cofactor_01 + c * cofactor_02, threshold)?;
    let inverse_determinant = determinant.recip();

    // The inverse is the transposed cofactor matrix (the adjugate) divided by
    // the determinant
    inverse[0] = cofactor_00 * inverse_determinant;
    inverse[1] = (c * h - b * i) * inverse_determinant;
    inverse[2] = (b * f - c * e) * inverse_determinant;
    inverse[3] = cofactor_01 * inverse_determinant;
    inverse[4] = (a * i - c * g) * inverse_determinant;
    inverse[5] = (c * d - a * f) * inverse_determinant;
    inverse[6] = cofactor_02 * inverse_determinant;
    inverse[7] = (b * g - a * h) * inverse_determinant;
    inverse[8] = (a * e - b * d) * inverse_determinant;

    Ok(determinant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{MatrixF32, MatrixF64};
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn matrix(n_rows: usize, n_cols: usize, elements: &[f64]) -> MatrixF64 {
        MatrixF64::from_row_slice(n_rows, n_cols, elements).unwrap()
    }

    fn product(a: &MatrixF64, b: &MatrixF64) -> MatrixF64 {
        let mut result = MatrixF64::zeros(a.n_rows(), b.n_cols());
        a.multiply_into(b, &mut result).unwrap();
        result
    }

    #[test]
    fn inverting_1x1_matrix_gives_reciprocal() {
        let mut inverse = MatrixF64::zeros(1, 1);
        matrix(1, 1, &[4.0]).inverse_into(&mut inverse).unwrap();
        assert_eq!(inverse.as_slice(), &[0.25]);
    }

    #[test]
    fn inverting_2x2_matrix_works() {
        let a = matrix(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let mut b = MatrixF64::zeros(2, 2);
        a.inverse_into(&mut b).unwrap();

        assert_abs_diff_eq!(b, matrix(2, 2, &[-2.0, 1.0, 1.5, -0.5]), epsilon = 1e-12);
        assert_abs_diff_eq!(product(&a, &b), MatrixF64::identity(2), epsilon = 1e-12);
    }

    #[test]
    fn inverting_3x3_matrix_works() {
        let a = matrix(3, 3, &[2.0, 0.0, 1.0, 1.0, 3.0, 2.0, 1.0, 1.0, 2.0]);
        let mut b = MatrixF64::zeros(3, 3);
        a.inverse_into(&mut b).unwrap();

        let mut expected = matrix(3, 3, &[4.0, 1.0, -3.0, 0.0, 3.0, -3.0, -2.0, -2.0, 6.0]);
        expected.scale(1.0 / 6.0);
        assert_abs_diff_eq!(b, expected, epsilon = 1e-12);
        assert!(product(&a, &b).identity_error() < 1e-20);
    }

    #[test]
    fn inverting_singular_2x2_matrix_fails_and_leaves_result_unchanged() {
        let a = matrix(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let mut b = matrix(2, 2, &[7.0; 4]);

        assert_eq!(
            a.inverse_into(&mut b),
            Err(LinalgError::Singular { determinant: 0.0 })
        );
        assert_eq!(b.as_slice(), &[7.0; 4]);
    }

    #[test]
    fn inverting_singular_1x1_and_3x3_matrices_fails() {
        let mut b1 = MatrixF64::zeros(1, 1);
        assert!(matrix(1, 1, &[0.0]).inverse_into(&mut b1).is_err());

        let mut b3 = MatrixF64::zeros(3, 3);
        let rank_two = matrix(3, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert!(matches!(
            rank_two.inverse_into(&mut b3),
            Err(LinalgError::Singular { .. })
        ));
        assert_eq!(b3.as_slice(), &[0.0; 9]);
    }

    #[test]
    fn inverting_matrix_with_nan_element_fails() {
        let mut b = MatrixF64::zeros(2, 2);
        assert!(
            matrix(2, 2, &[f64::NAN, 0.0, 0.0, 1.0])
                .inverse_into(&mut b)
                .is_err()
        );
    }

    #[test]
    fn inverting_non_square_or_large_matrix_fails() {
        let mut result = MatrixF64::zeros(3, 2);
        assert!(matches!(
            matrix(2, 3, &[1.0; 6]).inverse_into(&mut result),
            Err(LinalgError::DimensionMismatch { .. })
        ));

        let mut result = MatrixF64::zeros(4, 4);
        assert!(matches!(
            MatrixF64::identity(4).inverse_into(&mut result),
            Err(LinalgError::DimensionMismatch { .. })
        ));
        assert_eq!(result.as_slice(), &[0.0; 16]);
    }

    #[test]
    fn inverting_into_wrong_shape_fails() {
        let mut result = MatrixF64::zeros(3, 3);
        assert!(MatrixF64::identity(2).inverse_into(&mut result).is_err());
        assert_eq!(result.as_slice(), &[0.0; 9]);
    }

    #[test]
    fn custom_threshold_rejects_small_determinants() {
        let a = matrix(2, 2, &[1e-3, 0.0, 0.0, 1e-3]);
        let mut b = MatrixF64::zeros(2, 2);

        assert!(a.inverse_into(&mut b).is_ok());
        assert!(a.inverse_into_with_threshold(&mut b, 1e-4).is_err());
    }

    #[test]
    fn single_precision_uses_looser_singularity_threshold() {
        let a = MatrixF32::from_row_slice(1, 1, &[1e-7]).unwrap();
        let mut b = MatrixF32::zeros(1, 1);
        assert!(a.inverse_into(&mut b).is_err());

        let a = MatrixF64::from_row_slice(1, 1, &[1e-7]).unwrap();
        let mut b = MatrixF64::zeros(1, 1);
        assert!(a.inverse_into(&mut b).is_ok());
    }

    #[test]
    fn identity_error_is_zero_for_identity_and_sums_squared_deviations() {
        assert_eq!(MatrixF64::identity(3).identity_error(), 0.0);
        assert_eq!(matrix(2, 2, &[2.0, 0.5, -1.0, 1.0]).identity_error(), 2.25);
    }

    prop_compose! {
        fn invertible_matrix_strategy()(
            n in 1_usize..=3,
        )(
            elements in prop::collection::vec(-10.0..10.0, n * n),
            n in Just(n),
        ) -> MatrixF64 {
            let mut m = MatrixF64::from_row_slice(n, n, &elements).unwrap();
            // Diagonal dominance keeps the matrix well conditioned
            for i in 0..n {
                m.add_to_element(i, i, 40.0_f64.copysign(m.get(i, i)));
            }
            m
        }
    }

    proptest! {
        #[test]
        fn product_with_inverse_is_identity(a in invertible_matrix_strategy()) {
            let mut inverse = MatrixF64::zeros(a.n_rows(), a.n_cols());
            a.inverse_into(&mut inverse).unwrap();

            let identity_error = product(&a, &inverse).identity_error();
            prop_assert!(identity_error < 1e-20, "identity error {}", identity_error);
        }
    }
}
