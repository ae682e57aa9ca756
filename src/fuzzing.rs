//! Arbitrary matrix operands and checks for fuzz testing.

use crate::matrix::{MAX_INVERTIBLE_DIMENSION, MatrixF64};
use arbitrary::{Arbitrary, Result, Unstructured};

const MAX_DIMENSION: usize = 5;

/// Elements are multiples of 1/1000 within ±1000, which keeps every product
/// and sum of the tested sizes far away from overflow.
const ELEMENT_RESOLUTION: i32 = 1000;
const MAX_ELEMENT_UNITS: i32 = 1000 * ELEMENT_RESOLUTION;

/// A matrix of arbitrary shape with bounded finite elements.
#[derive(Clone, Debug)]
pub struct ArbitraryMatrix(pub MatrixF64);

/// A pair of matrices that can be multiplied in the given order.
#[derive(Clone, Debug)]
pub struct ArbitraryProductOperands {
    pub lhs: MatrixF64,
    pub rhs: MatrixF64,
}

impl<'a> Arbitrary<'a> for ArbitraryMatrix {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let n_rows = u.int_in_range(1..=MAX_DIMENSION)?;
        let n_cols = u.int_in_range(1..=MAX_DIMENSION)?;
        arbitrary_matrix(u, n_rows, n_cols).map(Self)
    }
}

impl<'a> Arbitrary<'a> for ArbitraryProductOperands {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let n_rows = u.int_in_range(1..=MAX_DIMENSION)?;
        let n_inner = u.int_in_range(1..=MAX_DIMENSION)?;
        let n_cols = u.int_in_range(1..=MAX_DIMENSION)?;
        Ok(Self {
            lhs: arbitrary_matrix(u, n_rows, n_inner)?,
            rhs: arbitrary_matrix(u, n_inner, n_cols)?,
        })
    }
}

fn arbitrary_matrix(u: &mut Unstructured<'_>, n_rows: usize, n_cols: usize) -> Result<MatrixF64> {
    let mut matrix = MatrixF64::zeros(n_rows, n_cols);
    for element in matrix.as_mut_slice() {
        let units = u.int_in_range(-MAX_ELEMENT_UNITS..=MAX_ELEMENT_UNITS)?;
        *element = f64::from(units) / f64::from(ELEMENT_RESOLUTION);
    }
    Ok(matrix)
}

/// Inversion must either produce finite elements or fail without touching
/// the destination, and must only succeed for supported square shapes.
pub fn fuzz_test_matrix_inversion(ArbitraryMatrix(matrix): ArbitraryMatrix) {
    const SENTINEL: f64 = -7.0;

    let mut inverse = MatrixF64::zeros(matrix.n_cols(), matrix.n_rows());
    inverse.as_mut_slice().fill(SENTINEL);

    match matrix.inverse_into(&mut inverse) {
        Ok(()) => {
            assert!(matrix.is_square() && matrix.n_rows() <= MAX_INVERTIBLE_DIMENSION);
            assert!(inverse.as_slice().iter().all(|value| value.is_finite()));
        }
        Err(_) => {
            assert!(inverse.as_slice().iter().all(|&value| value == SENTINEL));
        }
    }
}

/// The transposed product variants and the identity `(AB)ᵀ = BᵀAᵀ` must agree
/// exactly with the plain product, since all of them accumulate the same
/// products in the same order.
pub fn fuzz_test_transposed_products(operands: ArbitraryProductOperands) {
    let ArbitraryProductOperands { lhs, rhs } = operands;

    let mut product = MatrixF64::zeros(lhs.n_rows(), rhs.n_cols());
    let mut lhs_transposed = MatrixF64::zeros(lhs.n_cols(), lhs.n_rows());
    let mut rhs_transposed = MatrixF64::zeros(rhs.n_cols(), rhs.n_rows());
    let mut product_transposed = MatrixF64::zeros(rhs.n_cols(), lhs.n_rows());
    let mut transposed_product = MatrixF64::zeros(rhs.n_cols(), lhs.n_rows());
    let mut via_transpose_multiply = MatrixF64::zeros(lhs.n_rows(), rhs.n_cols());
    let mut via_multiply_transpose = MatrixF64::zeros(lhs.n_rows(), rhs.n_cols());

    let outcome = lhs
        .multiply_into(&rhs, &mut product)
        .and_then(|()| lhs.transpose_into(&mut lhs_transposed))
        .and_then(|()| rhs.transpose_into(&mut rhs_transposed))
        .and_then(|()| product.transpose_into(&mut product_transposed))
        .and_then(|()| rhs_transposed.multiply_into(&lhs_transposed, &mut transposed_product))
        .and_then(|()| {
            lhs_transposed.transpose_multiply_into(&rhs, &mut via_transpose_multiply)
        })
        .and_then(|()| lhs.multiply_transpose_into(&rhs_transposed, &mut via_multiply_transpose));
    assert_eq!(outcome, Ok(()));

    assert_eq!(product_transposed, transposed_product);
    assert_eq!(via_transpose_multiply, product);
    assert_eq!(via_multiply_transpose, product);
}
