//! Dense row-major matrices.

mod inverse;
mod product;

pub use inverse::MAX_INVERTIBLE_DIMENSION;

use crate::{
    error::{LinalgError, Result, Shape, ensure_shape},
    num::Float,
};
use approx::{AbsDiffEq, RelativeEq};
use std::{
    fmt,
    marker::PhantomData,
    ops::{Index, IndexMut},
};

/// A dense matrix with its elements stored in row-major order.
///
/// The storage `S` decides who owns the elements:
///
/// - `Vec<F>` (the default) gives a heap-allocated matrix owned by the
///   caller, see [`Matrix::zeros`].
/// - `[F; N]` gives a matrix that can live in a `static`, on the stack or
///   embedded in another struct, see [`Matrix::from_array`].
/// - `&mut [F]` borrows a caller-provided buffer, see
///   [`Matrix::from_storage`].
///
/// The storage always holds exactly `n_rows * n_cols` elements, and both
/// dimensions are at least one.
///
/// Operations that require compatible operand shapes return a [`Result`].
/// When they fail, the destination is left untouched. Element access with
/// out-of-range indices is a caller error: it is caught by a debug assertion,
/// and otherwise panics or accesses the wrong element within the buffer.
#[derive(Clone, Copy, PartialEq)]
pub struct Matrix<F, S = Vec<F>> {
    n_rows: usize,
    n_cols: usize,
    data: S,
    _phantom: PhantomData<F>,
}

pub type MatrixF64 = Matrix<f64>;
pub type MatrixF32 = Matrix<f32>;

impl<F: Float> Matrix<F> {
    /// Allocates a matrix with the given dimensions and all elements set to
    /// zero.
    ///
    /// # Panics
    /// If either dimension is zero or the element count overflows `usize`.
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        let n_elements = Shape::new(n_rows, n_cols)
            .checked_n_elements()
            .filter(|&n_elements| n_elements > 0);
        let Some(n_elements) = n_elements else {
            panic!("tried to allocate a {n_rows}x{n_cols} matrix");
        };
        Self::wrap(n_rows, n_cols, bytemuck::zeroed_vec(n_elements))
    }

    /// Allocates an `n` by `n` identity matrix.
    ///
    /// # Panics
    /// If `n` is zero.
    pub fn identity(n: usize) -> Self {
        let mut matrix = Self::zeros(n, n);
        matrix.set_identity();
        matrix
    }

    /// Allocates a matrix holding a copy of the given row-major elements.
    ///
    /// # Errors
    /// Returns [`LinalgError::DimensionMismatch`] if the number of elements
    /// does not match the dimensions.
    pub fn from_row_slice(n_rows: usize, n_cols: usize, elements: &[F]) -> Result<Self> {
        Self::from_storage(n_rows, n_cols, elements.to_vec())
    }
}

impl<F, const N: usize> Matrix<F, [F; N]> {
    /// Creates a matrix over the given array of row-major elements.
    ///
    /// This can be evaluated at compile time, so it may be used to initialize
    /// `static` and `const` matrices.
    ///
    /// # Panics
    /// If either dimension is zero or `N` differs from `n_rows * n_cols`.
    pub const fn from_array(n_rows: usize, n_cols: usize, data: [F; N]) -> Self {
        assert!(
            n_rows > 0 && n_cols > 0 && n_rows * n_cols == N,
            "array length does not match matrix dimensions"
        );
        Self::wrap(n_rows, n_cols, data)
    }
}

impl<F, S> Matrix<F, S> {
    const fn wrap(n_rows: usize, n_cols: usize, data: S) -> Self {
        Self {
            n_rows,
            n_cols,
            data,
            _phantom: PhantomData,
        }
    }

    /// The number of rows.
    #[inline]
    pub const fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// The number of columns.
    #[inline]
    pub const fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// The number of rows and columns.
    #[inline]
    pub const fn shape(&self) -> Shape {
        Shape::new(self.n_rows, self.n_cols)
    }

    /// Whether the matrix has as many rows as columns.
    #[inline]
    pub const fn is_square(&self) -> bool {
        self.n_rows == self.n_cols
    }

    /// Consumes the matrix and returns its row-major storage.
    pub fn into_storage(self) -> S {
        self.data
    }

    #[inline]
    fn linear_index(&self, row: usize, col: usize) -> usize {
        debug_assert!(
            row < self.n_rows && col < self.n_cols,
            "element ({row}, {col}) is outside {}x{} matrix",
            self.n_rows,
            self.n_cols
        );
        row * self.n_cols + col
    }

    /// The number of elements `(i, i)` on the leading diagonal. For
    /// non-square matrices this is the smaller of the two dimensions.
    #[inline]
    fn diagonal_len(&self) -> usize {
        self.n_rows.min(self.n_cols)
    }
}

impl<F: Float, S: AsRef<[F]>> Matrix<F, S> {
    /// Creates a matrix over the given row-major storage.
    ///
    /// # Errors
    /// Returns [`LinalgError::DimensionMismatch`] if either dimension is zero
    /// or the storage does not hold exactly `n_rows * n_cols` elements, which
    /// includes the case where that product overflows. The reported actual
    /// shape is the storage viewed as a single row.
    pub fn from_storage(n_rows: usize, n_cols: usize, data: S) -> Result<Self> {
        let shape = Shape::new(n_rows, n_cols);
        let n_elements = data.as_ref().len();
        if n_rows == 0 || n_cols == 0 || shape.checked_n_elements() != Some(n_elements) {
            return Err(LinalgError::dimension_mismatch(
                "construction",
                shape,
                Shape::new(1, n_elements),
            ));
        }
        Ok(Self::wrap(n_rows, n_cols, data))
    }

    /// The elements in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[F] {
        self.data.as_ref()
    }

    /// The raw bytes of the row-major elements.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.as_slice())
    }

    /// The elements of the given row.
    #[inline]
    pub fn row(&self, row: usize) -> &[F] {
        let start = self.linear_index(row, 0);
        &self.as_slice()[start..start + self.n_cols]
    }

    /// Returns the element at the given row and column.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> F {
        self.as_slice()[self.linear_index(row, col)]
    }

    /// Copies every element into `dest`.
    ///
    /// # Errors
    /// Returns [`LinalgError::DimensionMismatch`] unless `dest` has the same
    /// shape as `self`.
    pub fn copy_into<T: AsMut<[F]>>(&self, dest: &mut Matrix<F, T>) -> Result<()> {
        ensure_shape("copy", self.shape(), dest.shape())?;
        dest.data.as_mut().copy_from_slice(self.as_slice());
        Ok(())
    }

    /// Computes `result = self + other`.
    ///
    /// # Errors
    /// Returns [`LinalgError::DimensionMismatch`] unless all three matrices
    /// have the same shape.
    pub fn add_into<T, U>(&self, other: &Matrix<F, T>, result: &mut Matrix<F, U>) -> Result<()>
    where
        T: AsRef<[F]>,
        U: AsMut<[F]>,
    {
        self.combine_into("add", other, result, |a, b| a + b)
    }

    /// Computes `result = (self + other) / 2`.
    ///
    /// # Errors
    /// Returns [`LinalgError::DimensionMismatch`] unless all three matrices
    /// have the same shape.
    pub fn average_into<T, U>(
        &self,
        other: &Matrix<F, T>,
        result: &mut Matrix<F, U>,
    ) -> Result<()>
    where
        T: AsRef<[F]>,
        U: AsMut<[F]>,
    {
        self.combine_into("average", other, result, |a, b| (a + b) * F::ONE_HALF)
    }

    fn combine_into<T, U>(
        &self,
        operation: &'static str,
        other: &Matrix<F, T>,
        result: &mut Matrix<F, U>,
        combine: impl Fn(F, F) -> F,
    ) -> Result<()>
    where
        T: AsRef<[F]>,
        U: AsMut<[F]>,
    {
        ensure_shape(operation, self.shape(), other.shape())?;
        ensure_shape(operation, self.shape(), result.shape())?;

        for ((result, &a), &b) in result
            .data
            .as_mut()
            .iter_mut()
            .zip(self.as_slice())
            .zip(other.as_slice())
        {
            *result = combine(a, b);
        }
        Ok(())
    }

    /// Computes the dot product of two rows of the matrix. The rows may be the
    /// same.
    pub fn dot_rows(&self, row_a: usize, row_b: usize) -> F {
        product::accumulate_products(
            self.as_slice(),
            self.linear_index(row_a, 0),
            1,
            self.as_slice(),
            self.linear_index(row_b, 0),
            1,
            self.n_cols,
        )
    }

    /// Writes the transpose of the matrix into `result`.
    ///
    /// # Errors
    /// Returns [`LinalgError::DimensionMismatch`] unless `result` has
    /// `self.n_cols()` rows and `self.n_rows()` columns.
    pub fn transpose_into<T: AsMut<[F]>>(&self, result: &mut Matrix<F, T>) -> Result<()> {
        ensure_shape("transpose", self.shape().transposed(), result.shape())?;

        let source = self.as_slice();
        let dest = result.data.as_mut();
        for row in 0..self.n_rows {
            for col in 0..self.n_cols {
                dest[col * self.n_rows + row] = source[row * self.n_cols + col];
            }
        }
        Ok(())
    }
}

impl<F: Float, S: AsRef<[F]> + AsMut<[F]>> Matrix<F, S> {
    /// The elements in row-major order.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [F] {
        self.data.as_mut()
    }

    /// Sets the element at the given row and column.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: F) {
        let idx = self.linear_index(row, col);
        self.as_mut_slice()[idx] = value;
    }

    /// Adds `value` to the element at the given row and column.
    #[inline]
    pub fn add_to_element(&mut self, row: usize, col: usize, value: F) {
        let idx = self.linear_index(row, col);
        let element = &mut self.as_mut_slice()[idx];
        *element = *element + value;
    }

    /// Sets every element of the given row to `value`.
    pub fn set_row(&mut self, row: usize, value: F) {
        let start = self.linear_index(row, 0);
        let n_cols = self.n_cols;
        self.as_mut_slice()[start..start + n_cols].fill(value);
    }

    /// Sets every element of the given column to `value`.
    pub fn set_column(&mut self, col: usize, value: F) {
        let start = self.linear_index(0, col);
        let n_cols = self.n_cols;
        for element in self.as_mut_slice()[start..].iter_mut().step_by(n_cols) {
            *element = value;
        }
    }

    /// Sets every element to zero.
    pub fn zero(&mut self) {
        self.as_mut_slice().fill(F::ZERO);
    }

    /// Sets the elements `(i, i)` to one and every other element to zero.
    ///
    /// For a non-square matrix, the ones are placed along the leading diagonal
    /// up to the smaller of the two dimensions.
    pub fn set_identity(&mut self) {
        self.zero();
        self.add_identity();
    }

    /// Computes `self += other`.
    ///
    /// # Errors
    /// Returns [`LinalgError::DimensionMismatch`] unless both matrices have
    /// the same shape.
    pub fn add_in_place<T: AsRef<[F]>>(&mut self, other: &Matrix<F, T>) -> Result<()> {
        ensure_shape("add in place", self.shape(), other.shape())?;
        for (element, &addend) in self.as_mut_slice().iter_mut().zip(other.as_slice()) {
            *element = *element + addend;
        }
        Ok(())
    }

    /// Multiplies every element by `scalar`.
    pub fn scale(&mut self, scalar: F) {
        for element in self.as_mut_slice() {
            *element = *element * scalar;
        }
    }

    /// Computes `self += I`, following the same diagonal rule as
    /// [`Self::set_identity`].
    pub fn add_identity(&mut self) {
        self.add_to_diagonal(F::ONE);
    }

    /// Computes `self -= I`, following the same diagonal rule as
    /// [`Self::set_identity`].
    pub fn subtract_identity(&mut self) {
        self.add_to_diagonal(F::NEG_ONE);
    }

    /// Computes `self = I - self`, following the same diagonal rule as
    /// [`Self::set_identity`].
    pub fn identity_minus(&mut self) {
        self.scale(F::NEG_ONE);
        self.add_identity();
    }

    fn add_to_diagonal(&mut self, value: F) {
        for i in 0..self.diagonal_len() {
            self.add_to_element(i, i, value);
        }
    }

    /// Transposes a square matrix in place by swapping each element above the
    /// diagonal with its mirror below.
    ///
    /// # Errors
    /// Returns [`LinalgError::DimensionMismatch`] if the matrix is not square.
    pub fn transpose_in_place(&mut self) -> Result<()> {
        let n = self.n_rows;
        ensure_shape("transpose in place", Shape::new(n, n), self.shape())?;

        let data = self.as_mut_slice();
        for row in 0..n {
            for col in (row + 1)..n {
                data.swap(row * n + col, col * n + row);
            }
        }
        Ok(())
    }
}

impl<F: Float, S: AsRef<[F]>> Index<(usize, usize)> for Matrix<F, S> {
    type Output = F;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &F {
        &self.as_slice()[self.linear_index(row, col)]
    }
}

impl<F: Float, S: AsRef<[F]> + AsMut<[F]>> IndexMut<(usize, usize)> for Matrix<F, S> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut F {
        let idx = self.linear_index(row, col);
        &mut self.as_mut_slice()[idx]
    }
}

impl<F: Float, S: AsRef<[F]>> fmt::Debug for Matrix<F, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("n_rows", &self.n_rows)
            .field("n_cols", &self.n_cols)
            .field("data", &self.as_slice())
            .finish()
    }
}

impl<F: Float, S: AsRef<[F]>> fmt::Display for Matrix<F, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.n_rows {
            for (col, value) in self.row(row).iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                fmt::Display::fmt(value, f)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<F: Float, S: AsRef<[F]> + PartialEq> AbsDiffEq for Matrix<F, S> {
    type Epsilon = F;

    fn default_epsilon() -> F {
        F::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: F) -> bool {
        self.shape() == other.shape()
            && self
                .as_slice()
                .iter()
                .zip(other.as_slice())
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl<F: Float, S: AsRef<[F]> + PartialEq> RelativeEq for Matrix<F, S> {
    fn default_max_relative() -> F {
        F::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: F, max_relative: F) -> bool {
        self.shape() == other.shape()
            && self
                .as_slice()
                .iter()
                .zip(other.as_slice())
                .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

#[cfg(feature = "serde")]
mod serialization {
    use super::Matrix;
    use crate::num::Float;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeStruct};

    #[derive(Deserialize)]
    #[serde(rename = "Matrix")]
    struct MatrixParts<S> {
        n_rows: usize,
        n_cols: usize,
        data: S,
    }

    impl<F, S: Serialize> Serialize for Matrix<F, S> {
        fn serialize<Z: Serializer>(&self, serializer: Z) -> Result<Z::Ok, Z::Error> {
            let mut state = serializer.serialize_struct("Matrix", 3)?;
            state.serialize_field("n_rows", &self.n_rows)?;
            state.serialize_field("n_cols", &self.n_cols)?;
            state.serialize_field("data", &self.data)?;
            state.end()
        }
    }

    impl<'de, F: Float, S: AsRef<[F]> + Deserialize<'de>> Deserialize<'de> for Matrix<F, S> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let MatrixParts {
                n_rows,
                n_cols,
                data,
            } = MatrixParts::deserialize(deserializer)?;
            Self::from_storage(n_rows, n_cols, data).map_err(serde::de::Error::custom)
        }
    }
}
