//! Operations on three-component vectors stored as plain arrays.
//!
//! Functions writing an output take it as `result: &mut Vector3<F>` and
//! return it again so that calls can be chained. The borrow rules prevent
//! passing the same array as both input and output, so the cases where the
//! output should overwrite an input have dedicated `_assign` variants.

use crate::num::Float;

/// A three-dimensional vector.
pub type Vector3<F> = [F; 3];

pub type Vector3F64 = Vector3<f64>;
pub type Vector3F32 = Vector3<f32>;

/// Index of the x-component.
pub const X: usize = 0;
/// Index of the y-component.
pub const Y: usize = 1;
/// Index of the z-component.
pub const Z: usize = 2;
/// Number of components in a [`Vector3`].
pub const N_COMPONENTS: usize = 3;

/// Copies `source` into `dest`.
#[inline]
pub fn copy<'a, F: Float>(source: &Vector3<F>, dest: &'a mut Vector3<F>) -> &'a Vector3<F> {
    *dest = *source;
    dest
}

/// Computes `result = a + b * scale`.
#[inline]
pub fn multiply_accumulate<'a, F: Float>(
    a: &Vector3<F>,
    b: &Vector3<F>,
    scale: F,
    result: &'a mut Vector3<F>,
) -> &'a Vector3<F> {
    for i in 0..N_COMPONENTS {
        result[i] = a[i] + b[i] * scale;
    }
    result
}

/// Computes `a += b * scale`.
#[inline]
pub fn multiply_accumulate_assign<F: Float>(a: &mut Vector3<F>, b: &Vector3<F>, scale: F) {
    for i in 0..N_COMPONENTS {
        a[i] = a[i] + b[i] * scale;
    }
}

/// Computes `b = a + b * scale`.
#[inline]
pub fn multiply_accumulate_assign_scaled<F: Float>(a: &Vector3<F>, b: &mut Vector3<F>, scale: F) {
    for i in 0..N_COMPONENTS {
        b[i] = a[i] + b[i] * scale;
    }
}

/// Computes `result = a + b`.
#[inline]
pub fn sum<'a, F: Float>(
    a: &Vector3<F>,
    b: &Vector3<F>,
    result: &'a mut Vector3<F>,
) -> &'a Vector3<F> {
    for i in 0..N_COMPONENTS {
        result[i] = a[i] + b[i];
    }
    result
}

/// Computes `result = left - right`.
#[inline]
pub fn difference<'a, F: Float>(
    left: &Vector3<F>,
    right: &Vector3<F>,
    result: &'a mut Vector3<F>,
) -> &'a Vector3<F> {
    for i in 0..N_COMPONENTS {
        result[i] = left[i] - right[i];
    }
    result
}

/// Computes the dot product of `a` and `b`.
#[inline]
pub fn dot<F: Float>(a: &Vector3<F>, b: &Vector3<F>) -> F {
    a[X] * b[X] + a[Y] * b[Y] + a[Z] * b[Z]
}

/// Computes the cross product `result = left × right`.
#[inline]
pub fn cross<'a, F: Float>(
    left: &Vector3<F>,
    right: &Vector3<F>,
    result: &'a mut Vector3<F>,
) -> &'a Vector3<F> {
    *result = cross_components(left, right);
    result
}

/// Computes the cross product `left = left × right`.
#[inline]
pub fn cross_assign<F: Float>(left: &mut Vector3<F>, right: &Vector3<F>) {
    *left = cross_components(left, right);
}

/// Computes the cross product `right = left × right`.
#[inline]
pub fn cross_assign_right<F: Float>(left: &Vector3<F>, right: &mut Vector3<F>) {
    *right = cross_components(left, right);
}

/// All three components are evaluated before anything is stored, so callers
/// may write the returned value back over either input.
#[inline]
fn cross_components<F: Float>(left: &Vector3<F>, right: &Vector3<F>) -> Vector3<F> {
    [
        left[Y] * right[Z] - left[Z] * right[Y],
        left[Z] * right[X] - left[X] * right[Z],
        left[X] * right[Y] - left[Y] * right[X],
    ]
}

/// Computes the squared Euclidean length of `vector`.
#[inline]
pub fn length_squared<F: Float>(vector: &Vector3<F>) -> F {
    dot(vector, vector)
}

/// Computes the Euclidean length of `vector`.
#[inline]
pub fn length<F: Float>(vector: &Vector3<F>) -> F {
    length_squared(vector).sqrt()
}

/// Computes `result = vector * scale`.
#[inline]
pub fn scale<'a, F: Float>(
    vector: &Vector3<F>,
    result: &'a mut Vector3<F>,
    scale: F,
) -> &'a Vector3<F> {
    for i in 0..N_COMPONENTS {
        result[i] = vector[i] * scale;
    }
    result
}

/// Multiplies every component of `vector` by `scale`.
#[inline]
pub fn scale_assign<F: Float>(vector: &mut Vector3<F>, scale: F) {
    for component in vector.iter_mut() {
        *component = *component * scale;
    }
}

/// Writes `vector` scaled to unit length into `result`.
///
/// The zero vector has no direction: its components are divided by zero and
/// the result consists of NaNs. Callers that may encounter it must check the
/// length first.
#[inline]
pub fn unit<'a, F: Float>(vector: &Vector3<F>, result: &'a mut Vector3<F>) -> &'a Vector3<F> {
    scale(vector, result, length(vector).recip())
}

/// Scales `vector` to unit length in place. See [`unit`] for the zero vector.
#[inline]
pub fn unit_assign<F: Float>(vector: &mut Vector3<F>) {
    let inverse_length = length(vector).recip();
    scale_assign(vector, inverse_length);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    const EPSILON: f64 = 1e-9;

    fn assert_vectors_close(actual: &Vector3F64, expected: &Vector3F64, epsilon: f64) {
        for i in 0..N_COMPONENTS {
            assert_abs_diff_eq!(actual[i], expected[i], epsilon = epsilon);
        }
    }

    #[test]
    fn copying_returns_destination_with_source_values() {
        let source = [1.0, -2.0, 3.5];
        let mut dest = [0.0; 3];
        let returned = *copy(&source, &mut dest);
        assert_eq!(returned, source);
        assert_eq!(dest, source);
    }

    #[test]
    fn multiply_accumulate_adds_scaled_vector() {
        let mut result = [0.0; 3];
        multiply_accumulate(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], 0.5, &mut result);
        assert_eq!(result, [3.0, 4.5, 6.0]);
    }

    #[test]
    fn multiply_accumulate_assign_matches_out_of_place_version() {
        let a = [1.0, -1.0, 2.0];
        let b = [0.25, 8.0, -3.0];
        let mut expected = [0.0; 3];
        multiply_accumulate(&a, &b, 2.0, &mut expected);

        let mut in_place = a;
        multiply_accumulate_assign(&mut in_place, &b, 2.0);
        assert_eq!(in_place, expected);
    }

    #[test]
    fn multiply_accumulate_assign_scaled_overwrites_scaled_operand() {
        let a = [1.0, -1.0, 2.0];
        let b = [0.25, 8.0, -3.0];
        let mut expected = [0.0; 3];
        multiply_accumulate(&a, &b, 2.0, &mut expected);

        let mut in_place = b;
        multiply_accumulate_assign_scaled(&a, &mut in_place, 2.0);
        assert_eq!(in_place, expected);
    }

    #[test]
    fn sum_and_difference_are_elementwise() {
        let a = [1.0, 2.0, 3.0];
        let b = [0.5, -2.0, 10.0];
        let mut result = [0.0; 3];

        sum(&a, &b, &mut result);
        assert_eq!(result, [1.5, 0.0, 13.0]);

        difference(&a, &b, &mut result);
        assert_eq!(result, [0.5, 4.0, -7.0]);
    }

    #[test]
    fn dot_product_of_simple_vectors_works() {
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, -5.0, 6.0]), 12.0);
    }

    #[test]
    fn cross_product_of_x_and_y_axes_is_z_axis() {
        let mut result = [0.0; 3];
        cross(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0], &mut result);
        assert_eq!(result, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn cross_assign_is_not_corrupted_by_overwriting_left_operand() {
        let left = [1.0, 2.0, 3.0];
        let right = [-4.0, 0.5, 2.0];
        let mut expected = [0.0; 3];
        cross(&left, &right, &mut expected);

        let mut in_place = left;
        cross_assign(&mut in_place, &right);
        assert_eq!(in_place, expected);
    }

    #[test]
    fn cross_assign_right_is_not_corrupted_by_overwriting_right_operand() {
        let left = [1.0, 2.0, 3.0];
        let right = [-4.0, 0.5, 2.0];
        let mut expected = [0.0; 3];
        cross(&left, &right, &mut expected);

        let mut in_place = right;
        cross_assign_right(&left, &mut in_place);
        assert_eq!(in_place, expected);
    }

    #[test]
    fn lengths_of_three_four_zero_vector_work() {
        let vector = [3.0, 4.0, 0.0];
        assert_eq!(length_squared(&vector), 25.0);
        assert_eq!(length(&vector), 5.0);
    }

    #[test]
    fn scaling_multiplies_every_component() {
        let mut result = [0.0; 3];
        scale(&[1.0, -2.0, 0.5], &mut result, -2.0);
        assert_eq!(result, [-2.0, 4.0, -1.0]);

        let mut vector = [1.0, -2.0, 0.5];
        scale_assign(&mut vector, -2.0);
        assert_eq!(vector, result);
    }

    #[test]
    fn unit_of_axis_aligned_vector_is_axis() {
        let mut result = [0.0; 3];
        unit(&[0.0, -7.0, 0.0], &mut result);
        assert_eq!(result, [0.0, -1.0, 0.0]);
    }

    #[test]
    fn unit_of_zero_vector_is_nan() {
        let mut result = [0.0; 3];
        unit(&[0.0, 0.0, 0.0], &mut result);
        assert!(result.iter().all(|component: &f64| component.is_nan()));
    }

    #[test]
    fn single_precision_cross_product_matches_double_precision() {
        let mut result_f32: Vector3F32 = [0.0; 3];
        cross(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &mut result_f32);
        assert_eq!(result_f32, [-3.0, 6.0, -3.0]);

        let mut result_f64: Vector3F64 = [0.0; 3];
        cross(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &mut result_f64);
        assert_eq!(result_f64, [-3.0, 6.0, -3.0]);
    }

    prop_compose! {
        fn vector_strategy()(
            x in -1e3..1e3,
            y in -1e3..1e3,
            z in -1e3..1e3,
        ) -> Vector3F64 {
            [x, y, z]
        }
    }

    proptest! {
        #[test]
        fn unit_vectors_have_unit_length(vector in vector_strategy()) {
            prop_assume!(length(&vector) > 1e-6);
            let mut result = [0.0; 3];
            unit(&vector, &mut result);
            prop_assert!((length_squared(&result) - 1.0).abs() < EPSILON);
        }
    }

    proptest! {
        #[test]
        fn cross_product_is_anticommutative(a in vector_strategy(), b in vector_strategy()) {
            let mut ab = [0.0; 3];
            let mut ba = [0.0; 3];
            cross(&a, &b, &mut ab);
            cross(&b, &a, &mut ba);
            scale_assign(&mut ba, -1.0);
            assert_vectors_close(&ab, &ba, 0.0);
        }
    }

    proptest! {
        #[test]
        fn cross_product_is_orthogonal_to_operands(a in vector_strategy(), b in vector_strategy()) {
            let mut ab = [0.0; 3];
            cross(&a, &b, &mut ab);
            let tolerance = 1e-12 * length(&a) * length(&a) * length(&b) + EPSILON;
            prop_assert!(dot(&a, &ab).abs() <= tolerance);
            prop_assert!(dot(&b, &ab).abs() <= 1e-12 * length(&a) * length(&b) * length(&b) + EPSILON);
        }
    }
}
