//! Dense small-vector arithmetic.
//!
//! Factor-loading vectors have a handful of components (typically 2 to 5),
//! so these helpers work directly on slices and never allocate except in
//! [`zeros`].
//!
//! Length mismatches on the unchecked helpers are programming errors and
//! panic. [`checked_dot`] is available where the lengths come from user
//! input.

use crate::traits::Float;
use crate::types::CoreError;

/// Allocates a zero vector of length `len`.
#[inline]
pub fn zeros<T: Float>(len: usize) -> Vec<T> {
    vec![T::zero(); len]
}

/// Dot product `x · y`.
///
/// # Panics
///
/// Panics if `x.len() != y.len()`.
///
/// # Examples
///
/// ```
/// use pricer_core::math::vector::dot;
///
/// assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
/// ```
#[inline]
pub fn dot<T: Float>(x: &[T], y: &[T]) -> T {
    assert_eq!(x.len(), y.len(), "dot: vector lengths differ");
    x.iter()
        .zip(y)
        .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
}

/// Dot product with a length check.
///
/// # Errors
///
/// Returns [`CoreError::DimensionMismatch`] if the lengths differ.
pub fn checked_dot<T: Float>(x: &[T], y: &[T]) -> Result<T, CoreError> {
    if x.len() != y.len() {
        return Err(CoreError::dimension_mismatch(x.len(), y.len()));
    }
    Ok(dot(x, y))
}

/// Accumulates `y += alpha * x`.
///
/// # Panics
///
/// Panics if `x.len() != y.len()`.
///
/// # Examples
///
/// ```
/// use pricer_core::math::vector::axpy;
///
/// let mut acc = vec![1.0, 1.0];
/// axpy(0.5, &[2.0, 4.0], &mut acc);
/// assert_eq!(acc, vec![2.0, 3.0]);
/// ```
#[inline]
pub fn axpy<T: Float>(alpha: T, x: &[T], y: &mut [T]) {
    assert_eq!(x.len(), y.len(), "axpy: vector lengths differ");
    for (yi, &xi) in y.iter_mut().zip(x) {
        *yi = *yi + alpha * xi;
    }
}

/// Multiplies every component of `x` by `factor` in place.
#[inline]
pub fn scale_in_place<T: Float>(x: &mut [T], factor: T) {
    for xi in x.iter_mut() {
        *xi = *xi * factor;
    }
}

/// Resets every component of `x` to zero.
#[inline]
pub fn fill_zero<T: Float>(x: &mut [T]) {
    for xi in x.iter_mut() {
        *xi = T::zero();
    }
}

/// Euclidean norm `sqrt(x · x)`.
#[inline]
pub fn norm<T: Float>(x: &[T]) -> T {
    dot(x, x).sqrt()
}

/// Returns `true` if every component is finite.
#[inline]
pub fn all_finite<T: Float>(x: &[T]) -> bool {
    x.iter().all(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    // ========================================
    // Basic Operation Tests
    // ========================================

    #[test]
    fn test_zeros() {
        let z: Vec<f64> = zeros(3);
        assert_eq!(z, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_dot() {
        assert_relative_eq!(dot(&[0.2_f64], &[0.2]), 0.04, epsilon = 1e-15);
        assert_eq!(dot::<f64>(&[], &[]), 0.0);
    }

    #[test]
    #[should_panic(expected = "dot: vector lengths differ")]
    fn test_dot_length_mismatch_panics() {
        let _ = dot(&[1.0_f64, 2.0], &[1.0]);
    }

    #[test]
    fn test_checked_dot() {
        assert_eq!(checked_dot(&[1.0_f64, 2.0], &[3.0, 4.0]).unwrap(), 11.0);

        let err = checked_dot(&[1.0_f64, 2.0], &[3.0]).unwrap_err();
        assert!(err.is_dimension_mismatch());
    }

    #[test]
    fn test_axpy_accumulates() {
        let mut acc = zeros::<f64>(2);
        axpy(0.5, &[0.2, 0.1], &mut acc);
        axpy(0.5, &[0.4, -0.1], &mut acc);
        assert_relative_eq!(acc[0], 0.3, epsilon = 1e-15);
        assert_relative_eq!(acc[1], 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_scale_in_place() {
        let mut v = vec![0.2_f64, -0.1];
        scale_in_place(&mut v, 1.25);
        assert_relative_eq!(v[0], 0.25, epsilon = 1e-15);
        assert_relative_eq!(v[1], -0.125, epsilon = 1e-15);
    }

    #[test]
    fn test_fill_zero() {
        let mut v = vec![1.0_f64, 2.0];
        fill_zero(&mut v);
        assert_eq!(v, vec![0.0, 0.0]);
    }

    #[test]
    fn test_norm() {
        assert_relative_eq!(norm(&[3.0_f64, 4.0]), 5.0, epsilon = 1e-15);
    }

    #[test]
    fn test_all_finite() {
        assert!(all_finite(&[1.0_f64, -2.0]));
        assert!(!all_finite(&[1.0_f64, f64::NAN]));
        assert!(!all_finite(&[f64::INFINITY]));
    }

    // ========================================
    // Property Tests
    // ========================================

    proptest! {
        #[test]
        fn prop_dot_is_symmetric(
            x in proptest::collection::vec(-1.0_f64..1.0, 4),
            y in proptest::collection::vec(-1.0_f64..1.0, 4),
        ) {
            prop_assert!((dot(&x, &y) - dot(&y, &x)).abs() < 1e-14);
        }

        #[test]
        fn prop_scaling_scales_norm(
            x in proptest::collection::vec(-1.0_f64..1.0, 3),
            s in 0.1_f64..10.0,
        ) {
            let before = norm(&x);
            let mut y = x.clone();
            scale_in_place(&mut y, s);
            prop_assert!((norm(&y) - s * before).abs() < 1e-12);
        }
    }
}
