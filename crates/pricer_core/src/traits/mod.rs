//! Core numerical traits.
//!
//! The calibration code is written against `f64`, while the small vector
//! helpers in [`crate::math::vector`] stay generic over [`Float`] so that they
//! can be reused with `f32` grids or other floating-point types.

/// Generic floating-point trait for numeric computations.
///
/// # Examples
/// ```
/// use pricer_core::traits::Float;
///
/// fn variance<T: Float>(vol: T, periods: T) -> T {
///     vol * vol * periods
/// }
///
/// let v: f64 = variance(0.2, 4.0);
/// assert!((v - 0.16).abs() < 1e-12);
/// ```
pub use num_traits::Float;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_trait_with_f64() {
        fn generic_sqrt<T: Float>(x: T) -> T {
            x.sqrt()
        }

        assert_eq!(generic_sqrt(4.0_f64), 2.0);
    }

    #[test]
    fn test_float_trait_quadratic() {
        fn generic_quadratic<T: Float>(a: T, b: T, c: T, x: T) -> T {
            a * x * x + b * x + c
        }

        // 0.04 * 1.25^2 - 0.0625 = 0
        let result = generic_quadratic(0.04_f64, 0.0, -0.0625, 1.25);
        assert!(result.abs() < 1e-15);
    }
}
