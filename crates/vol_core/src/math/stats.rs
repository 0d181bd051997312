//! Sample statistics for return series.
//!
//! All functions are generic over `T: Float` and return `None` when the
//! input is too short for the statistic to be defined, leaving the choice of
//! error to the caller.
//!
//! # Example
//!
//! ```
//! use vol_core::math::stats::{log_returns, sample_std_dev};
//!
//! let prices = [100.0_f64, 101.0, 100.0, 102.0];
//! let returns = log_returns(&prices);
//! assert_eq!(returns.len(), 3);
//! assert!(sample_std_dev(&returns).unwrap() > 0.0);
//! ```

use num_traits::Float;

/// Natural-log returns `ln(p[i] / p[i-1])` of a price path.
///
/// Returns an empty vector for fewer than two prices.
pub fn log_returns<T: Float>(prices: &[T]) -> Vec<T> {
    prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect()
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean<T: Float>(values: &[T]) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let n = T::from(values.len())?;
    let sum = values.iter().fold(T::zero(), |acc, &v| acc + v);
    Some(sum / n)
}

/// Sample variance with the `n - 1` denominator, `None` for fewer than two values.
///
/// Uses the two-pass formula so a constant series yields exactly zero.
pub fn sample_variance<T: Float>(values: &[T]) -> Option<T> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let denom = T::from(values.len() - 1)?;
    let ss = values.iter().fold(T::zero(), |acc, &v| {
        let d = v - m;
        acc + d * d
    });
    Some(ss / denom)
}

/// Sample standard deviation, `None` for fewer than two values.
pub fn sample_std_dev<T: Float>(values: &[T]) -> Option<T> {
    sample_variance(values).map(|v| v.max(T::zero()).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_log_returns_short_input() {
        assert!(log_returns::<f64>(&[]).is_empty());
        assert!(log_returns(&[100.0_f64]).is_empty());
    }

    #[test]
    fn test_log_returns_values() {
        let r = log_returns(&[100.0_f64, 110.0, 99.0]);
        assert_relative_eq!(r[0], (1.1_f64).ln(), epsilon = 1e-15);
        assert_relative_eq!(r[1], (0.9_f64).ln(), epsilon = 1e-15);
    }

    #[test]
    fn test_mean_empty() {
        assert!(mean::<f64>(&[]).is_none());
    }

    #[test]
    fn test_sample_variance_known_values() {
        // 2, 4, 4, 4, 5, 5, 7, 9: population variance 4, sample variance 32/7
        let v = [2.0_f64, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(sample_variance(&v).unwrap(), 32.0 / 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_variance_needs_two_values() {
        assert!(sample_variance(&[1.0_f64]).is_none());
        assert!(sample_std_dev(&[1.0_f64]).is_none());
    }

    #[test]
    fn test_constant_series_has_zero_deviation() {
        let v = [0.001_f64; 30];
        assert!(sample_std_dev(&v).unwrap() < 1e-15);
    }

    #[test]
    fn test_works_with_f32() {
        let v = [1.0_f32, 2.0, 3.0];
        assert!((sample_variance(&v).unwrap() - 1.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn test_variance_non_negative(values in prop::collection::vec(-1.0_f64..1.0, 2..100)) {
            prop_assert!(sample_variance(&values).unwrap() >= 0.0);
        }

        #[test]
        fn test_variance_shift_invariant(
            values in prop::collection::vec(-1.0_f64..1.0, 2..50),
            shift in -10.0_f64..10.0
        ) {
            let shifted: Vec<f64> = values.iter().map(|v| v + shift).collect();
            let a = sample_variance(&values).unwrap();
            let b = sample_variance(&shifted).unwrap();
            prop_assert!((a - b).abs() < 1e-9);
        }
    }
}
