//! Descriptive statistics over plain `f64` slices
//!
//! Thin wrappers over `statrs` that return neutral values instead of NaN
//! for empty input.

use statrs::statistics::Statistics;

/// Arithmetic mean, 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().mean()
}

/// Population standard deviation (divides by `n`), 0.0 for fewer than 2 values
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let sd = values.iter().population_std_dev();
    if sd.is_finite() {
        sd
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(&[], 0.0)]
    #[case(&[4.0], 4.0)]
    #[case(&[1.0, 2.0, 3.0, 4.0], 2.5)]
    fn test_mean(#[case] values: &[f64], #[case] expected: f64) {
        assert_relative_eq!(mean(values), expected, epsilon = 1e-12);
    }

    #[rstest]
    #[case(&[], 0.0)]
    #[case(&[5.0], 0.0)]
    #[case(&[3.0, 3.0, 3.0], 0.0)]
    #[case(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 2.0)]
    fn test_population_std_dev(#[case] values: &[f64], #[case] expected: f64) {
        assert_relative_eq!(population_std_dev(values), expected, epsilon = 1e-12);
    }
}
