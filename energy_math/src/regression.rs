//! Ordinary least squares regression for trend estimation
//!
//! Fits `y = slope * x + intercept` over an arbitrary set of `(x, y)` points
//! and reports the coefficient of determination of the fit.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Below this the x values are considered identical
const MIN_X_SPREAD: f64 = 1e-10;

/// A fitted univariate least-squares line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    /// Change in y per unit of x
    pub slope: f64,
    /// Value of y at x = 0
    pub intercept: f64,
    /// Coefficient of determination (R²) against the fitted points
    pub r_squared: f64,
}

impl LinearFit {
    /// Fit a line through the given points
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(MathError::InvalidInput(format!(
                "x and y must have the same length (got {} and {})",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < 2 {
            return Err(MathError::InsufficientData(
                "Not enough data for linear regression. Need at least 2 points.".to_string(),
            ));
        }

        let n = xs.len() as f64;
        let x_mean = xs.iter().sum::<f64>() / n;
        let y_mean = ys.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for (&x, &y) in xs.iter().zip(ys) {
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        if denominator.abs() < MIN_X_SPREAD {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        let intercept = y_mean - slope * x_mean;
        let r_squared = coefficient_of_determination(xs, ys, y_mean, slope, intercept);

        Ok(Self {
            slope,
            intercept,
            r_squared,
        })
    }

    /// Evaluate the fitted line at `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// R² of a line against the points it was fitted on.
///
/// A flat series has no variance to explain: a perfect fit scores 1.0 and
/// anything else scores 0.0.
fn coefficient_of_determination(
    xs: &[f64],
    ys: &[f64],
    y_mean: f64,
    slope: f64,
    intercept: f64,
) -> f64 {
    let mut ss_total = 0.0;
    let mut ss_residual = 0.0;

    for (&x, &y) in xs.iter().zip(ys) {
        let y_pred = slope * x + intercept;
        ss_total += (y - y_mean).powi(2);
        ss_residual += (y - y_pred).powi(2);
    }

    if ss_total.abs() < MIN_X_SPREAD {
        return if ss_residual.abs() < MIN_X_SPREAD { 1.0 } else { 0.0 };
    }

    1.0 - (ss_residual / ss_total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perfect_line() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [10.0, 20.0, 30.0, 40.0];
        let fit = LinearFit::fit(&xs, &ys).unwrap();

        assert_relative_eq!(fit.slope, 10.0, epsilon = 1e-9);
        assert_relative_eq!(fit.intercept, 0.0, epsilon = 1e-9);
        assert_relative_eq!(fit.r_squared, 1.0, epsilon = 1e-9);
        assert_relative_eq!(fit.predict(5.0), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_flat_series_scores_perfect_fit() {
        let xs = [1.0, 2.0, 3.0];
        let ys = [7.0, 7.0, 7.0];
        let fit = LinearFit::fit(&xs, &ys).unwrap();

        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 7.0);
        assert_eq!(fit.r_squared, 1.0);
    }

    #[test]
    fn test_noisy_series_r_squared_below_one() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [2.0, 4.5, 5.5, 8.5, 9.5];
        let fit = LinearFit::fit(&xs, &ys).unwrap();

        assert!(fit.slope > 1.5 && fit.slope < 2.5);
        assert!(fit.r_squared > 0.9 && fit.r_squared < 1.0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            LinearFit::fit(&[1.0], &[1.0]),
            Err(MathError::InsufficientData(_))
        ));
        assert!(matches!(
            LinearFit::fit(&[1.0, 2.0], &[1.0]),
            Err(MathError::InvalidInput(_))
        ));
        assert!(matches!(
            LinearFit::fit(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]),
            Err(MathError::CalculationError(_))
        ));
    }
}
