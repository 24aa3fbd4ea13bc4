//! Trailing moving averages for smoothing monthly series
//!
//! Unlike a classic SMA, the trailing mean reports a value as soon as one
//! observation has arrived, averaging over however many are available until
//! the window fills.

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Trailing mean over at most `period` values
#[derive(Debug, Clone)]
pub struct TrailingMean {
    period: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl TrailingMean {
    /// Create a new trailing mean with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
            sum: 0.0,
        })
    }

    /// Push a new value into the window
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);
        self.sum += value;

        if self.values.len() > self.period {
            if let Some(old_value) = self.values.pop_front() {
                self.sum -= old_value;
            }
        }
    }

    /// Mean of the values currently in the window
    pub fn value(&self) -> Result<f64> {
        if self.values.is_empty() {
            return Err(MathError::InsufficientData(
                "No values in the window yet".to_string(),
            ));
        }

        Ok(self.sum / self.values.len() as f64)
    }
}

/// Trailing mean of every prefix of `values` over `period` values
pub fn rolling_mean(values: &[f64], period: usize) -> Result<Vec<f64>> {
    let mut window = TrailingMean::new(period)?;
    values
        .iter()
        .map(|&v| {
            window.update(v);
            window.value()
        })
        .collect()
}
