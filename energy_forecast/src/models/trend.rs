//! Linear trend over the time index

use crate::data::MonthlyObservation;
use crate::error::Result;
use crate::models::Channel;
use energy_math::LinearFit;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fit `value ≈ slope · time_index + intercept` for one channel
pub fn fit_trend(observations: &[MonthlyObservation], channel: Channel) -> Result<LinearFit> {
    let xs: Vec<f64> = observations.iter().map(|o| o.time_index as f64).collect();
    let ys: Vec<f64> = observations.iter().map(|o| channel.value(o)).collect();
    Ok(LinearFit::fit(&xs, &ys)?)
}

/// Direction of the fitted kWh trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    /// Classify a monthly slope against a symmetric dead band of `±threshold`
    pub fn classify(slope: f64, threshold: f64) -> Self {
        if slope > threshold {
            Self::Increasing
        } else if slope < -threshold {
            Self::Decreasing
        } else {
            Self::Stable
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increasing => write!(f, "increasing"),
            Self::Decreasing => write!(f, "decreasing"),
            Self::Stable => write!(f, "stable"),
        }
    }
}
