//! Headline totals of a projection
//!
//! The aggregate price range scales the single-month cost margin linearly
//! with the horizon (`total ± horizon · k·σ`), not by √horizon.

use crate::config::EngineConfig;
use crate::models::{ChannelModel, TrendDirection};
use crate::projection::{ForecastPoint, ProjectionResult};
use crate::window::WindowPolicy;
use serde::{Deserialize, Serialize};

/// Estimated spread of the total projected cost
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    /// Per-month cost margin the range was scaled from
    pub monthly_margin: f64,
}

/// Aggregates over the whole horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub horizon_months: usize,
    pub trend: TrendDirection,
    /// Fitted kWh change per month
    pub monthly_slope: f64,
    pub total_kwh: f64,
    pub total_cost: f64,
    pub price_range: PriceRange,
}

/// Collapse per-month forecast points into headline figures
pub fn summarize(
    forecast: &[ForecastPoint],
    kwh_model: &ChannelModel,
    cost_model: &ChannelModel,
    config: &EngineConfig,
) -> ProjectionSummary {
    let horizon = forecast.len();
    let total_kwh: f64 = forecast.iter().map(|p| p.projected_kwh).sum();
    let total_cost: f64 = forecast.iter().map(|p| p.projected_cost).sum();

    let monthly_margin = config.band_width_sigmas * cost_model.residual_std_dev;
    let spread = monthly_margin * horizon as f64;

    ProjectionSummary {
        horizon_months: horizon,
        trend: TrendDirection::classify(kwh_model.trend.slope, config.trend_threshold),
        monthly_slope: kwh_model.trend.slope,
        total_kwh,
        total_cost,
        price_range: PriceRange {
            min: (total_cost - spread).max(0.0),
            max: total_cost + spread,
            monthly_margin,
        },
    }
}

/// What the narrative generator is allowed to see: summary fields only,
/// never per-month values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeInput {
    pub horizon_months: usize,
    pub window_policy: WindowPolicy,
    pub trend: TrendDirection,
    pub monthly_slope: f64,
    pub total_kwh: f64,
    pub total_cost: f64,
    pub price_range: PriceRange,
}

impl NarrativeInput {
    pub fn from_result(result: &ProjectionResult) -> Self {
        let summary = &result.summary;
        Self {
            horizon_months: summary.horizon_months,
            window_policy: result.window_policy,
            trend: summary.trend,
            monthly_slope: summary.monthly_slope,
            total_kwh: summary.total_kwh,
            total_cost: summary.total_cost,
            price_range: summary.price_range,
        }
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
