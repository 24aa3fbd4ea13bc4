//! Per-channel decomposition models
//!
//! kWh and cost are modelled independently as
//! `value ≈ trend(time_index) × seasonal(month) ± noise`.

use crate::config::EngineConfig;
use crate::data::MonthlyObservation;
use crate::error::Result;
use crate::window::TrainingWindow;
use energy_math::LinearFit;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod noise;
pub mod seasonal;
pub mod trend;

pub use seasonal::SeasonalIndexTable;
pub use trend::TrendDirection;

/// Which measured quantity a model describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Kwh,
    Cost,
}

impl Channel {
    /// Read this channel's value from an observation
    pub fn value(self, observation: &MonthlyObservation) -> f64 {
        match self {
            Self::Kwh => observation.total_kwh,
            Self::Cost => observation.total_cost,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kwh => write!(f, "kWh"),
            Self::Cost => write!(f, "cost"),
        }
    }
}

/// Trend, seasonal factors and residual spread fitted for one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelModel {
    pub channel: Channel,
    pub trend: LinearFit,
    pub seasonal: SeasonalIndexTable,
    /// Standard deviation of `actual − trend × seasonal` over the window
    pub residual_std_dev: f64,
}

impl ChannelModel {
    /// Fit all three components on the training window
    pub fn train(
        window: &TrainingWindow<'_>,
        channel: Channel,
        config: &EngineConfig,
    ) -> Result<Self> {
        let observations = window.observations();
        let trend = trend::fit_trend(observations, channel)?;
        let seasonal =
            SeasonalIndexTable::from_ratios(observations, channel, &trend, config.seasonal_epsilon);
        let residual_std_dev = noise::residual_std_dev(observations, channel, &trend, &seasonal);

        tracing::debug!(
            %channel,
            slope = trend.slope,
            intercept = trend.intercept,
            r_squared = trend.r_squared,
            residual_std_dev,
            "trained channel model"
        );

        Ok(Self {
            channel,
            trend,
            seasonal,
            residual_std_dev,
        })
    }

    /// Deterministic expectation `trend × seasonal` at a time index and calendar month
    pub fn expected(&self, time_index: usize, month: u32) -> f64 {
        self.trend.predict(time_index as f64) * self.seasonal.factor(month)
    }
}
