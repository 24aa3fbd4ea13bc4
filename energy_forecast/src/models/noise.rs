//! Residual spread around the seasonal trend

use crate::data::MonthlyObservation;
use crate::models::{Channel, SeasonalIndexTable};
use energy_math::statistics::population_std_dev;
use energy_math::LinearFit;

/// Population standard deviation of `actual − trend × seasonal(month)`.
///
/// A single observation or identical residuals give 0.0.
pub fn residual_std_dev(
    observations: &[MonthlyObservation],
    channel: Channel,
    trend: &LinearFit,
    seasonal: &SeasonalIndexTable,
) -> f64 {
    let residuals: Vec<f64> = observations
        .iter()
        .map(|o| channel.value(o) - trend.predict(o.time_index as f64) * seasonal.factor(o.month))
        .collect();
    population_std_dev(&residuals)
}
