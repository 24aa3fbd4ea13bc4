//! Multiplicative seasonal indices per calendar month

use crate::data::MonthlyObservation;
use crate::models::Channel;
use energy_math::statistics::mean;
use energy_math::LinearFit;
use serde::{Deserialize, Serialize};

/// Factor applied to the trend for each calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalIndexTable {
    factors: [f64; 12],
}

impl Default for SeasonalIndexTable {
    fn default() -> Self {
        Self::neutral()
    }
}

impl SeasonalIndexTable {
    /// Every month at 1.0
    pub fn neutral() -> Self {
        Self { factors: [1.0; 12] }
    }

    /// Average `actual / (trend + epsilon)` per calendar month.
    ///
    /// Months with no observation keep the neutral factor 1.0.
    pub fn from_ratios(
        observations: &[MonthlyObservation],
        channel: Channel,
        trend: &LinearFit,
        epsilon: f64,
    ) -> Self {
        let mut ratios: [Vec<f64>; 12] = Default::default();

        for obs in observations {
            if !(1..=12).contains(&obs.month) {
                continue;
            }
            let predicted = trend.predict(obs.time_index as f64);
            ratios[(obs.month - 1) as usize].push(channel.value(obs) / (predicted + epsilon));
        }

        let mut factors = [1.0; 12];
        for (factor, month_ratios) in factors.iter_mut().zip(&ratios) {
            if !month_ratios.is_empty() {
                *factor = mean(month_ratios);
            }
        }

        Self { factors }
    }

    /// Factor for a calendar month (1..=12); anything else is neutral
    pub fn factor(&self, month: u32) -> f64 {
        match month {
            1..=12 => self.factors[(month - 1) as usize],
            _ => 1.0,
        }
    }

    pub fn factors(&self) -> &[f64; 12] {
        &self.factors
    }
}
