//! # Energy Forecast
//!
//! Energy consumption and cost forecasting for portfolios of government
//! buildings.
//!
//! ## Features
//!
//! - Monthly readings aggregated per building, department or sector
//! - Linear trend with multiplicative monthly seasonality for kWh and cost
//! - Deterministic cost bands or seeded Gaussian noise
//! - Horizon summaries safe to hand to a narrative generator
//! - Historical analytics, budget comparison and chart series
//! - CSV-backed data store configured from a JSON file
//!
//! ## Quick Start
//!
//! ```rust
//! use energy_forecast::data::{aggregate_monthly, MonthlyReading};
//! use energy_forecast::project;
//!
//! let readings: Vec<MonthlyReading> = (0..24)
//!     .map(|i| MonthlyReading {
//!         building_id: 1,
//!         year: 2022 + i / 12,
//!         month: (i % 12) as u32 + 1,
//!         kwh: 1000.0 + 20.0 * i as f64,
//!         cost: 150.0 + 3.0 * i as f64,
//!     })
//!     .collect();
//!
//! let series = aggregate_monthly(&[1], &readings);
//! let result = project(&series, 6, false, None).unwrap();
//!
//! assert_eq!(result.forecast.len(), 6);
//! assert_eq!((result.forecast[0].year, result.forecast[0].month), (2024, 1));
//! ```

pub mod analytics;
pub mod budget;
pub mod catalog;
pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod projection;
pub mod store;
pub mod summary;
pub mod window;

// Re-export commonly used types
pub use crate::catalog::{Catalog, ScopeFilter};
pub use crate::config::{AppConfig, EngineConfig};
pub use crate::data::{aggregate_monthly, MonthlyObservation, MonthlyReading, YearMonth};
pub use crate::error::{ForecastError, Result};
pub use crate::models::TrendDirection;
pub use crate::projection::{
    project, project_with_config, ForecastPoint, NoiseMode, ProjectionResult,
};
pub use crate::store::DataStore;
pub use crate::summary::{NarrativeInput, ProjectionSummary};
pub use crate::window::WindowPolicy;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
pub(crate) mod test_support {
    use crate::data::{MonthlyObservation, YearMonth};

    /// Consecutive months starting at `year`-`month` with the given values
    pub(crate) fn series_from(
        year: i32,
        month: u32,
        values: &[(f64, f64)],
    ) -> Vec<MonthlyObservation> {
        let mut period = YearMonth { year, month };
        values
            .iter()
            .enumerate()
            .map(|(i, &(kwh, cost))| {
                let observation = MonthlyObservation {
                    year: period.year,
                    month: period.month,
                    total_kwh: kwh,
                    total_cost: cost,
                    time_index: i + 1,
                };
                period = period.next();
                observation
            })
            .collect()
    }

    /// `n` consecutive months of constant consumption
    pub(crate) fn flat_series(
        year: i32,
        month: u32,
        n: usize,
        kwh: f64,
        cost: f64,
    ) -> Vec<MonthlyObservation> {
        series_from(year, month, &vec![(kwh, cost); n])
    }
}
