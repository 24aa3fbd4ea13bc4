//! # Gov Energy
//!
//! Umbrella crate for the government building energy toolkit.
//!
//! - [`math`]: regression, descriptive statistics and trailing means
//! - [`forecast`]: data loading, projection, analytics and budgets
//!
//! ```
//! use gov_energy::forecast::TrendDirection;
//!
//! assert_eq!(TrendDirection::classify(75.0, 50.0), TrendDirection::Increasing);
//! ```

pub use energy_forecast as forecast;
pub use energy_math as math;

pub use energy_forecast::{project, ForecastError, ProjectionResult};
