//! Configuration for the projection engine and its data sources
//!
//! Everything is passed explicitly: the engine reads an [`EngineConfig`]
//! and the storage layer is built from a [`DataSourceConfig`] at startup.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Tunable policy of the projection engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Monthly kWh slope beyond which a trend counts as increasing/decreasing
    pub trend_threshold: f64,
    /// Maximum number of observations used in recent-window mode
    pub recent_window: usize,
    /// Minimum history length required to project
    pub min_observations: usize,
    /// Added to the trend prediction before dividing in seasonal ratios
    pub seasonal_epsilon: f64,
    /// Half-width of the uncertainty band, in residual standard deviations
    pub band_width_sigmas: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trend_threshold: 50.0,
            recent_window: 24,
            min_observations: 3,
            seasonal_epsilon: 1e-4,
            band_width_sigmas: 1.0,
        }
    }
}

impl EngineConfig {
    /// Load and validate an engine configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: Self = read_json(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every knob is within its meaningful range
    pub fn validate(&self) -> Result<()> {
        if !self.trend_threshold.is_finite() || self.trend_threshold < 0.0 {
            return Err(ForecastError::ConfigError(format!(
                "trend_threshold must be a non-negative number, got {}",
                self.trend_threshold
            )));
        }
        if self.min_observations < 3 {
            return Err(ForecastError::ConfigError(format!(
                "min_observations must be at least 3, got {}",
                self.min_observations
            )));
        }
        if self.recent_window < self.min_observations {
            return Err(ForecastError::ConfigError(format!(
                "recent_window ({}) must not be smaller than min_observations ({})",
                self.recent_window, self.min_observations
            )));
        }
        if !(self.seasonal_epsilon > 0.0 && self.seasonal_epsilon.is_finite()) {
            return Err(ForecastError::ConfigError(format!(
                "seasonal_epsilon must be a small positive number, got {}",
                self.seasonal_epsilon
            )));
        }
        if !self.band_width_sigmas.is_finite() || self.band_width_sigmas < 0.0 {
            return Err(ForecastError::ConfigError(format!(
                "band_width_sigmas must be a non-negative number, got {}",
                self.band_width_sigmas
            )));
        }
        Ok(())
    }
}

/// Locations of the CSV tables backing the storage layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSourceConfig {
    /// Monthly per-building readings: `building_id,year,month,kwh,cost`
    pub readings_path: PathBuf,
    /// Building directory: `building_id,department_id,name`
    pub buildings_path: PathBuf,
    /// Department directory: `department_id,sector_id,name`
    pub departments_path: PathBuf,
    /// Sector directory: `sector_id,name`
    #[serde(default)]
    pub sectors_path: Option<PathBuf>,
    /// Quarterly budgets: `department_id,year,quarter,amount`
    #[serde(default)]
    pub budgets_path: Option<PathBuf>,
}

impl DataSourceConfig {
    /// Resolve relative paths against `base`
    pub fn relative_to(mut self, base: &Path) -> Self {
        let join = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.readings_path = join(self.readings_path);
        self.buildings_path = join(self.buildings_path);
        self.departments_path = join(self.departments_path);
        self.sectors_path = self.sectors_path.map(join);
        self.budgets_path = self.budgets_path.map(join);
        self
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub data: DataSourceConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Load an application configuration from a JSON file.
    ///
    /// Relative data paths are resolved against the directory holding the file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config: Self = read_json(path)?;
        config.engine.validate()?;

        if let Some(base) = path.parent() {
            config.data = config.data.relative_to(base);
        }
        Ok(config)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).map_err(|e| {
        ForecastError::ConfigError(format!("cannot read {}: {}", path.display(), e))
    })?;
    Ok(serde_json::from_str(&raw)?)
}
