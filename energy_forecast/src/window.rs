//! Training window selection
//!
//! The window is the single lever between long-run and short-run behaviour:
//! the full history gives a stable long-term trend, a bounded recent suffix
//! follows regime shifts.

use crate::config::EngineConfig;
use crate::data::MonthlyObservation;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which part of the history the models are fitted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Every observation
    FullHistory,
    /// At most the last `recent_window` observations
    Recent,
}

impl WindowPolicy {
    pub fn from_recent_flag(recent_only: bool) -> Self {
        if recent_only {
            Self::Recent
        } else {
            Self::FullHistory
        }
    }
}

impl fmt::Display for WindowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullHistory => write!(f, "full history"),
            Self::Recent => write!(f, "recent history"),
        }
    }
}

/// A contiguous suffix of the observation series
#[derive(Debug, Clone, Copy)]
pub struct TrainingWindow<'a> {
    observations: &'a [MonthlyObservation],
    policy: WindowPolicy,
}

impl<'a> TrainingWindow<'a> {
    /// Select the training window from the full series.
    ///
    /// Fails with [`ForecastError::InsufficientData`] when the full series is
    /// shorter than `config.min_observations`.
    pub fn select(
        observations: &'a [MonthlyObservation],
        policy: WindowPolicy,
        config: &EngineConfig,
    ) -> Result<Self> {
        if observations.len() < config.min_observations {
            return Err(ForecastError::InsufficientData {
                available: observations.len(),
                required: config.min_observations,
            });
        }

        let start = match policy {
            WindowPolicy::FullHistory => 0,
            WindowPolicy::Recent => observations.len().saturating_sub(config.recent_window),
        };

        tracing::debug!(
            %policy,
            history = observations.len(),
            window = observations.len() - start,
            "selected training window"
        );

        Ok(Self {
            observations: &observations[start..],
            policy,
        })
    }

    pub fn observations(&self) -> &'a [MonthlyObservation] {
        self.observations
    }

    pub fn policy(&self) -> WindowPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
