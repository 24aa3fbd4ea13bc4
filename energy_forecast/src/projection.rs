//! Multi-month consumption and cost projection
//!
//! For every month ahead the projector evaluates the fitted trend at the next
//! time index, scales it by that calendar month's seasonal factor and floors
//! the result at zero. The per-month cost band is `projected ± k·σ` where σ
//! is the residual standard deviation of the cost channel.
//!
//! Two noise modes exist and are not observably equivalent:
//!
//! - [`NoiseMode::Band`] (no seed given): the point estimate is the
//!   deterministic `trend × seasonal` value and uncertainty lives only in the
//!   band. Results are reproducible without any seed.
//! - [`NoiseMode::Gaussian`] (seed given): a zero-mean normal perturbation with
//!   the channel's residual σ is added to each point estimate, drawn from a
//!   generator seeded with the given value. Same seed, same result.

use crate::config::EngineConfig;
use crate::data::{MonthlyObservation, YearMonth};
use crate::error::{ForecastError, Result};
use crate::models::{Channel, ChannelModel};
use crate::summary::{summarize, NarrativeInput, ProjectionSummary};
use crate::window::{TrainingWindow, WindowPolicy};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// How month-to-month variation is represented in the forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum NoiseMode {
    /// Deterministic point estimates with a ±k·σ band
    Band,
    /// Point estimates perturbed by seeded Gaussian noise
    Gaussian { seed: u64 },
}

impl NoiseMode {
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::Gaussian { seed },
            None => Self::Band,
        }
    }
}

/// One projected future month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub year: i32,
    pub month: u32,
    pub projected_kwh: f64,
    pub projected_cost: f64,
    pub cost_low: f64,
    pub cost_high: f64,
}

impl ForecastPoint {
    pub fn period(&self) -> YearMonth {
        YearMonth {
            year: self.year,
            month: self.month,
        }
    }
}

/// Full output of one projection call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub window_policy: WindowPolicy,
    pub noise_mode: NoiseMode,
    /// Number of observations the models were fitted on
    pub window_size: usize,
    /// Last real month of the history
    pub last_observed: YearMonth,
    pub kwh_model: ChannelModel,
    pub cost_model: ChannelModel,
    pub forecast: Vec<ForecastPoint>,
    pub summary: ProjectionSummary,
}

impl ProjectionResult {
    /// Goodness of fit of the kWh trend over the training window
    pub fn r_squared(&self) -> f64 {
        self.kwh_model.trend.r_squared
    }

    /// Goodness of fit of the cost trend over the training window
    pub fn r_squared_cost(&self) -> f64 {
        self.cost_model.trend.r_squared
    }

    /// Summary-only view for downstream narrative generation
    pub fn narrative_input(&self) -> NarrativeInput {
        NarrativeInput::from_result(self)
    }
}

/// Source of per-month perturbations
enum NoiseSource {
    Band,
    Gaussian(StdRng),
}

impl NoiseSource {
    fn new(mode: NoiseMode) -> Self {
        match mode {
            NoiseMode::Band => Self::Band,
            NoiseMode::Gaussian { seed } => Self::Gaussian(StdRng::seed_from_u64(seed)),
        }
    }

    fn sample(&mut self, std_dev: f64) -> Result<f64> {
        match self {
            Self::Band => Ok(0.0),
            Self::Gaussian(_) if std_dev <= 0.0 => Ok(0.0),
            Self::Gaussian(rng) => {
                let normal = Normal::new(0.0, std_dev).map_err(|e| {
                    ForecastError::InvalidParameter(format!(
                        "cannot sample noise with standard deviation {}: {}",
                        std_dev, e
                    ))
                })?;
                Ok(normal.sample(rng))
            }
        }
    }
}

/// Steps fitted channel models forward month by month
#[derive(Debug)]
pub struct Projector<'a> {
    kwh: &'a ChannelModel,
    cost: &'a ChannelModel,
    band_width_sigmas: f64,
    noise_mode: NoiseMode,
}

impl<'a> Projector<'a> {
    pub fn new(
        kwh: &'a ChannelModel,
        cost: &'a ChannelModel,
        config: &EngineConfig,
        noise_mode: NoiseMode,
    ) -> Self {
        Self {
            kwh,
            cost,
            band_width_sigmas: config.band_width_sigmas,
            noise_mode,
        }
    }

    /// Project `horizon` months following the last real observation
    pub fn run(&self, last: &MonthlyObservation, horizon: usize) -> Result<Vec<ForecastPoint>> {
        let mut noise = NoiseSource::new(self.noise_mode);
        let mut period = last.period();
        let half_width = self.band_width_sigmas * self.cost.residual_std_dev;
        let mut points = Vec::with_capacity(horizon);

        for step in 1..=horizon {
            period = period.next();
            let time_index = last.time_index + step;

            let kwh = self.kwh.expected(time_index, period.month)
                + noise.sample(self.kwh.residual_std_dev)?;
            let cost = self.cost.expected(time_index, period.month)
                + noise.sample(self.cost.residual_std_dev)?;

            let projected_kwh = kwh.max(0.0);
            let projected_cost = cost.max(0.0);

            points.push(ForecastPoint {
                year: period.year,
                month: period.month,
                projected_kwh,
                projected_cost,
                cost_low: (projected_cost - half_width).max(0.0),
                cost_high: projected_cost + half_width,
            });
        }

        Ok(points)
    }
}

/// Project `horizon_months` of consumption and cost with the default engine policy.
///
/// `observations` must be the aggregated, chronologically sorted series.
/// With `use_recent_window` the models are fitted on at most the last 24
/// months only. `noise_seed` selects seeded Gaussian noise; `None` gives the
/// deterministic band.
pub fn project(
    observations: &[MonthlyObservation],
    horizon_months: usize,
    use_recent_window: bool,
    noise_seed: Option<u64>,
) -> Result<ProjectionResult> {
    project_with_config(
        observations,
        horizon_months,
        use_recent_window,
        noise_seed,
        &EngineConfig::default(),
    )
}

/// [`project`] with an explicit engine configuration.
///
/// The configuration is validated first and rejected with
/// [`ForecastError::ConfigError`] before any data is looked at.
pub fn project_with_config(
    observations: &[MonthlyObservation],
    horizon_months: usize,
    use_recent_window: bool,
    noise_seed: Option<u64>,
    config: &EngineConfig,
) -> Result<ProjectionResult> {
    config.validate()?;

    let policy = WindowPolicy::from_recent_flag(use_recent_window);
    let window = TrainingWindow::select(observations, policy, config)?;

    if horizon_months == 0 {
        return Err(ForecastError::InvalidParameter(
            "horizon must be at least one month".to_string(),
        ));
    }

    let kwh_model = ChannelModel::train(&window, Channel::Kwh, config)?;
    let cost_model = ChannelModel::train(&window, Channel::Cost, config)?;

    // The selected window guarantees a non-empty history
    let last = &observations[observations.len() - 1];
    let noise_mode = NoiseMode::from_seed(noise_seed);
    let forecast =
        Projector::new(&kwh_model, &cost_model, config, noise_mode).run(last, horizon_months)?;
    let summary = summarize(&forecast, &kwh_model, &cost_model, config);

    tracing::info!(
        %policy,
        window = window.len(),
        horizon = horizon_months,
        trend = %summary.trend,
        total_kwh = summary.total_kwh,
        total_cost = summary.total_cost,
        "projection complete"
    );

    Ok(ProjectionResult {
        window_policy: policy,
        noise_mode,
        window_size: window.len(),
        last_observed: last.period(),
        kwh_model,
        cost_model,
        forecast,
        summary,
    })
}
