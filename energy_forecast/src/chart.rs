//! Real and projected months on one time axis for chart rendering

use crate::data::MonthlyObservation;
use crate::projection::ProjectionResult;
use serde::{Deserialize, Serialize};

/// Whether a chart point was measured or projected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Actual,
    Forecast,
}

/// One month on the chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub year: i32,
    pub month: u32,
    pub kwh: f64,
    pub cost: f64,
    pub kind: SeriesKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_high: Option<f64>,
}

/// How much real history precedes the forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ChartView {
    FullHistory,
    /// Months of `current_year`, or the last 12 months if that year has none
    Recent { current_year: i32 },
}

/// Number of trailing months shown when the current year has no data
const RECENT_FALLBACK_MONTHS: usize = 12;

/// Concatenate the visible history and the forecast
pub fn chart_series(
    history: &[MonthlyObservation],
    result: &ProjectionResult,
    view: ChartView,
) -> Vec<ChartPoint> {
    let visible: &[MonthlyObservation] = match view {
        ChartView::FullHistory => history,
        ChartView::Recent { current_year } => {
            match history.iter().position(|o| o.year == current_year) {
                Some(start) => &history[start..],
                None => &history[history.len().saturating_sub(RECENT_FALLBACK_MONTHS)..],
            }
        }
    };

    let actual = visible.iter().map(|o| ChartPoint {
        year: o.year,
        month: o.month,
        kwh: o.total_kwh,
        cost: o.total_cost,
        kind: SeriesKind::Actual,
        cost_low: None,
        cost_high: None,
    });
    let forecast = result.forecast.iter().map(|p| ChartPoint {
        year: p.year,
        month: p.month,
        kwh: p.projected_kwh,
        cost: p.projected_cost,
        kind: SeriesKind::Forecast,
        cost_low: Some(p.cost_low),
        cost_high: Some(p.cost_high),
    });

    actual.chain(forecast).collect()
}
