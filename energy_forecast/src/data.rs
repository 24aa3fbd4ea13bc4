//! Monthly consumption records and their aggregation into a single series

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Identifier of a building
pub type BuildingId = u32;
/// Identifier of a department (the agency owning buildings)
pub type DepartmentId = u32;
/// Identifier of a government sector grouping departments
pub type SectorId = u32;

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Create a calendar month, rejecting months outside 1..=12
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(ForecastError::InvalidParameter(format!(
                "{}-{:02} is not a valid calendar month",
                year, month
            )));
        }
        Ok(Self { year, month })
    }

    /// The following month, rolling December over into January
    pub fn next(self) -> Self {
        if self.month >= 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Fiscal quarter (1..=4) of this month
    pub fn quarter(self) -> u32 {
        self.month.saturating_sub(1) / 3 + 1
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// One building's consumption for one month, as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReading {
    pub building_id: BuildingId,
    pub year: i32,
    pub month: u32,
    pub kwh: f64,
    pub cost: f64,
}

impl MonthlyReading {
    /// Calendar month of the reading
    pub fn period(&self) -> YearMonth {
        YearMonth {
            year: self.year,
            month: self.month,
        }
    }

    /// Reject readings that cannot describe a real month of consumption
    pub fn validate(&self) -> Result<()> {
        YearMonth::new(self.year, self.month).map_err(|_| {
            ForecastError::DataError(format!(
                "building {}: month {} of {} is out of range",
                self.building_id, self.month, self.year
            ))
        })?;
        if !(self.kwh.is_finite() && self.kwh >= 0.0) {
            return Err(ForecastError::DataError(format!(
                "building {} {}: kWh must be non-negative, got {}",
                self.building_id,
                self.period(),
                self.kwh
            )));
        }
        if !(self.cost.is_finite() && self.cost >= 0.0) {
            return Err(ForecastError::DataError(format!(
                "building {} {}: cost must be non-negative, got {}",
                self.building_id,
                self.period(),
                self.cost
            )));
        }
        Ok(())
    }
}

/// One month of the aggregated series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyObservation {
    pub year: i32,
    pub month: u32,
    pub total_kwh: f64,
    pub total_cost: f64,
    /// Position in the aggregated series, starting at 1
    pub time_index: usize,
}

impl MonthlyObservation {
    /// Calendar month of the observation
    pub fn period(&self) -> YearMonth {
        YearMonth {
            year: self.year,
            month: self.month,
        }
    }
}

/// Collapse per-building readings into one monthly series.
///
/// kWh and cost are summed across the requested buildings for every
/// (year, month) present. The series is sorted chronologically and numbered
/// 1..=N regardless of gaps between months. An empty building set yields an
/// empty series.
pub fn aggregate_monthly(
    building_ids: &[BuildingId],
    readings: &[MonthlyReading],
) -> Vec<MonthlyObservation> {
    if building_ids.is_empty() {
        return Vec::new();
    }

    let wanted: HashSet<BuildingId> = building_ids.iter().copied().collect();
    let mut totals: BTreeMap<YearMonth, (f64, f64)> = BTreeMap::new();

    for reading in readings.iter().filter(|r| wanted.contains(&r.building_id)) {
        let entry = totals.entry(reading.period()).or_insert((0.0, 0.0));
        entry.0 += reading.kwh;
        entry.1 += reading.cost;
    }

    let series: Vec<MonthlyObservation> = totals
        .into_iter()
        .enumerate()
        .map(|(i, (period, (kwh, cost)))| MonthlyObservation {
            year: period.year,
            month: period.month,
            total_kwh: kwh,
            total_cost: cost,
            time_index: i + 1,
        })
        .collect();

    tracing::debug!(
        buildings = wanted.len(),
        months = series.len(),
        "aggregated monthly series"
    );

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn reading(
        building_id: BuildingId,
        year: i32,
        month: u32,
        kwh: f64,
        cost: f64,
    ) -> MonthlyReading {
        MonthlyReading {
            building_id,
            year,
            month,
            kwh,
            cost,
        }
    }

    #[rstest]
    #[case(2024, 1, 2024, 2)]
    #[case(2024, 11, 2024, 12)]
    #[case(2024, 12, 2025, 1)]
    fn test_year_month_next(
        #[case] year: i32,
        #[case] month: u32,
        #[case] next_year: i32,
        #[case] next_month: u32,
    ) {
        let next = YearMonth::new(year, month).unwrap().next();
        assert_eq!(next, YearMonth::new(next_year, next_month).unwrap());
    }

    #[rstest]
    #[case(1, 1)]
    #[case(3, 1)]
    #[case(4, 2)]
    #[case(9, 3)]
    #[case(12, 4)]
    fn test_quarter(#[case] month: u32, #[case] quarter: u32) {
        assert_eq!(YearMonth::new(2023, month).unwrap().quarter(), quarter);
    }

    #[test]
    fn test_year_month_validation_and_display() {
        assert!(YearMonth::new(2024, 0).is_err());
        assert!(YearMonth::new(2024, 13).is_err());
        assert_eq!(YearMonth::new(2025, 3).unwrap().to_string(), "2025-03");
    }

    #[test]
    fn test_reading_validation() {
        assert!(reading(1, 2024, 5, 10.0, 2.0).validate().is_ok());
        assert!(reading(1, 2024, 13, 10.0, 2.0).validate().is_err());
        assert!(reading(1, 2024, 5, -1.0, 2.0).validate().is_err());
        assert!(reading(1, 2024, 5, 1.0, f64::NAN).validate().is_err());
    }

    #[test]
    fn test_aggregate_sums_selected_buildings() {
        let readings = vec![
            reading(1, 2023, 2, 100.0, 10.0),
            reading(2, 2023, 2, 50.0, 5.0),
            reading(3, 2023, 2, 999.0, 99.0),
            reading(1, 2023, 1, 80.0, 8.0),
        ];

        let series = aggregate_monthly(&[1, 2], &readings);
        assert_eq!(
            series,
            vec![
                MonthlyObservation {
                    year: 2023,
                    month: 1,
                    total_kwh: 80.0,
                    total_cost: 8.0,
                    time_index: 1,
                },
                MonthlyObservation {
                    year: 2023,
                    month: 2,
                    total_kwh: 150.0,
                    total_cost: 15.0,
                    time_index: 2,
                },
            ]
        );
    }

    #[test]
    fn test_aggregate_time_index_ignores_calendar_gaps() {
        let readings = vec![
            reading(1, 2024, 6, 1.0, 1.0),
            reading(1, 2021, 12, 1.0, 1.0),
            reading(1, 2022, 1, 1.0, 1.0),
            reading(1, 2023, 3, 1.0, 1.0),
        ];

        let series = aggregate_monthly(&[1], &readings);
        let periods: Vec<String> = series.iter().map(|o| o.period().to_string()).collect();
        let indices: Vec<usize> = series.iter().map(|o| o.time_index).collect();

        assert_eq!(periods, vec!["2021-12", "2022-01", "2023-03", "2024-06"]);
        assert_eq!(indices, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_aggregate_empty_building_set() {
        let readings = vec![reading(1, 2024, 1, 1.0, 1.0)];
        assert!(aggregate_monthly(&[], &readings).is_empty());
        assert!(aggregate_monthly(&[42], &readings).is_empty());
    }
}
