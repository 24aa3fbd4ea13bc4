//! Historical consumption analytics over a set of buildings

use crate::catalog::Catalog;
use crate::data::{aggregate_monthly, BuildingId, MonthlyObservation, MonthlyReading};
use crate::error::{ForecastError, Result};
use energy_math::moving_averages::rolling_mean;
use energy_math::statistics::mean;
use energy_math::LinearFit;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// Reduction rate used when none is given
pub const DEFAULT_SAVINGS_RATE: f64 = 0.10;

/// Most building series a monthly comparison returns
pub const MAX_COMPARISON_SERIES: usize = 20;

/// Consumption of one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualTotal {
    pub year: i32,
    pub total_kwh: f64,
    pub total_cost: f64,
    pub mean_monthly_kwh: f64,
}

/// Consumption of one month within a year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month: u32,
    pub kwh: f64,
    pub cost: f64,
}

/// Average consumption of a calendar month across all years
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProfile {
    pub month: u32,
    pub mean_kwh: f64,
    pub mean_cost: f64,
}

/// A month of the series with its trailing kWh mean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothedObservation {
    pub year: i32,
    pub month: u32,
    pub kwh: f64,
    pub cost: f64,
    pub rolling_kwh: f64,
}

/// Effect of cutting consumption by a fixed rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsPotential {
    pub current_kwh: f64,
    pub savings_kwh: f64,
    pub projected_kwh: f64,
}

/// Sign of the year-over-year kWh trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearlyDirection {
    Rising,
    Falling,
    Flat,
}

/// Least-squares line through annual kWh totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyTrend {
    pub slope: f64,
    pub intercept: f64,
    pub direction: YearlyDirection,
    pub years: Vec<AnnualTotal>,
}

/// Consumption of one department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentConsumption {
    pub sector: Option<String>,
    pub department: String,
    pub total_kwh: f64,
    pub total_cost: f64,
}

/// A building's place in a consumption ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingRank {
    pub building_id: BuildingId,
    pub name: Option<String>,
    pub total_kwh: f64,
    pub total_cost: f64,
}

/// One building's twelve months of a year, January first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingMonthlySeries {
    pub building_id: BuildingId,
    pub name: Option<String>,
    pub kwh: [f64; 12],
    pub cost: [f64; 12],
}

/// Analytics over the readings of a fixed building set
#[derive(Debug, Clone)]
pub struct ConsumptionAnalytics<'a> {
    readings: Vec<&'a MonthlyReading>,
    monthly: Vec<MonthlyObservation>,
}

impl<'a> ConsumptionAnalytics<'a> {
    pub fn new(readings: &'a [MonthlyReading], buildings: &[BuildingId]) -> Self {
        let wanted: HashSet<BuildingId> = buildings.iter().copied().collect();
        Self {
            readings: readings
                .iter()
                .filter(|r| wanted.contains(&r.building_id))
                .collect(),
            monthly: aggregate_monthly(buildings, readings),
        }
    }

    /// The aggregated monthly series
    pub fn monthly_series(&self) -> &[MonthlyObservation] {
        &self.monthly
    }

    /// Totals per year, oldest first
    pub fn annual_totals(&self) -> Vec<AnnualTotal> {
        let mut years: BTreeMap<i32, Vec<&MonthlyObservation>> = BTreeMap::new();
        for obs in &self.monthly {
            years.entry(obs.year).or_default().push(obs);
        }

        years
            .into_iter()
            .map(|(year, months)| {
                let kwh: Vec<f64> = months.iter().map(|o| o.total_kwh).collect();
                AnnualTotal {
                    year,
                    total_kwh: kwh.iter().sum(),
                    total_cost: months.iter().map(|o| o.total_cost).sum(),
                    mean_monthly_kwh: mean(&kwh),
                }
            })
            .collect()
    }

    /// Monthly totals of one year, January first
    pub fn monthly_breakdown(&self, year: i32) -> Vec<MonthlyTotal> {
        self.monthly
            .iter()
            .filter(|o| o.year == year)
            .map(|o| MonthlyTotal {
                month: o.month,
                kwh: o.total_kwh,
                cost: o.total_cost,
            })
            .collect()
    }

    /// Mean of every calendar month across years, for months with data
    pub fn monthly_profile(&self) -> Vec<MonthlyProfile> {
        let mut months: BTreeMap<u32, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
        for obs in &self.monthly {
            let entry = months.entry(obs.month).or_default();
            entry.0.push(obs.total_kwh);
            entry.1.push(obs.total_cost);
        }

        months
            .into_iter()
            .map(|(month, (kwh, cost))| MonthlyProfile {
                month,
                mean_kwh: mean(&kwh),
                mean_cost: mean(&cost),
            })
            .collect()
    }

    /// The `n` months with the highest kWh, highest first
    pub fn top_months(&self, n: usize) -> Vec<MonthlyObservation> {
        let mut ranked = self.monthly.clone();
        ranked.sort_by(|a, b| {
            b.total_kwh
                .partial_cmp(&a.total_kwh)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.period().cmp(&b.period()))
        });
        ranked.truncate(n);
        ranked
    }

    /// The series with a trailing kWh mean over `window` months
    pub fn rolling_trend(&self, window: usize) -> Result<Vec<SmoothedObservation>> {
        let kwh: Vec<f64> = self.monthly.iter().map(|o| o.total_kwh).collect();
        let smoothed = rolling_mean(&kwh, window)?;

        Ok(self
            .monthly
            .iter()
            .zip(smoothed)
            .map(|(o, rolling_kwh)| SmoothedObservation {
                year: o.year,
                month: o.month,
                kwh: o.total_kwh,
                cost: o.total_cost,
                rolling_kwh,
            })
            .collect())
    }

    /// Year with the highest kWh total
    pub fn peak_year(&self) -> Option<AnnualTotal> {
        self.annual_totals().into_iter().max_by(|a, b| {
            a.total_kwh
                .partial_cmp(&b.total_kwh)
                .unwrap_or(Ordering::Equal)
        })
    }

    /// kWh saved if consumption dropped by `rate` (0.10 = 10%)
    pub fn savings_potential(&self, rate: f64) -> Result<SavingsPotential> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(ForecastError::InvalidParameter(format!(
                "reduction rate must be between 0 and 1, got {}",
                rate
            )));
        }

        let current_kwh: f64 = self.monthly.iter().map(|o| o.total_kwh).sum();
        let savings_kwh = current_kwh * rate;
        Ok(SavingsPotential {
            current_kwh,
            savings_kwh,
            projected_kwh: current_kwh - savings_kwh,
        })
    }

    /// Line through (year, annual kWh). Fewer than two years is flat.
    pub fn yearly_trend(&self) -> Result<YearlyTrend> {
        let years = self.annual_totals();
        if years.len() < 2 {
            return Ok(YearlyTrend {
                slope: 0.0,
                intercept: 0.0,
                direction: YearlyDirection::Flat,
                years,
            });
        }

        let xs: Vec<f64> = years.iter().map(|y| y.year as f64).collect();
        let ys: Vec<f64> = years.iter().map(|y| y.total_kwh).collect();
        let fit = LinearFit::fit(&xs, &ys)?;

        let direction = if fit.slope > 0.0 {
            YearlyDirection::Rising
        } else if fit.slope < 0.0 {
            YearlyDirection::Falling
        } else {
            YearlyDirection::Flat
        };

        Ok(YearlyTrend {
            slope: fit.slope,
            intercept: fit.intercept,
            direction,
            years,
        })
    }

    /// Buildings by kWh in `year`, highest first, at most `limit`
    pub fn building_ranking(
        &self,
        catalog: &Catalog,
        year: i32,
        limit: usize,
    ) -> Vec<BuildingRank> {
        let mut totals: BTreeMap<BuildingId, (f64, f64)> = BTreeMap::new();
        for r in self.readings.iter().filter(|r| r.year == year) {
            let entry = totals.entry(r.building_id).or_insert((0.0, 0.0));
            entry.0 += r.kwh;
            entry.1 += r.cost;
        }

        let mut ranking: Vec<BuildingRank> = totals
            .into_iter()
            .map(|(building_id, (total_kwh, total_cost))| BuildingRank {
                building_id,
                name: catalog.building(building_id).map(|b| b.name.clone()),
                total_kwh,
                total_cost,
            })
            .collect();
        ranking.sort_by(|a, b| {
            b.total_kwh
                .partial_cmp(&a.total_kwh)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.building_id.cmp(&b.building_id))
        });
        ranking.truncate(limit);
        ranking
    }

    /// Side-by-side monthly kWh and cost of each building in `year`.
    ///
    /// Buildings come in id order, at most `limit` of them and never more
    /// than [`MAX_COMPARISON_SERIES`]. Months without readings are 0.0.
    pub fn monthly_comparison(
        &self,
        catalog: &Catalog,
        year: i32,
        limit: usize,
    ) -> Vec<BuildingMonthlySeries> {
        let mut series: BTreeMap<BuildingId, ([f64; 12], [f64; 12])> = BTreeMap::new();
        for r in self.readings.iter().filter(|r| r.year == year) {
            let (kwh, cost) = series.entry(r.building_id).or_insert(([0.0; 12], [0.0; 12]));
            if let Some(slot) = r.month.checked_sub(1).map(|m| m as usize).filter(|&m| m < 12) {
                kwh[slot] += r.kwh;
                cost[slot] += r.cost;
            }
        }

        series
            .into_iter()
            .take(limit.min(MAX_COMPARISON_SERIES))
            .map(|(building_id, (kwh, cost))| BuildingMonthlySeries {
                building_id,
                name: catalog.building(building_id).map(|b| b.name.clone()),
                kwh,
                cost,
            })
            .collect()
    }
}

/// kWh and cost per department across all readings, ordered by sector then
/// department name. Readings of buildings missing from the catalog are skipped.
pub fn department_breakdown(
    readings: &[MonthlyReading],
    catalog: &Catalog,
) -> Vec<DepartmentConsumption> {
    let mut totals: BTreeMap<(Option<String>, String), (f64, f64)> = BTreeMap::new();

    for r in readings {
        let Some(building) = catalog.building(r.building_id) else {
            continue;
        };
        let Some(department) = catalog.department(building.department_id) else {
            continue;
        };
        let sector = department
            .sector_id
            .and_then(|id| catalog.sector(id))
            .map(|s| s.name.clone());

        let entry = totals
            .entry((sector, department.name.clone()))
            .or_insert((0.0, 0.0));
        entry.0 += r.kwh;
        entry.1 += r.cost;
    }

    totals
        .into_iter()
        .map(|((sector, department), (total_kwh, total_cost))| DepartmentConsumption {
            sector,
            department,
            total_kwh,
            total_cost,
        })
        .collect()
}
