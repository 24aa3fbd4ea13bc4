//! Budget versus energy spend

use crate::catalog::Catalog;
use crate::data::{BuildingId, DepartmentId, MonthlyReading};
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Money allocated to a department for one fiscal quarter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAllocation {
    pub department_id: DepartmentId,
    pub year: i32,
    pub quarter: u32,
    pub amount: f64,
}

impl BudgetAllocation {
    pub fn validate(&self) -> Result<()> {
        if !(1..=4).contains(&self.quarter) {
            return Err(ForecastError::DataError(format!(
                "department {}: quarter {} of {} is out of range",
                self.department_id, self.quarter, self.year
            )));
        }
        if !(self.amount.is_finite() && self.amount >= 0.0) {
            return Err(ForecastError::DataError(format!(
                "department {}: budget must be non-negative, got {}",
                self.department_id, self.amount
            )));
        }
        Ok(())
    }
}

/// Budget and spend of one quarter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterComparison {
    pub quarter: u32,
    pub budget: f64,
    pub spend: f64,
    /// `budget − spend`; negative when overspent
    pub difference: f64,
    /// `spend / budget`, 0.0 without a budget
    pub spend_ratio: f64,
}

/// Headline figures of one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualKpis {
    pub year: i32,
    pub total_kwh: f64,
    pub total_cost: f64,
    pub total_budget: f64,
    /// Buildings with at least one reading in the year
    pub building_count: usize,
}

/// Compare the departments' quarterly budgets with the energy cost of all
/// their buildings in `year`
pub fn quarterly_budget_comparison(
    readings: &[MonthlyReading],
    budgets: &[BudgetAllocation],
    catalog: &Catalog,
    year: i32,
    departments: &[DepartmentId],
) -> Vec<QuarterComparison> {
    let buildings: HashSet<BuildingId> = catalog
        .buildings_of_departments(departments)
        .into_iter()
        .collect();

    (1..=4)
        .map(|quarter| {
            let budget: f64 = budgets
                .iter()
                .filter(|b| b.year == year && b.quarter == quarter)
                .filter(|b| departments.contains(&b.department_id))
                .map(|b| b.amount)
                .sum();
            let spend: f64 = readings
                .iter()
                .filter(|r| r.year == year && r.period().quarter() == quarter)
                .filter(|r| buildings.contains(&r.building_id))
                .map(|r| r.cost)
                .sum();

            QuarterComparison {
                quarter,
                budget,
                spend,
                difference: budget - spend,
                spend_ratio: if budget > 0.0 { spend / budget } else { 0.0 },
            }
        })
        .collect()
}

/// Year totals for a building set and the budget of its departments
pub fn annual_kpis(
    readings: &[MonthlyReading],
    budgets: &[BudgetAllocation],
    year: i32,
    buildings: &[BuildingId],
    departments: &[DepartmentId],
) -> AnnualKpis {
    let wanted: HashSet<BuildingId> = buildings.iter().copied().collect();
    let in_year: Vec<&MonthlyReading> = readings
        .iter()
        .filter(|r| r.year == year && wanted.contains(&r.building_id))
        .collect();

    AnnualKpis {
        year,
        total_kwh: in_year.iter().map(|r| r.kwh).sum(),
        total_cost: in_year.iter().map(|r| r.cost).sum(),
        total_budget: budgets
            .iter()
            .filter(|b| b.year == year && departments.contains(&b.department_id))
            .map(|b| b.amount)
            .sum(),
        building_count: in_year
            .iter()
            .map(|r| r.building_id)
            .collect::<HashSet<_>>()
            .len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_catalog;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    fn budget(
        department_id: DepartmentId,
        year: i32,
        quarter: u32,
        amount: f64,
    ) -> BudgetAllocation {
        BudgetAllocation {
            department_id,
            year,
            quarter,
            amount,
        }
    }

    fn reading(building_id: BuildingId, month: u32, cost: f64) -> MonthlyReading {
        MonthlyReading {
            building_id,
            year: 2024,
            month,
            kwh: cost * 10.0,
            cost,
        }
    }

    #[test]
    fn test_quarterly_comparison() {
        let readings = vec![
            reading(1, 1, 100.0),
            reading(2, 3, 50.0),
            reading(1, 5, 400.0),
            reading(3, 5, 999.0),
            reading(1, 12, 10.0),
        ];
        let budgets = vec![
            budget(10, 2024, 1, 300.0),
            budget(10, 2024, 2, 200.0),
            budget(20, 2024, 2, 5000.0),
            budget(10, 2023, 1, 1.0),
        ];

        let quarters =
            quarterly_budget_comparison(&readings, &budgets, &sample_catalog(), 2024, &[10]);

        assert_eq!(quarters.len(), 4);
        assert_eq!(
            quarters[0],
            QuarterComparison {
                quarter: 1,
                budget: 300.0,
                spend: 150.0,
                difference: 150.0,
                spend_ratio: 0.5,
            }
        );
        assert_relative_eq!(quarters[1].difference, -200.0);
        assert_relative_eq!(quarters[1].spend_ratio, 2.0);
        assert_eq!(quarters[2].spend, 0.0);
        assert_eq!(quarters[3].spend_ratio, 0.0);
        assert_relative_eq!(quarters[3].difference, -10.0);
    }

    #[test]
    fn test_annual_kpis() {
        let readings = vec![reading(1, 1, 100.0), reading(1, 2, 20.0), reading(4, 2, 7.0)];
        let budgets = vec![budget(10, 2024, 1, 300.0), budget(10, 2024, 3, 100.0)];

        let kpis = annual_kpis(&readings, &budgets, 2024, &[1, 2], &[10]);
        assert_eq!(kpis.building_count, 1);
        assert_relative_eq!(kpis.total_cost, 120.0);
        assert_relative_eq!(kpis.total_kwh, 1200.0);
        assert_relative_eq!(kpis.total_budget, 400.0);
    }

    #[test]
    fn test_budget_validation() {
        assert!(budget(1, 2024, 4, 10.0).validate().is_ok());
        assert!(budget(1, 2024, 5, 10.0).validate().is_err());
        assert!(budget(1, 2024, 1, -3.0).validate().is_err());
    }
}
