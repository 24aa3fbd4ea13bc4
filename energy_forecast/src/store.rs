//! Read-only storage layer backed by CSV tables

use crate::budget::BudgetAllocation;
use crate::catalog::{Building, Catalog, Department, Sector};
use crate::config::DataSourceConfig;
use crate::data::MonthlyReading;
use crate::error::{ForecastError, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::Path;

/// Consumption readings, the building directory and budgets, loaded once
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    readings: Vec<MonthlyReading>,
    catalog: Catalog,
    budgets: Vec<BudgetAllocation>,
}

impl DataStore {
    /// Assemble a store from already validated parts
    pub fn new(
        readings: Vec<MonthlyReading>,
        catalog: Catalog,
        budgets: Vec<BudgetAllocation>,
    ) -> Self {
        Self {
            readings,
            catalog,
            budgets,
        }
    }

    /// Load every table named in `config`
    pub fn load(config: &DataSourceConfig) -> Result<Self> {
        let readings: Vec<MonthlyReading> = read_table(&config.readings_path)?;
        for (row, reading) in readings.iter().enumerate() {
            reading.validate().map_err(|e| row_error(&config.readings_path, row, e))?;
        }

        let buildings: Vec<Building> = read_table(&config.buildings_path)?;
        let departments: Vec<Department> = read_table(&config.departments_path)?;
        let sectors: Vec<Sector> = match &config.sectors_path {
            Some(path) => read_table(path)?,
            None => Vec::new(),
        };

        let budgets: Vec<BudgetAllocation> = match &config.budgets_path {
            Some(path) => {
                let budgets: Vec<BudgetAllocation> = read_table(path)?;
                for (row, budget) in budgets.iter().enumerate() {
                    budget.validate().map_err(|e| row_error(path, row, e))?;
                }
                budgets
            }
            None => Vec::new(),
        };

        let catalog = Catalog::new(buildings, departments, sectors);
        tracing::info!(
            readings = readings.len(),
            buildings = catalog.buildings().len(),
            departments = catalog.departments().len(),
            sectors = catalog.sectors().len(),
            budgets = budgets.len(),
            "loaded data store"
        );

        Ok(Self::new(readings, catalog, budgets))
    }

    pub fn readings(&self) -> &[MonthlyReading] {
        &self.readings
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn budgets(&self) -> &[BudgetAllocation] {
        &self.budgets
    }
}

/// Deserialize every row of a headed CSV file
fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|e| {
        ForecastError::DataError(format!("cannot open {}: {}", path.display(), e))
    })?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, csv::Error>>()?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "read table");
    Ok(rows)
}

fn row_error(path: &Path, row: usize, err: ForecastError) -> ForecastError {
    // +2: header line and 1-based numbering
    ForecastError::DataError(format!("{} line {}: {}", path.display(), row + 2, err))
}
