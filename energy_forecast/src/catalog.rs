//! Building, department and sector directory with scope resolution
//!
//! Every analysis works on a concrete set of buildings. A [`ScopeFilter`]
//! names that set indirectly and [`Catalog`] resolves it.

use crate::data::{BuildingId, DepartmentId, SectorId};
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A building and the department that owns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub building_id: BuildingId,
    pub department_id: DepartmentId,
    pub name: String,
}

/// A government department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub department_id: DepartmentId,
    pub sector_id: Option<SectorId>,
    pub name: String,
}

/// A sector grouping departments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub sector_id: SectorId,
    pub name: String,
}

/// Which buildings an analysis covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "ids", rename_all = "snake_case")]
pub enum ScopeFilter {
    ByBuilding(Vec<BuildingId>),
    ByDepartment(Vec<DepartmentId>),
    BySector(Vec<SectorId>),
}

impl ScopeFilter {
    /// Parse a scope from its kind (`building`, `department` or `sector`)
    /// and a comma separated id list such as `"1,2,3"`
    pub fn parse(kind: &str, ids: &str) -> Result<Self> {
        let ids = ids
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<u32>().map_err(|_| {
                    ForecastError::InvalidParameter(format!("invalid identifier '{}'", s))
                })
            })
            .collect::<Result<Vec<u32>>>()?;

        if ids.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "at least one identifier is required, e.g. '1,2,3'".to_string(),
            ));
        }

        match kind.trim().to_lowercase().as_str() {
            "building" => Ok(Self::ByBuilding(ids)),
            "department" => Ok(Self::ByDepartment(ids)),
            "sector" => Ok(Self::BySector(ids)),
            other => Err(ForecastError::InvalidParameter(format!(
                "unknown scope '{}', expected building, department or sector",
                other
            ))),
        }
    }
}

/// In-memory directory of buildings, departments and sectors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    buildings: Vec<Building>,
    departments: Vec<Department>,
    sectors: Vec<Sector>,
}

impl Catalog {
    pub fn new(
        buildings: Vec<Building>,
        departments: Vec<Department>,
        sectors: Vec<Sector>,
    ) -> Self {
        Self {
            buildings,
            departments,
            sectors,
        }
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.iter().find(|b| b.building_id == id)
    }

    pub fn department(&self, id: DepartmentId) -> Option<&Department> {
        self.departments.iter().find(|d| d.department_id == id)
    }

    pub fn sector(&self, id: SectorId) -> Option<&Sector> {
        self.sectors.iter().find(|s| s.sector_id == id)
    }

    /// Buildings owned by any of the given departments, sorted
    pub fn buildings_of_departments(&self, departments: &[DepartmentId]) -> Vec<BuildingId> {
        self.buildings
            .iter()
            .filter(|b| departments.contains(&b.department_id))
            .map(|b| b.building_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Resolve a scope to a sorted, de-duplicated set of known buildings.
    /// Unknown identifiers are ignored.
    pub fn resolve_buildings(&self, filter: &ScopeFilter) -> Vec<BuildingId> {
        let resolved: Vec<BuildingId> = match filter {
            ScopeFilter::ByBuilding(ids) => self
                .buildings
                .iter()
                .filter(|b| ids.contains(&b.building_id))
                .map(|b| b.building_id)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
            ScopeFilter::ByDepartment(_) | ScopeFilter::BySector(_) => {
                self.buildings_of_departments(&self.resolve_departments(filter))
            }
        };

        if resolved.is_empty() {
            tracing::warn!(?filter, "scope matches no known building");
        } else {
            tracing::debug!(?filter, buildings = resolved.len(), "resolved scope to buildings");
        }
        resolved
    }

    /// Resolve a scope to the departments it touches. A building resolves
    /// to its owning department.
    pub fn resolve_departments(&self, filter: &ScopeFilter) -> Vec<DepartmentId> {
        let ids: BTreeSet<DepartmentId> = match filter {
            ScopeFilter::ByBuilding(ids) => self
                .buildings
                .iter()
                .filter(|b| ids.contains(&b.building_id))
                .map(|b| b.department_id)
                .collect(),
            ScopeFilter::ByDepartment(ids) => self
                .departments
                .iter()
                .filter(|d| ids.contains(&d.department_id))
                .map(|d| d.department_id)
                .collect(),
            ScopeFilter::BySector(ids) => self
                .departments
                .iter()
                .filter(|d| d.sector_id.is_some_and(|s| ids.contains(&s)))
                .map(|d| d.department_id)
                .collect(),
        };
        ids.into_iter().collect()
    }
}
