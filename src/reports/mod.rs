//! Report Catalog
//!
//! Two fixed tiers of named, parameterless analytical queries over
//! `traffic_stops`:
//!
//! - **Standard**: grouping, counting and rate reports
//! - **Advanced**: window-function reports (rankings, partition shares)
//!
//! Report names and their order are stable; they are what users pick from.
//! Running a report returns the store's [`Table`] unchanged. An empty result
//! is still a table carrying the report's columns.

mod advanced;
mod export;
mod standard;

pub use export::{export_filename, slugify, write_export};

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::store::{Store, StoreError, StoreResult, Table};

/// Report complexity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTier {
    Standard,
    Advanced,
}

impl ReportTier {
    pub fn all() -> &'static [ReportTier] {
        &[ReportTier::Standard, ReportTier::Advanced]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportTier::Standard => "standard",
            ReportTier::Advanced => "advanced",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportTier::Standard => "Standard Reports",
            ReportTier::Advanced => "Advanced Reports",
        }
    }

    /// Report definitions of this tier, in catalog order
    pub fn definitions(self) -> &'static [ReportDefinition] {
        match self {
            ReportTier::Standard => standard::REPORTS,
            ReportTier::Advanced => advanced::REPORTS,
        }
    }
}

impl fmt::Display for ReportTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportTier {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "medium" => Ok(ReportTier::Standard),
            "advanced" | "complex" => Ok(ReportTier::Advanced),
            other => Err(StoreError::Validation(format!(
                "unknown report tier '{}' (expected standard or advanced)",
                other
            ))),
        }
    }
}

/// A named query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    pub sql: &'static str,
}

/// Runs catalog reports against the store
#[derive(Debug, Clone)]
pub struct ReportCatalog {
    store: Arc<Store>,
}

impl ReportCatalog {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Report names of a tier, in catalog order
    pub fn list(&self, tier: ReportTier) -> Vec<&'static str> {
        tier.definitions().iter().map(|r| r.name).collect()
    }

    /// Look up a report by exact name
    pub fn find(&self, tier: ReportTier, name: &str) -> StoreResult<&'static ReportDefinition> {
        tier.definitions()
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| StoreError::UnknownReport(format!("{} ({} tier)", name, tier)))
    }

    /// Run a report by name
    pub fn run(&self, tier: ReportTier, name: &str) -> StoreResult<Table> {
        let report = self.find(tier, name)?;
        self.run_definition(report)
    }

    /// Run a report definition
    pub fn run_definition(&self, report: &ReportDefinition) -> StoreResult<Table> {
        match self.store.execute(report.sql) {
            Ok(table) => {
                tracing::info!(report = report.name, rows = table.len(), "Report executed");
                Ok(table)
            }
            Err(e) => {
                tracing::error!(report = report.name, error = %e, "Report failed");
                Err(e)
            }
        }
    }
}
