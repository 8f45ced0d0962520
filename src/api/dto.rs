//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::reports::{ReportDefinition, ReportTier};
use crate::search::{Filter, Predicate, Selection, Summary};
use crate::store::Table;

// ============================================
// STOP DTOs
// ============================================

/// Query parameters for GET /api/v1/stops
#[derive(Debug, Default, Deserialize)]
pub struct StopQuery {
    /// Only stops where a search was conducted
    #[serde(default)]
    pub searched_only: bool,
    pub search_type: Option<String>,
    pub country: Option<String>,
    pub violation: Option<String>,
    pub gender: Option<String>,
    /// Vehicle number fragment (case-insensitive)
    pub vehicle: Option<String>,
    pub age_min: Option<f64>,
    pub age_max: Option<f64>,
}

impl StopQuery {
    /// Translate the parameters into an in-memory filter
    pub fn filter(&self) -> Filter {
        let mut filter = Filter::new();

        if self.searched_only {
            filter.push(Predicate::equals("search_conducted", true));
        }

        let facets = [
            ("search_type", &self.search_type),
            ("country_name", &self.country),
            ("violation", &self.violation),
            ("driver_gender", &self.gender),
        ];
        for (column, choice) in facets {
            let selection = Selection::parse(choice.as_deref());
            if !selection.is_all() {
                filter.push(Predicate::equals(column, selection));
            }
        }

        // Blank means no filter; otherwise the fragment is matched as typed
        if let Some(vehicle) = self.vehicle.as_deref() {
            if !vehicle.trim().is_empty() {
                filter.push(Predicate::contains("vehicle_number", vehicle));
            }
        }

        if self.age_min.is_some() || self.age_max.is_some() {
            filter.push(Predicate::range(
                "driver_age",
                self.age_min.unwrap_or(f64::NEG_INFINITY),
                self.age_max.unwrap_or(f64::INFINITY),
            ));
        }

        filter
    }
}

/// Filtered stops plus aggregates over them
#[derive(Debug, Serialize)]
pub struct StopsResponse {
    pub table: Table,
    pub summary: Summary,
}

/// Stop registration response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Status: "ok"
    pub status: String,
    /// Number of stop records after the insert
    pub total_stops: i64,
}

// ============================================
// REPORT DTOs
// ============================================

/// Query parameters naming a report
#[derive(Debug, Deserialize)]
pub struct ReportParams {
    pub name: String,
}

/// Reports available in a tier
#[derive(Debug, Serialize)]
pub struct ReportListResponse {
    pub tier: ReportTier,
    pub title: String,
    pub reports: Vec<ReportDefinition>,
}

/// Result of running a report
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub tier: ReportTier,
    pub name: String,
    pub row_count: usize,
    pub table: Table,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy or unhealthy
    pub status: String,
    /// Record store status
    pub store: String,
    /// Number of stop records, when the store is reachable
    pub total_stops: Option<i64>,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
