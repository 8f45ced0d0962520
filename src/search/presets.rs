//! Filters behind the three search pages

use super::{Filter, Predicate, Selection};

/// Stops where a search was conducted, narrowed by facet selections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentSearch {
    pub search_type: Selection,
    pub country: Selection,
    pub violation: Selection,
}

impl IncidentSearch {
    pub fn filter(&self) -> Filter {
        Filter::new()
            .and(Predicate::equals("search_conducted", true))
            .and(Predicate::equals("search_type", self.search_type.clone()))
            .and(Predicate::equals("country_name", self.country.clone()))
            .and(Predicate::equals("violation", self.violation.clone()))
    }
}

/// Case-insensitive lookup by vehicle number fragment
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSearch {
    pub vehicle_number: String,
}

impl VehicleSearch {
    pub fn new(vehicle_number: impl Into<String>) -> Self {
        Self {
            vehicle_number: vehicle_number.into(),
        }
    }

    pub fn filter(&self) -> Filter {
        Filter::new().and(Predicate::contains("vehicle_number", self.vehicle_number.as_str()))
    }
}

/// Drivers within an age range, optionally of one gender
#[derive(Debug, Clone, PartialEq)]
pub struct DriverSearch {
    pub age_min: f64,
    pub age_max: f64,
    pub gender: Selection,
}

impl DriverSearch {
    pub fn filter(&self) -> Filter {
        Filter::new()
            .and(Predicate::range("driver_age", self.age_min, self.age_max))
            .and(Predicate::equals("driver_gender", self.gender.clone()))
    }
}
