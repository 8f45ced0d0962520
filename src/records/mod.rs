//! Stop records
//!
//! - **StopRecord**: one row of `traffic_stops`, as written by ingestion
//! - **buckets**: age and time-of-day classifications shared with reports

mod buckets;

pub use buckets::{AgeBucket, DayPart, TimeOfDay};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Lowest driver age accepted by ingestion
pub const MIN_DRIVER_AGE: i64 = 0;

/// Highest driver age accepted by ingestion
pub const MAX_DRIVER_AGE: i64 = 120;

/// One vehicle stop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopRecord {
    pub stop_date: NaiveDate,
    pub stop_time: NaiveTime,
    pub country_name: String,
    /// M, F or Other
    pub driver_gender: String,
    /// Age as captured at the source; defaults to `driver_age` when absent
    #[serde(default)]
    pub driver_age_raw: Option<i64>,
    #[serde(default)]
    pub driver_age: Option<i64>,
    #[serde(default)]
    pub driver_race: Option<String>,
    pub violation_raw: String,
    pub violation: String,
    #[serde(default)]
    pub search_conducted: bool,
    /// Only meaningful when `search_conducted` is set
    #[serde(default)]
    pub search_type: Option<String>,
    pub stop_outcome: String,
    #[serde(default)]
    pub is_arrested: bool,
    /// Free text such as "15 mins"
    #[serde(default)]
    pub stop_duration: Option<String>,
    #[serde(default)]
    pub drugs_related_stop: bool,
    #[serde(default)]
    pub vehicle_number: Option<String>,
}

impl StopRecord {
    /// Search type as it must be persisted: null unless a search happened
    pub fn effective_search_type(&self) -> Option<&str> {
        if self.search_conducted {
            self.search_type.as_deref()
        } else {
            None
        }
    }

    /// Raw age as it must be persisted
    pub fn effective_age_raw(&self) -> Option<i64> {
        self.driver_age_raw.or(self.driver_age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::record;

    #[test]
    fn test_search_type_dropped_without_search() {
        let stop = StopRecord {
            search_conducted: false,
            search_type: Some("Vehicle".to_string()),
            ..record()
        };
        assert_eq!(stop.effective_search_type(), None);

        let searched = StopRecord {
            search_conducted: true,
            ..stop
        };
        assert_eq!(searched.effective_search_type(), Some("Vehicle"));
    }

    #[test]
    fn test_age_raw_defaults_to_age() {
        let stop = StopRecord {
            driver_age: Some(31),
            driver_age_raw: None,
            ..record()
        };
        assert_eq!(stop.effective_age_raw(), Some(31));

        let with_raw = StopRecord {
            driver_age_raw: Some(1989),
            ..stop
        };
        assert_eq!(with_raw.effective_age_raw(), Some(1989));
    }

    #[test]
    fn test_deserialize_form_payload() {
        let json = r#"{
            "stop_date": "2024-03-01",
            "stop_time": "21:15:00",
            "country_name": "France",
            "driver_gender": "F",
            "driver_age": 29,
            "violation_raw": "Speeding",
            "violation": "Speeding",
            "search_conducted": false,
            "search_type": "Vehicle",
            "stop_outcome": "Warning",
            "vehicle_number": "XY-981"
        }"#;

        let stop: StopRecord = serde_json::from_str(json).unwrap();
        assert_eq!(stop.driver_age, Some(29));
        assert!(!stop.is_arrested);
        assert_eq!(stop.effective_search_type(), None);
        assert_eq!(stop.stop_duration, None);
    }
}
