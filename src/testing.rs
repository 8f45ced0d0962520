//! Fixtures shared by unit tests

use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use tempfile::TempDir;

use crate::ingest::Ingestor;
use crate::records::StopRecord;
use crate::store::Store;

/// A fresh store in a temporary directory; keep the directory alive
pub(crate) fn temp_store() -> (Arc<Store>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("traffic_stops.db")).unwrap();
    (Arc::new(store), dir)
}

/// An unremarkable afternoon stop
pub(crate) fn record() -> StopRecord {
    StopRecord {
        stop_date: NaiveDate::from_ymd_opt(2020, 1, 5).unwrap(),
        stop_time: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
        country_name: "Canada".to_string(),
        driver_gender: "M".to_string(),
        driver_age_raw: None,
        driver_age: Some(30),
        driver_race: Some("White".to_string()),
        violation_raw: "Speeding".to_string(),
        violation: "Speeding".to_string(),
        search_conducted: false,
        search_type: None,
        stop_outcome: "Citation".to_string(),
        is_arrested: false,
        stop_duration: Some("0-15 Min".to_string()),
        drugs_related_stop: false,
        vehicle_number: None,
    }
}

/// The same stop moved to a given hour
pub(crate) fn at_hour(stop: StopRecord, hour: u32) -> StopRecord {
    StopRecord {
        stop_time: NaiveTime::from_hms_opt(hour, 15, 0).unwrap(),
        ..stop
    }
}

pub(crate) fn seed(store: &Arc<Store>, stops: &[StopRecord]) {
    Ingestor::new(Arc::clone(store)).insert_batch(stops).unwrap();
}
