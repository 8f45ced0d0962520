//! Record Ingestion
//!
//! Writes new stop records into `traffic_stops`. Every record goes through
//! the same rules whether it comes from the registration form, the HTTP API
//! or a CSV seed file:
//!
//! - a present driver age must fall in `[0, 120]`
//! - `search_type` is stored as NULL unless a search was conducted
//! - a missing `driver_age_raw` takes the value of `driver_age`

mod csv_import;

pub use csv_import::{CsvImportResult, StopCsvImporter};

use rusqlite::{params, Connection};
use std::sync::Arc;

use crate::records::{StopRecord, MAX_DRIVER_AGE, MIN_DRIVER_AGE};
use crate::store::{schema, Store, StoreError, StoreResult, DATE_FORMAT, TIME_FORMAT};

/// Inserts stop records into the store
#[derive(Debug, Clone)]
pub struct Ingestor {
    store: Arc<Store>,
}

impl Ingestor {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Validate and insert a single record
    pub fn insert(&self, record: &StopRecord) -> StoreResult<()> {
        validate(record)?;

        let result = self
            .store
            .with_connection(|conn| insert_with(conn, record));

        match &result {
            Ok(()) => tracing::info!(
                country = %record.country_name,
                violation = %record.violation,
                "Stop record inserted"
            ),
            Err(e) => tracing::error!(error = %e, "Failed to insert stop record"),
        }
        result
    }

    /// Validate every record, then insert them all in one transaction.
    ///
    /// Nothing is written if any record is invalid or any insert fails.
    pub fn insert_batch(&self, records: &[StopRecord]) -> StoreResult<usize> {
        for record in records {
            validate(record)?;
        }

        let inserted = self.store.with_connection(|conn| {
            let tx = conn.transaction()?;
            for record in records {
                insert_with(&tx, record)?;
            }
            tx.commit()?;
            Ok(records.len())
        })?;

        tracing::info!(count = inserted, "Stop records inserted");
        Ok(inserted)
    }
}

/// Check a record against the ingestion rules
pub fn validate(record: &StopRecord) -> StoreResult<()> {
    if let Some(age) = record.driver_age {
        if !(MIN_DRIVER_AGE..=MAX_DRIVER_AGE).contains(&age) {
            return Err(StoreError::Validation(format!(
                "driver age {} is outside {}..={}",
                age, MIN_DRIVER_AGE, MAX_DRIVER_AGE
            )));
        }
    }
    Ok(())
}

/// Insert a record on an open connection (or transaction)
pub(crate) fn insert_with(conn: &Connection, record: &StopRecord) -> StoreResult<()> {
    conn.execute(
        schema::INSERT_STOP,
        params![
            record.stop_date.format(DATE_FORMAT).to_string(),
            record.stop_time.format(TIME_FORMAT).to_string(),
            record.country_name,
            record.driver_gender,
            record.effective_age_raw(),
            record.driver_age,
            record.driver_race,
            record.violation_raw,
            record.violation,
            record.search_conducted,
            record.effective_search_type(),
            record.stop_outcome,
            record.is_arrested,
            record.stop_duration,
            record.drugs_related_stop,
            record.vehicle_number,
        ],
    )?;
    Ok(())
}
