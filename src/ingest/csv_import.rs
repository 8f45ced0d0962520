//! CSV Import
//!
//! Seeds `traffic_stops` from a CSV file whose header names the table
//! columns. Column order is free and optional columns may be missing.

use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use super::{validate, Ingestor};
use crate::records::StopRecord;
use crate::store::{StoreError, StoreResult};

/// Most error messages kept in a result
const MAX_ERRORS: usize = 100;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

const REQUIRED_COLUMNS: [&str; 2] = ["stop_date", "stop_time"];

/// Parser for stop-record CSV files
#[derive(Debug, Default, Clone, Copy)]
pub struct StopCsvImporter;

/// Result of parsing a CSV file
#[derive(Debug, Default)]
pub struct CsvImportResult {
    pub records: Vec<StopRecord>,
    pub rows_processed: usize,
    pub rows_failed: usize,
    pub errors: Vec<String>,
}

impl CsvImportResult {
    fn fail(&mut self, line: usize, message: impl std::fmt::Display) {
        self.rows_failed += 1;
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(format!("Line {}: {}", line, message));
        }
    }

    /// Insert every parsed record in one transaction
    pub fn commit(&self, ingestor: &Ingestor) -> StoreResult<usize> {
        ingestor.insert_batch(&self.records)
    }
}

impl StopCsvImporter {
    pub fn new() -> Self {
        Self
    }

    /// Parse a CSV file
    pub fn parse_path(&self, path: &Path) -> StoreResult<CsvImportResult> {
        let file = std::fs::File::open(path)?;
        self.parse_reader(file)
    }

    /// Parse CSV text
    pub fn parse_str(&self, csv_data: &str) -> StoreResult<CsvImportResult> {
        self.parse_reader(csv_data.as_bytes())
    }

    /// Parse CSV from any reader.
    ///
    /// A missing required column fails the whole parse; bad rows are
    /// counted and skipped.
    pub fn parse_reader<R: Read>(&self, reader: R) -> StoreResult<CsvImportResult> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: HashMap<String, usize> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.trim().to_lowercase(), idx))
            .collect();

        for column in REQUIRED_COLUMNS {
            if !headers.contains_key(column) {
                return Err(StoreError::Validation(format!(
                    "CSV header is missing required column '{}'",
                    column
                )));
            }
        }

        let mut result = CsvImportResult::default();

        for (line_num, row) in reader.records().enumerate() {
            // Header is line 1
            let line = line_num + 2;

            let row = match row {
                Ok(r) => r,
                Err(e) => {
                    result.fail(line, e);
                    continue;
                }
            };

            let fields = Fields {
                headers: &headers,
                row: &row,
            };

            match fields.to_record().and_then(|r| validate(&r).map(|_| r)) {
                Ok(record) => {
                    result.records.push(record);
                    result.rows_processed += 1;
                }
                Err(e) => result.fail(line, e),
            }
        }

        if result.rows_failed > 0 {
            tracing::warn!(
                failed = result.rows_failed,
                processed = result.rows_processed,
                "Some CSV rows were skipped"
            );
        }

        Ok(result)
    }

    /// Parse a file and insert its valid rows in one transaction
    pub fn import(&self, path: &Path, ingestor: &Ingestor) -> StoreResult<CsvImportResult> {
        let result = self.parse_path(path)?;
        result.commit(ingestor)?;
        tracing::info!(
            path = %path.display(),
            rows = result.rows_processed,
            "CSV import complete"
        );
        Ok(result)
    }
}

/// One CSV row viewed through the header mapping
struct Fields<'a> {
    headers: &'a HashMap<String, usize>,
    row: &'a csv::StringRecord,
}

impl Fields<'_> {
    /// Trimmed, non-empty cell for a column
    fn get(&self, column: &str) -> Option<&str> {
        let idx = *self.headers.get(column)?;
        self.row.get(idx).map(str::trim).filter(|s| !s.is_empty())
    }

    fn text(&self, column: &str) -> Option<String> {
        self.get(column).map(str::to_string)
    }

    fn text_or_empty(&self, column: &str) -> String {
        self.text(column).unwrap_or_default()
    }

    fn date(&self, column: &str) -> StoreResult<NaiveDate> {
        let raw = self.required(column)?;
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
            .ok_or_else(|| StoreError::Validation(format!("invalid {} '{}'", column, raw)))
    }

    fn time(&self, column: &str) -> StoreResult<NaiveTime> {
        let raw = self.required(column)?;
        TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
            .ok_or_else(|| StoreError::Validation(format!("invalid {} '{}'", column, raw)))
    }

    fn integer(&self, column: &str) -> StoreResult<Option<i64>> {
        match self.get(column) {
            None => Ok(None),
            Some(raw) => parse_integer(raw)
                .map(Some)
                .ok_or_else(|| StoreError::Validation(format!("invalid {} '{}'", column, raw))),
        }
    }

    fn flag(&self, column: &str) -> StoreResult<bool> {
        match self.get(column) {
            None => Ok(false),
            Some(raw) => parse_flag(raw)
                .ok_or_else(|| StoreError::Validation(format!("invalid {} '{}'", column, raw))),
        }
    }

    fn required(&self, column: &str) -> StoreResult<&str> {
        self.get(column)
            .ok_or_else(|| StoreError::Validation(format!("missing {}", column)))
    }

    fn to_record(&self) -> StoreResult<StopRecord> {
        Ok(StopRecord {
            stop_date: self.date("stop_date")?,
            stop_time: self.time("stop_time")?,
            country_name: self.text_or_empty("country_name"),
            driver_gender: self.text_or_empty("driver_gender"),
            driver_age_raw: self.integer("driver_age_raw")?,
            driver_age: self.integer("driver_age")?,
            driver_race: self.text("driver_race"),
            violation_raw: self.text_or_empty("violation_raw"),
            violation: self.text_or_empty("violation"),
            search_conducted: self.flag("search_conducted")?,
            search_type: self.text("search_type"),
            stop_outcome: self.text_or_empty("stop_outcome"),
            is_arrested: self.flag("is_arrested")?,
            stop_duration: self.text("stop_duration"),
            drugs_related_stop: self.flag("drugs_related_stop")?,
            vehicle_number: self.text("vehicle_number"),
        })
    }
}

/// Integers, also accepting whole-valued decimals such as "34.0".
/// Decimals outside the `i64` range are rejected rather than saturated.
fn parse_integer(raw: &str) -> Option<i64> {
    // 2^63 is exact as an f64; i64::MAX is not
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .filter(|f| *f >= -LIMIT && *f < LIMIT)
            .map(|f| f as i64)
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
