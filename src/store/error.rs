//! Store error types
//!
//! Defines every error the store, report catalog, search engine and
//! ingestion path can surface to a caller.

use thiserror::Error;

/// Errors that can occur while talking to the record store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The database could not be opened (missing directory, bad path, permissions)
    #[error("Connection error: {0}")]
    Connection(String),

    /// A statement failed to prepare or execute (syntax, constraint violation)
    #[error("Query error: {0}")]
    Query(String),

    /// Input rejected before it reached the store
    #[error("Validation error: {0}")]
    Validation(String),

    /// No report with this name exists in the requested tier
    #[error("Unknown report: {0}")]
    UnknownReport(String),

    /// Rows do not match the column descriptors of a table
    #[error("Schema error: {0}")]
    Schema(String),

    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Query(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::UnknownReport("Nope".to_string());
        assert_eq!(err.to_string(), "Unknown report: Nope");

        let err = StoreError::Validation("driver age 130 is outside 0..=120".to_string());
        assert_eq!(
            err.to_string(),
            "Validation error: driver age 130 is outside 0..=120"
        );
    }

    #[test]
    fn test_sqlite_error_is_query_error() {
        let err: StoreError = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, StoreError::Query(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: StoreError = io_err.into();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
