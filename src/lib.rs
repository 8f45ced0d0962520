//! # Checkpoint
//!
//! Traffic-stop analytics over a SQLite record store: a catalog of canned
//! SQL reports, in-memory faceted search, data entry and CSV export.
//!
//! ## Modules
//!
//! - [`store`]: Record store accessor and typed result tables
//! - [`records`]: The stop record and its derived buckets
//! - [`ingest`]: Validated inserts and CSV seeding
//! - [`reports`]: Standard and advanced report catalogs, CSV export
//! - [`search`]: Predicate filters, facets and summary metrics
//! - [`dashboard`]: Overview metrics and distributions
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use checkpoint::reports::{ReportCatalog, ReportTier};
//! use checkpoint::store::Store;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(Store::open("./data/traffic_stops.db")?);
//!     let catalog = ReportCatalog::new(store);
//!
//!     for name in catalog.list(ReportTier::Standard) {
//!         let table = catalog.run(ReportTier::Standard, name)?;
//!         println!("{}: {} rows", name, table.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod ingest;
pub mod logging;
pub mod records;
pub mod reports;
pub mod search;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

// Re-export top-level types for convenience
pub use store::{Column, ColumnType, Store, StoreError, StoreResult, Table, Value};

pub use records::{AgeBucket, DayPart, StopRecord, TimeOfDay};

pub use ingest::{CsvImportResult, Ingestor, StopCsvImporter};

pub use reports::{ReportCatalog, ReportDefinition, ReportTier};

pub use search::{Facets, Filter, Predicate, Selection, Summary};

pub use dashboard::Overview;

pub use api::{build_router, serve, ApiError, AppState};

pub use config::Config;
