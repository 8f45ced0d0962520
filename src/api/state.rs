//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ApiConfig;
use crate::ingest::Ingestor;
use crate::reports::ReportCatalog;
use crate::store::Store;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Record store handle
    pub store: Arc<Store>,
    /// Report catalog over the same store
    pub catalog: ReportCatalog,
    /// Ingestion rules for new records
    pub ingestor: Ingestor,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<Store>, config: ApiConfig) -> Self {
        Self {
            catalog: ReportCatalog::new(Arc::clone(&store)),
            ingestor: Ingestor::new(Arc::clone(&store)),
            store,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
