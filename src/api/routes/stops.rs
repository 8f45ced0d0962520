//! Stop Routes
//!
//! Search and registration of stop records.
//!
//! - GET /api/v1/stops - Filtered stops with summary
//! - GET /api/v1/stops/facets - Dropdown options and age bounds
//! - POST /api/v1/stops - Register a new stop

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::blocking;
use crate::api::dto::{RegisterResponse, StopQuery, StopsResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::records::StopRecord;
use crate::search::{Facets, Summary};

/// GET /api/v1/stops
///
/// Loads the whole table once and filters it in memory.
pub async fn list_stops(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StopQuery>,
) -> ApiResult<Json<StopsResponse>> {
    let store = Arc::clone(&state.store);
    let table = blocking(move || store.fetch_all()).await?;

    let filtered = query.filter().apply(&table)?;
    let summary = Summary::from_table(&filtered);

    Ok(Json(StopsResponse {
        table: filtered,
        summary,
    }))
}

/// GET /api/v1/stops/facets
pub async fn get_facets(State(state): State<Arc<AppState>>) -> ApiResult<Json<Facets>> {
    let store = Arc::clone(&state.store);
    let table = blocking(move || store.fetch_all()).await?;

    Ok(Json(Facets::from_table(&table)?))
}

/// POST /api/v1/stops
///
/// Register a new stop. Out-of-range ages are rejected with 400.
pub async fn register_stop(
    State(state): State<Arc<AppState>>,
    Json(record): Json<StopRecord>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let ingestor = state.ingestor.clone();
    let store = Arc::clone(&state.store);

    let total_stops = blocking(move || {
        ingestor.insert(&record)?;
        store.count()
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            status: "ok".to_string(),
            total_stops,
        }),
    ))
}
