//! Overview Routes
//!
//! - GET /api/v1/overview - Dashboard metrics over every stop

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::blocking;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::dashboard::Overview;

/// GET /api/v1/overview
pub async fn get_overview(State(state): State<Arc<AppState>>) -> ApiResult<Json<Overview>> {
    let store = Arc::clone(&state.store);
    let table = blocking(move || store.fetch_all()).await?;

    Ok(Json(Overview::from_table(&table)))
}
