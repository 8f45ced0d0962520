//! Report Routes
//!
//! - GET /api/v1/reports/:tier - Reports of a tier, in catalog order
//! - GET /api/v1/reports/:tier/run?name= - Run a report
//! - GET /api/v1/reports/:tier/export?name= - Run a report as a CSV download

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::blocking;
use crate::api::dto::{ReportListResponse, ReportParams, ReportResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::reports::{export_filename, ReportTier};

/// GET /api/v1/reports/:tier
pub async fn list_reports(Path(tier): Path<String>) -> ApiResult<Json<ReportListResponse>> {
    let tier: ReportTier = tier.parse()?;

    Ok(Json(ReportListResponse {
        tier,
        title: tier.title().to_string(),
        reports: tier.definitions().to_vec(),
    }))
}

/// GET /api/v1/reports/:tier/run?name=
pub async fn run_report(
    State(state): State<Arc<AppState>>,
    Path(tier): Path<String>,
    Query(params): Query<ReportParams>,
) -> ApiResult<Json<ReportResponse>> {
    let tier: ReportTier = tier.parse()?;
    let catalog = state.catalog.clone();
    let name = params.name.clone();

    let table = blocking(move || catalog.run(tier, &name)).await?;

    Ok(Json(ReportResponse {
        tier,
        name: params.name,
        row_count: table.len(),
        table,
    }))
}

/// GET /api/v1/reports/:tier/export?name=
pub async fn export_report(
    State(state): State<Arc<AppState>>,
    Path(tier): Path<String>,
    Query(params): Query<ReportParams>,
) -> ApiResult<Response> {
    let tier: ReportTier = tier.parse()?;
    let catalog = state.catalog.clone();
    let name = params.name.clone();

    let csv = blocking(move || catalog.run(tier, &name)?.to_csv_string()).await?;

    let filename = export_filename(&params.name, chrono::Local::now().naive_local())?;
    let disposition = format!("attachment; filename=\"{}\"", filename);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
