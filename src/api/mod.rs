//! Checkpoint REST API
//!
//! HTTP API layer over the record store, built with Axum.
//!
//! # Endpoints
//!
//! ## Dashboard
//! - `GET /api/v1/overview` - Headline numbers and distributions
//!
//! ## Stops
//! - `GET /api/v1/stops` - Filtered stops with summary
//! - `GET /api/v1/stops/facets` - Dropdown options and age bounds
//! - `POST /api/v1/stops` - Register a new stop
//!
//! ## Reports
//! - `GET /api/v1/reports/:tier` - List reports of a tier
//! - `GET /api/v1/reports/:tier/run?name=` - Run a report
//! - `GET /api/v1/reports/:tier/export?name=` - Download a report as CSV
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! The store is synchronous, so every store call runs on the blocking pool.
//!
//! # Example
//!
//! ```rust,no_run
//! use checkpoint::api::{serve, AppState};
//! use checkpoint::config::ApiConfig;
//! use checkpoint::store::Store;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(Store::open("./data/traffic_stops.db")?);
//!     let config = ApiConfig::default();
//!
//!     serve(AppState::new(store, config.clone()), &config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::HeaderValue,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ApiConfig;
use crate::store::StoreResult;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Dashboard
        .route("/overview", get(routes::overview::get_overview))
        // Stops
        .route(
            "/stops",
            get(routes::stops::list_stops).post(routes::stops::register_stop),
        )
        .route("/stops/facets", get(routes::stops::get_facets))
        // Reports
        .route("/reports/:tier", get(routes::reports::list_reports))
        .route("/reports/:tier/run", get(routes::reports::run_report))
        .route("/reports/:tier/export", get(routes::reports::export_report));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config);

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Permissive unless origins are configured
fn cors_layer(config: &ApiConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Run a store call on the blocking thread pool
pub(crate) async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("Store task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Checkpoint API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Checkpoint API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::StopRecord;
    use crate::testing::{record, seed, temp_store};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    fn create_test_app(stops: &[StopRecord]) -> (Router, TempDir) {
        let (store, dir) = temp_store();
        seed(&store, stops);

        let state = AppState::new(store, ApiConfig::default());
        (build_router(state), dir)
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn with_vehicle(number: &str, drugs: bool) -> StopRecord {
        StopRecord {
            vehicle_number: Some(number.to_string()),
            drugs_related_stop: drugs,
            ..record()
        }
    }

    #[tokio::test]
    async fn test_health_live() {
        let (app, _dir) = create_test_app(&[]);
        let response = get(app, "/health/live").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        let (app, _dir) = create_test_app(&[]);
        let response = get(app, "/health/ready").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let (app, _dir) = create_test_app(&[record()]);
        let response = get(app, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["total_stops"], 1);
    }

    #[tokio::test]
    async fn test_ready_fails_without_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = crate::store::Store::at(dir.path().join("missing").join("stops.db"));
        let app = build_router(AppState::new(Arc::new(store), ApiConfig::default()));

        let response = get(app, "/health/ready").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_overview() {
        let (app, _dir) = create_test_app(&[record(), with_vehicle("ABC123", true)]);
        let response = get(app, "/api/v1/overview").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["total_stops"], 2);
        assert_eq!(body["drug_related_stops"], 1);
    }

    #[tokio::test]
    async fn test_list_stops_with_filters() {
        let (app, _dir) = create_test_app(&[
            with_vehicle("ABC123", false),
            with_vehicle("XYZ789", false),
            record(),
        ]);

        let response = get(app, "/api/v1/stops?vehicle=abc").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["summary"]["total"], 1);
        assert_eq!(body["table"]["rows"].as_array().unwrap().len(), 1);
        assert_eq!(body["table"]["columns"][0]["name"], "stop_date");
    }

    #[tokio::test]
    async fn test_empty_filter_result_has_null_rates() {
        let (app, _dir) = create_test_app(&[record()]);

        let response = get(app, "/api/v1/stops?country=Atlantis").await;
        let body = json_body(response).await;
        assert_eq!(body["summary"]["total"], 0);
        assert!(body["summary"]["arrest_rate"].is_null());
    }

    #[tokio::test]
    async fn test_facets() {
        let (app, _dir) = create_test_app(&[record()]);

        let response = get(app, "/api/v1/stops/facets").await;
        let body = json_body(response).await;
        assert_eq!(body["countries"], serde_json::json!(["All", "Canada"]));
        assert_eq!(body["age_bounds"], serde_json::json!([30.0, 30.0]));
    }

    #[tokio::test]
    async fn test_register_stop() {
        let (app, _dir) = create_test_app(&[]);

        let payload = serde_json::to_string(&StopRecord {
            search_type: Some("Frisk".to_string()),
            ..record()
        })
        .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/stops")
                    .header("Content-Type", "application/json")
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["total_stops"], 1);
    }

    #[tokio::test]
    async fn test_register_rejects_bad_age() {
        let (app, _dir) = create_test_app(&[]);

        let payload = serde_json::to_string(&StopRecord {
            driver_age: Some(150),
            ..record()
        })
        .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/stops")
                    .header("Content-Type", "application/json")
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_register_invalid_json() {
        let (app, _dir) = create_test_app(&[]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/stops")
                    .header("Content-Type", "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_reports() {
        let (app, _dir) = create_test_app(&[]);

        let response = get(app, "/api/v1/reports/complex").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["tier"], "advanced");
        assert_eq!(body["reports"].as_array().unwrap().len(), 6);
        assert!(body["reports"][0].get("sql").is_none());
    }

    #[tokio::test]
    async fn test_unknown_tier() {
        let (app, _dir) = create_test_app(&[]);
        let response = get(app, "/api/v1/reports/expert").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_run_report() {
        let (app, _dir) = create_test_app(&[
            with_vehicle("ABC123", true),
            with_vehicle("ABC123", true),
            with_vehicle("XYZ789", false),
        ]);

        let response = get(
            app,
            "/api/v1/reports/standard/run?name=Top%2010%20Vehicles%20in%20Drug-Related%20Stops",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["row_count"], 1);
        assert_eq!(body["table"]["rows"][0], serde_json::json!(["ABC123", 2]));
    }

    #[tokio::test]
    async fn test_run_unknown_report() {
        let (app, _dir) = create_test_app(&[]);
        let response = get(app, "/api/v1/reports/standard/run?name=Nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_report() {
        let (app, _dir) = create_test_app(&[with_vehicle("ABC123", true)]);

        let response = get(
            app,
            "/api/v1/reports/medium/export?name=Top%2010%20Vehicles%20in%20Drug-Related%20Stops",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("top_10_vehicles_in_drug_related_stops_"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            String::from_utf8(bytes.to_vec()).unwrap(),
            "vehicle_number,stop_count\nABC123,1\n"
        );
    }
}
