//! # jsv-api — HTTP Service for the JSON Schema Vault
//!
//! Stores JSON Schemas under caller-chosen identifiers and validates JSON
//! documents against them.
//!
//! ## API Surface
//!
//! | Route                   | Module                | Purpose              |
//! |-------------------------|-----------------------|----------------------|
//! | `POST /schema/{id}`     | [`routes::schema`]    | Upload a schema      |
//! | `GET /schema/{id}`      | [`routes::schema`]    | Download a schema    |
//! | `POST /validate/{id}`   | [`routes::validate`]  | Validate a document  |
//! | `GET /health/liveness`  | this module           | Liveness probe       |
//! | `GET /health/readiness` | this module           | Readiness probe      |
//! | `GET /metrics`          | this module           | Prometheus scrape    |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → BodyLimit → Handler
//! ```

pub mod config;
pub mod middleware;
pub mod outcome;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, StatusCode};
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Maximum accepted request body. Larger bodies get the error outcome.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Assemble the application router.
///
/// The `/metrics` route and the request metrics middleware are mounted only
/// when `state.metrics` holds a recorder handle.
pub fn app(state: AppState) -> Router {
    let metrics_on = state.metrics.is_some();

    let mut router = Router::new()
        .merge(routes::schema::router())
        .merge(routes::validate::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    if metrics_on {
        router = router
            .route("/metrics", get(prometheus_metrics))
            .layer(from_fn(middleware::metrics::metrics_middleware));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// GET /metrics — Prometheus text exposition.
async fn prometheus_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Liveness probe. The process is up if it can answer.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. Returns 200 "ready" when the schema store can be
/// listed, 503 otherwise.
async fn readiness(State(state): State<AppState>) -> Response {
    let service = state.service.clone();
    let listed = tokio::task::spawn_blocking(move || service.store().list()).await;
    match listed {
        Ok(Ok(_)) => (StatusCode::OK, "ready").into_response(),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "schema store check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "schema store unavailable").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "readiness worker failed");
            (StatusCode::SERVICE_UNAVAILABLE, "readiness check failed").into_response()
        }
    }
}
