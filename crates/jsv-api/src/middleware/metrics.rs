//! # Prometheus Metrics
//!
//! HTTP metrics are recorded through the `metrics` facade and rendered by
//! the `metrics-exporter-prometheus` recorder at `GET /metrics`.
//!
//! Paths are labelled by their route template (`/schema/{id}`), never by the
//! concrete request path, so label cardinality stays bounded.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

use crate::outcome::PIPELINE_OUTCOMES_TOTAL;

pub const HTTP_REQUESTS_TOTAL: &str = "jsv_http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "jsv_http_request_duration_seconds";
pub const HTTP_ERRORS_TOTAL: &str = "jsv_http_errors_total";

/// Path label for requests that matched no route.
const UNMATCHED: &str = "unmatched";

const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Install the global Prometheus recorder and describe the service metrics.
///
/// Fails if a recorder is already installed.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(HTTP_REQUEST_DURATION_SECONDS.to_string()),
            DURATION_BUCKETS,
        )?
        .install_recorder()?;
    describe_metrics();
    Ok(handle)
}

fn describe_metrics() {
    describe_counter!(HTTP_REQUESTS_TOTAL, "Total HTTP requests");
    describe_histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        Unit::Seconds,
        "HTTP request duration in seconds"
    );
    describe_counter!(HTTP_ERRORS_TOTAL, "Total HTTP errors (4xx and 5xx)");
    describe_counter!(
        PIPELINE_OUTCOMES_TOTAL,
        "Finished pipeline operations by action and status"
    );
}

/// Record one request's count, latency and error status.
pub fn record_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    metrics::counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string(),
    )
    .increment(1);
    metrics::histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "method" => method.to_string(),
        "path" => path.to_string(),
    )
    .record(duration_secs);
    if status >= 400 {
        metrics::counter!(
            HTTP_ERRORS_TOTAL,
            "method" => method.to_string(),
            "path" => path.to_string(),
            "status" => status.to_string(),
        )
        .increment(1);
    }
}

/// Axum middleware recording HTTP metrics for every request.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED.to_string());
    let start = Instant::now();

    let response = next.run(request).await;

    record_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_with_local_recorder(f: impl FnOnce()) -> String {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, f);
        handle.render()
    }

    #[test]
    fn success_is_counted_without_error() {
        let text = render_with_local_recorder(|| {
            record_request("POST", "/schema/{id}", 201, 0.01);
        });
        assert!(text.contains("jsv_http_requests_total"));
        assert!(text.contains(r#"status="201""#));
        assert!(!text.contains("jsv_http_errors_total"));
    }

    #[test]
    fn error_statuses_count_as_errors() {
        let text = render_with_local_recorder(|| {
            record_request("POST", "/validate/{id}", 500, 0.01);
            record_request("GET", UNMATCHED, 404, 0.001);
        });
        assert!(text.contains("jsv_http_errors_total"));
        assert!(text.contains(r#"path="unmatched""#));
        assert!(text.contains(r#"path="/validate/{id}""#));
    }

    #[test]
    fn duration_is_recorded() {
        let text = render_with_local_recorder(|| {
            record_request("GET", "/schema/{id}", 200, 0.2);
        });
        assert!(text.contains("jsv_http_request_duration_seconds"));
    }
}
