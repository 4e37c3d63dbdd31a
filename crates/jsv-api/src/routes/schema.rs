//! Schema upload and download.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;

use crate::outcome::{Action, Outcome};
use crate::routes::run_pipeline;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/schema/{id}", post(upload_schema).get(download_schema))
}

/// POST /schema/{id} — store the body as schema `id`.
///
/// Replaces any schema already stored under the same id.
async fn upload_schema(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Outcome {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => return Outcome::body_rejected(Action::UploadSchema, id, &rejection),
    };
    let result = run_pipeline(&state.service, &id, move |svc, id| svc.upload(id, &body)).await;
    Outcome::from_result(Action::UploadSchema, id, &result)
}

/// GET /schema/{id} — return the stored schema bytes unchanged.
async fn download_schema(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let result = run_pipeline(&state.service, &id, |svc, id| svc.download(id)).await;
    let outcome = Outcome::from_result(Action::DownloadSchema, id, &result);
    match result {
        Ok(bytes) => (
            outcome.status_code(),
            [(header::CONTENT_TYPE, "application/json")],
            bytes,
        )
            .into_response(),
        Err(_) => outcome.into_response(),
    }
}
