//! Document validation.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Path, State};
use axum::routing::post;
use axum::Router;

use crate::outcome::{Action, Outcome};
use crate::routes::run_pipeline;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/validate/{id}", post(validate_document))
}

/// POST /validate/{id} — check the body against schema `id`.
///
/// Null-valued fields are stripped from the document before validation.
async fn validate_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Outcome {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => return Outcome::body_rejected(Action::ValidateDocument, id, &rejection),
    };
    let result = run_pipeline(&state.service, &id, move |svc, id| svc.validate(id, &body)).await;
    Outcome::from_result(Action::ValidateDocument, id, &result)
}
