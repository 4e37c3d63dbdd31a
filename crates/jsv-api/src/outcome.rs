//! # Request Outcomes
//!
//! Every pipeline operation ends in exactly one of two response shapes:
//!
//! ```text
//! {"Action":"uploadSchema","ID":"test-config","Status":"success"}
//! {"Action":"uploadSchema","ID":"test-config","Status":"error","Message":"Invalid JSON"}
//! ```
//!
//! Field order is fixed by struct declaration order. The error message is
//! always the generic [`INVALID_JSON`]: the stage that failed and why are
//! logged server-side and never returned to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsv_schema::PipelineError;
use serde::Serialize;

/// Client-facing message for every failed operation.
pub const INVALID_JSON: &str = "Invalid JSON";

/// Counter of finished pipeline operations, labelled by action and status.
pub const PIPELINE_OUTCOMES_TOTAL: &str = "jsv_pipeline_outcomes_total";

/// The pipeline operation that produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// `POST /schema/{id}`.
    UploadSchema,
    /// `GET /schema/{id}`.
    DownloadSchema,
    /// `POST /validate/{id}`.
    ValidateDocument,
}

impl Action {
    /// Wire name of the action.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UploadSchema => "uploadSchema",
            Self::DownloadSchema => "downloadSchema",
            Self::ValidateDocument => "validateDocument",
        }
    }

    /// Status code paired with a successful outcome.
    pub fn success_status(self) -> StatusCode {
        match self {
            Self::UploadSchema | Self::ValidateDocument => StatusCode::CREATED,
            Self::DownloadSchema => StatusCode::OK,
        }
    }
}

/// `Status` field of an outcome body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Error,
}

/// Serialized outcome body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeBody {
    #[serde(rename = "Action")]
    pub action: Action,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Status")]
    pub status: OutcomeStatus,
    #[serde(rename = "Message", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success {
        action: Action,
        id: String,
    },
    Error {
        action: Action,
        id: String,
        message: String,
    },
}

impl Outcome {
    /// A success outcome.
    pub fn success(action: Action, id: impl Into<String>) -> Self {
        Self::Success {
            action,
            id: id.into(),
        }
    }

    /// An error outcome with the generic client message.
    pub fn error(action: Action, id: impl Into<String>) -> Self {
        Self::Error {
            action,
            id: id.into(),
            message: INVALID_JSON.to_string(),
        }
    }

    /// Map a pipeline result to an outcome, logging the fault detail.
    ///
    /// `id` is the raw identifier from the request path and is echoed back
    /// even when it failed validation.
    pub fn from_result<T>(action: Action, id: impl Into<String>, result: &Result<T, PipelineError>) -> Self {
        let id = id.into();
        let outcome = match result {
            Ok(_) => {
                tracing::info!(action = action.as_str(), schema_id = %id, "request succeeded");
                Self::success(action, id)
            }
            Err(e) => {
                tracing::warn!(
                    action = action.as_str(),
                    schema_id = %id,
                    stage = e.stage(),
                    error = %e,
                    "request failed"
                );
                Self::error(action, id)
            }
        };
        outcome.record();
        outcome
    }

    /// Error outcome for a request body that could not be read, such as one
    /// over the body limit. The pipeline never runs.
    pub fn body_rejected(action: Action, id: impl Into<String>, reason: &dyn std::fmt::Display) -> Self {
        let id = id.into();
        tracing::warn!(
            action = action.as_str(),
            schema_id = %id,
            stage = "body",
            error = %reason,
            "request body rejected"
        );
        let outcome = Self::error(action, id);
        outcome.record();
        outcome
    }

    fn record(&self) {
        let (action, status) = match self {
            Self::Success { action, .. } => (action, "success"),
            Self::Error { action, .. } => (action, "error"),
        };
        metrics::counter!(
            PIPELINE_OUTCOMES_TOTAL,
            "action" => action.as_str(),
            "status" => status,
        )
        .increment(1);
    }

    /// Whether this is a success outcome.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// HTTP status code for this outcome.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Success { action, .. } => action.success_status(),
            Self::Error { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The body in wire form.
    pub fn body(&self) -> OutcomeBody {
        match self {
            Self::Success { action, id } => OutcomeBody {
                action: *action,
                id: id.clone(),
                status: OutcomeStatus::Success,
                message: None,
            },
            Self::Error {
                action,
                id,
                message,
            } => OutcomeBody {
                action: *action,
                id: id.clone(),
                status: OutcomeStatus::Error,
                message: Some(message.clone()),
            },
        }
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

/// Encode a success outcome as an HTTP response.
pub fn encode_success(action: Action, id: impl Into<String>) -> Response {
    Outcome::success(action, id).into_response()
}

/// Encode an error outcome as an HTTP response (500).
pub fn encode_error(action: Action, id: impl Into<String>, message: impl Into<String>) -> Response {
    Outcome::Error {
        action,
        id: id.into(),
        message: message.into(),
    }
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use jsv_core::SchemaId;

    async fn response_parts(response: Response) -> (StatusCode, String) {
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn action_wire_names() {
        assert_eq!(Action::UploadSchema.as_str(), "uploadSchema");
        assert_eq!(Action::DownloadSchema.as_str(), "downloadSchema");
        assert_eq!(Action::ValidateDocument.as_str(), "validateDocument");
        assert_eq!(
            serde_json::to_string(&Action::ValidateDocument).unwrap(),
            r#""validateDocument""#
        );
    }

    #[test]
    fn success_status_codes() {
        assert_eq!(Action::UploadSchema.success_status(), StatusCode::CREATED);
        assert_eq!(Action::ValidateDocument.success_status(), StatusCode::CREATED);
        assert_eq!(Action::DownloadSchema.success_status(), StatusCode::OK);
        assert_eq!(
            Outcome::error(Action::DownloadSchema, "x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn success_body_field_order() {
        let body = Outcome::success(Action::UploadSchema, "test-config").body();
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"Action":"uploadSchema","ID":"test-config","Status":"success"}"#
        );
    }

    #[test]
    fn error_body_field_order() {
        let body = Outcome::error(Action::UploadSchema, "test-config").body();
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"Action":"uploadSchema","ID":"test-config","Status":"error","Message":"Invalid JSON"}"#
        );
    }

    #[test]
    fn from_result_hides_fault_detail() {
        let missing = SchemaId::new("secret-path").unwrap();
        let result: Result<(), PipelineError> = Err(PipelineError::NotFound(missing));
        let outcome = Outcome::from_result(Action::ValidateDocument, "secret-path", &result);
        assert_eq!(
            outcome,
            Outcome::Error {
                action: Action::ValidateDocument,
                id: "secret-path".to_string(),
                message: INVALID_JSON.to_string(),
            }
        );
    }

    #[test]
    fn body_rejection_uses_error_shape() {
        let outcome = Outcome::body_rejected(Action::UploadSchema, "big", &"length limit exceeded");
        assert_eq!(outcome, Outcome::error(Action::UploadSchema, "big"));
        assert_eq!(outcome.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn from_result_success() {
        let result: Result<(), PipelineError> = Ok(());
        let outcome = Outcome::from_result(Action::UploadSchema, "s", &result);
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn encode_success_response() {
        let (status, body) =
            response_parts(encode_success(Action::UploadSchema, "test-config")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            r#"{"Action":"uploadSchema","ID":"test-config","Status":"success"}"#
        );
    }

    #[tokio::test]
    async fn encode_error_response() {
        let response = encode_error(Action::UploadSchema, "test-schemaid-not-exists", INVALID_JSON);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "application/json"
        );
        let (status, body) = response_parts(response).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            r#"{"Action":"uploadSchema","ID":"test-schemaid-not-exists","Status":"error","Message":"Invalid JSON"}"#
        );
    }
}
