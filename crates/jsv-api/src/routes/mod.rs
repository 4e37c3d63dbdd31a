//! # Route Handlers
//!
//! | Route                 | Module       | Action             |
//! |-----------------------|--------------|--------------------|
//! | `POST /schema/{id}`   | [`schema`]   | `uploadSchema`     |
//! | `GET /schema/{id}`    | [`schema`]   | `downloadSchema`   |
//! | `POST /validate/{id}` | [`validate`] | `validateDocument` |
//!
//! Pipeline stages do blocking file I/O and schema compilation, so every
//! handler runs its stage on the blocking pool via [`run_pipeline`].

pub mod schema;
pub mod validate;

use jsv_core::SchemaId;
use jsv_schema::{PipelineError, SchemaService, StoreError};

/// Parse `raw_id` and run `op` against the service on the blocking pool.
pub(crate) async fn run_pipeline<T, F>(
    service: &SchemaService,
    raw_id: &str,
    op: F,
) -> Result<T, PipelineError>
where
    T: Send + 'static,
    F: FnOnce(&SchemaService, &SchemaId) -> Result<T, PipelineError> + Send + 'static,
{
    let id = SchemaId::new(raw_id)?;
    let service = service.clone();
    tokio::task::spawn_blocking(move || op(&service, &id))
        .await
        .map_err(|e| {
            PipelineError::Storage(StoreError::Io {
                path: "pipeline worker".to_string(),
                source: std::io::Error::other(e),
            })
        })?
}
