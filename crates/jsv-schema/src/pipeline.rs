//! # Document Pipeline
//!
//! [`SchemaService`] owns the store and validator and exposes the three
//! operations the HTTP layer dispatches to. Every stage is synchronous.
//!
//! ```text
//! validate: Received → Parsed → Normalized → Compiled → Checked
//! upload:   Received → Parsed → Stored
//! download: Received → Loaded
//! ```
//!
//! A failure at any stage ends the request with a [`PipelineError`]; there
//! is no partial recovery and no retry.

use std::sync::Arc;

use jsv_core::{normalize, IdError, ParseError, SchemaId};
use serde_json::Value;
use thiserror::Error;

use crate::store::{SchemaStore, StoreError};
use crate::validate::{SchemaValidationError, SchemaValidator, ValidationViolations};

/// A fault at some pipeline stage.
///
/// The HTTP layer collapses every variant into the same client-facing error
/// outcome; the detail is for logs only.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The identifier from the request path cannot name a schema.
    #[error("invalid schema id: {0}")]
    InvalidId(#[from] IdError),

    /// The request body is not a JSON object.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// No schema is stored under the identifier.
    #[error("schema '{0}' not found")]
    NotFound(SchemaId),

    /// The stored schema is malformed or unsupported.
    #[error("schema '{schema_id}' failed to compile: {reason}")]
    Compile {
        /// Schema that failed to compile.
        schema_id: SchemaId,
        /// Compiler diagnostic.
        reason: String,
    },

    /// The document violates the schema.
    #[error("document does not match schema '{schema_id}':\n{violations}")]
    ValidationMismatch {
        /// Schema validated against.
        schema_id: SchemaId,
        /// Every violated constraint.
        violations: ValidationViolations,
    },

    /// Reading or writing schema bytes failed.
    #[error(transparent)]
    Storage(StoreError),
}

impl PipelineError {
    /// Short name of the stage that failed, for logs and metric labels.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidId(_) => "id",
            Self::Parse(_) => "parse",
            Self::NotFound(_) => "load",
            Self::Compile { .. } => "compile",
            Self::ValidationMismatch { .. } => "check",
            Self::Storage(_) => "storage",
        }
    }
}

impl From<StoreError> for PipelineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

impl From<SchemaValidationError> for PipelineError {
    fn from(err: SchemaValidationError) -> Self {
        match err {
            SchemaValidationError::Store(e) => e.into(),
            SchemaValidationError::ValidatorBuildError { schema_id, reason } => {
                Self::Compile { schema_id, reason }
            }
            SchemaValidationError::ValidationFailed {
                schema_id,
                violations,
            } => Self::ValidationMismatch {
                schema_id,
                violations,
            },
        }
    }
}

/// The upload / download / validate service.
///
/// Holds explicit handles to its collaborators; there is no global state.
/// Cloning is cheap and clones share the same store.
#[derive(Debug, Clone)]
pub struct SchemaService {
    store: Arc<dyn SchemaStore>,
    validator: SchemaValidator,
}

impl SchemaService {
    /// Build a service over `store`, validating against schemas in the same store.
    pub fn new(store: Arc<dyn SchemaStore>) -> Self {
        let validator = SchemaValidator::new(Arc::clone(&store));
        Self { store, validator }
    }

    /// The underlying schema store.
    pub fn store(&self) -> &Arc<dyn SchemaStore> {
        &self.store
    }

    /// The validator used by [`validate`](Self::validate).
    pub fn validator(&self) -> &SchemaValidator {
        &self.validator
    }

    /// Accept a schema upload.
    ///
    /// The body must parse as a JSON object; malformed bytes are rejected
    /// before anything is written. Accepted bytes are stored verbatim so a
    /// later download is byte-identical.
    pub fn upload(&self, id: &SchemaId, body: &[u8]) -> Result<(), PipelineError> {
        jsv_core::parse(body)?;
        self.store.put(id, body)?;
        Ok(())
    }

    /// Return the raw bytes of a stored schema.
    pub fn download(&self, id: &SchemaId) -> Result<Vec<u8>, PipelineError> {
        Ok(self.store.get(id)?)
    }

    /// Validate a document against the schema stored under `id`.
    ///
    /// The body is parsed and stripped of null-valued fields before the
    /// schema is compiled and checked.
    pub fn validate(&self, id: &SchemaId, body: &[u8]) -> Result<(), PipelineError> {
        let document = Value::Object(normalize(body)?);
        let compiled = self.validator.compile(id)?;
        self.validator.validate(&compiled, &document)?;
        Ok(())
    }
}
