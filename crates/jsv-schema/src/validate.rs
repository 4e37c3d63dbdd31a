//! # Schema Validation
//!
//! Compiles stored schemas into reusable validators (format assertions on)
//! and checks normalized documents against them.
//!
//! ## Drafts
//!
//! A schema without `$schema` is compiled as Draft 2020-12. Otherwise the
//! draft it declares is used: draft-04, draft-06, draft-07, 2019-09 or
//! 2020-12. Any other `$schema` value fails compilation.
//!
//! ## Schema Resolution
//!
//! Schemas are compiled on demand from the [`SchemaStore`]; nothing is
//! cached between calls, so a re-upload takes effect on the next
//! validation.
//!
//! A `$ref` to another stored schema resolves locally. Any reference whose
//! last path segment is `<id>.json` or `<id>` (for example `address.json`
//! or `https://example.com/schemas/address.json`) is looked up in the same
//! store. Nothing is fetched over the network; an unresolvable reference
//! fails compilation.

use std::fmt;
use std::sync::Arc;

use jsonschema::{Draft, Retrieve, Uri, Validator};
use jsv_core::SchemaId;
use serde_json::Value;
use thiserror::Error;

use crate::store::{SchemaStore, StoreError};

/// Resolves cross-schema `$ref` URIs from the schema store.
struct StoreRetriever {
    store: Arc<dyn SchemaStore>,
}

impl Retrieve for StoreRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        let segment = uri_str
            .split('#')
            .next()
            .unwrap_or(uri_str)
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(uri_str);
        let stem = segment.strip_suffix(".json").unwrap_or(segment);

        let id = SchemaId::new(stem)
            .map_err(|e| format!("cannot resolve $ref '{uri_str}': {e}"))?;
        let bytes = self.store.get(&id)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Draft named by the schema's `$schema` keyword, Draft 2020-12 if absent.
fn declared_draft(schema: &Value) -> Result<Draft, String> {
    let uri = match schema.get("$schema") {
        None => return Ok(Draft::Draft202012),
        Some(Value::String(uri)) => uri,
        Some(other) => return Err(format!("$schema must be a string, got {other}")),
    };
    let normalized = uri
        .trim_end_matches('#')
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    match normalized {
        "json-schema.org/draft-04/schema" => Ok(Draft::Draft4),
        "json-schema.org/draft-06/schema" => Ok(Draft::Draft6),
        "json-schema.org/draft-07/schema" => Ok(Draft::Draft7),
        "json-schema.org/draft/2019-09/schema" => Ok(Draft::Draft201909),
        "json-schema.org/draft/2020-12/schema" => Ok(Draft::Draft202012),
        _ => Err(format!("unsupported $schema '{uri}'")),
    }
}

/// Error during schema compilation or validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The document did not conform to the schema.
    #[error("validation failed against schema '{schema_id}':\n{violations}")]
    ValidationFailed {
        /// Schema that was validated against.
        schema_id: SchemaId,
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// The schema could not be loaded from the store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The stored schema is not valid JSON or not a valid JSON Schema.
    #[error("validator build error for schema '{schema_id}': {reason}")]
    ValidatorBuildError {
        /// Schema that failed to compile.
        schema_id: SchemaId,
        /// Reason the validator could not be built.
        reason: String,
    },
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations. Never empty when returned in an error.
#[derive(Debug, Clone)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A schema compiled and ready for repeated checks.
pub struct CompiledSchema {
    id: SchemaId,
    validator: Validator,
}

impl CompiledSchema {
    /// The identifier this schema was compiled from.
    pub fn id(&self) -> &SchemaId {
        &self.id
    }
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Compiles schemas from a [`SchemaStore`] and validates documents.
///
/// `SchemaValidator` is `Send + Sync` and cheap to clone; it holds only a
/// handle to the store.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    store: Arc<dyn SchemaStore>,
}

impl SchemaValidator {
    /// Create a validator reading schemas from `store`.
    pub fn new(store: Arc<dyn SchemaStore>) -> Self {
        Self { store }
    }

    /// Load the schema stored under `id` and build a validator for it.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::Store` if the schema is missing or
    /// unreadable. Returns `SchemaValidationError::ValidatorBuildError` if
    /// the bytes are not JSON, declare an unsupported `$schema`, or do not
    /// form a valid schema for their draft.
    pub fn compile(&self, id: &SchemaId) -> Result<CompiledSchema, SchemaValidationError> {
        let bytes = self.store.get(id)?;
        let schema: Value = serde_json::from_slice(&bytes).map_err(|e| {
            SchemaValidationError::ValidatorBuildError {
                schema_id: id.clone(),
                reason: format!("invalid JSON: {e}"),
            }
        })?;
        let draft =
            declared_draft(&schema).map_err(|reason| SchemaValidationError::ValidatorBuildError {
                schema_id: id.clone(),
                reason,
            })?;

        let validator = jsonschema::options()
            .with_draft(draft)
            .should_validate_formats(true)
            .with_retriever(StoreRetriever {
                store: Arc::clone(&self.store),
            })
            .build(&schema)
            .map_err(|e| SchemaValidationError::ValidatorBuildError {
                schema_id: id.clone(),
                reason: e.to_string(),
            })?;

        Ok(CompiledSchema {
            id: id.clone(),
            validator,
        })
    }

    /// Check `instance` against a compiled schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ValidationFailed` with every
    /// violation found if the instance does not conform.
    pub fn validate(
        &self,
        compiled: &CompiledSchema,
        instance: &Value,
    ) -> Result<(), SchemaValidationError> {
        let errors: Vec<Violation> = compiled
            .validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaValidationError::ValidationFailed {
                schema_id: compiled.id.clone(),
                violations: ValidationViolations { violations: errors },
            })
        }
    }

    /// Compile the schema under `id` and validate `instance` against it.
    pub fn validate_document(
        &self,
        id: &SchemaId,
        instance: &Value,
    ) -> Result<(), SchemaValidationError> {
        let compiled = self.compile(id)?;
        self.validate(&compiled, instance)
    }
}
