//! # jsv-schema — Schema Storage & Validation
//!
//! Everything between raw request bytes and a pass/fail verdict.
//!
//! - [`store`] — the [`SchemaStore`] trait with a flat-directory
//!   implementation ([`FsSchemaStore`]) and an in-process one
//!   ([`MemorySchemaStore`]).
//! - [`validate`] — [`SchemaValidator`], which compiles stored schemas with
//!   the `jsonschema` crate and reports structured [`Violation`]s.
//! - [`pipeline`] — [`SchemaService`], the upload / download / validate
//!   operations and the [`PipelineError`] taxonomy.
//!
//! ## Crate Policy
//!
//! - Depends only on `jsv-core` internally.
//! - No HTTP types. Mapping faults to responses is the API layer's job.

pub mod pipeline;
pub mod store;
pub mod validate;

pub use pipeline::{PipelineError, SchemaService};
pub use store::{FsSchemaStore, MemorySchemaStore, SchemaStore, StoreError};
pub use validate::{
    CompiledSchema, SchemaValidationError, SchemaValidator, ValidationViolations, Violation,
};
