//! # jsv-core — Foundational Types for the JSON Schema Vault
//!
//! Leaf crate of the workspace. Defines the two primitives every other
//! crate builds on:
//!
//! 1. **`SchemaId` newtype.** A schema identifier is also a filename stem,
//!    so it is validated once at construction. No bare strings reach the
//!    storage layer.
//!
//! 2. **Null-stripping normalization.** [`normalize`] parses raw request
//!    bytes into a JSON object and removes null-valued fields recursively
//!    before any schema check runs.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `jsv-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod normalize;

pub use error::{IdError, ParseError};
pub use identity::SchemaId;
pub use normalize::{normalize, parse, strip_nulls, Document};
