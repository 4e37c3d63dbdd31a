//! # Error Types
//!
//! Errors raised by the leaf primitives. Both are surfaced to clients only
//! as the generic error outcome; the detail here is for logs.

use thiserror::Error;

/// A schema identifier failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The identifier is empty.
    #[error("schema id is required")]
    Empty,

    /// The identifier exceeds the maximum length.
    #[error("schema id too long: {len} chars (max {max})")]
    TooLong {
        /// Actual length in characters.
        len: usize,
        /// Maximum permitted length.
        max: usize,
    },

    /// The identifier must start with an ASCII alphanumeric character.
    #[error("schema id must start with [A-Za-z0-9], got: {0:?}")]
    InvalidStart(String),

    /// The identifier contains a character outside `[A-Za-z0-9._-]`.
    #[error("schema id contains invalid character {0:?}: must match [A-Za-z0-9._-]")]
    InvalidChar(char),
}

/// Raw bytes could not be turned into a document.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The bytes are not syntactically valid JSON.
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    /// The bytes are valid JSON but the top-level value is not an object.
    #[error("expected a JSON object at the top level, found {0}")]
    NotAnObject(&'static str),
}
