//! # Schema Identifier
//!
//! The identifier taken from the request path names both the schema and the
//! file it is stored in (`<id>.json`). Validation happens here so that the
//! storage layer can join it onto a directory without further checks.
//!
//! ## Security Invariant
//!
//! A `SchemaId` never contains a path separator and never equals `.` or
//! `..`. Path traversal through the identifier is structurally impossible.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::IdError;

/// Maximum identifier length in characters.
pub const MAX_SCHEMA_ID_LEN: usize = 128;

/// A validated schema identifier.
///
/// Matches `^[A-Za-z0-9][A-Za-z0-9._-]{0,127}$`. The inner value is private
/// so the invariant holds for every instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaId(String);

impl SchemaId {
    /// Validate and wrap an identifier.
    pub fn new(raw: &str) -> Result<Self, IdError> {
        if raw.is_empty() {
            return Err(IdError::Empty);
        }
        let len = raw.chars().count();
        if len > MAX_SCHEMA_ID_LEN {
            return Err(IdError::TooLong {
                len,
                max: MAX_SCHEMA_ID_LEN,
            });
        }
        let mut chars = raw.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphanumeric() => {}
            _ => return Err(IdError::InvalidStart(raw.to_string())),
        }
        for c in chars {
            if !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')) {
                return Err(IdError::InvalidChar(c));
            }
        }
        Ok(Self(raw.to_string()))
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The filename this schema is persisted under.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SchemaId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<SchemaId> for String {
    fn from(id: SchemaId) -> Self {
        id.0
    }
}

impl AsRef<str> for SchemaId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for SchemaId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_typical_ids() {
        for id in ["test-config", "test_schema", "config.v2", "A1", "x"] {
            assert!(SchemaId::new(id).is_ok(), "rejected {id}");
        }
    }

    #[test]
    fn file_name_appends_json() {
        let id = SchemaId::new("test-config").unwrap();
        assert_eq!(id.file_name(), "test-config.json");
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(SchemaId::new(""), Err(IdError::Empty));
    }

    #[test]
    fn rejects_traversal() {
        assert!(SchemaId::new("..").is_err());
        assert!(SchemaId::new(".").is_err());
        assert!(SchemaId::new("../etc/passwd").is_err());
        assert!(SchemaId::new("a/b").is_err());
        assert!(SchemaId::new("a\\b").is_err());
    }

    #[test]
    fn rejects_leading_punctuation() {
        assert!(matches!(
            SchemaId::new("-lead"),
            Err(IdError::InvalidStart(_))
        ));
        assert!(matches!(
            SchemaId::new(".hidden"),
            Err(IdError::InvalidStart(_))
        ));
    }

    #[test]
    fn rejects_whitespace_and_unicode() {
        assert_eq!(SchemaId::new("a b"), Err(IdError::InvalidChar(' ')));
        assert_eq!(SchemaId::new("caf\u{e9}"), Err(IdError::InvalidChar('\u{e9}')));
    }

    #[test]
    fn rejects_too_long() {
        let long = "a".repeat(MAX_SCHEMA_ID_LEN + 1);
        assert!(matches!(SchemaId::new(&long), Err(IdError::TooLong { .. })));
        let max = "a".repeat(MAX_SCHEMA_ID_LEN);
        assert!(SchemaId::new(&max).is_ok());
    }

    #[test]
    fn serde_roundtrip_validates() {
        let id: SchemaId = serde_json::from_str(r#""person""#).unwrap();
        assert_eq!(id, "person");
        assert!(serde_json::from_str::<SchemaId>(r#""../x""#).is_err());
    }
}
