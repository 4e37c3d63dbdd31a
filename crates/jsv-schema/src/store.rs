//! # Schema Store
//!
//! Persists raw schema bytes keyed by [`SchemaId`]. The filesystem store
//! lays schemas out as `{root}/{id}.json` in a single flat directory with
//! no metadata sidecars.
//!
//! ## Concurrency
//!
//! Writes are whole-file replacements with no locking. Two concurrent
//! uploads to the same id race and the last completed write wins; a
//! concurrent reader may observe the old content, the new content, or a
//! torn write. Re-uploading is the recovery path.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jsv_core::SchemaId;
use parking_lot::RwLock;
use thiserror::Error;

/// Error from a schema store operation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No schema is stored under the identifier.
    #[error("schema '{0}' not found")]
    NotFound(SchemaId),

    /// The underlying medium could not be read or written.
    #[error("storage error at {path}: {source}")]
    Io {
        /// Path (or logical location) of the failed operation.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Storage medium for raw schema bytes.
///
/// Implementations must be shareable across request workers.
pub trait SchemaStore: Send + Sync + fmt::Debug {
    /// Persist `bytes` under `id`, replacing any existing schema.
    fn put(&self, id: &SchemaId, bytes: &[u8]) -> Result<(), StoreError>;

    /// Return the bytes stored under `id`.
    ///
    /// Fails with [`StoreError::NotFound`] if nothing is stored there.
    fn get(&self, id: &SchemaId) -> Result<Vec<u8>, StoreError>;

    /// Whether a schema is stored under `id`.
    fn contains(&self, id: &SchemaId) -> Result<bool, StoreError>;

    /// All stored identifiers, sorted.
    fn list(&self) -> Result<Vec<SchemaId>, StoreError>;
}

// ---------------------------------------------------------------------------
// FsSchemaStore
// ---------------------------------------------------------------------------

/// A schema store backed by a flat directory of `{id}.json` files.
#[derive(Debug, Clone)]
pub struct FsSchemaStore {
    root: PathBuf,
}

impl FsSchemaStore {
    /// Create a store rooted at `root`.
    ///
    /// The directory does not need to exist yet; it is created on the
    /// first [`put`](SchemaStore::put).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path for a schema.
    pub fn schema_path(&self, id: &SchemaId) -> PathBuf {
        self.root.join(id.file_name())
    }
}

impl SchemaStore for FsSchemaStore {
    fn put(&self, id: &SchemaId, bytes: &[u8]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|e| StoreError::io(&self.root, e))?;
        let path = self.schema_path(id);
        fs::write(&path, bytes).map_err(|e| StoreError::io(&path, e))
    }

    fn get(&self, id: &SchemaId) -> Result<Vec<u8>, StoreError> {
        let path = self.schema_path(id);
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound(id.clone())),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    fn contains(&self, id: &SchemaId) -> Result<bool, StoreError> {
        let path = self.schema_path(id);
        path.try_exists().map_err(|e| StoreError::io(&path, e))
    }

    fn list(&self) -> Result<Vec<SchemaId>, StoreError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.root, e)),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::io(&self.root, e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if let Ok(id) = SchemaId::new(stem) {
                    ids.push(id);
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}

// ---------------------------------------------------------------------------
// MemorySchemaStore
// ---------------------------------------------------------------------------

/// An in-process schema store. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemorySchemaStore {
    schemas: RwLock<HashMap<SchemaId, Vec<u8>>>,
}

impl MemorySchemaStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SchemaStore for MemorySchemaStore {
    fn put(&self, id: &SchemaId, bytes: &[u8]) -> Result<(), StoreError> {
        self.schemas.write().insert(id.clone(), bytes.to_vec());
        Ok(())
    }

    fn get(&self, id: &SchemaId) -> Result<Vec<u8>, StoreError> {
        self.schemas
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn contains(&self, id: &SchemaId) -> Result<bool, StoreError> {
        Ok(self.schemas.read().contains_key(id))
    }

    fn list(&self) -> Result<Vec<SchemaId>, StoreError> {
        let mut ids: Vec<SchemaId> = self.schemas.read().keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> SchemaId {
        SchemaId::new(s).unwrap()
    }

    #[test]
    fn fs_put_and_get_roundtrip_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsSchemaStore::new(dir.path());
        // Whitespace and key order must survive untouched.
        let bytes = b"{\n  \"type\" : \"object\",\"required\":[\"a\"]\n}\n";

        store.put(&id("test-config"), bytes).unwrap();
        assert_eq!(store.get(&id("test-config")).unwrap(), bytes.to_vec());
        assert!(dir.path().join("test-config.json").is_file());
    }

    #[test]
    fn fs_put_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("json-uploads");
        let store = FsSchemaStore::new(&root);

        store.put(&id("s"), b"{}").unwrap();
        assert!(root.join("s.json").is_file());
    }

    #[test]
    fn fs_put_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsSchemaStore::new(dir.path());

        store.put(&id("s"), br#"{"v":1}"#).unwrap();
        store.put(&id("s"), br#"{"v":2}"#).unwrap();
        assert_eq!(store.get(&id("s")).unwrap(), br#"{"v":2}"#.to_vec());
    }

    #[test]
    fn fs_get_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsSchemaStore::new(dir.path());

        let err = store.get(&id("test-schemaid-not-exists")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref missing) if missing == &"test-schemaid-not-exists"));
    }

    #[test]
    fn fs_put_into_unwritable_root_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the root directory should be.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();
        let store = FsSchemaStore::new(&blocker);

        let err = store.put(&id("s"), b"{}").unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }), "got {err}");
    }

    #[test]
    fn fs_list_ignores_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsSchemaStore::new(dir.path());
        store.put(&id("b"), b"{}").unwrap();
        store.put(&id("a"), b"{}").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::write(dir.path().join(".hidden.json"), b"{}").unwrap();

        let ids = store.list().unwrap();
        assert_eq!(ids, vec![id("a"), id("b")]);
    }

    #[test]
    fn fs_list_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsSchemaStore::new(dir.path().join("absent"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn fs_contains() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsSchemaStore::new(dir.path());
        assert!(!store.contains(&id("s")).unwrap());
        store.put(&id("s"), b"{}").unwrap();
        assert!(store.contains(&id("s")).unwrap());
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemorySchemaStore::new();
        assert!(store.list().unwrap().is_empty());
        store.put(&id("s"), b"{}").unwrap();
        assert_eq!(store.get(&id("s")).unwrap(), b"{}".to_vec());
        assert!(matches!(
            store.get(&id("other")),
            Err(StoreError::NotFound(_))
        ));
        assert_eq!(store.list().unwrap(), vec![id("s")]);
    }
}
