//! Storage layer for lostfound.
//!
//! Reports are kept as a single JSON array that is read in full on every
//! access and rewritten in full on every change. Uploaded photos live in a
//! directory of their own, see [`photos`].

pub mod memory;
pub mod photos;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::{next_id_for, PersonRecord};

pub use memory::MemoryStore;
pub use photos::{sanitize_filename, PhotoStore, StoredPhoto};

/// Persistence for the ordered list of reports.
///
/// Implementations hold no cache: every `load` observes the latest `save`.
#[async_trait]
pub trait RecordStore: Send + Sync + std::fmt::Debug {
    /// Load every record, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backing data cannot be read or parsed.
    async fn load(&self) -> Result<Vec<PersonRecord>>;

    /// Replace the stored records with `records`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backing data cannot be written.
    async fn save(&self, records: &[PersonRecord]) -> Result<()>;

    /// Id the next appended record should receive.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the records cannot be loaded.
    async fn next_id(&self) -> Result<u64> {
        Ok(next_id_for(&self.load().await?))
    }
}

/// Record store backed by a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    /// Path to the record file.
    path: PathBuf,
}

impl JsonFileStore {
    /// Open the record file at `path`, creating it holding `[]` if absent.
    ///
    /// Creates the parent directories if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the record file cannot be inspected, or if the
    /// directories or the initial file cannot be created.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| Error::DirectoryCreate {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
        }

        let store = Self { path };
        let exists = tokio::fs::try_exists(&store.path)
            .await
            .map_err(|source| Error::StorageRead {
                path: store.path.clone(),
                source,
            })?;
        if !exists {
            store.save(&[]).await?;
            info!("Created empty record file at {}", store.path.display());
        }
        Ok(store)
    }

    /// Get the path to the record file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling path the next save is staged at before being renamed into place.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<PersonRecord>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| Error::StorageRead {
                path: self.path.clone(),
                source,
            })?;

        let records: Vec<PersonRecord> =
            serde_json::from_slice(&bytes).map_err(|source| Error::StorageCorrupt {
                path: self.path.clone(),
                source,
            })?;

        debug!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    async fn save(&self, records: &[PersonRecord]) -> Result<()> {
        let bytes = serde_json::to_vec(records)?;
        let staging = self.staging_path();

        tokio::fs::write(&staging, &bytes)
            .await
            .map_err(|source| Error::StorageWrite {
                path: staging.clone(),
                source,
            })?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|source| Error::StorageWrite {
                path: self.path.clone(),
                source,
            })?;

        debug!("Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NewReport;

    fn sample(id: u64, name: &str) -> PersonRecord {
        NewReport {
            name: name.to_string(),
            age: "40".to_string(),
            location: "Harbour".to_string(),
            details: "blue coat".to_string(),
        }
        .into_record(id, format!("/static/uploads/{name}.jpg"))
    }

    #[tokio::test]
    async fn test_open_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        assert!(store.load().await.unwrap().is_empty());
        assert_eq!(store.path(), path);
    }

    #[tokio::test]
    async fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/data.json");

        JsonFileStore::open(&path).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_open_keeps_existing_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(
            &path,
            r#"[{"id": 0, "name": "A", "age": "1", "location": "L", "details": "D", "photo": "/static/uploads/a.jpg"}]"#,
        )
        .unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();
        let records = store.load().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "A");
    }

    #[tokio::test]
    async fn test_open_uninspectable_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        // Longer than any file system allows, so stat fails with something other than NotFound
        let path = dir.path().join("x".repeat(300));

        let err = JsonFileStore::open(&path).await.unwrap_err();
        assert!(matches!(err, Error::StorageRead { .. }));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("data.json"))
            .await
            .unwrap();

        let records = vec![sample(0, "ann"), sample(1, "bob")];
        store.save(&records).await.unwrap();
        assert_eq!(store.load().await.unwrap(), records);
        assert!(!store.staging_path().exists());
    }

    #[tokio::test]
    async fn test_load_save_round_trip_is_identity() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("data.json"))
            .await
            .unwrap();
        store
            .save(&[sample(2, "cy"), sample(0, "di"), sample(7, "ed")])
            .await
            .unwrap();

        let first = store.load().await.unwrap();
        store.save(&first).await.unwrap();
        let second = store.load().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(
            second.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![2, 0, 7]
        );
    }

    #[tokio::test]
    async fn test_load_missing_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let store = JsonFileStore::open(&path).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, Error::StorageRead { .. }));
    }

    #[tokio::test]
    async fn test_load_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let store = JsonFileStore::open(&path).await.unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, Error::StorageCorrupt { .. }));
        assert_eq!(err.kind(), crate::error::ErrorKind::Storage);
    }

    #[tokio::test]
    async fn test_next_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("data.json"))
            .await
            .unwrap();
        assert_eq!(store.next_id().await.unwrap(), 0);

        store
            .save(&[sample(0, "a"), sample(3, "b")])
            .await
            .unwrap();
        assert_eq!(store.next_id().await.unwrap(), 4);
    }
}
