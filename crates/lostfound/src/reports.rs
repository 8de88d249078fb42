//! Report submission and lookup.
//!
//! [`ReportService`] ties the record store and the photo store together. It
//! is the only writer of the record list and the upload directory. Each
//! submission holds one lock across the photo write, eviction and the load,
//! append and save cycle, so concurrent submissions cannot drop each other's
//! records or race to delete the same photo.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::record::{find_by_id, next_id_for, NewReport, PersonRecord, PhotoUpload};
use crate::storage::{JsonFileStore, PhotoStore, RecordStore};

/// Operations behind the HTTP routes and the CLI.
#[derive(Debug)]
pub struct ReportService {
    records: Arc<dyn RecordStore>,
    photos: PhotoStore,
    photo_capacity: Option<usize>,
    write_lock: Mutex<()>,
}

impl ReportService {
    /// Create a service over the given stores.
    ///
    /// `photo_capacity` caps the number of stored photos; `None` keeps them all.
    #[must_use]
    pub fn new(
        records: Arc<dyn RecordStore>,
        photos: PhotoStore,
        photo_capacity: Option<usize>,
    ) -> Self {
        Self {
            records,
            photos,
            photo_capacity,
            write_lock: Mutex::new(()),
        }
    }

    /// Open the file-backed stores named by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record file or the upload directory cannot be created.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let records = JsonFileStore::open(&config.storage.data_file).await?;
        let photos = PhotoStore::open(config.upload_dir(), config.upload_url_prefix()).await?;
        Ok(Self::new(
            Arc::new(records),
            photos,
            config.photo_capacity(),
        ))
    }

    /// Get the photo store.
    #[must_use]
    pub fn photos(&self) -> &PhotoStore {
        &self.photos
    }

    /// Store a new report and return the record that was appended.
    ///
    /// The whole photo write, eviction and record append runs under the writer
    /// lock. The photo is written (and old photos evicted) before the record
    /// list is touched, so a failed save leaves the photo behind.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unusable photo name, or a storage
    /// error if the photo or the record list cannot be written.
    pub async fn submit(&self, report: NewReport, photo: &PhotoUpload) -> Result<PersonRecord> {
        let _guard = self.write_lock.lock().await;

        let photo_path = self.photos.save(photo).await?;
        if let Some(capacity) = self.photo_capacity {
            self.photos.evict_if_over_capacity(capacity).await?;
        }

        let mut records = self.records.load().await?;
        let record = report.into_record(next_id_for(&records), photo_path);
        records.push(record.clone());
        self.records.save(&records).await?;

        info!(id = record.id, photo = %record.photo, "Report submitted");
        Ok(record)
    }

    /// All reports in submission order.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the record list cannot be loaded.
    pub async fn list(&self) -> Result<Vec<PersonRecord>> {
        self.records.load().await
    }

    /// Look up a report by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if no record has this id, or a
    /// storage error if the record list cannot be loaded.
    pub async fn get(&self, id: u64) -> Result<PersonRecord> {
        let records = self.records.load().await?;
        let found = find_by_id(&records, id).cloned();
        debug!(id, found = found.is_some(), "Report lookup");
        found.ok_or(Error::RecordNotFound { id })
    }

    /// Apply the photo cap now, returning how many files were removed.
    ///
    /// `max_files` overrides the configured cap. Without either, nothing is removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload directory cannot be read or pruned.
    pub async fn prune_photos(&self, max_files: Option<usize>) -> Result<usize> {
        let Some(max) = max_files.or(self.photo_capacity) else {
            return Ok(0);
        };
        let _guard = self.write_lock.lock().await;
        self.photos.evict_if_over_capacity(max).await
    }
}
