//! Photo storage for lostfound.
//!
//! Uploaded photos are written under a single directory using a sanitized
//! form of the client's file name. The directory can be capped at a number of
//! files, in which case the oldest files are evicted first.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::record::PhotoUpload;

/// Device names Windows refuses to use as file names.
const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "LPT1", "LPT2", "LPT3",
];

/// Characters that survive sanitizing.
fn unsafe_chars() -> &'static Regex {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("valid filename pattern"))
}

/// Reduce a client-supplied file name to a safe, flat file name.
///
/// The name is NFKD-normalized and what remains outside ASCII is dropped, so
/// accented letters keep their base letter. Path separators and whitespace runs
/// become a single `_`, anything outside `[A-Za-z0-9_.-]` is removed and
/// leading or trailing `.`/`_` are trimmed. The result may be empty.
///
/// ```
/// use lostfound::storage::sanitize_filename;
///
/// assert_eq!(sanitize_filename("photo 1.jpg"), "photo_1.jpg");
/// assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
/// ```
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let ascii: String = name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let stripped = unsafe_chars().replace_all(&joined, "");
    let trimmed = stripped.trim_matches(|c: char| c == '.' || c == '_');

    let stem = trimmed.split('.').next().unwrap_or_default();
    if WINDOWS_DEVICE_NAMES
        .iter()
        .any(|device| device.eq_ignore_ascii_case(stem))
    {
        format!("_{trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// A photo file currently held in the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    /// File name within the upload directory.
    pub name: String,
    /// Full path of the file.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Creation time, or modification time where creation time is unavailable.
    pub created: DateTime<Utc>,
}

/// Directory-backed store for uploaded photos.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    /// Directory photos are written to.
    dir: PathBuf,
    /// URL path the directory is served under, without trailing slash.
    url_prefix: String,
}

impl PhotoStore {
    /// Open the upload directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub async fn open(dir: impl AsRef<Path>, url_prefix: impl Into<String>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| Error::DirectoryCreate {
                path: dir.clone(),
                source,
            })?;

        let url_prefix = url_prefix.into().trim_end_matches('/').to_string();
        debug!("Photo store at {} served as {}", dir.display(), url_prefix);
        Ok(Self { dir, url_prefix })
    }

    /// Get the upload directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// URL path a photo with this stored name is served at.
    #[must_use]
    pub fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.url_prefix, name)
    }

    /// Write an uploaded photo and return the URL path it is served at.
    ///
    /// A photo whose sanitized name matches an existing file replaces it.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the file name sanitizes to nothing, or a
    /// storage error if the file cannot be written.
    pub async fn save(&self, upload: &PhotoUpload) -> Result<String> {
        let name = sanitize_filename(&upload.file_name);
        if name.is_empty() {
            return Err(Error::invalid_field(
                "photo",
                format!("unusable file name {:?}", upload.file_name),
            ));
        }

        let path = self.dir.join(&name);
        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(|source| Error::PhotoWrite {
                path: path.clone(),
                source,
            })?;

        debug!("Stored {} bytes at {}", upload.bytes.len(), path.display());
        Ok(self.url_for(&name))
    }

    /// List stored photos, oldest first.
    ///
    /// Files created at the same instant are ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub async fn list(&self) -> Result<Vec<StoredPhoto>> {
        let mut photos = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("Photo {:?} vanished while listing", entry.file_name());
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            if !metadata.is_file() {
                continue;
            }
            let created = metadata
                .created()
                .or_else(|_| metadata.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);

            photos.push(StoredPhoto {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path(),
                size: metadata.len(),
                created: DateTime::<Utc>::from(created),
            });
        }

        photos.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.name.cmp(&b.name)));
        Ok(photos)
    }

    /// Delete the oldest photos until at most `max_files` remain.
    ///
    /// Files are removed whether or not a record still refers to them. A file
    /// that disappears before it can be removed is skipped. Returns the number
    /// of files deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read or a file cannot be removed.
    pub async fn evict_if_over_capacity(&self, max_files: usize) -> Result<usize> {
        let photos = self.list().await?;
        let excess = photos.len().saturating_sub(max_files);
        let mut evicted = 0;

        for photo in photos.iter().take(excess) {
            match tokio::fs::remove_file(&photo.path).await {
                Ok(()) => {
                    evicted += 1;
                    debug!("Evicted photo {}", photo.name);
                }
                // Already gone
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(Error::PhotoWrite {
                        path: photo.path.clone(),
                        source,
                    });
                }
            }
        }

        if evicted > 0 {
            info!("Evicted {} photos to keep {}", evicted, max_files);
        }
        Ok(evicted)
    }
}
