//! Error types for lostfound.
//!
//! This module defines all error types used throughout the lostfound crate.
//! Every variant belongs to an [`ErrorKind`], which is what the HTTP layer
//! uses to pick a status code.

use std::path::PathBuf;
use thiserror::Error;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The client sent an incomplete or unusable request.
    Validation,
    /// The request body is over the configured size limit.
    TooLarge,
    /// The requested record does not exist.
    NotFound,
    /// Reading or writing persisted state failed.
    Storage,
    /// Configuration could not be loaded or is invalid.
    Config,
}

/// The main error type for lostfound operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Request Errors ===
    /// A required form field was not supplied.
    #[error("missing form field '{field}'")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A form field was supplied but cannot be used.
    #[error("invalid form field '{field}': {message}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },

    /// The multipart body could not be read.
    #[error("malformed multipart request: {0}")]
    Multipart(String),

    /// The request body exceeded the upload size limit.
    #[error("request body too large: {0}")]
    PayloadTooLarge(String),

    /// No record carries the requested id.
    #[error("no report with id {id}")]
    RecordNotFound {
        /// The id that was looked up.
        id: u64,
    },

    // === Storage Errors ===
    /// Failed to read the record file.
    #[error("failed to read records from {path}: {source}")]
    StorageRead {
        /// Path to the record file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the record file.
    #[error("failed to write records to {path}: {source}")]
    StorageWrite {
        /// Path to the record file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The record file does not hold a well-formed record list.
    #[error("record file {path} is corrupt: {source}")]
    StorageCorrupt {
        /// Path to the record file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write or remove an uploaded photo.
    #[error("failed to store photo {path}: {source}")]
    PhotoWrite {
        /// Path of the photo file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for lostfound operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a missing field error.
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Create an invalid field error.
    #[must_use]
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// Create a multipart error.
    #[must_use]
    pub fn multipart(message: impl Into<String>) -> Self {
        Self::Multipart(message.into())
    }

    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField { .. } | Self::InvalidField { .. } | Self::Multipart(_) => {
                ErrorKind::Validation
            }
            Self::PayloadTooLarge(_) => ErrorKind::TooLarge,
            Self::RecordNotFound { .. } => ErrorKind::NotFound,
            Self::ConfigLoad(_) | Self::ConfigValidation { .. } => ErrorKind::Config,
            Self::StorageRead { .. }
            | Self::StorageWrite { .. }
            | Self::StorageCorrupt { .. }
            | Self::PhotoWrite { .. }
            | Self::DirectoryCreate { .. }
            | Self::Io(_)
            | Self::Json(_) => ErrorKind::Storage,
        }
    }

    /// Check if this error was caused by the client's request.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Check if this error is a record lookup miss.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
