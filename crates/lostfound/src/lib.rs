//! `lostfound` - A small web application for lost person reports
//!
//! Reports (name, age, location, details and a photo) are submitted through a
//! form, kept as a JSON array in a single file, and browsed as a list and a
//! detail page. Uploaded photos are stored on local disk.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod record;
pub mod reports;
pub mod storage;

pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use http::{build_router, serve, AppState};
pub use logging::init_logging;
pub use record::{NewReport, PersonRecord, PhotoUpload};
pub use reports::ReportService;
pub use storage::{JsonFileStore, MemoryStore, PhotoStore, RecordStore};
