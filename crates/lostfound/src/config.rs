//! Configuration management for lostfound.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "lostfound";

/// Subdirectory of the static root that holds uploaded photos.
const UPLOADS_DIR_NAME: &str = "uploads";

/// URL path the static root is served under.
pub const STATIC_URL_PREFIX: &str = "/static";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. `PORT` environment variable (server port only)
/// 2. Environment variables (prefixed with `LOSTFOUND_`, `__` separates sections)
/// 3. TOML config file at `~/.config/lostfound/config.toml`
/// 4. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the JSON record file.
    pub data_file: PathBuf,
    /// Directory served under `/static`; photos go in its `uploads` child.
    pub static_dir: PathBuf,
    /// Maximum number of stored photos.
    /// Set to 0 for unlimited.
    pub max_photos: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data.json"),
            static_dir: PathBuf::from("static"),
            max_photos: 50,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("LOSTFOUND_").split("__"))
            .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::ConfigValidation {
                message: "server.port must be greater than 0".to_string(),
            });
        }

        if self.server.max_upload_bytes == 0 {
            return Err(Error::ConfigValidation {
                message: "server.max_upload_bytes must be greater than 0".to_string(),
            });
        }

        if self.storage.data_file.as_os_str().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage.data_file must not be empty".to_string(),
            });
        }

        self.bind_addr()?;
        Ok(())
    }

    /// Get the socket address the server should bind.
    ///
    /// # Errors
    ///
    /// Returns an error if `server.host` is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip = self
            .server
            .host
            .parse()
            .map_err(|_| Error::ConfigValidation {
                message: format!("invalid server.host: {}", self.server.host),
            })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// Get the directory uploaded photos are written to.
    #[must_use]
    pub fn upload_dir(&self) -> PathBuf {
        self.storage.static_dir.join(UPLOADS_DIR_NAME)
    }

    /// Get the URL prefix stored photos are served under.
    #[must_use]
    pub fn upload_url_prefix(&self) -> String {
        format!("{STATIC_URL_PREFIX}/{UPLOADS_DIR_NAME}")
    }

    /// Photo retention cap, or `None` when eviction is disabled.
    #[must_use]
    pub fn photo_capacity(&self) -> Option<usize> {
        match self.storage.max_photos {
            0 => None,
            n => Some(n),
        }
    }
}
