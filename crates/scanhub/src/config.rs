//! Service configuration loading and management.
//!
//! Configuration can come from a TOML file (explicit path or upward
//! discovery of `scanhub.toml`), with environment variable overrides
//! applied last. The resulting [`ServiceConfig`] is immutable for the
//! lifetime of the server and shared with every handler.

use crate::{Result, ScanHubError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_language() -> String {
    "eng".to_string()
}

fn default_psm() -> u8 {
    3
}

/// Main service configuration.
///
/// # Example
///
/// ```rust
/// use scanhub::config::ServiceConfig;
///
/// // Create with defaults (uploads/ staging dir, 16 MiB cap)
/// let config = ServiceConfig::default();
/// assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Directory where uploads are staged for the duration of a request
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Maximum request body size in bytes (enforced at the router layer)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// OCR collaborator configuration
    #[serde(default)]
    pub ocr: OcrConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            ocr: OcrConfig::default(),
        }
    }
}

/// OCR configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Language code passed to Tesseract (e.g., "eng", "deu")
    #[serde(default = "default_language")]
    pub language: String,

    /// Tesseract page segmentation mode (3 = fully automatic)
    #[serde(default = "default_psm")]
    pub psm: u8,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            psm: default_psm(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ScanHubError::Validation` if the file doesn't exist or is invalid TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ScanHubError::validation(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        toml::from_str(&content)
            .map_err(|e| ScanHubError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))
    }

    /// Discover a configuration file in parent directories.
    ///
    /// Searches for `scanhub.toml` in the current directory and its parents.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(ScanHubError::Io)?;

        loop {
            let scanhub_toml = current.join("scanhub.toml");
            if scanhub_toml.exists() {
                return Ok(Some(Self::from_toml_file(scanhub_toml)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Resolve the effective configuration for server startup.
    ///
    /// Explicit path wins over discovery, discovery over defaults.
    /// Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_toml_file(p)?,
            None => match Self::discover()? {
                Some(config) => {
                    tracing::info!("Loaded service config from discovered scanhub.toml");
                    config
                }
                None => {
                    tracing::info!("No config file found, using default configuration");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `SCANHUB_UPLOAD_DIR` and `SCANHUB_MAX_UPLOAD_BYTES` overrides.
    ///
    /// Invalid values are logged and ignored rather than failing startup.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("SCANHUB_UPLOAD_DIR") {
            if !dir.trim().is_empty() {
                tracing::info!("Upload directory configured from environment: {}", dir);
                self.upload_dir = PathBuf::from(dir);
            }
        }

        if let Ok(value) = std::env::var("SCANHUB_MAX_UPLOAD_BYTES") {
            match value.parse::<usize>() {
                Ok(bytes) if bytes > 0 => {
                    tracing::info!(
                        "Upload size limit configured from environment: {} bytes ({:.1} MB)",
                        bytes,
                        bytes as f64 / (1024.0 * 1024.0)
                    );
                    self.max_upload_bytes = bytes;
                }
                _ => {
                    tracing::warn!(
                        "Failed to parse SCANHUB_MAX_UPLOAD_BYTES='{}', must be a positive integer",
                        value
                    );
                }
            }
        }
    }
}
