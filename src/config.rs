//! Startup configuration.
//!
//! A YAML document naming the archive and, optionally, a script to run
//! before the interactive prompt:
//!
//! ```yaml
//! filesystem: fs.zip
//! startup_script: start.txt
//! ```
//!
//! `filesystem` is relative to the directory holding the configuration file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file '{}' not found", .path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read configuration file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration in '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Raw document as written on disk
#[derive(Debug, Deserialize)]
struct RawConfig {
    filesystem: PathBuf,
    #[serde(default)]
    startup_script: Option<PathBuf>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Archive backing the filesystem
    pub archive_path: PathBuf,
    /// Commands to run before interactive use
    pub startup_script: Option<PathBuf>,
}

impl Config {
    /// Load and resolve a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_yaml(&text, base).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a YAML document, resolving the archive path against `base`
    pub fn from_yaml(text: &str, base: &Path) -> Result<Self, serde_yaml::Error> {
        let raw: RawConfig = serde_yaml::from_str(text)?;
        Ok(Config {
            archive_path: base.join(raw.filesystem),
            startup_script: raw.startup_script,
        })
    }
}
