//! Optional TOML configuration.
//!
//! Every setting has a default, so an empty file (or no file at all) is a
//! valid configuration. Unknown keys are rejected so that typos surface
//! instead of silently falling back to defaults.
//!
//! ```toml
//! [archive]
//! compression_level = 9        # 0-9, omit for the deflate default
//! preserve_permissions = true  # store Unix mode bits on entries
//! preserve_mtime = true        # store modification times on entries
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use gome::config::Config;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::load_with_optional(Some(Path::new("gome.toml")))?;
//! let summary = config.archiver().archive(Path::new("data"), Path::new("data.zip"))?;
//! println!("{} files archived", summary.files);
//! # Ok(())
//! # }
//! ```

use crate::archive::{ArchiveOptions, Archiver};
use crate::core::GomeError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Highest deflate compression level accepted in configuration
pub const MAX_COMPRESSION_LEVEL: i64 = 9;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Settings for [`crate::archive`]
    #[serde(default)]
    pub archive: ArchiveOptions,
}

impl Config {
    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, GomeError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// holds out-of-range values.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = crate::utils::fs::read_text_file(path)?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        tracing::debug!(target: "config", "Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Loads configuration from `path` if given and present, else defaults.
    ///
    /// A path that does not exist yields the default configuration; a path
    /// that exists but cannot be parsed is an error.
    pub fn load_with_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load_from(path),
            Some(path) => {
                tracing::debug!(
                    target: "config",
                    "No config at {}, using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), GomeError> {
        if let Some(level) = self.archive.compression_level
            && !(0..=MAX_COMPRESSION_LEVEL).contains(&level)
        {
            return Err(GomeError::ConfigError {
                message: format!(
                    "archive.compression_level must be between 0 and {MAX_COMPRESSION_LEVEL}, got {level}"
                ),
            });
        }
        Ok(())
    }

    /// An [`Archiver`] using the `[archive]` settings
    pub fn archiver(&self) -> Archiver {
        Archiver::new(self.archive.clone())
    }
}
