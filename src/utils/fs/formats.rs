//! Reading and writing structured data files.
//!
//! - Plain text
//! - JSON (compact or pretty printed, newline terminated)
//! - TOML (read only, used for configuration)
//!
//! All writes go through [`super::atomic::safe_write`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use gome::utils::fs::formats::{read_json_file, write_json_file};
//! use serde::{Deserialize, Serialize};
//! use std::path::Path;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Settings {
//!     name: String,
//!     retries: u32,
//! }
//!
//! # fn example() -> anyhow::Result<()> {
//! let settings = Settings { name: "nightly".to_string(), retries: 3 };
//! write_json_file(Path::new("settings.json"), &settings, true)?;
//!
//! let loaded: Settings = read_json_file(Path::new("settings.json"))?;
//! # Ok(())
//! # }
//! ```

use crate::core::file_error::{FileOperation, FileResultExt};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Reads a text file with proper error handling and context.
///
/// # Errors
/// Returns a [`crate::core::FileOperationError`] if the file cannot be read
/// or is not valid UTF-8
pub fn read_text_file(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path).with_file_context(
        FileOperation::Read,
        path,
        "reading text file",
        "utils::fs::formats::read_text_file",
    )?)
}

/// Writes a text file atomically, creating parent directories as needed.
pub fn write_text_file(path: &Path, content: &str) -> Result<()> {
    super::atomic::safe_write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Reads and parses a JSON file.
///
/// # Type Parameters
/// * `T` - The type to deserialize into
///
/// # Errors
/// Returns an error if the file cannot be read or does not parse as `T`
pub fn read_json_file<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = read_text_file(path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON from file: {}", path.display()))
}

/// Writes data as JSON to a file atomically.
///
/// The file is created or replaced, and always ends with a newline.
///
/// # Arguments
/// * `path` - The path to write to
/// * `data` - The data to serialize
/// * `pretty` - Whether to use pretty formatting
///
/// # Errors
/// Returns an error if serialization fails or the file cannot be written
pub fn write_json_file<T>(path: &Path, data: &T, pretty: bool) -> Result<()>
where
    T: serde::Serialize + ?Sized,
{
    let mut json = if pretty {
        serde_json::to_string_pretty(data)
    } else {
        serde_json::to_string(data)
    }
    .with_context(|| format!("Failed to serialize data to JSON for: {}", path.display()))?;
    json.push('\n');

    write_text_file(path, &json)
        .with_context(|| format!("Failed to write JSON file: {}", path.display()))
}

/// Reads and parses a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed
pub fn read_toml_file<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = read_text_file(path)?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}
