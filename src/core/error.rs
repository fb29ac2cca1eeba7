//! Error types shared by the gome helpers.
//!
//! Most helpers return [`anyhow::Result`] and attach path context with
//! `.with_context(...)`. The failures a caller may want to match on are
//! collected in [`GomeError`], which converts into `anyhow::Error` like any
//! other `std::error::Error`.
//!
//! The archiver has its own error type, [`crate::archive::ArchiveError`],
//! because its callers need to tell setup, per-entry and finalize failures
//! apart.
//!
//! # Examples
//!
//! ```rust,no_run
//! use gome::core::GomeError;
//! use gome::hash::Algorithm;
//!
//! match "whirlpool".parse::<Algorithm>() {
//!     Ok(algorithm) => println!("using {algorithm}"),
//!     Err(GomeError::UnsupportedAlgorithm { name }) => {
//!         eprintln!("{name} is not supported, pick md5, sha1, sha256 or sha512");
//!     }
//!     Err(e) => eprintln!("unexpected error: {e}"),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Typed failures raised by the gome helpers.
#[derive(Error, Debug)]
pub enum GomeError {
    /// The requested hashing algorithm is not one of md5, sha1, sha256, sha512
    #[error("No valid hashing algorithm specified: '{name}' (expected md5, sha1, sha256 or sha512)")]
    UnsupportedAlgorithm {
        /// The name that failed to parse
        name: String,
    },

    /// A checksum string is not of the form `algorithm:hexdigest`
    #[error("Invalid checksum '{value}': {reason}")]
    InvalidChecksum {
        /// The rejected input
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// A path expected to be a directory is something else
    #[error("Path exists but is not a directory: {}", path.display())]
    NotADirectory {
        /// The offending path
        path: PathBuf,
    },

    /// Configuration file could not be understood
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}
