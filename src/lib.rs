//! gome - small, independent filesystem helpers
//!
//! A collection of stateless helpers that do not depend on each other:
//!
//! - [`archive`] - zip a file or directory tree, atomically
//! - [`hash`] - MD5, SHA-1, SHA-256 and SHA-512 digests of files and strings,
//!   digest validation and `algorithm:hex` checksums
//! - [`text`] - line-oriented substring search
//! - [`utils::fs`] - recursive copy, atomic writes and JSON/TOML/text files
//! - [`config`] - optional TOML configuration for the archiver
//! - [`core`] - shared error types
//!
//! # Example
//!
//! ```rust,no_run
//! use gome::{archive, hash, text, utils};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let copied = utils::fs::copy_dir(Path::new("data"), Path::new("backup/data"))?;
//! if !copied.is_complete() {
//!     eprintln!("{} entries failed to copy", copied.failures.len());
//! }
//!
//! let summary = archive::create_zip(Path::new("backup/data"), Path::new("data.zip"))?;
//! println!("archived {} files", summary.files);
//!
//! let digest = hash::file_sha256(Path::new("data.zip"))?;
//! assert!(hash::validate_sha256(&digest));
//!
//! let log = utils::fs::read_text_file(Path::new("backup/data/run.log"))?;
//! if text::text_contains_no_case(&log, "error") {
//!     println!("run had errors");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! The crate emits [`tracing`] events (targets `archive`, `fs::copy`,
//! `hash` and `config`) and never installs a subscriber itself.

pub mod archive;
pub mod config;
pub mod core;
pub mod hash;
pub mod text;
pub mod utils;

// test_utils is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
