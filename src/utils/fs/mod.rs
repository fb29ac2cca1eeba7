//! File system helpers.
//!
//! - [`dirs`]: directory creation, single-file copy and fail-soft recursive copy
//! - [`atomic`]: temp-and-rename writes
//! - [`formats`]: text, JSON and TOML files
//!
//! # Examples
//!
//! ```rust,no_run
//! use gome::utils::fs::{copy_dir, read_json_file, write_json_file};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let summary = copy_dir(Path::new("fixtures"), Path::new("work/fixtures"))?;
//! println!("copied {} files", summary.files_copied);
//!
//! let value: serde_json::Value = read_json_file(Path::new("work/fixtures/data.json"))?;
//! write_json_file(Path::new("work/out.json"), &value, true)?;
//! # Ok(())
//! # }
//! ```

pub mod atomic;
pub mod dirs;
pub mod formats;

// Directory operations
pub use dirs::{CopyFailure, CopySummary, copy, copy_dir, copy_file, ensure_dir, ensure_parent_dir};

// Atomic write operations
pub use atomic::{atomic_write, safe_write};

// Format-specific I/O
pub use formats::{read_json_file, read_text_file, read_toml_file, write_json_file, write_text_file};
