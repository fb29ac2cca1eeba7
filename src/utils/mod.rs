//! Filesystem utilities.
//!
//! See [`fs`] for directory copy, atomic writes and JSON files.

pub mod fs;

pub use fs::{
    CopySummary, atomic_write, copy_dir, copy_file, ensure_dir, read_json_file, safe_write,
    write_json_file,
};
