//! Core error types for gome.
//!
//! - [`GomeError`] covers the typed failures of the hashing, config and
//!   filesystem helpers.
//! - [`FileOperationError`] wraps an [`std::io::Error`] with the operation,
//!   path, purpose and caller that produced it. Attach it with
//!   [`FileResultExt::with_file_context`].
//!
//! The archiver's error type lives with the archiver, in
//! [`crate::archive::ArchiveError`].

pub mod error;
pub mod file_error;

pub use error::GomeError;
pub use file_error::{FileOperation, FileOperationContext, FileOperationError, FileResultExt};
