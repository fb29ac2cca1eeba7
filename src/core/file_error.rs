//! Structured file system errors.
//!
//! Captures what was being done, to which path, and by whom at the point of
//! failure instead of reconstructing it later from an I/O error string.

use std::path::PathBuf;
use thiserror::Error;

/// Detailed file operation context for better error messages
#[derive(Debug, Clone)]
pub struct FileOperationContext {
    /// The type of operation being performed
    pub operation: FileOperation,
    /// The file path being accessed
    pub file_path: PathBuf,
    /// Additional context about why the file is being accessed
    pub purpose: String,
    /// The function that initiated the operation
    pub caller: String,
    /// Optional related paths (e.g., the copy destination)
    pub related_paths: Vec<PathBuf>,
}

/// Types of file operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    /// Reading a file completely
    Read,
    /// Opening a file for streaming
    Open,
    /// Creating or truncating a file
    Create,
    /// Writing a file
    Write,
    /// Copying bytes between two files
    Copy,
    /// Flushing a file to disk
    Sync,
    /// Getting file metadata
    Metadata,
    /// Creating a directory
    CreateDir,
    /// Listing a directory
    ReadDir,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Open => write!(f, "opening"),
            FileOperation::Create => write!(f, "creating"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Copy => write!(f, "copying"),
            FileOperation::Sync => write!(f, "syncing"),
            FileOperation::Metadata => write!(f, "getting metadata of"),
            FileOperation::CreateDir => write!(f, "creating directory"),
            FileOperation::ReadDir => write!(f, "listing directory"),
        }
    }
}

impl FileOperationContext {
    /// Create a new file operation context
    pub fn new(
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        caller: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            file_path: file_path.into(),
            purpose: purpose.into(),
            caller: caller.into(),
            related_paths: Vec::new(),
        }
    }

    /// Add a related path for context
    pub fn with_related_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.related_paths.push(path.into());
        self
    }
}

/// File operation error with full context
#[derive(Error, Debug)]
#[error("File operation failed: {operation} {}", file_path.display())]
pub struct FileOperationError {
    /// The type of operation that failed
    pub operation: FileOperation,
    /// The file path that was being accessed
    pub file_path: PathBuf,
    /// Why the file was being accessed
    pub purpose: String,
    /// What code initiated the operation
    pub caller: String,
    /// The underlying IO error
    #[source]
    pub source: std::io::Error,
    /// Related paths for additional context
    pub related_paths: Vec<PathBuf>,
}

impl FileOperationError {
    /// Create a new file operation error from context and IO error
    pub fn new(context: FileOperationContext, source: std::io::Error) -> Self {
        Self {
            operation: context.operation,
            file_path: context.file_path,
            purpose: context.purpose,
            caller: context.caller,
            source,
            related_paths: context.related_paths,
        }
    }
}

/// Extension trait for Result types to add file operation context
pub trait FileResultExt<T> {
    /// Add file operation context to a Result
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        caller: impl Into<String>,
    ) -> Result<T, FileOperationError>;
}

impl<T> FileResultExt<T> for Result<T, std::io::Error> {
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        caller: impl Into<String>,
    ) -> Result<T, FileOperationError> {
        self.map_err(|io_error| {
            let context = FileOperationContext::new(operation, file_path, purpose, caller);
            FileOperationError::new(context, io_error)
        })
    }
}
