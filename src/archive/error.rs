//! Error type for archive creation.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use zip::result::ZipError;

/// Which phase of [`super::Archiver::archive`] failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveErrorKind {
    /// Nothing was written yet: the source could not be stat'ed or the
    /// destination could not be created
    Setup,
    /// A single entry could not be read or written
    Entry,
    /// The central directory could not be written or the archive could not
    /// be moved into place
    Finalize,
}

/// Failure while building an archive.
///
/// Every variant is terminal. The temporary container is discarded and
/// the destination is left as it was before the call.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Source does not exist or cannot be inspected
    #[error("Cannot stat archive source {}: {source}", path.display())]
    Stat {
        /// The source path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Destination (or its temporary sibling) cannot be created
    #[error("Cannot create archive {}: {source}", path.display())]
    Create {
        /// The destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A node under the source could not be listed, opened or inspected
    #[error("Cannot read {} while archiving: {source}", path.display())]
    Walk {
        /// The node that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Writing the header or payload of an entry failed
    #[error("Failed to write archive entry '{name}': {source}")]
    Entry {
        /// Name of the entry inside the archive
        name: String,
        /// Underlying zip error
        #[source]
        source: ZipError,
    },

    /// Writing the central directory failed
    #[error("Failed to finalize archive {}: {source}", path.display())]
    Finalize {
        /// The destination path
        path: PathBuf,
        /// Underlying zip error
        #[source]
        source: ZipError,
    },

    /// The finished archive could not be synced or renamed over the destination
    #[error("Failed to move finished archive to {}: {source}", path.display())]
    Persist {
        /// The destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ArchiveError {
    /// The phase this error belongs to.
    pub fn kind(&self) -> ArchiveErrorKind {
        match self {
            Self::Stat { .. } | Self::Create { .. } => ArchiveErrorKind::Setup,
            Self::Walk { .. } | Self::Entry { .. } => ArchiveErrorKind::Entry,
            Self::Finalize { .. } | Self::Persist { .. } => ArchiveErrorKind::Finalize,
        }
    }

    pub(crate) fn walk(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        Self::Walk {
            path,
            source: io::Error::from(err),
        }
    }
}
