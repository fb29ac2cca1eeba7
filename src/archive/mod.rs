//! Directory-to-zip archiving.
//!
//! [`Archiver`] walks a source path and writes every node under it into a
//! single zip container:
//!
//! - A directory source contributes its own base name as a prefix, so
//!   extracting `data.zip` recreates `data/`. The root itself is stored as
//!   the `data/` entry.
//! - A single file source is stored under its file name with no prefix.
//! - Directories are stored with a trailing `/` and no payload. Files are
//!   deflate-compressed. Symlinks are stored as links and never followed.
//!   FIFOs, sockets and devices are skipped with a warning.
//! - Entries are written depth-first, sorted by file name within each
//!   directory, so the same tree always yields the same entry order.
//!
//! The container is built in a temporary file next to the destination and
//! renamed over it only once the central directory is written. A failed run
//! therefore never leaves a truncated archive behind, and an existing
//! destination survives untouched. The first error aborts the run.
//!
//! # Examples
//!
//! ```rust,no_run
//! use gome::archive::{ArchiveOptions, Archiver, create_zip};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), gome::archive::ArchiveError> {
//! let summary = create_zip(Path::new("data"), Path::new("data.zip"))?;
//! println!("{} files, {} directories", summary.files, summary.directories);
//!
//! let fast = Archiver::new(ArchiveOptions {
//!     compression_level: Some(1),
//!     ..ArchiveOptions::default()
//! });
//! fast.archive(Path::new("logs"), Path::new("logs.zip"))?;
//! # Ok(())
//! # }
//! ```

pub mod entry;
pub mod error;

pub use entry::{ArchiveEntry, EntryKind, entry_name};
pub use error::{ArchiveError, ArchiveErrorKind};

use crate::utils::fs::atomic::{persist, temp_file_beside};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::result::ZipError;

/// Knobs for [`Archiver`]. Loadable from the `[archive]` config table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveOptions {
    /// Deflate level 0-9; `None` uses the deflate default
    pub compression_level: Option<i64>,
    /// Store Unix permission bits on each entry
    pub preserve_permissions: bool,
    /// Store each node's modification time instead of the current time
    pub preserve_mtime: bool,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            compression_level: None,
            preserve_permissions: true,
            preserve_mtime: true,
        }
    }
}

/// Outcome of a successful [`Archiver::archive`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Where the archive was written
    pub destination: PathBuf,
    /// Number of file entries
    pub files: usize,
    /// Number of directory entries, the source root included
    pub directories: usize,
    /// Number of symlink entries
    pub symlinks: usize,
    /// Special files left out of the archive
    pub skipped: usize,
    /// Total uncompressed bytes of file entries
    pub bytes: u64,
}

impl ArchiveSummary {
    /// Total number of entries written
    pub fn entries(&self) -> usize {
        self.files + self.directories + self.symlinks
    }
}

/// Builds zip archives from files and directory trees.
#[derive(Debug, Clone, Default)]
pub struct Archiver {
    options: ArchiveOptions,
}

impl Archiver {
    pub fn new(options: ArchiveOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ArchiveOptions {
        &self.options
    }

    /// Archives `source` into a zip file at `destination`.
    ///
    /// `destination` is overwritten if it exists. Its parent directory must
    /// already exist.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::Stat`] if `source` is missing or inaccessible.
    ///   Nothing is created in that case.
    /// - [`ArchiveError::Create`] if the temporary container cannot be
    ///   created next to `destination`
    /// - [`ArchiveError::Walk`] if a node under `source` cannot be listed or
    ///   opened
    /// - [`ArchiveError::Entry`] if writing an entry fails
    /// - [`ArchiveError::Finalize`] / [`ArchiveError::Persist`] if the
    ///   container cannot be finished or moved into place
    pub fn archive(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<ArchiveSummary, ArchiveError> {
        let metadata = fs::metadata(source).map_err(|source_err| ArchiveError::Stat {
            path: source.to_path_buf(),
            source: source_err,
        })?;

        tracing::info!(
            target: "archive",
            "Archiving {} into {}",
            source.display(),
            destination.display()
        );

        let temp = temp_file_beside(destination).map_err(|e| ArchiveError::Create {
            path: destination.to_path_buf(),
            source: e,
        })?;
        let excluded = excluded_paths(temp.path(), destination);

        let mut session = Session {
            writer: ZipWriter::new(temp),
            options: &self.options,
            summary: ArchiveSummary {
                destination: destination.to_path_buf(),
                ..ArchiveSummary::default()
            },
        };

        if metadata.is_dir() {
            session.add_tree(source, &excluded)?;
        } else {
            let name = entry_name(None, Path::new(source.file_name().unwrap_or_default()));
            session.add_node(source, name, &metadata)?;
        }

        let Session { writer, summary, .. } = session;

        let temp = writer.finish().map_err(|e| ArchiveError::Finalize {
            path: destination.to_path_buf(),
            source: e,
        })?;
        persist(temp, destination).map_err(|e| ArchiveError::Persist {
            path: destination.to_path_buf(),
            source: e,
        })?;

        tracing::info!(
            target: "archive",
            "Wrote {} ({} files, {} directories, {} symlinks, {} bytes)",
            destination.display(),
            summary.files,
            summary.directories,
            summary.symlinks,
            summary.bytes
        );
        Ok(summary)
    }
}

/// Archives `source` into `destination` with default options.
///
/// See [`Archiver::archive`].
pub fn create_zip(source: &Path, destination: &Path) -> Result<ArchiveSummary, ArchiveError> {
    Archiver::default().archive(source, destination)
}

/// Archives `source` into `destination` with explicit options.
pub fn create_zip_with_options(
    source: &Path,
    destination: &Path,
    options: ArchiveOptions,
) -> Result<ArchiveSummary, ArchiveError> {
    Archiver::new(options).archive(source, destination)
}

/// One in-progress archive.
struct Session<'a> {
    writer: ZipWriter<NamedTempFile>,
    options: &'a ArchiveOptions,
    summary: ArchiveSummary,
}

impl Session<'_> {
    fn add_tree(&mut self, root: &Path, excluded: &[PathBuf]) -> Result<(), ArchiveError> {
        let prefix = base_name(root);

        for item in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let item = item.map_err(ArchiveError::walk)?;
            let path = item.path();

            if excluded.iter().any(|skip| same_file(path, skip)) {
                tracing::debug!(
                    target: "archive",
                    "Skipping the archive being written: {}",
                    path.display()
                );
                continue;
            }

            let relative = path.strip_prefix(root).unwrap_or(path);
            if item.depth() == 0 && prefix.is_none() {
                continue;
            }
            let name = entry_name(prefix.as_deref(), relative);

            // The root may be a symlink to a directory; it is walked as one.
            let metadata = if item.depth() == 0 {
                fs::metadata(path)
            } else {
                fs::symlink_metadata(path)
            }
            .map_err(|e| ArchiveError::Walk {
                path: path.to_path_buf(),
                source: e,
            })?;

            self.add_node(path, name, &metadata)?;
        }
        Ok(())
    }

    fn add_node(
        &mut self,
        path: &Path,
        name: String,
        metadata: &fs::Metadata,
    ) -> Result<(), ArchiveError> {
        let Some(entry) = ArchiveEntry::from_metadata(name, metadata) else {
            tracing::warn!(
                target: "archive",
                "Skipping special file {}",
                path.display()
            );
            self.summary.skipped += 1;
            return Ok(());
        };

        let file_options = entry.file_options(self.options);
        let entry_err = |source: ZipError| ArchiveError::Entry {
            name: entry.name().to_string(),
            source,
        };

        match entry.kind() {
            EntryKind::Directory => {
                self.writer
                    .add_directory(entry.name().to_string(), file_options)
                    .map_err(entry_err)?;
                self.summary.directories += 1;
            }
            EntryKind::Symlink => {
                let target = fs::read_link(path).map_err(|e| ArchiveError::Walk {
                    path: path.to_path_buf(),
                    source: e,
                })?;
                self.writer
                    .add_symlink(
                        entry.name().to_string(),
                        target.to_string_lossy().into_owned(),
                        file_options,
                    )
                    .map_err(entry_err)?;
                self.summary.symlinks += 1;
            }
            EntryKind::File => {
                let mut file = File::open(path).map_err(|e| ArchiveError::Walk {
                    path: path.to_path_buf(),
                    source: e,
                })?;
                self.writer
                    .start_file(entry.name().to_string(), file_options)
                    .map_err(entry_err)?;
                let copied = io::copy(&mut file, &mut self.writer)
                    .map_err(|e| entry_err(ZipError::Io(e)))?;

                self.summary.files += 1;
                self.summary.bytes += copied;
            }
        }

        tracing::debug!(target: "archive", "Added {}", entry.name());
        Ok(())
    }
}

/// Base name used to prefix entries of a directory source.
///
/// `.` and `..` style paths have no file name of their own, so they are
/// resolved first. A filesystem root has none at all and gets no prefix.
fn base_name(root: &Path) -> Option<String> {
    let name = match root.file_name() {
        Some(name) => Some(name.to_os_string()),
        None => root
            .canonicalize()
            .ok()
            .and_then(|resolved| resolved.file_name().map(|n| n.to_os_string())),
    };
    name.map(|n| n.to_string_lossy().into_owned())
}

/// Paths the walk must not add: the temporary container and the old
/// destination, when either sits inside the source tree.
fn excluded_paths(temp: &Path, destination: &Path) -> Vec<PathBuf> {
    [temp, destination]
        .into_iter()
        .filter_map(resolve_file_path)
        .collect()
}

/// Canonical form of a file path whose parent exists.
fn resolve_file_path(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    parent.canonicalize().ok().map(|parent| parent.join(name))
}

fn same_file(walked: &Path, excluded: &Path) -> bool {
    walked.file_name() == excluded.file_name()
        && resolve_file_path(walked).is_some_and(|resolved| resolved == excluded)
}
