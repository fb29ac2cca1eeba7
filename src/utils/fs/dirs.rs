//! Directory operations: creating directories and copying files and trees.
//!
//! [`copy_dir`] is deliberately fail-soft. A file or subdirectory that cannot
//! be copied is logged, recorded in the returned [`CopySummary`], and the walk
//! moves on to its siblings. Only failures on the top-level source and
//! destination abort the copy.

use crate::core::file_error::{FileOperation, FileOperationContext, FileOperationError, FileResultExt};
use crate::core::GomeError;
use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// # Arguments
///
/// * `path` - The directory path to create
///
/// # Returns
///
/// - `Ok(())` if the directory exists or was successfully created
/// - `Err` if the path exists but is not a directory, or creation fails
///
/// # Examples
///
/// ```rust,no_run
/// use gome::utils::fs::ensure_dir;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// ensure_dir(Path::new("output/reports/2024"))?;
/// # Ok(())
/// # }
/// ```
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_file_context(
                FileOperation::CreateDir,
                path,
                "ensuring directory exists",
                "utils::fs::dirs::ensure_dir",
            )
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        return Err(GomeError::NotADirectory {
            path: path.to_path_buf(),
        }
        .into());
    }
    Ok(())
}

/// Ensures that the parent directory of a file path exists.
///
/// Paths without a parent (filesystem roots, bare file names) are accepted
/// as-is.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_dir(parent)?;
    }
    Ok(())
}

/// Copies a single file from `src` to `dst`, returning the number of bytes copied.
///
/// The destination is created or truncated, the source bytes are streamed
/// into it, the destination is synced to disk, and the source permissions are
/// carried over.
///
/// # Examples
///
/// ```rust,no_run
/// use gome::utils::fs::copy_file;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let bytes = copy_file(Path::new("report.txt"), Path::new("backup/report.txt"))?;
/// println!("copied {bytes} bytes");
/// # Ok(())
/// # }
/// ```
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64> {
    const CALLER: &str = "utils::fs::dirs::copy_file";

    let mut source = fs::File::open(src).map_err(|e| {
        FileOperationError::new(
            FileOperationContext::new(FileOperation::Open, src, "copying file", CALLER)
                .with_related_path(dst),
            e,
        )
    })?;
    let permissions = source
        .metadata()
        .with_file_context(FileOperation::Metadata, src, "copying file", CALLER)?
        .permissions();

    let mut target = fs::File::create(dst).map_err(|e| {
        FileOperationError::new(
            FileOperationContext::new(FileOperation::Create, dst, "copying file", CALLER)
                .with_related_path(src),
            e,
        )
    })?;

    let bytes = io::copy(&mut source, &mut target).map_err(|e| {
        FileOperationError::new(
            FileOperationContext::new(FileOperation::Copy, src, "copying file", CALLER)
                .with_related_path(dst),
            e,
        )
    })?;

    target.sync_all().with_file_context(FileOperation::Sync, dst, "copying file", CALLER)?;

    fs::set_permissions(dst, permissions)
        .with_context(|| format!("Failed to copy permissions to {}", dst.display()))?;

    tracing::trace!(target: "fs::copy", "Copied {} -> {} ({bytes} bytes)", src.display(), dst.display());
    Ok(bytes)
}

/// Alias for [`copy_file`], kept for callers of the older name.
pub fn copy(src: &Path, dst: &Path) -> Result<u64> {
    copy_file(src, dst)
}

/// One entry that [`copy_dir`] could not copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyFailure {
    /// Source path of the entry
    pub path: PathBuf,
    /// Rendered error chain
    pub message: String,
}

/// Outcome of a [`copy_dir`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopySummary {
    /// Regular files copied, symlinked files included
    pub files_copied: usize,
    /// Subdirectories created under the destination
    pub dirs_created: usize,
    /// Total bytes copied
    pub bytes_copied: u64,
    /// Special files (FIFOs, sockets, devices) that were not copied
    pub skipped: usize,
    /// Entries that failed, in walk order
    pub failures: Vec<CopyFailure>,
}

impl CopySummary {
    /// True when every entry was copied or intentionally skipped
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn record_failure(&mut self, path: &Path, error: &anyhow::Error) {
        tracing::warn!(target: "fs::copy", "Error copying {}: {error:#}", path.display());
        self.failures.push(CopyFailure {
            path: path.to_path_buf(),
            message: format!("{error:#}"),
        });
    }
}

/// Recursively copies a directory and all its contents to a new location.
///
/// # Behavior
///
/// - Creates the destination directory (and its parents) if needed
/// - Recursively copies all subdirectories and regular files
/// - Copies the target of a symlink that resolves to a regular file; a
///   dangling symlink or one pointing at a directory is a recorded failure
/// - Skips special files, counting them in [`CopySummary::skipped`]
/// - Overwrites existing files in the destination
/// - Logs and records per-entry failures, then continues with the next entry
///
/// # Errors
///
/// Fails only if the destination cannot be created or the top-level source
/// cannot be listed. Everything below that is reported through
/// [`CopySummary::failures`].
///
/// # Examples
///
/// ```rust,no_run
/// use gome::utils::fs::copy_dir;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let summary = copy_dir(Path::new("data"), Path::new("backup/data"))?;
/// if !summary.is_complete() {
///     for failure in &summary.failures {
///         eprintln!("{}: {}", failure.path.display(), failure.message);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub fn copy_dir(src: &Path, dst: &Path) -> Result<CopySummary> {
    ensure_dir(dst)?;

    let entries = fs::read_dir(src)
        .with_file_context(
            FileOperation::ReadDir,
            src,
            "copying directory",
            "utils::fs::dirs::copy_dir",
        )
        .with_context(|| format!("Failed to read directory: {}", src.display()))?;

    let mut summary = CopySummary::default();
    copy_entries(entries, src, dst, &mut summary);

    tracing::debug!(
        target: "fs::copy",
        "Copied {} -> {}: {} files, {} dirs, {} failures",
        src.display(),
        dst.display(),
        summary.files_copied,
        summary.dirs_created,
        summary.failures.len()
    );
    Ok(summary)
}

fn copy_entries(entries: fs::ReadDir, src: &Path, dst: &Path, summary: &mut CopySummary) {
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let error = anyhow::Error::from(e)
                    .context(format!("Failed to read entry in {}", src.display()));
                summary.record_failure(src, &error);
                continue;
            }
        };

        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                summary.record_failure(&src_path, &anyhow::Error::from(e));
                continue;
            }
        };

        if file_type.is_dir() {
            if let Err(error) = copy_subdir(&src_path, &dst_path, summary) {
                summary.record_failure(&src_path, &error);
            }
        } else if file_type.is_file() {
            copy_into_summary(&src_path, &dst_path, summary);
        } else if file_type.is_symlink() {
            match symlinked_file(&src_path) {
                Ok(()) => copy_into_summary(&src_path, &dst_path, summary),
                Err(error) => summary.record_failure(&src_path, &error),
            }
        } else {
            tracing::debug!(target: "fs::copy", "Skipping non-regular file {}", src_path.display());
            summary.skipped += 1;
        }
    }
}

fn copy_into_summary(src: &Path, dst: &Path, summary: &mut CopySummary) {
    match copy_file(src, dst) {
        Ok(bytes) => {
            summary.files_copied += 1;
            summary.bytes_copied += bytes;
        }
        Err(error) => summary.record_failure(src, &error),
    }
}

/// Succeeds when the symlink at `path` resolves to a regular file.
fn symlinked_file(path: &Path) -> Result<()> {
    let target = fs::metadata(path)
        .with_file_context(
            FileOperation::Metadata,
            path,
            "resolving symlink",
            "utils::fs::dirs::copy_dir",
        )
        .with_context(|| format!("Broken symlink: {}", path.display()))?;

    if !target.is_file() {
        anyhow::bail!("Symlink does not point to a regular file: {}", path.display());
    }
    Ok(())
}

fn copy_subdir(src: &Path, dst: &Path, summary: &mut CopySummary) -> Result<()> {
    ensure_dir(dst)?;
    summary.dirs_created += 1;

    let entries = fs::read_dir(src)
        .with_context(|| format!("Failed to read directory: {}", src.display()))?;
    copy_entries(entries, src, dst, summary);
    Ok(())
}
