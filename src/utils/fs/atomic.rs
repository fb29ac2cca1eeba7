//! Atomic file writes using a temp-and-rename strategy.
//!
//! Content is written to a temporary file created next to the target, synced,
//! and renamed over the target. Readers see either the old file or the new
//! one, never a partial write. An abandoned temporary file is removed when it
//! is dropped.

use crate::utils::fs::dirs::ensure_dir;
use anyhow::{Context, Result};
#[cfg(unix)]
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Mode of newly written files on Unix, before the umask applies
#[cfg(unix)]
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Safely writes a string to a file using atomic operations.
///
/// Convenience wrapper around [`atomic_write`].
///
/// # Examples
///
/// ```rust,no_run
/// use gome::utils::fs::safe_write;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// safe_write(Path::new("notes/today.txt"), "buy milk\n")?;
/// # Ok(())
/// # }
/// ```
pub fn safe_write(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Atomically writes bytes to a file.
///
/// 1. Creates the parent directory if needed
/// 2. Writes `content` to a temporary sibling of `path`
/// 3. Syncs the temporary file to disk
/// 4. Renames it over `path`
///
/// # Errors
///
/// Fails if the parent directory cannot be created or any step of the write
/// fails. The target is left untouched in that case.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_dir(parent)?;
    }

    let mut temp = temp_file_beside(path)
        .with_context(|| format!("Failed to create temp file next to: {}", path.display()))?;

    temp.write_all(content)
        .with_context(|| format!("Failed to write to temp file: {}", temp.path().display()))?;

    persist(temp, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

/// Creates a temporary file in the same directory as `path`.
///
/// Keeping the temporary file on the same filesystem as the target is what
/// makes the final rename atomic. On Unix the temporary file takes the mode
/// of an existing `path`, or `0644` for a new file, so the rename does not
/// leave an owner-only file behind.
pub fn temp_file_beside(path: &Path) -> io::Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = match path.file_name() {
        Some(name) => format!(".{}.", name.to_string_lossy()),
        None => ".gome.".to_string(),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix).suffix(".tmp");
    #[cfg(unix)]
    builder.permissions(target_permissions(path));
    builder.tempfile_in(dir)
}

/// Mode for a file about to replace `path`.
#[cfg(unix)]
fn target_permissions(path: &Path) -> fs::Permissions {
    use std::os::unix::fs::PermissionsExt;

    let mode = match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata.permissions().mode() & 0o777,
        _ => DEFAULT_FILE_MODE,
    };
    fs::Permissions::from_mode(mode)
}

/// Syncs a temporary file and renames it over `path`.
pub fn persist(temp: NamedTempFile, path: &Path) -> io::Result<()> {
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
