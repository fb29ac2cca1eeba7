//! One filesystem node as it will appear inside the archive.

use super::ArchiveOptions;
use chrono::{Datelike, Local, Timelike};
use std::fs::Metadata;
use std::path::{Component, Path};
use std::time::SystemTime;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// Sizes at or above this need ZIP64 headers.
pub const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// What kind of node an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Stored with a trailing `/` and no payload
    Directory,
    /// Stored with deflate-compressed content
    File,
    /// Stored with the link target as payload
    Symlink,
}

/// A node visited by the archiver, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    name: String,
    kind: EntryKind,
    mode: Option<u32>,
    size: u64,
    modified: Option<SystemTime>,
}

impl ArchiveEntry {
    /// Builds an entry from a node's metadata.
    ///
    /// `name` is the slash-separated name inside the archive; a trailing
    /// `/` is added for directories. Returns `None` for nodes that cannot be
    /// stored (FIFOs, sockets, devices).
    pub fn from_metadata(name: String, metadata: &Metadata) -> Option<Self> {
        let file_type = metadata.file_type();
        let kind = if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            return None;
        };

        let name = match kind {
            EntryKind::Directory if !name.ends_with('/') => format!("{name}/"),
            _ => name,
        };

        Some(Self {
            name,
            kind,
            mode: unix_mode(metadata),
            size: if kind == EntryKind::File { metadata.len() } else { 0 },
            modified: metadata.modified().ok(),
        })
    }

    /// Name inside the archive
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Permission bits of the source node, if the platform has them
    pub fn mode(&self) -> Option<u32> {
        self.mode
    }

    /// Uncompressed size in bytes (zero for directories and symlinks)
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Header options for this entry under `options`.
    pub fn file_options(&self, options: &ArchiveOptions) -> SimpleFileOptions {
        let method = match self.kind {
            EntryKind::File => CompressionMethod::Deflated,
            EntryKind::Directory | EntryKind::Symlink => CompressionMethod::Stored,
        };

        let mut file_options = SimpleFileOptions::default()
            .compression_method(method)
            .large_file(self.size >= ZIP64_THRESHOLD);

        if self.kind == EntryKind::File {
            file_options = file_options.compression_level(options.compression_level);
        }
        if options.preserve_permissions
            && let Some(mode) = self.mode
        {
            file_options = file_options.unix_permissions(mode & 0o7777);
        }
        if options.preserve_mtime
            && let Some(modified) = self.modified
        {
            file_options = file_options.last_modified_time(zip_time(modified));
        }

        file_options
    }
}

/// Joins the components of `relative` with `/`, behind an optional prefix.
///
/// An empty `relative` yields just the prefix.
pub fn entry_name(prefix: Option<&str>, relative: &Path) -> String {
    let parts = relative.components().filter_map(|component| match component {
        Component::Normal(part) => Some(part.to_string_lossy()),
        _ => None,
    });

    let mut name = prefix.unwrap_or_default().to_string();
    for part in parts {
        if !name.is_empty() {
            name.push('/');
        }
        name.push_str(&part);
    }
    name
}

/// Converts a filesystem time to the DOS timestamp zip stores.
///
/// Zip times are local and limited to 1980..=2107; anything outside falls
/// back to the zip epoch.
pub fn zip_time(time: SystemTime) -> zip::DateTime {
    let local = chrono::DateTime::<Local>::from(time);
    let Ok(year) = u16::try_from(local.year()) else {
        return zip::DateTime::default();
    };

    zip::DateTime::from_date_and_time(
        year,
        local.month() as u8,
        local.day() as u8,
        local.hour() as u8,
        local.minute() as u8,
        local.second() as u8,
    )
    .unwrap_or_default()
}

#[cfg(unix)]
fn unix_mode(metadata: &Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(metadata.permissions().mode())
}

#[cfg(not(unix))]
fn unix_mode(metadata: &Metadata) -> Option<u32> {
    let mode = if metadata.is_dir() {
        0o755
    } else if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    };
    Some(mode)
}
