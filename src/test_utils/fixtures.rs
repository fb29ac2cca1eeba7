//! Directory tree fixtures and archive readers.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::ZipArchive;

/// A directory tree created inside its own temporary directory.
///
/// The tree lives at `<temp>/<name>`; [`TreeFixture::scratch_path`] gives
/// paths next to it, outside the tree, for archives and copies.
#[derive(Debug)]
pub struct TreeFixture {
    temp_dir: TempDir,
    root: PathBuf,
    files: Vec<(String, Vec<u8>)>,
    dirs: Vec<String>,
}

impl TreeFixture {
    /// Starts a fixture whose root directory is called `name`
    pub fn new(name: &str) -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temp dir for fixture")?;
        let root = temp_dir.path().join(name);
        Ok(Self {
            temp_dir,
            root,
            files: Vec::new(),
            dirs: Vec::new(),
        })
    }

    /// Adds a file; missing parent directories are created on build
    pub fn with_file(mut self, relative: &str, content: impl AsRef<[u8]>) -> Self {
        self.files.push((relative.to_string(), content.as_ref().to_vec()));
        self
    }

    /// Adds an (empty) directory
    pub fn with_dir(mut self, relative: &str) -> Self {
        self.dirs.push(relative.to_string());
        self
    }

    /// Writes everything to disk.
    pub fn build(self) -> Result<Self> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create {}", self.root.display()))?;
        for dir in &self.dirs {
            let path = self.root.join(dir);
            fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
        }
        for (relative, content) in &self.files {
            let path = self.root.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Ok(self)
    }

    /// The tree's root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A path beside the tree, inside the same temp dir
    pub fn scratch_path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Relative paths and contents of every file added
    pub fn files(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.files.iter().map(|(path, content)| (path.as_str(), content.as_slice()))
    }
}

/// Names of all entries in the archive at `path`, in stored order.
pub fn zip_entry_names(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut archive = ZipArchive::new(file)?;
    let mut names = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        names.push(archive.by_index(index)?.name().to_string());
    }
    Ok(names)
}

/// Uncompressed payload of entry `name` in the archive at `path`.
pub fn read_zip_entry(path: &Path, name: &str) -> Result<Vec<u8>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut archive = ZipArchive::new(file)?;
    let mut entry = archive
        .by_name(name)
        .with_context(|| format!("No entry '{name}' in {}", path.display()))?;
    let mut content = Vec::new();
    entry.read_to_end(&mut content)?;
    Ok(content)
}
