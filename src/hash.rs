//! Hashing of files, strings and directory trees, plus digest validation.
//!
//! Four algorithms are supported: MD5, SHA-1, SHA-256 and SHA-512. Digests are
//! always rendered as lowercase hexadecimal.
//!
//! # Examples
//!
//! ```rust,no_run
//! use gome::hash::{self, Algorithm};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let digest = hash::hash_file(Path::new("release.tar.gz"), Algorithm::Sha256)?;
//! assert!(hash::validate_sha256(&digest));
//!
//! let expected = format!("sha256:{digest}");
//! assert!(hash::verify_file(Path::new("release.tar.gz"), &expected)?);
//!
//! assert_eq!(hash::string_md5("hello"), "5d41402abc4b2a76b9719d911017c592");
//! # Ok(())
//! # }
//! ```
//!
//! # Validation
//!
//! The `validate_*` functions check that the whole input is a hex digest of
//! exactly the algorithm's length, in either case. A longer hex string that
//! merely contains a digest-length run is rejected.

use crate::core::GomeError;
use crate::core::file_error::{FileOperation, FileResultExt};
use anyhow::{Context, Result};
use md5::Md5;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;
use walkdir::WalkDir;

static MD5_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-fA-F0-9]{32}$").expect("MD5 pattern is valid"));
static SHA1_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-fA-F0-9]{40}$").expect("SHA-1 pattern is valid"));
static SHA256_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-fA-F0-9]{64}$").expect("SHA-256 pattern is valid"));
static SHA512_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-fA-F0-9]{128}$").expect("SHA-512 pattern is valid"));

/// A supported hashing algorithm.
///
/// Parses from `md5`, `sha1`, `sha256`, `sha512` (case-insensitive, dashed
/// forms such as `sha-256` accepted) and serializes to the lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Algorithm {
    /// MD5, 128-bit digest
    Md5,
    /// SHA-1, 160-bit digest
    Sha1,
    /// SHA-256, 256-bit digest
    #[default]
    Sha256,
    /// SHA-512, 512-bit digest
    Sha512,
}

impl Algorithm {
    /// All supported algorithms, weakest first
    pub const ALL: [Algorithm; 4] =
        [Algorithm::Md5, Algorithm::Sha1, Algorithm::Sha256, Algorithm::Sha512];

    /// Canonical lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Md5 => "md5",
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha512 => "sha512",
        }
    }

    /// Length of the hex-encoded digest
    pub fn hex_len(self) -> usize {
        match self {
            Algorithm::Md5 => 32,
            Algorithm::Sha1 => 40,
            Algorithm::Sha256 => 64,
            Algorithm::Sha512 => 128,
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            Algorithm::Md5 => &MD5_PATTERN,
            Algorithm::Sha1 => &SHA1_PATTERN,
            Algorithm::Sha256 => &SHA256_PATTERN,
            Algorithm::Sha512 => &SHA512_PATTERN,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = GomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "").as_str() {
            "md5" => Ok(Algorithm::Md5),
            "sha1" => Ok(Algorithm::Sha1),
            "sha256" => Ok(Algorithm::Sha256),
            "sha512" => Ok(Algorithm::Sha512),
            _ => Err(GomeError::UnsupportedAlgorithm {
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Algorithm {
    type Error = GomeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

fn digest_reader<D>(reader: &mut dyn Read) -> io::Result<String>
where
    D: Digest + Write,
{
    let mut hasher = D::new();
    io::copy(reader, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Streams `reader` through `algorithm` and returns the hex digest.
pub fn hash_reader(reader: &mut dyn Read, algorithm: Algorithm) -> io::Result<String> {
    match algorithm {
        Algorithm::Md5 => digest_reader::<Md5>(reader),
        Algorithm::Sha1 => digest_reader::<Sha1>(reader),
        Algorithm::Sha256 => digest_reader::<Sha256>(reader),
        Algorithm::Sha512 => digest_reader::<Sha512>(reader),
    }
}

/// Hashes an in-memory byte slice.
pub fn hash_bytes(bytes: &[u8], algorithm: Algorithm) -> String {
    match algorithm {
        Algorithm::Md5 => hex::encode(Md5::digest(bytes)),
        Algorithm::Sha1 => hex::encode(Sha1::digest(bytes)),
        Algorithm::Sha256 => hex::encode(Sha256::digest(bytes)),
        Algorithm::Sha512 => hex::encode(Sha512::digest(bytes)),
    }
}

/// Hashes the UTF-8 bytes of a string.
pub fn hash_string(s: &str, algorithm: Algorithm) -> String {
    hash_bytes(s.as_bytes(), algorithm)
}

/// Hashes the contents of the file at `path`.
///
/// The file is streamed, never loaded into memory whole.
///
/// # Errors
///
/// Returns a [`crate::core::FileOperationError`] if the file cannot be opened
/// or read.
pub fn hash_file(path: &Path, algorithm: Algorithm) -> Result<String> {
    const CALLER: &str = "hash::hash_file";

    let mut file = fs::File::open(path).with_file_context(
        FileOperation::Open,
        path,
        "hashing file",
        CALLER,
    )?;
    let digest = hash_reader(&mut file, algorithm).with_file_context(
        FileOperation::Read,
        path,
        "hashing file",
        CALLER,
    )?;

    tracing::trace!(target: "hash", "{algorithm} {} = {digest}", path.display());
    Ok(digest)
}

/// MD5 of a file
pub fn file_md5(path: &Path) -> Result<String> {
    hash_file(path, Algorithm::Md5)
}

/// SHA-1 of a file
pub fn file_sha1(path: &Path) -> Result<String> {
    hash_file(path, Algorithm::Sha1)
}

/// SHA-256 of a file
pub fn file_sha256(path: &Path) -> Result<String> {
    hash_file(path, Algorithm::Sha256)
}

/// SHA-512 of a file
pub fn file_sha512(path: &Path) -> Result<String> {
    hash_file(path, Algorithm::Sha512)
}

/// MD5 of a string
pub fn string_md5(s: &str) -> String {
    hash_string(s, Algorithm::Md5)
}

/// SHA-1 of a string
pub fn string_sha1(s: &str) -> String {
    hash_string(s, Algorithm::Sha1)
}

/// SHA-256 of a string
pub fn string_sha256(s: &str) -> String {
    hash_string(s, Algorithm::Sha256)
}

/// SHA-512 of a string
pub fn string_sha512(s: &str) -> String {
    hash_string(s, Algorithm::Sha512)
}

/// Returns true if `hash` is a well-formed hex digest for `algorithm`.
pub fn validate(hash: &str, algorithm: Algorithm) -> bool {
    algorithm.pattern().is_match(hash)
}

/// Returns true if `hash` is a 32-character hex string
pub fn validate_md5(hash: &str) -> bool {
    validate(hash, Algorithm::Md5)
}

/// Returns true if `hash` is a 40-character hex string
pub fn validate_sha1(hash: &str) -> bool {
    validate(hash, Algorithm::Sha1)
}

/// Returns true if `hash` is a 64-character hex string
pub fn validate_sha256(hash: &str) -> bool {
    validate(hash, Algorithm::Sha256)
}

/// Returns true if `hash` is a 128-character hex string
pub fn validate_sha512(hash: &str) -> bool {
    validate(hash, Algorithm::Sha512)
}

/// A digest tagged with its algorithm, written as `algorithm:hexdigest`.
///
/// # Examples
///
/// ```rust
/// use gome::hash::{Algorithm, Checksum};
///
/// let checksum: Checksum =
///     "MD5:5D41402ABC4B2A76B9719D911017C592".parse().unwrap();
/// assert_eq!(checksum.algorithm, Algorithm::Md5);
/// assert_eq!(checksum.to_string(), "md5:5d41402abc4b2a76b9719d911017c592");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum {
    /// Algorithm that produced the digest
    pub algorithm: Algorithm,
    /// Lowercase hex digest
    pub digest: String,
}

impl Checksum {
    /// Computes the checksum of a file
    pub fn of_file(path: &Path, algorithm: Algorithm) -> Result<Self> {
        Ok(Self {
            algorithm,
            digest: hash_file(path, algorithm)?,
        })
    }

    /// Hashes `path` with this checksum's algorithm and compares digests
    pub fn matches_file(&self, path: &Path) -> Result<bool> {
        Ok(hash_file(path, self.algorithm)? == self.digest)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.digest)
    }
}

impl FromStr for Checksum {
    type Err = GomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| GomeError::InvalidChecksum {
            value: s.to_string(),
            reason,
        };

        let (name, digest) = s
            .split_once(':')
            .ok_or_else(|| invalid("expected the form 'algorithm:hexdigest'".to_string()))?;
        let algorithm: Algorithm = name.parse()?;

        if !validate(digest, algorithm) {
            return Err(invalid(format!(
                "{algorithm} digests are {} hex characters",
                algorithm.hex_len()
            )));
        }

        Ok(Self {
            algorithm,
            digest: digest.to_ascii_lowercase(),
        })
    }
}

/// Verifies a file against an `algorithm:hexdigest` checksum.
///
/// # Returns
///
/// * `Ok(true)` - the file's digest matches
/// * `Ok(false)` - the file's digest differs
/// * `Err` - the checksum string is malformed or the file cannot be read
pub fn verify_file(path: &Path, expected: &str) -> Result<bool> {
    let checksum: Checksum = expected.parse()?;
    let matches = checksum.matches_file(path)?;
    if !matches {
        tracing::debug!(target: "hash", "Checksum mismatch for {}: expected {checksum}", path.display());
    }
    Ok(matches)
}

/// Computes a deterministic digest for a directory tree.
///
/// Each regular file contributes a `relative/path:filedigest\n` line, using
/// forward slashes. Lines are ordered by relative path and hashed with the
/// same algorithm. Directories and symlinks do not contribute, so two trees
/// with the same files hash identically regardless of empty directories.
///
/// # Errors
///
/// Fails with [`GomeError::NotADirectory`] if `path` is not a directory, and
/// with a file error if any file cannot be read.
pub fn hash_dir(path: &Path, algorithm: Algorithm) -> Result<String> {
    let metadata = fs::metadata(path).with_file_context(
        FileOperation::Metadata,
        path,
        "hashing directory",
        "hash::hash_dir",
    )?;
    if !metadata.is_dir() {
        return Err(GomeError::NotADirectory {
            path: path.to_path_buf(),
        }
        .into());
    }

    let mut file_hashes: Vec<(String, String)> = Vec::new();

    for entry in WalkDir::new(path).follow_links(false) {
        let entry = entry
            .with_context(|| format!("Failed to read directory entry in: {}", path.display()))?;

        if entry.file_type().is_file() {
            let relative = entry.path().strip_prefix(path).unwrap_or(entry.path());
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            file_hashes.push((relative, hash_file(entry.path(), algorithm)?));
        }
    }

    file_hashes.sort_by(|a, b| a.0.cmp(&b.0));

    let manifest: String =
        file_hashes.iter().map(|(path, digest)| format!("{path}:{digest}\n")).collect();
    Ok(hash_string(&manifest, algorithm))
}
