//! End-to-end archive tests: layout, round-trip, overwrite and failures.

use anyhow::Result;
use gome::archive::{ArchiveError, ArchiveErrorKind, ArchiveOptions, Archiver, create_zip};
use gome::test_utils::{TreeFixture, init_test_logging, read_zip_entry, zip_entry_names};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Read;
use zip::ZipArchive;

fn sample_tree() -> Result<TreeFixture> {
    TreeFixture::new("data")?
        .with_file("a.txt", "alpha\n")
        .with_file("sub/b.txt", "beta\n")
        .with_file("sub/deeper/c.bin", [0u8, 1, 2, 3, 255])
        .with_file("z/last.md", "# last\n")
        .with_dir("empty")
        .build()
}

#[test]
fn test_counts_match_tree() -> Result<()> {
    init_test_logging(None);
    let tree = sample_tree()?;
    let dest = tree.scratch_path("data.zip");

    let summary = create_zip(tree.root(), &dest)?;

    // data/, data/empty/, data/sub/, data/sub/deeper/, data/z/
    assert_eq!(summary.directories, 5);
    assert_eq!(summary.files, 4);
    assert_eq!(summary.symlinks, 0);

    let mut archive = ZipArchive::new(File::open(&dest)?)?;
    let mut dirs = 0;
    let mut files = 0;
    for index in 0..archive.len() {
        let entry = archive.by_index(index)?;
        if entry.is_dir() {
            assert!(entry.name().ends_with('/'));
            assert_eq!(entry.size(), 0);
            dirs += 1;
        } else {
            files += 1;
        }
    }
    assert_eq!((files, dirs), (4, 5));
    Ok(())
}

#[test]
fn test_entries_are_depth_first_and_sorted() -> Result<()> {
    let tree = sample_tree()?;
    let dest = tree.scratch_path("data.zip");
    create_zip(tree.root(), &dest)?;

    assert_eq!(
        zip_entry_names(&dest)?,
        vec![
            "data/",
            "data/a.txt",
            "data/empty/",
            "data/sub/",
            "data/sub/b.txt",
            "data/sub/deeper/",
            "data/sub/deeper/c.bin",
            "data/z/",
            "data/z/last.md",
        ]
    );
    Ok(())
}

#[test]
fn test_round_trip_preserves_bytes() -> Result<()> {
    let tree = sample_tree()?;
    let dest = tree.scratch_path("data.zip");
    let summary = create_zip(tree.root(), &dest)?;

    let mut expected_bytes = 0;
    for (relative, content) in tree.files() {
        let stored = read_zip_entry(&dest, &format!("data/{relative}"))?;
        assert_eq!(stored, content, "content of {relative}");
        expected_bytes += content.len() as u64;
    }
    assert_eq!(summary.bytes, expected_bytes);
    Ok(())
}

#[test]
fn test_single_file_has_no_prefix() -> Result<()> {
    let tree = TreeFixture::new("reports")?.with_file("report.txt", "totals").build()?;
    let dest = tree.scratch_path("report.zip");

    create_zip(&tree.root().join("report.txt"), &dest)?;

    assert_eq!(zip_entry_names(&dest)?, vec!["report.txt"]);
    assert_eq!(read_zip_entry(&dest, "report.txt")?, b"totals");
    Ok(())
}

#[test]
fn test_running_twice_overwrites_with_same_entries() -> Result<()> {
    let tree = sample_tree()?;
    let dest = tree.scratch_path("data.zip");

    create_zip(tree.root(), &dest)?;
    let first: BTreeSet<String> = zip_entry_names(&dest)?.into_iter().collect();
    let first_payload = read_zip_entry(&dest, "data/sub/b.txt")?;

    create_zip(tree.root(), &dest)?;
    let second: BTreeSet<String> = zip_entry_names(&dest)?.into_iter().collect();

    assert_eq!(first, second);
    assert_eq!(read_zip_entry(&dest, "data/sub/b.txt")?, first_payload);
    Ok(())
}

#[test]
fn test_unrelated_destination_is_replaced() -> Result<()> {
    let tree = sample_tree()?;
    let dest = tree.scratch_path("data.zip");
    fs::write(&dest, "not a zip at all")?;

    create_zip(tree.root(), &dest)?;

    let mut archive = ZipArchive::new(File::open(&dest)?)?;
    assert_eq!(archive.len(), 9);
    let mut content = String::new();
    archive.by_name("data/a.txt")?.read_to_string(&mut content)?;
    assert_eq!(content, "alpha\n");
    Ok(())
}

#[test]
fn test_missing_source_leaves_existing_destination_untouched() -> Result<()> {
    let tree = sample_tree()?;
    let dest = tree.scratch_path("data.zip");
    fs::write(&dest, "previous archive")?;

    let err = create_zip(&tree.scratch_path("missing"), &dest).unwrap_err();

    assert!(matches!(err, ArchiveError::Stat { .. }));
    assert_eq!(err.kind(), ArchiveErrorKind::Setup);
    assert_eq!(fs::read_to_string(&dest)?, "previous archive");
    Ok(())
}

#[test]
fn test_missing_source_does_not_create_destination() -> Result<()> {
    let tree = sample_tree()?;
    let dest = tree.scratch_path("never.zip");

    assert!(create_zip(&tree.scratch_path("missing"), &dest).is_err());
    assert!(!dest.exists());
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_aborts_without_partial_archive() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let tree = sample_tree()?;
    let locked = tree.root().join("sub/b.txt");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

    // Root can read anything; nothing to test there.
    if File::open(&locked).is_ok() {
        return Ok(());
    }

    let dest = tree.scratch_path("data.zip");
    let err = create_zip(tree.root(), &dest).unwrap_err();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644))?;

    assert!(matches!(err, ArchiveError::Walk { .. }));
    assert_eq!(err.kind(), ArchiveErrorKind::Entry);
    assert!(!dest.exists());

    let leftovers: Vec<_> = fs::read_dir(tree.scratch_path(""))?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
    Ok(())
}

#[test]
fn test_fast_level_without_metadata() -> Result<()> {
    let tree = sample_tree()?;
    let dest = tree.scratch_path("data.zip");
    let archiver = Archiver::new(ArchiveOptions {
        compression_level: Some(1),
        preserve_permissions: false,
        preserve_mtime: false,
    });

    let summary = archiver.archive(tree.root(), &dest)?;
    assert_eq!(summary.files, 4);
    assert_eq!(read_zip_entry(&dest, "data/a.txt")?, b"alpha\n");
    Ok(())
}
