//! Recursive directory copy, including its fail-soft behaviour.

use anyhow::Result;
use gome::hash::{Algorithm, hash_dir};
use gome::test_utils::{TreeFixture, init_test_logging};
use gome::utils::fs::{copy_dir, copy_file};
use std::fs;

#[test]
fn test_copy_dir_reproduces_tree() -> Result<()> {
    init_test_logging(None);
    let tree = TreeFixture::new("src")?
        .with_file("a.txt", "a")
        .with_file("nested/b.txt", "bb")
        .with_file("nested/deeper/c.txt", "ccc")
        .with_dir("empty")
        .build()?;
    let dst = tree.scratch_path("out/copy");

    let summary = copy_dir(tree.root(), &dst)?;

    assert!(summary.is_complete());
    assert_eq!(summary.files_copied, 3);
    assert_eq!(summary.dirs_created, 3);
    assert_eq!(summary.bytes_copied, 6);
    assert!(dst.join("empty").is_dir());
    assert_eq!(
        hash_dir(tree.root(), Algorithm::Sha256)?,
        hash_dir(&dst, Algorithm::Sha256)?
    );
    Ok(())
}

#[test]
fn test_copy_dir_continues_past_failures() -> Result<()> {
    let tree = TreeFixture::new("src")?
        .with_file("blocked/inner.txt", "x")
        .with_file("ok.txt", "fine")
        .with_file("zeta/z.txt", "z")
        .build()?;
    let dst = tree.scratch_path("dst");
    fs::create_dir_all(&dst)?;
    // A file where a directory must go makes the `blocked` subtree fail.
    fs::write(dst.join("blocked"), "in the way")?;

    let summary = copy_dir(tree.root(), &dst)?;

    assert!(!summary.is_complete());
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].path.ends_with("blocked"));
    assert_eq!(fs::read_to_string(dst.join("ok.txt"))?, "fine");
    assert_eq!(fs::read_to_string(dst.join("zeta/z.txt"))?, "z");
    Ok(())
}

#[test]
fn test_copy_dir_missing_source_fails() -> Result<()> {
    let tree = TreeFixture::new("src")?.build()?;
    assert!(copy_dir(&tree.scratch_path("missing"), &tree.scratch_path("dst")).is_err());
    Ok(())
}

#[test]
fn test_copy_file_overwrites() -> Result<()> {
    let tree = TreeFixture::new("src")?.with_file("new.txt", "new contents").build()?;
    let target = tree.scratch_path("target.txt");
    fs::write(&target, "old contents that are longer")?;

    let bytes = copy_file(&tree.root().join("new.txt"), &target)?;

    assert_eq!(bytes, 12);
    assert_eq!(fs::read_to_string(&target)?, "new contents");
    Ok(())
}
