//! Loading archiver options from a TOML file.

use anyhow::Result;
use gome::config::Config;
use gome::test_utils::{TreeFixture, zip_entry_names};
use std::fs::{self, File};
use zip::ZipArchive;

#[test]
fn test_config_file_drives_archiver() -> Result<()> {
    let tree = TreeFixture::new("site")?
        .with_file("index.html", "<h1>hi</h1>\n".repeat(200))
        .build()?;
    let config_path = tree.scratch_path("gome.toml");
    fs::write(
        &config_path,
        "[archive]\ncompression_level = 9\npreserve_permissions = false\n",
    )?;

    let config = Config::load_from(&config_path)?;
    assert_eq!(config.archive.compression_level, Some(9));
    assert!(!config.archive.preserve_permissions);
    assert!(config.archive.preserve_mtime);

    let dest = tree.scratch_path("site.zip");
    let summary = config.archiver().archive(tree.root(), &dest)?;
    assert_eq!(summary.files, 1);
    assert_eq!(zip_entry_names(&dest)?, vec!["site/", "site/index.html"]);

    let mut archive = ZipArchive::new(File::open(&dest)?)?;
    let entry = archive.by_name("site/index.html")?;
    assert!(entry.compressed_size() < entry.size());
    Ok(())
}

#[test]
fn test_missing_config_file_uses_defaults() -> Result<()> {
    let tree = TreeFixture::new("empty")?.build()?;
    let config = Config::load_with_optional(Some(&tree.scratch_path("gome.toml")))?;
    assert_eq!(config, Config::default());
    Ok(())
}

#[test]
fn test_invalid_config_reports_path() -> Result<()> {
    let tree = TreeFixture::new("empty")?.build()?;
    let config_path = tree.scratch_path("gome.toml");
    fs::write(&config_path, "[archive]\ncompression_level = -1\n")?;

    let err = Config::load_from(&config_path).unwrap_err();
    let rendered = format!("{err:#}");
    assert!(rendered.contains("gome.toml"));
    assert!(rendered.contains("compression_level"));
    Ok(())
}
