//! JSON and text file helpers.

use anyhow::Result;
use gome::test_utils::TreeFixture;
use gome::text::{matching_lines, text_contains, text_contains_no_case};
use gome::utils::fs::{read_json_file, read_text_file, write_json_file, write_text_file};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Release {
    name: String,
    version: u32,
    tags: Vec<String>,
    checksums: BTreeMap<String, String>,
}

fn sample_release() -> Release {
    Release {
        name: "gome".to_string(),
        version: 2,
        tags: vec!["stable".to_string()],
        checksums: BTreeMap::from([("gome.zip".to_string(), "sha256:00".to_string())]),
    }
}

#[test]
fn test_json_round_trip_in_new_directory() -> Result<()> {
    let tree = TreeFixture::new("work")?.build()?;
    let path = tree.root().join("meta/release.json");

    write_json_file(&path, &sample_release(), true)?;
    let back: Release = read_json_file(&path)?;

    assert_eq!(back, sample_release());
    let raw = read_text_file(&path)?;
    assert!(raw.ends_with("}\n"));
    assert!(raw.contains("\n  \"name\""));
    Ok(())
}

#[test]
fn test_compact_json_is_single_line() -> Result<()> {
    let tree = TreeFixture::new("work")?.build()?;
    let path = tree.root().join("release.json");

    write_json_file(&path, &sample_release(), false)?;

    let raw = read_text_file(&path)?;
    assert_eq!(raw.lines().count(), 1);
    assert!(raw.ends_with('\n'));
    Ok(())
}

#[test]
fn test_malformed_json_error_names_file() -> Result<()> {
    let tree = TreeFixture::new("work")?.with_file("broken.json", "{\"name\": ").build()?;
    let err = read_json_file::<Release>(&tree.root().join("broken.json")).unwrap_err();
    assert!(format!("{err:#}").contains("broken.json"));
    Ok(())
}

#[test]
fn test_search_written_log() -> Result<()> {
    let tree = TreeFixture::new("logs")?.build()?;
    let path = tree.root().join("run.log");
    write_text_file(&path, "INFO start\nWARN low disk\nERROR write failed\n")?;

    let log = read_text_file(&path)?;
    assert!(text_contains(&log, "ERROR"));
    assert!(!text_contains(&log, "error"));
    assert!(text_contains_no_case(&log, "error"));
    assert_eq!(
        matching_lines(&log, "warn", false),
        vec![(2, "WARN low disk")]
    );
    Ok(())
}
