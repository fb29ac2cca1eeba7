//! File hashing, checksum verification and directory digests.

use anyhow::Result;
use gome::core::GomeError;
use gome::hash::{
    Algorithm, Checksum, file_md5, file_sha1, file_sha256, file_sha512, hash_dir, hash_file,
    string_sha256, validate, verify_file,
};
use gome::test_utils::TreeFixture;
use std::fs;

#[test]
fn test_file_digests_match_known_vectors() -> Result<()> {
    let tree = TreeFixture::new("vectors")?.with_file("abc.txt", "abc").build()?;
    let path = tree.root().join("abc.txt");

    assert_eq!(file_md5(&path)?, "900150983cd24fb0d6963f7d28e17f72");
    assert_eq!(file_sha1(&path)?, "a9993e364706816aba3e25717850c26c9cd0d89d");
    assert_eq!(
        file_sha256(&path)?,
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(
        file_sha512(&path)?,
        "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
         2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
    );
    assert_eq!(file_sha256(&path)?, string_sha256("abc"));
    Ok(())
}

#[test]
fn test_every_algorithm_produces_valid_digest() -> Result<()> {
    let tree = TreeFixture::new("any")?.with_file("blob", vec![7u8; 70_000]).build()?;
    for algorithm in Algorithm::ALL {
        let digest = hash_file(&tree.root().join("blob"), algorithm)?;
        assert_eq!(digest.len(), algorithm.hex_len());
        assert!(validate(&digest, algorithm), "{algorithm}");
    }
    Ok(())
}

#[test]
fn test_verify_file_round_trip() -> Result<()> {
    let tree = TreeFixture::new("dl")?.with_file("pkg.tar", "payload").build()?;
    let path = tree.root().join("pkg.tar");

    let checksum = Checksum::of_file(&path, Algorithm::Sha512)?;
    assert!(verify_file(&path, &checksum.to_string())?);
    assert!(verify_file(&path, &checksum.to_string().to_uppercase())?);

    fs::write(&path, "tampered")?;
    assert!(!verify_file(&path, &checksum.to_string())?);
    Ok(())
}

#[test]
fn test_verify_file_rejects_malformed_checksum() -> Result<()> {
    let tree = TreeFixture::new("dl")?.with_file("f", "x").build()?;
    let err = verify_file(&tree.root().join("f"), "sha256:abc").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GomeError>(),
        Some(GomeError::InvalidChecksum { .. })
    ));
    Ok(())
}

#[test]
fn test_hash_missing_file_errors() {
    assert!(file_sha256(std::path::Path::new("/definitely/not/here")).is_err());
}

#[test]
fn test_hash_dir_ignores_location_and_tracks_content() -> Result<()> {
    let one = TreeFixture::new("one")?
        .with_file("a.txt", "a")
        .with_file("sub/b.txt", "b")
        .build()?;
    let two = TreeFixture::new("two")?
        .with_file("sub/b.txt", "b")
        .with_file("a.txt", "a")
        .with_dir("unrelated-empty-dir")
        .build()?;

    assert_eq!(
        hash_dir(one.root(), Algorithm::Sha256)?,
        hash_dir(two.root(), Algorithm::Sha256)?
    );

    fs::write(two.root().join("sub/b.txt"), "changed")?;
    assert_ne!(
        hash_dir(one.root(), Algorithm::Sha256)?,
        hash_dir(two.root(), Algorithm::Sha256)?
    );
    Ok(())
}
