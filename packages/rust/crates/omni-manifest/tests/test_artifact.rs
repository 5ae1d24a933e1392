//! Integration tests for the manifest artifact format.
//!
//! These tests verify that artifacts reload to the exact index that was
//! written, independent of chunking, and that replacement is atomic.

use std::fs;
use std::sync::Arc;

use omni_manifest::{
    ARTIFACT_MAGIC, CategoryAttribute, ManifestError, ManifestIndex, ModuleCategory,
    ModuleDefinition, decode_manifest, encode_manifest, load_manifest, write_artifact,
};
use tempfile::TempDir;

fn index_with_unicode() -> ManifestIndex {
    let report = Arc::new(ModuleDefinition::new(
        "App\\Reports",
        vec![
            ModuleCategory::with_attributes(
                "export",
                vec![
                    CategoryAttribute::positional("csv"),
                    CategoryAttribute::keyed("label", "Übersicht"),
                    CategoryAttribute::keyed("label", "概要"),
                    CategoryAttribute::positional(""),
                ],
            ),
            ModuleCategory::bare("admin"),
        ],
        "Report",
    ));
    let mut index = ManifestIndex::new();
    index.push("export", Arc::clone(&report));
    index.push("admin", report);
    index.push(
        "admin",
        Arc::new(ModuleDefinition::new("App", vec![ModuleCategory::bare("admin")], "Users")),
    );
    index
}

/// Round trip keeps attribute order, duplicate keys and empty values.
#[test]
fn test_round_trip_multibyte_attributes() {
    let index = index_with_unicode();
    for width in [0, 1, 3, 70, 4096] {
        let text = encode_manifest(&index, width).unwrap();
        assert!(text.starts_with(ARTIFACT_MAGIC));
        assert_eq!(decode_manifest(&text).unwrap(), index, "width {width}");
    }
}

/// Encoding is a pure function of the index.
#[test]
fn test_encoding_is_stable() {
    let first = encode_manifest(&index_with_unicode(), 70).unwrap();
    let second = encode_manifest(&index_with_unicode(), 70).unwrap();
    assert_eq!(first, second);
}

/// Tampering with the payload is detected.
#[test]
fn test_modified_payload_is_rejected() {
    let text = encode_manifest(&index_with_unicode(), 0).unwrap();
    let tampered = text.replacen("Report", "Rapport", 1);

    let err = decode_manifest(&tampered).unwrap_err();
    assert!(matches!(err, ManifestError::ChecksumMismatch { .. }));
}

/// Replacing an existing artifact swaps in the new content whole.
#[test]
fn test_replace_existing_artifact() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("modules.manifest");

    write_artifact(&path, &ManifestIndex::new(), 70).unwrap();
    assert!(load_manifest(&path).unwrap().is_empty());

    write_artifact(&path, &index_with_unicode(), 70).unwrap();
    assert_eq!(load_manifest(&path).unwrap(), index_with_unicode());

    let entries = fs::read_dir(temp_dir.path()).unwrap().count();
    assert_eq!(entries, 1);
}

/// Loading a missing artifact reports the path.
#[test]
fn test_load_missing_artifact() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.manifest");

    match load_manifest(&path).unwrap_err() {
        ManifestError::Read { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}
