use super::*;
use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use crate::hashing::fingerprint_text;

fn create_test_archive() -> (FsDocumentArchive, TempDir) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let archive = FsDocumentArchive::new(temp_dir.path());
    (archive, temp_dir)
}

fn create_test_document(id: DocumentId, text: &str) -> Document {
    Document {
        id,
        file_name: format!("doc-{id}.txt"),
        file_type: "text/plain".to_string(),
        file_size: text.len() as u64,
        text: text.to_string(),
        fingerprint: fingerprint_text(text),
        uploaded_at: Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap(),
    }
}

#[test]
fn test_save_and_load_all() {
    let (archive, _temp) = create_test_archive();
    let first = create_test_document(1, "Coding & Programming");
    let second = create_test_document(2, "System Integration");

    archive.save(&second).unwrap();
    archive.save(&first).unwrap();

    let loaded = archive.load_all().unwrap();
    assert_eq!(loaded, vec![first, second]);
}

#[test]
fn test_save_leaves_no_temp_files() {
    let (archive, _temp) = create_test_archive();
    archive.save(&create_test_document(7, "content")).unwrap();

    let names: Vec<_> = std::fs::read_dir(archive.root())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["0000000000000007.json"]);
}

#[test]
fn test_overwrite_existing_document() {
    let (archive, _temp) = create_test_archive();
    archive.save(&create_test_document(1, "old text")).unwrap();
    archive.save(&create_test_document(1, "new text")).unwrap();

    let loaded = archive.load_all().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].text, "new text");
}

#[test]
fn test_remove() {
    let (archive, _temp) = create_test_archive();
    archive.save(&create_test_document(1, "text")).unwrap();

    archive.remove(1).unwrap();
    assert!(archive.load_all().unwrap().is_empty());

    // absent documents are not an error
    archive.remove(1).unwrap();
    archive.remove(99).unwrap();
}

#[test]
fn test_load_all_missing_root() {
    let temp = TempDir::new().unwrap();
    let archive = FsDocumentArchive::new(temp.path().join("never-created"));
    assert!(archive.load_all().unwrap().is_empty());
}

#[test]
fn test_load_all_skips_corrupt_and_foreign_files() {
    let (archive, _temp) = create_test_archive();
    archive.save(&create_test_document(1, "valid")).unwrap();

    std::fs::write(archive.root().join("0000000000000002.json"), b"{ not json").unwrap();
    std::fs::write(archive.root().join("notes.md"), b"# ignored").unwrap();
    std::fs::write(archive.root().join("0000000000000003.json.tmp"), b"partial").unwrap();

    let loaded = archive.load_all().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, 1);
}

#[test]
fn test_availability() {
    let (archive, _temp) = create_test_archive();
    assert!(archive.is_available());
    assert!(archive.root().is_dir());

    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("occupied");
    std::fs::write(&blocker, b"file, not dir").unwrap();
    let blocked = FsDocumentArchive::new(&blocker);
    assert!(!blocked.is_available());
    assert!(matches!(
        blocked.save(&create_test_document(1, "x")),
        Err(StorageError::DirectoryUnavailable { .. })
    ));
}

#[test]
fn test_memory_archive_failure_mode() {
    let archive = MemoryArchive::new();
    archive.save(&create_test_document(1, "text")).unwrap();
    assert!(archive.contains(1));

    archive.set_fail_writes(true);
    assert!(!archive.is_available());
    assert!(archive.save(&create_test_document(2, "more")).is_err());
    assert!(archive.remove(1).is_err());
    assert_eq!(archive.len(), 1);
}
