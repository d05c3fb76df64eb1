//! Annotation store persistence tests
//!
//! Exercises the file-backed store across instances: durability of
//! completed sets, corruption recovery, scope isolation and copying.
//! Run with: cargo test --test store_persistence_tests
use roomsync::{AnnotationKey, AnnotationStore, FileStorage, ResolverSignals};
use std::fs;
use tempfile::TempDir;

fn key(sku: &str) -> AnnotationKey {
    roomsync::resolver::resolve_key(&ResolverSignals::new().sku(sku)).unwrap()
}

#[test]
fn test_annotations_survive_store_reopen() {
    let dir = TempDir::new().unwrap();

    {
        let mut store = AnnotationStore::new(FileStorage::new(dir.path()).unwrap());
        store.set("cart123", &key("EP1"), "Toddler Room").unwrap();
        store.set("cart123", &key("EP2"), "Nursery").unwrap();
    }

    let store = AnnotationStore::new(FileStorage::new(dir.path()).unwrap());
    assert_eq!(store.get("cart123", &key("EP1")), "Toddler Room");
    assert_eq!(store.get("cart123", &key("EP2")), "Nursery");
    assert_eq!(store.all_entries("cart123").len(), 2);
}

#[test]
fn test_empty_set_removes_entry_durably() {
    let dir = TempDir::new().unwrap();

    {
        let mut store = AnnotationStore::new(FileStorage::new(dir.path()).unwrap());
        store.set("cart123", &key("EP1"), "Toddler Room").unwrap();
        store.set("cart123", &key("EP1"), "").unwrap();
    }

    let store = AnnotationStore::new(FileStorage::new(dir.path()).unwrap());
    assert!(store.all_entries("cart123").is_empty());
}

#[test]
fn test_corrupt_file_degrades_to_empty_scope() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("cart123.json"), "{{{ definitely not json").unwrap();

    let mut store = AnnotationStore::new(FileStorage::new(dir.path()).unwrap());
    assert!(store.all_entries("cart123").is_empty());

    // Writing through the corrupt scope replaces it with a clean payload.
    store.set("cart123", &key("EP1"), "Nursery").unwrap();
    let reopened = AnnotationStore::new(FileStorage::new(dir.path()).unwrap());
    assert_eq!(reopened.get("cart123", &key("EP1")), "Nursery");
}

#[test]
fn test_scopes_use_separate_files() {
    let dir = TempDir::new().unwrap();
    let mut store = AnnotationStore::new(FileStorage::new(dir.path()).unwrap());
    store.set("cart123", &key("EP1"), "Room A").unwrap();
    store.set("cart456", &key("EP1"), "Room B").unwrap();

    assert!(dir.path().join("cart123.json").exists());
    assert!(dir.path().join("cart456.json").exists());
    assert_eq!(store.get("cart123", &key("EP1")), "Room A");
    assert_eq!(store.get("cart456", &key("EP1")), "Room B");
}

#[test]
fn test_copy_scope_between_saved_quote_and_cart() {
    let dir = TempDir::new().unwrap();
    let mut store = AnnotationStore::new(FileStorage::new(dir.path()).unwrap());
    store.set("quote42", &key("EP1"), "Toddler Room").unwrap();
    store.set("cart", &key("EP9"), "Old note").unwrap();

    assert!(store.copy_scope("quote42", "cart").unwrap());

    // Destination is a full copy, not a merge.
    let dest = store.all_entries("cart");
    assert_eq!(dest.len(), 1);
    assert_eq!(store.get("cart", &key("EP1")), "Toddler Room");
}

#[test]
fn test_clear_scope_removes_file() {
    let dir = TempDir::new().unwrap();
    let mut store = AnnotationStore::new(FileStorage::new(dir.path()).unwrap());
    store.set("cart123", &key("EP1"), "Room A").unwrap();
    store.clear_scope("cart123").unwrap();

    assert!(!dir.path().join("cart123.json").exists());
    assert!(store.all_entries("cart123").is_empty());
}
