use std::fs;

use playlist_core::KeyValueStore;
use playlist_engine::{ensure_storage_dir, storage_filename, AtomicFileWriter, FileStore};
use tempfile::TempDir;

#[test]
fn creates_missing_storage_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("state");
    assert!(!new_dir.exists());
    ensure_storage_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("state.json", "hello").unwrap();
    assert_eq!(fs::read_to_string(&first).unwrap(), "hello");

    let second = writer.write("state.json", "world").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "world");
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("state.json", "data").is_err());
    assert!(!file_path.with_file_name("state.json").exists());
}

#[test]
fn file_store_round_trips_and_removes_keys() {
    let temp = TempDir::new().unwrap();
    let mut store = FileStore::open(temp.path().join("data")).unwrap();

    assert_eq!(store.get("appState").unwrap(), None);
    store.set("appState", "{\"playlists\":[]}").unwrap();
    store.set("youtubeApiKey", "secret").unwrap();

    assert_eq!(
        store.get("appState").unwrap().as_deref(),
        Some("{\"playlists\":[]}")
    );
    assert_eq!(store.get("youtubeApiKey").unwrap().as_deref(), Some("secret"));

    store.remove("appState").unwrap();
    store.remove("appState").unwrap();
    assert_eq!(store.get("appState").unwrap(), None);
    assert_eq!(store.get("youtubeApiKey").unwrap().as_deref(), Some("secret"));
}

#[test]
fn file_store_persists_across_instances() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("data");
    {
        let mut store = FileStore::open(dir.clone()).unwrap();
        store.set("youtubeApiKey", "secret").unwrap();
    }

    let reopened = FileStore::open(dir).unwrap();
    assert_eq!(reopened.get("youtubeApiKey").unwrap().as_deref(), Some("secret"));
}

#[test]
fn storage_filenames_are_sanitized_and_distinct() {
    let plain = storage_filename("appState");
    assert!(plain.starts_with("appState--"));
    assert!(plain.ends_with(".json"));

    let a = storage_filename("a/b");
    let b = storage_filename("a:b");
    assert!(a.starts_with("a_b--"));
    assert_ne!(a, b);
    assert!(!a.contains('/'));
}
