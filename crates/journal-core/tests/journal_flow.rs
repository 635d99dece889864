//! End-to-end journal behaviour against file-backed storage

use std::sync::Arc;

use journal_core::logger::MemoryLogger;
use journal_core::{
    filter_entries, merge_entries, sort_entries, unique_tags, Config, Entry, EntryFilter,
    EntryInput, EntryOptions, EntryStore, FileStorage, KeyValueStorage,
};
use tempfile::TempDir;

fn store() -> EntryStore {
    EntryStore::with_logger(&Config::default(), Arc::new(MemoryLogger::new())).unwrap()
}

fn input(title: &str) -> EntryInput {
    EntryInput::new()
        .with_title(title)
        .with_summary("Résumé")
        .with_commitments("Action")
}

fn fixed(id: &str, created_at: &str) -> EntryOptions<'static> {
    EntryOptions::new().with_id(id).with_created_at(created_at)
}

#[test]
fn add_two_entries_then_reload() {
    let temp_dir = TempDir::new().unwrap();
    let mut storage = FileStorage::open(temp_dir.path()).unwrap();
    let store = store();

    let first = store
        .create_entry(&input("first"), &fixed("e1", "2023-12-01T10:00:00.000Z"))
        .unwrap();
    let second = store
        .create_entry(&input("second"), &fixed("e2", "2023-12-02T10:00:00.000Z"))
        .unwrap();

    let after_first = store.add_entry(first.clone(), &mut storage).unwrap();
    assert_eq!(after_first, vec![first.clone()]);

    let after_second = store.add_entry(second.clone(), &mut storage).unwrap();
    assert_eq!(after_second, vec![second, first]);

    // Reopening the directory sees exactly what was returned
    let reopened = FileStorage::open(temp_dir.path()).unwrap();
    assert_eq!(store.load_entries(&reopened), after_second);
}

#[test]
fn remove_unknown_id_keeps_stored_bytes() {
    let temp_dir = TempDir::new().unwrap();
    let mut storage = FileStorage::open(temp_dir.path()).unwrap();
    let store = store();

    let entry = store
        .create_entry(&input("kept"), &fixed("e1", "2023-12-01T10:00:00.000Z"))
        .unwrap();
    store.add_entry(entry, &mut storage).unwrap();
    let before = storage.get(store.storage_key()).unwrap();

    store.remove_entry("nope", &mut storage).unwrap();
    assert_eq!(storage.get(store.storage_key()).unwrap(), before);
}

#[test]
fn corrupt_file_degrades_to_empty_journal() {
    let temp_dir = TempDir::new().unwrap();
    let mut storage = FileStorage::open(temp_dir.path()).unwrap();
    let store = store();

    storage.set(store.storage_key(), "{invalid json").unwrap();
    assert!(store.load_entries(&storage).is_empty());

    // The journal stays usable afterwards
    let entry = store
        .create_entry(&input("fresh"), &fixed("e1", "2023-12-01T10:00:00.000Z"))
        .unwrap();
    assert_eq!(store.add_entry(entry, &mut storage).unwrap().len(), 1);
}

#[test]
fn persist_then_load_single_entry() {
    let temp_dir = TempDir::new().unwrap();
    let mut storage = FileStorage::open(temp_dir.path()).unwrap();
    let store = store();

    let entry = store
        .create_entry(
            &input("  Décision  ")
                .with_participants("A & B")
                .with_decision_type("Consensus")
                .with_tags(" x, y "),
            &fixed("id1", "2024-01-01T00:00:00.000Z"),
        )
        .unwrap();
    assert_eq!(entry.title, "Décision");
    assert_eq!(entry.participants, "A &amp; B");
    assert_eq!(entry.tags, vec!["x", "y"]);

    store
        .persist_entries(std::slice::from_ref(&entry), &mut storage)
        .unwrap();
    assert_eq!(store.load_entries(&storage), vec![entry]);
}

#[test]
fn merge_overlapping_id_takes_imported_fields() {
    let store = store();
    let existing = vec![
        store
            .create_entry(&input("a"), &fixed("a", "2023-12-01T10:00:00.000Z"))
            .unwrap(),
        store
            .create_entry(&input("old b"), &fixed("b", "2023-12-02T10:00:00.000Z"))
            .unwrap(),
    ];
    let imported = vec![
        store
            .create_entry(&input("new b"), &fixed("b", "2023-12-02T10:00:00.000Z"))
            .unwrap(),
        store
            .create_entry(&input("c"), &fixed("c", "2023-12-03T10:00:00.000Z"))
            .unwrap(),
    ];

    let merged = sort_entries(&merge_entries(existing, imported));
    assert_eq!(merged.len(), 3);
    let b: &Entry = merged.iter().find(|e| e.id == "b").unwrap();
    assert_eq!(b.title, "new b");
    assert_eq!(merged[0].id, "c");
}

#[test]
fn import_file_into_journal_and_query() {
    let temp_dir = TempDir::new().unwrap();
    let mut storage = FileStorage::open(temp_dir.path()).unwrap();
    let store = store();

    let payload = r#"[
        {"id": "entry-1", "createdAt": "2023-12-01T10:00:00.000Z",
         "title": "Décision", "summary": "Partage des notes",
         "commitments": "Envoyer le compte-rendu", "participants": "Collectif A",
         "decisionType": "consensus", "tags": ["transparence"]},
        {"id": "entry-2", "createdAt": "2023-12-02T10:00:00.000Z",
         "title": "Question ouverte", "summary": "Discussion sur la facilitation",
         "commitments": "Collecter des retours", "participants": "Collectif B",
         "decisionType": "consultation", "tags": "feedback"}
    ]"#;

    let report = store.import_entries(payload, &mut storage).unwrap();
    assert_eq!((report.added, report.updated, report.skipped), (2, 0, 0));

    let entries = store.load_entries(&storage);
    let filtered = filter_entries(&entries, &EntryFilter::new("transparence", "compte"));
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, "entry-1");

    assert_eq!(
        unique_tags(&entries),
        vec!["consensus", "consultation", "feedback", "transparence"]
    );
}
