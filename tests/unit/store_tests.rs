/*!
 * Tests for the durable translation store
 */

use std::fs;

use ptradutor::corpus::{CorpusName, Domain, Split, TranslationRecord};
use ptradutor::errors::StoreError;
use ptradutor::translation::TranslationStore;

use crate::common::create_temp_dir;

fn record(idx: u64, pt: &str, en: &str) -> TranslationRecord {
    TranslationRecord::new(idx, CorpusName::DslTl, Domain::Default, Split::Test, pt).with_translation(en)
}

/// Test that a saved store reloads with identical contents
#[test]
fn test_store_saveThenOpen_shouldRestoreRecords() {
    let tmp = create_temp_dir().unwrap();
    let mut store = TranslationStore::open(tmp.path(), "en_dsl_tl_default_test").unwrap();
    store.add(3, record(3, "Não há pão.", "There is no bread."));
    store.add(1, record(1, "Coração", "Heart"));
    store.save().unwrap();

    let reopened = TranslationStore::open(tmp.path(), "en_dsl_tl_default_test").unwrap();
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.get(3), store.get(3));
    assert_eq!(reopened.ids(), store.ids());
    assert_eq!(
        reopened.records().iter().map(|r| r.idx).collect::<Vec<_>>(),
        vec![1, 3]
    );
}

/// Test the persisted layout: string keys and full records
#[test]
fn test_store_persistedLayout_shouldUseStringKeys() {
    let tmp = create_temp_dir().unwrap();
    let mut store = TranslationStore::open(tmp.path(), "s").unwrap();
    store.add(7, record(7, "Olá", "Hello"));
    store.save().unwrap();

    let content = fs::read_to_string(tmp.path().join("s.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    let entry = &value["7"];
    assert_eq!(entry["idx"], 7);
    assert_eq!(entry["source"], "dsl_tl");
    assert_eq!(entry["domain"], "default");
    assert_eq!(entry["split"], "test");
    assert_eq!(entry["pt"], "Olá");
    assert_eq!(entry["en"], "Hello");
    assert!(content.contains("Olá"));
}

/// Test that the record index always matches its key
#[test]
fn test_store_add_shouldAlignRecordIndexWithKey() {
    let tmp = create_temp_dir().unwrap();
    let mut store = TranslationStore::open(tmp.path(), "s").unwrap();
    store.add(42, record(0, "a", "b"));
    assert_eq!(store.get(42).unwrap().idx, 42);
}

/// Test that saving leaves no temporary files behind
#[test]
fn test_store_save_shouldLeaveOnlyCheckpoint() {
    let tmp = create_temp_dir().unwrap();
    let mut store = TranslationStore::open(tmp.path(), "s").unwrap();
    store.add(0, record(0, "a", "b"));
    store.save().unwrap();
    store.add(1, record(1, "c", "d"));
    store.save().unwrap();

    let entries: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

/// Test that an unreadable checkpoint is reported rather than discarded
#[test]
fn test_store_truncatedCheckpoint_shouldFailToOpen() {
    let tmp = create_temp_dir().unwrap();
    fs::write(tmp.path().join("s.json"), "{\"0\": {\"idx\": 0,").unwrap();

    let result = TranslationStore::open(tmp.path(), "s");
    assert!(matches!(result, Err(StoreError::Serde { .. })));
}
