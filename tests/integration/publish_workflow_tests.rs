/*!
 * End-to-end tests for building and publishing tiers
 */

use std::fs;
use std::sync::Arc;

use ptradutor::app_controller::Controller;
use ptradutor::corpus::{LocalCorpusProvider, Split, Tier};
use ptradutor::providers::MockTranslator;
use ptradutor::translation::TranslationStore;

use crate::common::{GOOD_EN, GOOD_PT, OTHER_EN, OTHER_PT, create_temp_dir, test_config, translated};

/// Fill two stores in `root/stores` with good, duplicate and noisy pairs
fn seed_stores(root: &std::path::Path) {
    let dir = root.join("stores");

    let mut journalistic = TranslationStore::open(&dir, "en_pt_vid_journalistic_train").unwrap();
    journalistic.add(0, translated(0, Split::Train, GOOD_PT, GOOD_EN));
    journalistic.add(1, translated(1, Split::Train, GOOD_PT, GOOD_EN));
    journalistic.add(2, translated(2, Split::Train, "March 2021: resultados", "March 2021: results"));
    journalistic.add(3, translated(3, Split::Train, OTHER_PT, OTHER_EN));
    journalistic.save().unwrap();

    let mut test = TranslationStore::open(&dir, "en_frmt_default_test").unwrap();
    test.add(0, translated(0, Split::Test, OTHER_PT, OTHER_EN));
    test.save().unwrap();
}

fn controller(root: &std::path::Path) -> Controller {
    let config = test_config(root);
    let corpus_provider = Box::new(LocalCorpusProvider::new(config.paths.corpus_dir()));
    Controller::with_components(config, Arc::new(MockTranslator::working()), corpus_provider).unwrap()
}

fn read_rows(path: &std::path::Path) -> Vec<serde_json::Value> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

/// Test that the raw tier publishes every translated record
#[test]
fn test_runPublish_raw_shouldKeepEveryRecord() {
    let tmp = create_temp_dir().unwrap();
    seed_stores(tmp.path());

    let summary = controller(tmp.path()).run_publish(Tier::Raw).unwrap();
    assert_eq!(summary.rows, 5);

    let dir = tmp.path().join("hf").join("raw");
    let train_rows: usize = (0..5).map(|i| read_rows(&dir.join(format!("train_{}.jsonl", i))).len()).sum();
    assert_eq!(train_rows, 4);
    assert_eq!(read_rows(&dir.join("test.jsonl")).len(), 1);
}

/// Test that the superclean tier drops duplicates and boilerplate
#[test]
fn test_runPublish_superclean_shouldFilterAndDropSplitField() {
    let tmp = create_temp_dir().unwrap();
    seed_stores(tmp.path());

    let summary = controller(tmp.path()).run_publish(Tier::Superclean).unwrap();
    assert_eq!(summary.rows, 3);

    let dir = tmp.path().join("hf").join("superclean");
    let train: Vec<serde_json::Value> = (0..5)
        .flat_map(|i| read_rows(&dir.join(format!("train_{}.jsonl", i))))
        .collect();
    let pts: Vec<&str> = train.iter().filter_map(|row| row["pt"].as_str()).collect();
    assert_eq!(pts, vec![GOOD_PT, OTHER_PT]);
    assert!(train.iter().all(|row| row.get("split").is_none()));

    let test = read_rows(&dir.join("test.jsonl"));
    assert_eq!(test[0]["en"], OTHER_EN);
}

/// Test that the stats command reports every stage of both cascades
#[test]
fn test_runStats_superclean_shouldReportEveryStage() {
    let tmp = create_temp_dir().unwrap();
    seed_stores(tmp.path());

    let reports = controller(tmp.path()).run_stats(Tier::Superclean).unwrap();
    let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "transform",
            "quality",
            "drop_duplicates",
            "drop_duplicates_start_ends",
            "transform",
            "max_tokens",
            "invalid_chars",
            "patterns",
            "misc"
        ]
    );
    assert_eq!(reports[0].records_in, 5);
    assert_eq!(reports.last().map(|r| r.records_out), Some(3));
}

/// Test publishing with no stores at all
#[test]
fn test_runPublish_noStores_shouldWriteEmptyTier() {
    let tmp = create_temp_dir().unwrap();
    let summary = controller(tmp.path()).run_publish(Tier::Clean).unwrap();
    assert_eq!(summary.rows, 0);
    assert!(summary.files.is_empty());
}
