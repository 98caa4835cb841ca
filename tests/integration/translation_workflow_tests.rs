/*!
 * End-to-end tests for translating corpora into stores
 */

use std::fs;
use std::sync::Arc;

use ptradutor::app_controller::{Controller, SEQUENTIAL_STORE_NAME};
use ptradutor::corpus::{CorpusName, Domain, LocalCorpusProvider, Split};
use ptradutor::providers::MockTranslator;
use ptradutor::translation::TranslationStore;

use crate::common::{
    GOOD_EN, GOOD_PT, OTHER_PT, create_temp_dir, dictionary_translation, init_logging, test_config,
    write_corpus_split,
};

fn controller(root: &std::path::Path, translator: &MockTranslator) -> Controller {
    init_logging();
    let config = test_config(root);
    let corpus_provider = Box::new(LocalCorpusProvider::new(config.paths.corpus_dir()));
    Controller::with_components(config, Arc::new(translator.clone()), corpus_provider).unwrap()
}

/// Test translating a corpus and re-running without new work
#[tokio::test]
async fn test_runTranslate_rerun_shouldNotCallTranslatorAgain() {
    let tmp = create_temp_dir().unwrap();
    let corpora = tmp.path().join("corpora");
    write_corpus_split(&corpora, "frmt", "default", "train", &[(GOOD_PT, 0), (OTHER_PT, 1)]).unwrap();
    write_corpus_split(&corpora, "frmt", "default", "test", &[("Bom dia.", 0)]).unwrap();

    let translator = MockTranslator::working().with_custom_response(dictionary_translation);
    let controller = controller(tmp.path(), &translator);

    let summary = controller.run_translate(CorpusName::Frmt, None, None).await.unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.translated, 3);
    assert_eq!(translator.request_count(), 3);

    let stores = tmp.path().join("stores");
    let train = TranslationStore::open(&stores, "en_frmt_default_train").unwrap();
    assert_eq!(train.get(0).unwrap().en.as_deref(), Some(GOOD_EN));
    assert_eq!(train.get(1).unwrap().source, CorpusName::Frmt);

    let rerun = controller.run_translate(CorpusName::Frmt, None, None).await.unwrap();
    assert_eq!(rerun.already_done, 3);
    assert_eq!(rerun.translated, 0);
    assert_eq!(translator.request_count(), 3);
}

/// Test that a run interrupted by failures is completed by the next run
#[tokio::test]
async fn test_runTranslate_afterFailures_shouldOnlyTranslateMissing() {
    let tmp = create_temp_dir().unwrap();
    let corpora = tmp.path().join("corpora");
    let rows: Vec<(String, i64)> = (0..10).map(|i| (format!("Frase número {}.", i), 0)).collect();
    let rows: Vec<(&str, i64)> = rows.iter().map(|(text, label)| (text.as_str(), *label)).collect();
    write_corpus_split(&corpora, "dsl_tl", "default", "train", &rows).unwrap();

    let flaky = MockTranslator::intermittent(2);
    let first = controller(tmp.path(), &flaky)
        .run_translate(CorpusName::DslTl, Some(Domain::Default), Some(Split::Train))
        .await
        .unwrap();
    assert_eq!(first.translated + first.failed, 10);
    assert!(first.failed > 0);

    let working = MockTranslator::working();
    let second = controller(tmp.path(), &working)
        .run_translate(CorpusName::DslTl, Some(Domain::Default), Some(Split::Train))
        .await
        .unwrap();
    assert_eq!(second.already_done, first.translated);
    assert_eq!(working.request_count(), first.failed);

    let store = TranslationStore::open(tmp.path().join("stores"), "en_dsl_tl_default_train").unwrap();
    assert_eq!(store.len(), 10);
}

/// Test that a resumed run leaves the same store file as one uninterrupted run
#[tokio::test]
async fn test_runTranslate_resumedRun_shouldMatchSingleRunBytes() {
    let rows: Vec<(String, i64)> = (0..12).map(|i| (format!("Notícia número {}.", i), 0)).collect();
    let rows: Vec<(&str, i64)> = rows.iter().map(|(text, label)| (text.as_str(), *label)).collect();
    let store_file = |root: &std::path::Path| root.join("stores").join("en_frmt_default_train.json");

    let resumed = create_temp_dir().unwrap();
    write_corpus_split(&resumed.path().join("corpora"), "frmt", "default", "train", &rows).unwrap();
    let flaky = MockTranslator::intermittent(3);
    let first = controller(resumed.path(), &flaky).run_translate(CorpusName::Frmt, None, None).await.unwrap();
    assert!(first.failed > 0);

    let working = MockTranslator::working();
    controller(resumed.path(), &working).run_translate(CorpusName::Frmt, None, None).await.unwrap();
    let after_resume = fs::read(store_file(resumed.path())).unwrap();

    let rerun = controller(resumed.path(), &working).run_translate(CorpusName::Frmt, None, None).await.unwrap();
    assert_eq!(rerun.translated, 0);
    assert_eq!(fs::read(store_file(resumed.path())).unwrap(), after_resume);

    let single = create_temp_dir().unwrap();
    write_corpus_split(&single.path().join("corpora"), "frmt", "default", "train", &rows).unwrap();
    controller(single.path(), &MockTranslator::working())
        .run_translate(CorpusName::Frmt, None, None)
        .await
        .unwrap();
    assert_eq!(fs::read(store_file(single.path())).unwrap(), after_resume);
}

/// Test that rows outside the corpus label set are never translated
#[tokio::test]
async fn test_runTranslate_dslTl_shouldKeepOnlyPortugueseLabels() {
    let tmp = create_temp_dir().unwrap();
    let corpora = tmp.path().join("corpora");
    write_corpus_split(
        &corpora,
        "dsl_tl",
        "default",
        "train",
        &[("europeu", 0), ("brasileiro", 1), ("ambos", 2)],
    )
    .unwrap();

    let translator = MockTranslator::working();
    let summary = controller(tmp.path(), &translator)
        .run_translate(CorpusName::DslTl, None, Some(Split::Train))
        .await
        .unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(translator.calls(), vec!["europeu".to_string(), "ambos".to_string()]);
}

/// Test that a missing corpus directory fails before any translation
#[test]
fn test_runTranslate_missingCorpus_shouldFail() {
    let tmp = create_temp_dir().unwrap();
    let translator = MockTranslator::working();

    let result = tokio_test::block_on(async {
        controller(tmp.path(), &translator).run_translate(CorpusName::PtVid, None, None).await
    });
    assert!(result.is_err());
    assert_eq!(translator.request_count(), 0);
}

/// Test the single-store sequential mode over every corpus
#[tokio::test]
async fn test_runSequential_shouldNumberTextsGlobally() {
    let tmp = create_temp_dir().unwrap();
    let corpora = tmp.path().join("corpora");
    write_corpus_split(&corpora, "pt_vid", "journalistic", "train", &[("a", 0), ("b", 0)]).unwrap();
    write_corpus_split(&corpora, "frmt", "default", "train", &[("c", 0)]).unwrap();
    write_corpus_split(&corpora, "dsl_tl", "default", "test", &[("d", 2)]).unwrap();

    let translator = MockTranslator::working();
    let summary = controller(tmp.path(), &translator).run_sequential().await.unwrap();
    assert_eq!(summary.translated, 4);

    let store = TranslationStore::open(tmp.path().join("stores"), SEQUENTIAL_STORE_NAME).unwrap();
    let sources: Vec<(u64, CorpusName, &str)> =
        store.records().iter().map(|r| (r.idx, r.source, r.pt.as_str())).collect();
    assert_eq!(
        sources,
        vec![
            (0, CorpusName::PtVid, "a"),
            (1, CorpusName::PtVid, "b"),
            (2, CorpusName::Frmt, "c"),
            (3, CorpusName::DslTl, "d"),
        ]
    );
}
