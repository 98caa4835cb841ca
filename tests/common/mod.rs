/*!
 * Common test utilities for the ptradutor test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use ptradutor::app_config::{Config, TranslationProvider};
use ptradutor::corpus::{CorpusName, Domain, Split, TranslationRecord};

/// A Portuguese sentence that survives every filter
pub const GOOD_PT: &str = "O governo aprovou ontem o novo orçamento para a educação pública.";
/// Its English translation
pub const GOOD_EN: &str = "The government approved yesterday the new budget for public education.";

/// Another surviving pair, distinct from the first in both windows
pub const OTHER_PT: &str = "A equipa técnica apresentou hoje o plano de obras para a nova escola.";
pub const OTHER_EN: &str = "The technical team presented today the works plan for the new school.";

/// Route log output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Writes `<root>/<corpus>/<domain>/<split>.jsonl` with one row per `(text, label)`
pub fn write_corpus_split(
    root: &Path,
    corpus: &str,
    domain: &str,
    split: &str,
    rows: &[(&str, i64)],
) -> Result<PathBuf> {
    let dir = root.join(corpus).join(domain);
    fs::create_dir_all(&dir)?;

    let content: String = rows
        .iter()
        .map(|(text, label)| serde_json::json!({ "text": text, "label": label }).to_string() + "\n")
        .collect();
    let path = dir.join(format!("{}.jsonl", split));
    fs::write(&path, content)?;
    Ok(path)
}

/// Configuration rooted in `root`, using the mock backend and no progress bar
pub fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.paths.data_dir = root.join("stores").to_string_lossy().to_string();
    config.paths.corpus_dir = root.join("corpora").to_string_lossy().to_string();
    config.paths.publish_dir = root.join("hf").to_string_lossy().to_string();
    config.translation.provider = TranslationProvider::Mock;
    config.batch.show_progress = false;
    config
}

/// A translated record
pub fn translated(idx: u64, split: Split, pt: &str, en: &str) -> TranslationRecord {
    TranslationRecord::new(idx, CorpusName::PtVid, Domain::Journalistic, split, pt).with_translation(en)
}

/// Mock response that maps the known Portuguese sentences to their translation
pub fn dictionary_translation(text: &str) -> String {
    match text {
        GOOD_PT => GOOD_EN.to_string(),
        OTHER_PT => OTHER_EN.to_string(),
        _ => format!("EN {}", text),
    }
}
