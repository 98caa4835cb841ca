/*!
 * Batch translation orchestration.
 *
 * This module translates the texts of a corpus split that are not yet in
 * a store. Missing indices are processed in batches: inside a batch the
 * translation calls run concurrently with a bounded number of workers, and
 * once every call of the batch has settled the successes are added to the
 * store and the store is checkpointed. An interrupted run therefore loses
 * at most the batch in flight, and re-running it only translates what is
 * still missing.
 */

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::BatchConfig;
use crate::corpus::{Corpus, CorpusName, Domain, Split, TranslationRecord};
use crate::errors::{StoreError, TranslationError};
use crate::providers::Translator;

use super::store::TranslationStore;

/// Indices checkpointed together in sequential mode
pub const SEQUENTIAL_CHECKPOINT_EVERY: u64 = 100;

/// Outcome of one orchestrator run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Texts in the source split
    pub total: usize,
    /// Texts already present in the store before the run
    pub already_done: usize,
    /// Texts translated and stored by this run
    pub translated: usize,
    /// Texts whose translation failed or came back empty
    pub failed: usize,
    /// Batches processed
    pub batches: usize,
}

impl RunSummary {
    fn absorb(&mut self, other: &RunSummary) {
        self.total += other.total;
        self.already_done += other.already_done;
        self.translated += other.translated;
        self.failed += other.failed;
        self.batches += other.batches;
    }
}

/// Indices in `0..total` not yet in `done`, ascending
pub fn missing_indices(total: usize, done: &HashSet<u64>) -> Vec<u64> {
    (0..total as u64).filter(|idx| !done.contains(idx)).collect()
}

/// Batch translator for filling a store from a source split
pub struct BatchTranslator {
    /// Shared translation backend
    translator: Arc<dyn Translator>,

    /// Batch size, worker bound, pacing and progress settings
    options: BatchConfig,

    source_language: String,
    target_language: String,
}

impl BatchTranslator {
    pub fn new(
        translator: Arc<dyn Translator>,
        options: BatchConfig,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            translator,
            options,
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }

    /// Concurrent calls allowed for a batch of `batch_len` items
    fn workers_for(&self, batch_len: usize) -> usize {
        match self.options.max_workers {
            0 => batch_len.max(1),
            n => n,
        }
    }

    fn progress_bar(&self, len: usize, message: &str) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(len as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} texts ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message(message.to_string());
        progress_bar
    }

    /// Wait the configured pacing delay, if any
    async fn pace(&self) {
        if self.options.pacing_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.options.pacing_delay_ms)).await;
        }
    }

    async fn translate_one(&self, text: &str) -> Result<String, TranslationError> {
        let translation = self
            .translator
            .translate(text, &self.source_language, &self.target_language)
            .await?;
        if translation.trim().is_empty() {
            return Err(TranslationError::EmptyTranslation);
        }
        Ok(translation)
    }

    /// Run the calls of one batch, returning results ordered by index.
    ///
    /// Calls are dispatched one pacing delay apart, whatever the worker bound.
    async fn translate_batch(
        &self,
        items: Vec<(u64, &str)>,
        progress_bar: &ProgressBar,
    ) -> Vec<(u64, Result<String, TranslationError>)> {
        let workers = self.workers_for(items.len());

        let mut results = stream::iter(items.into_iter().enumerate())
            .then(|(position, item)| async move {
                if position > 0 {
                    self.pace().await;
                }
                item
            })
            .map(|(idx, text)| async move {
                let result = self.translate_one(text).await;
                progress_bar.inc(1);
                (idx, result)
            })
            .buffer_unordered(workers)
            .collect::<Vec<_>>()
            .await;

        results.sort_by_key(|(idx, _)| *idx);
        results
    }

    /// Translate every text of `texts` missing from `store`.
    ///
    /// Text `i` of the split is stored under index `i`. Failed or empty
    /// translations are logged and left missing for the next run. A failed
    /// checkpoint aborts the run.
    pub async fn translate_missing(
        &self,
        store: &mut TranslationStore,
        texts: &[String],
        source: CorpusName,
        domain: Domain,
        split: Split,
    ) -> Result<RunSummary, StoreError> {
        let start_time = Instant::now();
        let missing = missing_indices(texts.len(), &store.ids());

        let mut summary = RunSummary {
            total: texts.len(),
            already_done: texts.len() - missing.len(),
            ..RunSummary::default()
        };

        info!(
            "Store '{}': {} of {} texts already translated, {} missing",
            store.name(),
            summary.already_done,
            summary.total,
            missing.len()
        );
        if missing.is_empty() {
            return Ok(summary);
        }

        let batch_size = self.options.batch_size.max(1);
        let batch_count = missing.len().div_ceil(batch_size);
        let progress_bar = self.progress_bar(missing.len(), store.name());

        for (batch_index, batch) in missing.chunks(batch_size).enumerate() {
            debug!("Processing batch {} of {}", batch_index + 1, batch_count);
            let items: Vec<(u64, &str)> = batch.iter().map(|idx| (*idx, texts[*idx as usize].as_str())).collect();

            let results = self.translate_batch(items, &progress_bar).await;

            for (idx, result) in results {
                match result {
                    Ok(en) => {
                        let record = TranslationRecord::new(idx, source, domain, split, texts[idx as usize].clone())
                            .with_translation(en);
                        store.add(idx, record);
                        summary.translated += 1;
                    }
                    Err(e) => {
                        progress_bar.suspend(|| warn!("Error translating {}: {}", idx, e));
                        summary.failed += 1;
                    }
                }
            }

            store.save()?;
            summary.batches += 1;
        }

        progress_bar.finish_and_clear();
        info!(
            "Store '{}': translated {}, failed {}, {} batches in {:?}",
            store.name(),
            summary.translated,
            summary.failed,
            summary.batches,
            start_time.elapsed()
        );

        Ok(summary)
    }

    /// Translate every domain and split of `corpus` into one store per split
    ///
    /// Stores are opened from `data_dir` and named
    /// `<target>_<corpus>_<domain>_<split>`.
    pub async fn translate_corpus(
        &self,
        data_dir: &std::path::Path,
        name: CorpusName,
        corpus: &Corpus,
        domain_filter: Option<Domain>,
        split_filter: Option<Split>,
    ) -> Result<RunSummary, StoreError> {
        let mut summary = RunSummary::default();

        for (domain, splits) in corpus {
            if domain_filter.is_some_and(|wanted| wanted != *domain) {
                continue;
            }
            for (split, texts) in splits {
                if split_filter.is_some_and(|wanted| wanted != *split) {
                    continue;
                }
                let store_name = format!("{}_{}_{}_{}", self.target_language, name, domain, split);
                let mut store = TranslationStore::open(data_dir, &store_name)?;
                let split_summary = self.translate_missing(&mut store, texts, name, *domain, *split).await?;
                summary.absorb(&split_summary);
            }
        }

        Ok(summary)
    }

    /// Translate several corpora into a single store, one text at a time.
    ///
    /// Indices are global: they run over the corpora in the given order,
    /// then domains, splits and texts. The store is checkpointed every
    /// hundred indices and at the end.
    pub async fn translate_sequential(
        &self,
        store: &mut TranslationStore,
        corpora: &[(CorpusName, Corpus)],
    ) -> Result<RunSummary, StoreError> {
        let total: usize = corpora
            .iter()
            .flat_map(|(_, corpus)| corpus.values())
            .flat_map(|splits| splits.values())
            .map(Vec::len)
            .sum();

        let mut summary = RunSummary {
            total,
            batches: 1,
            ..RunSummary::default()
        };
        let progress_bar = self.progress_bar(total, store.name());
        let mut idx: u64 = 0;

        for (name, corpus) in corpora {
            info!("Translating dataset {}", name);
            for (domain, splits) in corpus {
                for (split, texts) in splits {
                    for text in texts {
                        if store.contains(idx) {
                            debug!("Skipping {}", idx);
                            summary.already_done += 1;
                        } else {
                            self.pace().await;
                            match self.translate_one(text).await {
                                Ok(en) => {
                                    let record = TranslationRecord::new(idx, *name, *domain, *split, text.clone())
                                        .with_translation(en);
                                    store.add(idx, record);
                                    summary.translated += 1;
                                }
                                Err(e) => {
                                    progress_bar.suspend(|| warn!("Error translating {}: {}", idx, e));
                                    summary.failed += 1;
                                }
                            }
                        }

                        progress_bar.inc(1);
                        idx += 1;
                        if idx % SEQUENTIAL_CHECKPOINT_EVERY == 0 {
                            store.save()?;
                        }
                    }
                }
            }
        }

        store.save()?;
        progress_bar.finish_and_clear();
        Ok(summary)
    }
}
