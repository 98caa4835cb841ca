use anyhow::{Context, Result};
use log::{info, warn};
use std::sync::Arc;

use crate::app_config::Config;
use crate::corpus::{Corpus, CorpusName, CorpusProvider, Domain, LocalCorpusProvider, Split, Tier, TierDataset};
use crate::file_utils::FileManager;
use crate::pipeline::{StageReport, TierBuilder};
use crate::providers::{self, Translator};
use crate::publish::{self, LocalPublisher, PublishSummary, PublishTarget};
use crate::rules::{BpeTokenizer, Tokenizer};
use crate::translation::{BatchTranslator, RunSummary, TranslationStore};

/// Store used by the single-store sequential mode
pub const SEQUENTIAL_STORE_NAME: &str = "pt";

/// Main application controller
pub struct Controller {
    config: Config,
    translator: Arc<dyn Translator>,
    tokenizer: Arc<dyn Tokenizer>,
    corpus_provider: Box<dyn CorpusProvider>,
}

impl Controller {
    /// Create a controller with the backends selected in `config`
    pub fn with_config(config: Config) -> Result<Self> {
        let translator = providers::create_translator(&config.translation);
        let corpus_provider = Box::new(LocalCorpusProvider::new(config.paths.corpus_dir()));
        Self::with_components(config, translator, corpus_provider)
    }

    /// Create a controller with explicit backends; the tokenizer named in
    /// the filter configuration is loaded here, once
    pub fn with_components(
        config: Config,
        translator: Arc<dyn Translator>,
        corpus_provider: Box<dyn CorpusProvider>,
    ) -> Result<Self> {
        let tokenizer = BpeTokenizer::new(&config.filters.tokenizer)
            .with_context(|| format!("Failed to load tokenizer '{}'", config.filters.tokenizer))?;

        Ok(Self {
            config,
            translator,
            tokenizer: Arc::new(tokenizer),
            corpus_provider,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn batch_translator(&self) -> BatchTranslator {
        BatchTranslator::new(
            Arc::clone(&self.translator),
            self.config.batch.clone(),
            self.config.source_language.clone(),
            self.config.target_language.clone(),
        )
    }

    fn prepare_data_dir(&self) -> Result<std::path::PathBuf> {
        let data_dir = self.config.paths.data_dir();
        FileManager::ensure_dir(&data_dir)?;
        Ok(data_dir)
    }

    /// Translate the missing texts of one corpus, one store per split
    ///
    /// Without a domain or split filter every domain or split is processed.
    pub async fn run_translate(
        &self,
        name: CorpusName,
        domain: Option<Domain>,
        split: Option<Split>,
    ) -> Result<RunSummary> {
        let data_dir = self.prepare_data_dir()?;
        let corpus = self.corpus_provider.load(name)?;

        if let Some(domain) = domain {
            if !corpus.contains_key(&domain) {
                warn!("Corpus {} has no domain {}", name, domain);
            }
        }

        info!(
            "Translating {} with {} ({})",
            name,
            self.config.translation.provider.display_name(),
            self.config.translation.model
        );

        let summary = self
            .batch_translator()
            .translate_corpus(&data_dir, name, &corpus, domain, split)
            .await
            .with_context(|| format!("Translation of {} aborted", name))?;

        info!(
            "Finished {}: {} translated, {} failed, {} already done of {}",
            name, summary.translated, summary.failed, summary.already_done, summary.total
        );
        Ok(summary)
    }

    /// Translate every corpus into the single sequential store
    pub async fn run_sequential(&self) -> Result<RunSummary> {
        let data_dir = self.prepare_data_dir()?;
        let corpora: Vec<(CorpusName, Corpus)> = CorpusName::ALL
            .iter()
            .map(|name| self.corpus_provider.load(*name).map(|corpus| (*name, corpus)))
            .collect::<Result<_>>()?;

        let mut store = TranslationStore::open(&data_dir, SEQUENTIAL_STORE_NAME)?;
        let summary = self
            .batch_translator()
            .translate_sequential(&mut store, &corpora)
            .await
            .context("Sequential translation aborted")?;

        info!(
            "Finished sequential run: {} translated, {} failed, {} skipped",
            summary.translated, summary.failed, summary.already_done
        );
        Ok(summary)
    }

    /// Build `tier` from the stores in the data directory
    pub fn build_tier(&self, tier: Tier) -> Result<(TierDataset, Vec<StageReport>)> {
        let raw = publish::load_raw_tier(self.config.paths.data_dir())?;
        info!("Raw tier: {} records", raw.len());

        let builder = TierBuilder::new(self.config.filters.clone(), Arc::clone(&self.tokenizer));
        Ok(builder.build(&raw, tier))
    }

    /// Build and write `tier` to the publish directory
    pub fn run_publish(&self, tier: Tier) -> Result<PublishSummary> {
        let (dataset, _) = self.build_tier(tier)?;
        if dataset.is_empty() {
            warn!("The {} tier is empty, publishing empty files", tier);
        }

        let publisher = LocalPublisher::new(self.config.paths.publish_dir(), self.config.publish.train_chunks);
        publisher.publish(&dataset)
    }

    /// Build `tier` and log how many records each stage kept, per domain
    pub fn run_stats(&self, tier: Tier) -> Result<Vec<StageReport>> {
        let (dataset, reports) = self.build_tier(tier)?;
        for report in &reports {
            report.log();
        }
        for (split, records) in dataset.splits() {
            info!("{} {}: {} records", tier, split, records.len());
        }
        Ok(reports)
    }
}
