/*!
 * Publishing of corpus tiers.
 *
 * The raw tier is assembled from every translation store in the data
 * directory. A publish target receives a finished tier; the bundled
 * local publisher writes it as JSON Lines under `<root>/<tier>/`, with the
 * train split chunked into `train_<i>.jsonl` files and every other split
 * written to `<split>.jsonl`.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::corpus::{PublishedRow, Split, Tier, TierDataset, TranslationRecord};
use crate::file_utils::FileManager;
use crate::translation::TranslationStore;

/// Files written by a publish run
#[derive(Debug, Clone, Default, Serialize)]
pub struct PublishSummary {
    pub files: Vec<PathBuf>,
    pub rows: usize,
}

/// Destination for a finished tier
pub trait PublishTarget {
    fn publish(&self, dataset: &TierDataset) -> Result<PublishSummary>;
}

/// Raw tier made of every translated record of `stores`
///
/// Records without a translation are left out. Stores are taken in the
/// given order and records in index order.
pub fn raw_tier(stores: &[TranslationStore]) -> TierDataset {
    let records: Vec<TranslationRecord> = stores
        .iter()
        .flat_map(|store| store.records())
        .filter(|record| record.is_translated())
        .cloned()
        .collect();
    TierDataset::from_records(Tier::Raw, records)
}

/// Load every store under `data_dir` and build the raw tier from them
pub fn load_raw_tier<P: AsRef<Path>>(data_dir: P) -> Result<TierDataset> {
    let stores = TranslationStore::load_all(data_dir.as_ref())
        .with_context(|| format!("Failed to load stores from {:?}", data_dir.as_ref()))?;
    for store in &stores {
        info!("Formatting {} ({} records)", store.name(), store.len());
    }
    Ok(raw_tier(&stores))
}

/// Contiguous ranges splitting `len` rows into `chunks` parts
///
/// Chunk `i` starts at `i * len / chunks`, so sizes differ by at most one.
pub fn chunk_ranges(len: usize, chunks: usize) -> Vec<Range<usize>> {
    let chunks = chunks.max(1);
    (0..chunks)
        .map(|chunk| (chunk * len / chunks)..((chunk + 1) * len / chunks))
        .collect()
}

/// Writes tiers as JSON Lines on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalPublisher {
    root: PathBuf,
    train_chunks: usize,
}

impl LocalPublisher {
    pub fn new<P: AsRef<Path>>(root: P, train_chunks: usize) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            train_chunks: train_chunks.max(1),
        }
    }

    fn write_rows(path: &Path, records: &[TranslationRecord]) -> Result<()> {
        let mut content = Vec::new();
        for record in records {
            serde_json::to_writer(&mut content, &PublishedRow::from(record))
                .with_context(|| format!("Failed to serialize record {}", record.idx))?;
            content.push(b'\n');
        }
        FileManager::write_atomic(path, &content).with_context(|| format!("Failed to write {:?}", path))?;
        debug!("Wrote {} rows to {:?}", records.len(), path);
        Ok(())
    }
}

impl PublishTarget for LocalPublisher {
    fn publish(&self, dataset: &TierDataset) -> Result<PublishSummary> {
        let dir = self.root.join(dataset.tier().as_str());
        FileManager::ensure_dir(&dir)?;
        let mut summary = PublishSummary::default();

        for (split, records) in dataset.splits() {
            if *split == Split::Train {
                for (chunk, range) in chunk_ranges(records.len(), self.train_chunks).into_iter().enumerate() {
                    let path = dir.join(format!("train_{}.jsonl", chunk));
                    Self::write_rows(&path, &records[range])?;
                    summary.files.push(path);
                }
            } else {
                let path = dir.join(format!("{}.jsonl", split));
                Self::write_rows(&path, records)?;
                summary.files.push(path);
            }
            summary.rows += records.len();
        }

        info!(
            "Published {} tier: {} rows in {} files under {:?}",
            dataset.tier(),
            summary.rows,
            summary.files.len(),
            dir
        );
        Ok(summary)
    }
}
