/*!
 * Durable, resumable store of translated records.
 *
 * A store is a named mapping `idx -> TranslationRecord` kept in memory and
 * checkpointed to `<dir>/<name>.json`. Checkpoints are atomic: the state
 * is written to a temporary file next to the destination and renamed over
 * it, so an interrupted save leaves the previous checkpoint intact.
 */

use log::{debug, info};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::corpus::TranslationRecord;
use crate::errors::StoreError;
use crate::file_utils::FileManager;

/// Named translation store backed by a JSON file
#[derive(Debug)]
pub struct TranslationStore {
    name: String,
    path: PathBuf,
    records: HashMap<u64, TranslationRecord>,
}

impl TranslationStore {
    /// Load the store `name` from `dir`, or start an empty one when no
    /// checkpoint exists yet
    pub fn open<P: AsRef<Path>>(dir: P, name: &str) -> Result<Self, StoreError> {
        let path = dir.as_ref().join(format!("{}.json", name));

        let records = if path.is_file() {
            let content = fs::read(&path).map_err(|source| StoreError::Io {
                name: name.to_string(),
                source,
            })?;
            let records: HashMap<u64, TranslationRecord> =
                serde_json::from_slice(&content).map_err(|source| StoreError::Serde {
                    name: name.to_string(),
                    source,
                })?;
            info!("Loaded {} records from store '{}'", records.len(), name);
            records
        } else {
            debug!("No checkpoint for store '{}' at {:?}, starting empty", name, path);
            HashMap::new()
        };

        Ok(Self {
            name: name.to_string(),
            path,
            records,
        })
    }

    /// Open every store found in `dir`, sorted by name
    pub fn load_all<P: AsRef<Path>>(dir: P) -> Result<Vec<TranslationStore>, StoreError> {
        let files = FileManager::find_files(dir.as_ref(), "json").map_err(|e| StoreError::Io {
            name: dir.as_ref().display().to_string(),
            source: std::io::Error::other(e.to_string()),
        })?;

        files
            .iter()
            .filter_map(|path| path.file_stem().map(|stem| stem.to_string_lossy().to_string()))
            .map(|name| Self::open(dir.as_ref(), &name))
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, idx: u64) -> bool {
        self.records.contains_key(&idx)
    }

    /// Insert or replace the record at `idx`
    pub fn add(&mut self, idx: u64, mut record: TranslationRecord) {
        record.idx = idx;
        self.records.insert(idx, record);
    }

    pub fn get(&self, idx: u64) -> Option<&TranslationRecord> {
        self.records.get(&idx)
    }

    /// Indices already present
    pub fn ids(&self) -> HashSet<u64> {
        self.records.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &TranslationRecord> {
        self.records.values()
    }

    /// Records sorted by index
    pub fn records(&self) -> Vec<&TranslationRecord> {
        let mut records: Vec<&TranslationRecord> = self.records.values().collect();
        records.sort_by_key(|record| record.idx);
        records
    }

    /// Checkpoint the whole store.
    ///
    /// Keys are written as decimal strings in numeric order and non-ASCII
    /// text is kept verbatim. Saving an unchanged store rewrites identical
    /// bytes.
    pub fn save(&self) -> Result<(), StoreError> {
        let ordered: BTreeMap<u64, &TranslationRecord> =
            self.records.iter().map(|(idx, record)| (*idx, record)).collect();
        let content = serde_json::to_vec_pretty(&ordered).map_err(|source| StoreError::Serde {
            name: self.name.clone(),
            source,
        })?;

        FileManager::write_atomic(&self.path, &content).map_err(|e| StoreError::Persist {
            name: self.name.clone(),
            message: e.to_string(),
        })?;

        debug!("Saved {} records to store '{}'", self.records.len(), self.name);
        Ok(())
    }
}
