/*!
 * Duplicate and near-duplicate removal.
 *
 * Both passes run independently within each split and keep the first
 * occurrence of a fingerprint. Fingerprints are SHA-256 digests of the
 * Portuguese text (exact) or of its leading and trailing character windows
 * (near-duplicates).
 */

use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};

use crate::corpus::{Split, TranslationRecord};

/// Default window length, in characters, for near-duplicate detection
pub const DEFAULT_WINDOW: usize = 60;

/// Which duplicate detection a dedup stage performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupKind {
    /// Same Portuguese text
    Exact,
    /// Same leading or trailing window of `n` characters
    Window(usize),
}

/// Remembers the digests it has already seen
#[derive(Debug, Default)]
pub struct DigestFilter {
    seen: HashSet<[u8; 32]>,
}

impl DigestFilter {
    /// True the first time `text` is presented, false afterwards
    pub fn detect(&mut self, text: &str) -> bool {
        let digest: [u8; 32] = Sha256::digest(text.as_bytes()).into();
        self.seen.insert(digest)
    }
}

/// Run `dedup` with the stage's kind
pub fn apply(records: Vec<TranslationRecord>, kind: DedupKind) -> Vec<TranslationRecord> {
    match kind {
        DedupKind::Exact => drop_duplicates(records),
        DedupKind::Window(n) => drop_duplicates_start_ends(records, n),
    }
}

/// Keep the first record of every distinct Portuguese text, per split
pub fn drop_duplicates(records: Vec<TranslationRecord>) -> Vec<TranslationRecord> {
    let keep = first_occurrences(&records, |record| record.pt.clone());
    retain_marked(records, &keep)
}

/// Keep a record only when its leading `n` characters and its trailing `n`
/// characters are both first occurrences within its split.
///
/// Texts shorter than `n` use the whole text for both windows.
pub fn drop_duplicates_start_ends(records: Vec<TranslationRecord>, n: usize) -> Vec<TranslationRecord> {
    let first_by_start = first_occurrences(&records, |record| leading_window(&record.pt, n));
    let first_by_end = first_occurrences(&records, |record| trailing_window(&record.pt, n));

    let keep: Vec<bool> = first_by_start
        .iter()
        .zip(&first_by_end)
        .map(|(start, end)| *start && *end)
        .collect();
    retain_marked(records, &keep)
}

/// Mark, for each record, whether its key is the first of its split
fn first_occurrences<F>(records: &[TranslationRecord], key: F) -> Vec<bool>
where
    F: Fn(&TranslationRecord) -> String,
{
    let mut filters: HashMap<Split, DigestFilter> = HashMap::new();
    records
        .iter()
        .map(|record| filters.entry(record.split).or_default().detect(&key(record)))
        .collect()
}

fn retain_marked(records: Vec<TranslationRecord>, keep: &[bool]) -> Vec<TranslationRecord> {
    let before = records.len();
    let kept: Vec<TranslationRecord> = records
        .into_iter()
        .zip(keep)
        .filter_map(|(record, keep)| keep.then_some(record))
        .collect();
    debug!("Dedup dropped {} of {} records", before - kept.len(), before);
    kept
}

fn leading_window(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

fn trailing_window(text: &str, n: usize) -> String {
    let len = text.chars().count();
    text.chars().skip(len.saturating_sub(n)).collect()
}
