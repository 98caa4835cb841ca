/*!
 * Corpus tiers: immutable, split-partitioned snapshots of the dataset.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::record::{Split, TranslationRecord};
use crate::errors::NameError;

/// Quality stage of a published dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Raw,
    Clean,
    Superclean,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Clean => "clean",
            Self::Superclean => "superclean",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "clean" => Ok(Self::Clean),
            "superclean" => Ok(Self::Superclean),
            _ => Err(NameError::UnknownTier(s.to_string())),
        }
    }
}

/// A named snapshot of records partitioned by split
#[derive(Debug, Clone, PartialEq)]
pub struct TierDataset {
    tier: Tier,
    splits: BTreeMap<Split, Vec<TranslationRecord>>,
}

impl TierDataset {
    /// Partition `records` by their split tag, keeping their relative order
    pub fn from_records(tier: Tier, records: impl IntoIterator<Item = TranslationRecord>) -> Self {
        let mut splits: BTreeMap<Split, Vec<TranslationRecord>> = BTreeMap::new();
        for record in records {
            splits.entry(record.split).or_default().push(record);
        }
        Self { tier, splits }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn splits(&self) -> &BTreeMap<Split, Vec<TranslationRecord>> {
        &self.splits
    }

    pub fn split(&self, split: Split) -> &[TranslationRecord] {
        self.splits.get(&split).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.splits.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the next tier by running `derive` independently on every split
    pub fn derive<F>(&self, tier: Tier, mut derive: F) -> TierDataset
    where
        F: FnMut(Split, &[TranslationRecord]) -> Vec<TranslationRecord>,
    {
        let splits = self
            .splits
            .iter()
            .map(|(split, records)| (*split, derive(*split, records)))
            .collect();
        TierDataset { tier, splits }
    }
}
