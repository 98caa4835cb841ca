/*!
 * Translation record and the closed vocabularies that tag it.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{NameError, RuleError};

/// Source corpus a text was collected from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorpusName {
    /// Dialect identification corpus (DSL-TL)
    DslTl,
    /// Portuguese variety identification corpus, several domains
    PtVid,
    /// Regional variant corpus (FRMT)
    Frmt,
}

impl CorpusName {
    pub const ALL: [CorpusName; 3] = [CorpusName::PtVid, CorpusName::Frmt, CorpusName::DslTl];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DslTl => "dsl_tl",
            Self::PtVid => "pt_vid",
            Self::Frmt => "frmt",
        }
    }
}

impl fmt::Display for CorpusName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorpusName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dsl_tl" => Ok(Self::DslTl),
            "pt_vid" => Ok(Self::PtVid),
            "frmt" => Ok(Self::Frmt),
            _ => Err(NameError::UnknownCorpus(s.to_string())),
        }
    }
}

/// Topical or stylistic category of a source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Default,
    Journalistic,
    Legal,
    Literature,
    Politics,
    SocialMedia,
    Web,
}

impl Domain {
    pub const ALL: [Domain; 7] = [
        Domain::Default,
        Domain::Journalistic,
        Domain::Literature,
        Domain::Web,
        Domain::Politics,
        Domain::Legal,
        Domain::SocialMedia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Journalistic => "journalistic",
            Self::Legal => "legal",
            Self::Literature => "literature",
            Self::Politics => "politics",
            Self::SocialMedia => "social_media",
            Self::Web => "web",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .iter()
            .find(|d| d.as_str() == s.trim().to_lowercase())
            .copied()
            .ok_or_else(|| NameError::UnknownDomain(s.to_string()))
    }
}

/// Partition tag attached to each record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    Train,
    Test,
    Valid,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Test, Split::Valid];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Test => "test",
            Self::Valid => "valid",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "train" => Ok(Self::Train),
            "test" => Ok(Self::Test),
            "valid" | "validation" => Ok(Self::Valid),
            _ => Err(NameError::UnknownSplit(s.to_string())),
        }
    }
}

/// One aligned Portuguese/English pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// Stable identity inside a store
    pub idx: u64,
    /// Corpus the Portuguese text came from
    pub source: CorpusName,
    /// Domain of the text
    pub domain: Domain,
    /// Partition the record belongs to
    pub split: Split,
    /// Portuguese text
    pub pt: String,
    /// English translation, absent until translated
    #[serde(default)]
    pub en: Option<String>,
}

impl TranslationRecord {
    /// Create an untranslated record
    pub fn new(idx: u64, source: CorpusName, domain: Domain, split: Split, pt: impl Into<String>) -> Self {
        Self {
            idx,
            source,
            domain,
            split,
            pt: pt.into(),
            en: None,
        }
    }

    /// Attach a translation
    pub fn with_translation(mut self, en: impl Into<String>) -> Self {
        self.en = Some(en.into());
        self
    }

    /// The English side, or a rule error when it was never filled in
    pub fn en(&self) -> Result<&str, RuleError> {
        self.en.as_deref().ok_or(RuleError::MissingField {
            idx: self.idx,
            field: "en",
        })
    }

    /// Whether a translation is attached
    pub fn is_translated(&self) -> bool {
        self.en.is_some()
    }
}

/// Row shape written by publish targets; the split is implied by the file
#[derive(Debug, Serialize)]
pub struct PublishedRow<'a> {
    pub idx: u64,
    pub source: CorpusName,
    pub domain: Domain,
    pub pt: &'a str,
    pub en: Option<&'a str>,
}

impl<'a> From<&'a TranslationRecord> for PublishedRow<'a> {
    fn from(record: &'a TranslationRecord) -> Self {
        Self {
            idx: record.idx,
            source: record.source,
            domain: record.domain,
            pt: &record.pt,
            en: record.en.as_deref(),
        }
    }
}
