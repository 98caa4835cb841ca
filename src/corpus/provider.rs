/*!
 * Source corpus loading.
 *
 * A corpus provider maps a corpus name to `domain -> split -> texts`. The
 * bundled provider reads local JSONL dumps laid out as
 * `<root>/<corpus>/<domain>/<split>.jsonl`, one `{"text": ..., "label": ...}`
 * object per line, and keeps only the rows whose label belongs to the
 * Portuguese variety the corpus is used for.
 */

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::record::{CorpusName, Domain, Split};

/// Texts of a corpus grouped by domain then split, in source order
pub type Corpus = BTreeMap<Domain, BTreeMap<Split, Vec<String>>>;

/// Anything able to hand out the raw texts of a named corpus
pub trait CorpusProvider: Send + Sync {
    /// Load every domain and split of `name`
    fn load(&self, name: CorpusName) -> Result<Corpus>;
}

/// Which domains and splits a corpus has and which labels to keep
#[derive(Debug, Clone, Copy)]
pub struct CorpusLayout {
    pub domains: &'static [Domain],
    pub splits: &'static [Split],
    /// Labels to keep; `None` keeps every row
    pub labels: Option<&'static [i64]>,
}

impl CorpusName {
    pub fn layout(&self) -> CorpusLayout {
        match self {
            CorpusName::DslTl => CorpusLayout {
                domains: &[Domain::Default],
                splits: &[Split::Train, Split::Test],
                labels: Some(&[0, 2]),
            },
            CorpusName::PtVid => CorpusLayout {
                domains: &[
                    Domain::Journalistic,
                    Domain::Legal,
                    Domain::Literature,
                    Domain::Politics,
                    Domain::SocialMedia,
                    Domain::Web,
                ],
                // the test partition is held out and never translated
                splits: &[Split::Train],
                labels: Some(&[0]),
            },
            CorpusName::Frmt => CorpusLayout {
                domains: &[Domain::Default],
                splits: &[Split::Train, Split::Test],
                labels: None,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawRow {
    text: String,
    #[serde(default)]
    label: Option<i64>,
}

/// Reads corpora from JSONL dumps on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalCorpusProvider {
    root: PathBuf,
}

impl LocalCorpusProvider {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn read_split(path: &Path, labels: Option<&[i64]>) -> Result<Vec<String>> {
        let file = File::open(path).with_context(|| format!("Failed to open corpus file: {:?}", path))?;
        let mut texts = Vec::new();

        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read {:?}", path))?;
            if line.trim().is_empty() {
                continue;
            }
            let row: RawRow = serde_json::from_str(&line)
                .with_context(|| format!("Malformed row at {:?}:{}", path, line_no + 1))?;

            let keep = match (labels, row.label) {
                (Some(allowed), Some(label)) => allowed.contains(&label),
                _ => true,
            };
            if keep {
                texts.push(row.text);
            }
        }

        Ok(texts)
    }
}

impl CorpusProvider for LocalCorpusProvider {
    fn load(&self, name: CorpusName) -> Result<Corpus> {
        let dir = self.root.join(name.as_str());
        if !dir.is_dir() {
            return Err(anyhow!("Corpus directory not found for {}: {:?}", name, dir));
        }

        let layout = name.layout();
        let mut corpus = Corpus::new();

        for domain in layout.domains {
            let splits = corpus.entry(*domain).or_default();
            for split in layout.splits {
                let path = dir.join(domain.as_str()).join(format!("{}.jsonl", split));
                let texts = if path.is_file() {
                    Self::read_split(&path, layout.labels)?
                } else {
                    debug!("No {} split for {}/{}, using an empty one", split, name, domain);
                    Vec::new()
                };
                splits.insert(*split, texts);
            }
        }

        let total: usize = corpus.values().flat_map(|s| s.values()).map(Vec::len).sum();
        info!("Loaded {} texts from corpus {}", total, name);

        Ok(corpus)
    }
}
