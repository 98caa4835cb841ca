/*!
 * Filter stages and their composition.
 *
 * A `Pipeline` is an ordered list of stages. Every stage maps a collection
 * of records to an order-preserving subset of it (a transform stage keeps
 * every record and rewrites its text). Rules inside a filter stage are
 * named values combined with short-circuit AND, so a cascade can be
 * reordered or instrumented stage by stage.
 */

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::dedup::{self, DedupKind};
use crate::corpus::{Domain, TranslationRecord};
use crate::errors::RuleError;
use crate::rules::normalize;

/// Which side(s) of a pair a text rule inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleTarget {
    #[default]
    Pt,
    En,
    Both,
}

impl RuleTarget {
    /// The texts of `record` this target selects
    pub fn fields<'a>(&self, record: &'a TranslationRecord) -> Result<Vec<&'a str>, RuleError> {
        Ok(match self {
            RuleTarget::Pt => vec![record.pt.as_str()],
            RuleTarget::En => vec![record.en()?],
            RuleTarget::Both => vec![record.pt.as_str(), record.en()?],
        })
    }
}

type RuleFn = dyn Fn(&TranslationRecord) -> Result<bool, RuleError> + Send + Sync;

/// A named predicate over a record; `Ok(true)` keeps the record
#[derive(Clone)]
pub struct Rule {
    name: String,
    check: Arc<RuleFn>,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

impl Rule {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&TranslationRecord) -> Result<bool, RuleError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// Keep a record only when `predicate` is false on every targeted field
    pub fn reject_if<P>(name: impl Into<String>, target: RuleTarget, predicate: P) -> Self
    where
        P: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::new(name, move |record| {
            Ok(!target.fields(record)?.into_iter().any(&predicate))
        })
    }

    /// Keep a record only when `predicate` holds on every targeted field
    pub fn require<P>(name: impl Into<String>, target: RuleTarget, predicate: P) -> Self
    where
        P: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::new(name, move |record| {
            Ok(target.fields(record)?.into_iter().all(&predicate))
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accepts(&self, record: &TranslationRecord) -> Result<bool, RuleError> {
        (self.check)(record)
    }
}

/// Evaluate `rules` in order, stopping at the first rejection or error
pub fn accepts_all(rules: &[Rule], record: &TranslationRecord) -> Result<bool, RuleError> {
    for rule in rules {
        if !rule.accepts(record)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Keep the records satisfying `predicate`, preserving their order
pub fn apply_stage<F>(records: Vec<TranslationRecord>, predicate: F) -> Vec<TranslationRecord>
where
    F: Fn(&TranslationRecord) -> bool + Send + Sync,
{
    records.into_par_iter().filter(|record| predicate(record)).collect()
}

/// One step of a pipeline
#[derive(Debug, Clone)]
pub enum Stage {
    /// Drop records rejected by any rule
    Filter { name: String, rules: Vec<Rule> },
    /// Normalize both sides of every record
    Transform { name: String },
    /// Drop duplicates within each split
    Dedup { name: String, kind: DedupKind },
}

impl Stage {
    pub fn filter(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Stage::Filter {
            name: name.into(),
            rules,
        }
    }

    pub fn transform(name: impl Into<String>) -> Self {
        Stage::Transform { name: name.into() }
    }

    pub fn dedup(name: impl Into<String>, kind: DedupKind) -> Self {
        Stage::Dedup {
            name: name.into(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Stage::Filter { name, .. } | Stage::Transform { name } | Stage::Dedup { name, .. } => name,
        }
    }

    /// Run this stage, returning the survivors and how many records were
    /// excluded because a rule could not be evaluated
    pub fn apply(&self, records: Vec<TranslationRecord>) -> (Vec<TranslationRecord>, usize) {
        match self {
            Stage::Filter { name, rules } => {
                let errors = AtomicUsize::new(0);
                let kept = apply_stage(records, |record| match accepts_all(rules, record) {
                    Ok(keep) => keep,
                    Err(e) => {
                        warn!("Stage '{}' excluded record: {}", name, e);
                        errors.fetch_add(1, Ordering::Relaxed);
                        false
                    }
                });
                (kept, errors.into_inner())
            }
            Stage::Transform { .. } => {
                let transformed = records
                    .into_par_iter()
                    .map(|mut record| {
                        record.pt = normalize(&record.pt);
                        record.en = record.en.as_deref().map(normalize);
                        record
                    })
                    .collect();
                (transformed, 0)
            }
            Stage::Dedup { kind, .. } => (dedup::apply(records, *kind), 0),
        }
    }
}

/// Yield of a single stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub name: String,
    pub records_in: usize,
    pub records_out: usize,
    /// Records excluded because a required field was missing
    pub rule_errors: usize,
    /// Surviving records per domain
    pub by_domain: BTreeMap<Domain, usize>,
}

impl StageReport {
    fn new(name: &str, records_in: usize, survivors: &[TranslationRecord], rule_errors: usize) -> Self {
        let mut by_domain = BTreeMap::new();
        for record in survivors {
            *by_domain.entry(record.domain).or_insert(0) += 1;
        }
        Self {
            name: name.to_string(),
            records_in,
            records_out: survivors.len(),
            rule_errors,
            by_domain,
        }
    }

    /// Add the counts of the same stage run over another split
    pub fn absorb(&mut self, other: &StageReport) {
        self.records_in += other.records_in;
        self.records_out += other.records_out;
        self.rule_errors += other.rule_errors;
        for (domain, count) in &other.by_domain {
            *self.by_domain.entry(*domain).or_insert(0) += count;
        }
    }

    pub fn dropped(&self) -> usize {
        self.records_in - self.records_out
    }

    /// Log the stage yield, one line per domain
    pub fn log(&self) {
        info!(
            "{:<24} {:>9} -> {:>9} ({} dropped, {} rule errors)",
            self.name,
            self.records_in,
            self.records_out,
            self.dropped(),
            self.rule_errors
        );
        for (domain, count) in &self.by_domain {
            info!("    {:<15} {}", domain.as_str(), count);
        }
    }
}

/// Merge per-split report lists stage by stage
pub fn merge_reports(total: &mut Vec<StageReport>, reports: Vec<StageReport>) {
    if total.is_empty() {
        *total = reports;
        return;
    }
    for (acc, report) in total.iter_mut().zip(&reports) {
        acc.absorb(report);
    }
}

/// Ordered cascade of stages
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Run every stage in order
    pub fn run(&self, records: Vec<TranslationRecord>) -> (Vec<TranslationRecord>, Vec<StageReport>) {
        let mut reports = Vec::with_capacity(self.stages.len());
        let mut current = records;

        for stage in &self.stages {
            let records_in = current.len();
            let (next, rule_errors) = stage.apply(current);
            reports.push(StageReport::new(stage.name(), records_in, &next, rule_errors));
            current = next;
        }

        (current, reports)
    }
}
