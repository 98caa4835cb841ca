/*!
 * Tier cascades.
 *
 * The clean tier applies the first-generation quality filter to the raw
 * tier; the superclean tier applies the canonical seven-stage cascade to
 * the clean tier. Both cascades are assembled from named rules so their
 * stage yields can be logged.
 */

use log::info;
use std::sync::Arc;

use super::dedup::DedupKind;
use super::stage::{Pipeline, Rule, RuleTarget, Stage, StageReport, merge_reports};
use crate::app_config::FilterConfig;
use crate::corpus::{Tier, TierDataset};
use crate::rules::{self, Tokenizer, valid_token_count};

/// Token-count bounds over `"{pt} {en}"`
fn token_count_rule(filters: &FilterConfig, tokenizer: Arc<dyn Tokenizer>) -> Rule {
    let bounds = filters.token_bounds();
    Rule::new("valid_token_count", move |record| {
        let pair = format!("{} {}", record.pt, record.en()?);
        Ok(valid_token_count(tokenizer.as_ref(), &pair, &bounds))
    })
}

/// First-generation cascade: normalize, then one quality filter whose
/// pattern rules inspect `filters.clean_target`
pub fn clean_pipeline(filters: &FilterConfig, tokenizer: Arc<dyn Tokenizer>) -> Pipeline {
    let target = filters.clean_target;
    let max_word_len = filters.clean_max_word_len;

    Pipeline::new()
        .stage(Stage::transform("transform"))
        .stage(Stage::filter(
            "quality",
            vec![
                Rule::reject_if("starts_with_month", target, rules::starts_with_month),
                Rule::reject_if("is_unfinished", target, rules::is_unfinished),
                Rule::reject_if("is_pagination", target, rules::is_pagination),
                Rule::reject_if("has_too_long_word", target, move |text| {
                    rules::has_too_long_word(text, max_word_len)
                }),
                Rule::reject_if("has_invalid_start", target, rules::has_invalid_start),
                Rule::reject_if("has_invalid_middle", target, rules::has_invalid_middle),
                token_count_rule(filters, tokenizer),
            ],
        ))
}

/// Canonical cascade: exact dedup, window dedup, transform, token bounds,
/// invalid characters, boilerplate patterns, miscellaneous checks
pub fn superclean_pipeline(filters: &FilterConfig, tokenizer: Arc<dyn Tokenizer>) -> Pipeline {
    let target = filters.superclean_target;
    let max_word_len = filters.superclean_max_word_len;
    let ratio_bounds = filters.ratio_bounds();

    Pipeline::new()
        .stage(Stage::dedup("drop_duplicates", DedupKind::Exact))
        .stage(Stage::dedup(
            "drop_duplicates_start_ends",
            DedupKind::Window(filters.window_size),
        ))
        .stage(Stage::transform("transform"))
        .stage(Stage::filter("max_tokens", vec![token_count_rule(filters, tokenizer)]))
        .stage(Stage::filter(
            "invalid_chars",
            vec![Rule::reject_if(
                "has_invalid_character",
                RuleTarget::Pt,
                rules::has_invalid_character,
            )],
        ))
        .stage(Stage::filter(
            "patterns",
            vec![
                Rule::reject_if("starts_with_month", target, rules::starts_with_month),
                Rule::reject_if("has_invalid_start", target, rules::has_invalid_start),
                Rule::reject_if("has_invalid_middle", target, rules::has_invalid_middle),
                Rule::reject_if("has_invalid_end", target, rules::has_invalid_end),
                Rule::reject_if("has_more_than_three_points", target, rules::has_more_than_three_points),
                Rule::reject_if("has_too_long_word", target, move |text| {
                    rules::has_too_long_word(text, max_word_len)
                }),
            ],
        ))
        .stage(Stage::filter(
            "misc",
            vec![
                Rule::reject_if("is_empty", RuleTarget::Pt, rules::is_empty),
                Rule::new("bad_translation", move |record| {
                    Ok(!rules::bad_translation_with(&record.pt, record.en()?, &ratio_bounds))
                }),
                Rule::require("has_valid_brackets", RuleTarget::Pt, rules::has_valid_brackets),
                Rule::require("has_valid_quotes", RuleTarget::Pt, rules::has_valid_quotes),
            ],
        ))
}

/// Derive `tier` from `source` by running `pipeline` on every split
pub fn build_tier(source: &TierDataset, tier: Tier, pipeline: &Pipeline) -> (TierDataset, Vec<StageReport>) {
    let mut reports = Vec::new();
    let derived = source.derive(tier, |split, records| {
        let (kept, split_reports) = pipeline.run(records.to_vec());
        info!("{} {}: {} -> {} records", tier, split, records.len(), kept.len());
        merge_reports(&mut reports, split_reports);
        kept
    });
    (derived, reports)
}

/// Builds the clean and superclean tiers with a shared tokenizer
pub struct TierBuilder {
    filters: FilterConfig,
    tokenizer: Arc<dyn Tokenizer>,
}

impl TierBuilder {
    pub fn new(filters: FilterConfig, tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self { filters, tokenizer }
    }

    pub fn clean(&self, raw: &TierDataset) -> (TierDataset, Vec<StageReport>) {
        let pipeline = clean_pipeline(&self.filters, Arc::clone(&self.tokenizer));
        build_tier(raw, Tier::Clean, &pipeline)
    }

    pub fn superclean(&self, clean: &TierDataset) -> (TierDataset, Vec<StageReport>) {
        let pipeline = superclean_pipeline(&self.filters, Arc::clone(&self.tokenizer));
        build_tier(clean, Tier::Superclean, &pipeline)
    }

    /// Build `tier` from the raw tier, going through every intermediate tier
    pub fn build(&self, raw: &TierDataset, tier: Tier) -> (TierDataset, Vec<StageReport>) {
        match tier {
            Tier::Raw => (raw.clone(), Vec::new()),
            Tier::Clean => self.clean(raw),
            Tier::Superclean => {
                let (clean, mut reports) = self.clean(raw);
                let (superclean, superclean_reports) = self.superclean(&clean);
                reports.extend(superclean_reports);
                (superclean, reports)
            }
        }
    }
}
