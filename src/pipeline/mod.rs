/*!
 * Filter pipeline over translation records.
 *
 * - `stage`: rules, stages, pipelines and stage reports
 * - `dedup`: exact and window-based duplicate removal
 * - `tiers`: the clean and superclean cascades
 */

pub mod dedup;
pub mod stage;
pub mod tiers;

pub use dedup::{DedupKind, drop_duplicates, drop_duplicates_start_ends};
pub use stage::{Pipeline, Rule, RuleTarget, Stage, StageReport, apply_stage};
pub use tiers::{TierBuilder, build_tier, clean_pipeline, superclean_pipeline};
