/*!
 * # PTradutor - Portuguese-English parallel corpus builder
 *
 * A Rust library for building a filtered Portuguese-English parallel corpus
 * by machine-translating Portuguese source corpora.
 *
 * ## Features
 *
 * - Load source corpora (pt_vid, frmt, dsl_tl) from local JSONL dumps
 * - Translate them through a pluggable backend (Ollama, mock)
 * - Resume interrupted runs from atomic per-batch checkpoints
 * - Filter translated pairs through text-quality heuristics
 * - Remove exact and near duplicates
 * - Publish raw, clean and superclean tiers as JSON Lines
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `corpus`: Records, source corpora and tiers
 * - `rules`: Text-quality predicates and normalizing transforms
 * - `pipeline`: Filter stages, deduplication and tier cascades
 * - `translation`: Resumable translation:
 *   - `translation::store`: Durable store of translated records
 *   - `translation::batch`: Batched, bounded-concurrency orchestration
 * - `providers`: Translator backends:
 *   - `providers::ollama`: Ollama API client
 *   - `providers::mock`: Scripted translator for tests
 * - `publish`: Raw tier assembly and publish targets
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod corpus;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod pipeline;
pub mod providers;
pub mod publish;
pub mod rules;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use corpus::{CorpusName, Domain, Split, Tier, TierDataset, TranslationRecord};
pub use errors::{AppError, NameError, RuleError, StoreError, TranslationError};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use pipeline::{Pipeline, TierBuilder};
pub use providers::Translator;
pub use translation::{BatchTranslator, RunSummary, TranslationStore};
