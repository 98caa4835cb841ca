use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

use crate::pipeline::RuleTarget;
use crate::rules::{RatioBounds, TokenBounds};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Data, corpus and publish directories
    #[serde(default)]
    pub paths: PathsConfig,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Batch orchestration config
    #[serde(default)]
    pub batch: BatchConfig,

    /// Quality filter thresholds
    #[serde(default)]
    pub filters: FilterConfig,

    /// Publish target config
    #[serde(default)]
    pub publish: PublishConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Ollama
    #[default]
    Ollama,
    // @provider: Offline echo backend
    Mock,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Ollama => "Ollama",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Ollama => "ollama".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Where the pipeline reads and writes its files
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PathsConfig {
    /// Directory of the translation stores; empty means the user data dir
    #[serde(default)]
    pub data_dir: String,

    /// Root of the source corpora dumps
    #[serde(default = "default_corpus_dir")]
    pub corpus_dir: String,

    /// Root of the published tiers
    #[serde(default = "default_publish_dir")]
    pub publish_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            corpus_dir: default_corpus_dir(),
            publish_dir: default_publish_dir(),
        }
    }
}

impl PathsConfig {
    /// Resolved store directory
    pub fn data_dir(&self) -> PathBuf {
        if !self.data_dir.is_empty() {
            return PathBuf::from(&self.data_dir);
        }
        dirs::data_local_dir()
            .map(|dir| dir.join("ptradutor"))
            .unwrap_or_else(|| PathBuf::from("data"))
    }

    pub fn corpus_dir(&self) -> PathBuf {
        PathBuf::from(&self.corpus_dir)
    }

    pub fn publish_dir(&self) -> PathBuf {
        PathBuf::from(&self.publish_dir)
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Model name (e.g., "llama3.1:8b")
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Service endpoint URL
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            model: default_ollama_model(),
            endpoint: default_ollama_endpoint(),
            timeout_secs: default_timeout_secs(),
            common: TranslationCommonConfig::default(),
        }
    }
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt template for translation
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    /// Lower values make output more deterministic, higher values more creative
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
        }
    }
}

/// Batch translation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BatchConfig {
    /// Records translated between two checkpoints
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Concurrent translation calls per batch, 0 for the whole batch
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Minimum spacing between dispatched translation calls in milliseconds
    #[serde(default)]
    pub pacing_delay_ms: u64,

    /// Whether to draw a progress bar
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_workers: default_max_workers(),
            pacing_delay_ms: 0,
            show_progress: true,
        }
    }
}

/// Thresholds of the clean and superclean cascades
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FilterConfig {
    /// Minimum tokens of "pt en"
    #[serde(default = "default_min_tokens")]
    pub min_tokens: usize,

    /// Maximum tokens of "pt en"
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// BPE model or encoding name used to count tokens
    #[serde(default = "default_tokenizer")]
    pub tokenizer: String,

    /// Character length above which the tokenizer is skipped; 0 derives it
    /// from `max_tokens`
    #[serde(default)]
    pub max_chars: usize,

    /// Longest word allowed in the clean tier
    #[serde(default = "default_clean_max_word_len")]
    pub clean_max_word_len: usize,

    /// Longest word allowed in the superclean tier
    #[serde(default = "default_superclean_max_word_len")]
    pub superclean_max_word_len: usize,

    /// Window length of near-duplicate detection
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Minimum en/pt length ratio
    #[serde(default = "default_min_length_ratio")]
    pub min_length_ratio: f64,

    /// Maximum en/pt length ratio
    #[serde(default = "default_max_length_ratio")]
    pub max_length_ratio: f64,

    /// Side(s) inspected by the clean tier pattern rules
    #[serde(default = "default_clean_target")]
    pub clean_target: RuleTarget,

    /// Side(s) inspected by the superclean tier pattern rules
    #[serde(default = "default_superclean_target")]
    pub superclean_target: RuleTarget,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_tokens: default_min_tokens(),
            max_tokens: default_max_tokens(),
            tokenizer: default_tokenizer(),
            max_chars: 0,
            clean_max_word_len: default_clean_max_word_len(),
            superclean_max_word_len: default_superclean_max_word_len(),
            window_size: default_window_size(),
            min_length_ratio: default_min_length_ratio(),
            max_length_ratio: default_max_length_ratio(),
            clean_target: default_clean_target(),
            superclean_target: default_superclean_target(),
        }
    }
}

impl FilterConfig {
    pub fn token_bounds(&self) -> TokenBounds {
        let bounds = TokenBounds::new(self.min_tokens, self.max_tokens);
        if self.max_chars > 0 {
            bounds.with_max_chars(self.max_chars)
        } else {
            bounds
        }
    }

    pub fn ratio_bounds(&self) -> RatioBounds {
        RatioBounds {
            min_ratio: self.min_length_ratio,
            max_ratio: self.max_length_ratio,
        }
    }
}

/// Publish target settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PublishConfig {
    /// Number of files the train split is chunked into
    #[serde(default = "default_train_chunks")]
    pub train_chunks: usize,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            train_chunks: default_train_chunks(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Largest accepted batch size
pub const MAX_BATCH_SIZE: usize = 10_000;

fn default_source_language() -> String {
    "pt".to_string()
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_corpus_dir() -> String {
    "data/corpora".to_string()
}

fn default_publish_dir() -> String {
    "data/hf".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_retry_count() -> u32 {
    3 // Default to 3 retries
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_temperature() -> f32 {
    0.0
}

fn default_true() -> bool {
    true
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.1:8b".to_string()
}

fn default_system_prompt() -> String {
    "You are a professional translator. Translate the following text from {source_language} to {target_language}. Answer with the translation only.".to_string()
}

fn default_batch_size() -> usize {
    1000
}

fn default_max_workers() -> usize {
    5
}

fn default_min_tokens() -> usize {
    crate::rules::tokens::MIN_N_TOKENS
}

fn default_tokenizer() -> String {
    crate::rules::tokens::DEFAULT_ENCODING.to_string()
}

fn default_max_tokens() -> usize {
    crate::rules::tokens::MAX_N_TOKENS
}

fn default_clean_max_word_len() -> usize {
    30
}

fn default_superclean_max_word_len() -> usize {
    20
}

fn default_window_size() -> usize {
    crate::pipeline::dedup::DEFAULT_WINDOW
}

fn default_min_length_ratio() -> f64 {
    crate::rules::length::DEFAULT_MIN_LENGTH_RATIO
}

fn default_max_length_ratio() -> f64 {
    crate::rules::length::DEFAULT_MAX_LENGTH_RATIO
}

fn default_clean_target() -> RuleTarget {
    RuleTarget::Pt
}

fn default_superclean_target() -> RuleTarget {
    RuleTarget::Both
}

fn default_train_chunks() -> usize {
    5
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;
        if !crate::language_utils::language_codes_match(&self.source_language, "pt") {
            return Err(anyhow!(
                "Source language must be Portuguese, got '{}'",
                self.source_language
            ));
        }

        if self.batch.batch_size == 0 || self.batch.batch_size > MAX_BATCH_SIZE {
            return Err(anyhow!(
                "Batch size must be between 1 and {}, got {}",
                MAX_BATCH_SIZE,
                self.batch.batch_size
            ));
        }

        let filters = &self.filters;
        if filters.min_tokens > filters.max_tokens {
            return Err(anyhow!(
                "Minimum token count {} exceeds maximum {}",
                filters.min_tokens,
                filters.max_tokens
            ));
        }
        if filters.tokenizer.trim().is_empty() {
            return Err(anyhow!("Tokenizer name must not be empty"));
        }
        if filters.window_size == 0 {
            return Err(anyhow!("Dedup window size must be positive"));
        }
        if filters.min_length_ratio < 0.0 || filters.min_length_ratio > filters.max_length_ratio {
            return Err(anyhow!(
                "Invalid length ratio bounds [{}, {}]",
                filters.min_length_ratio,
                filters.max_length_ratio
            ));
        }

        if self.publish.train_chunks == 0 {
            return Err(anyhow!("Train split must be published in at least one chunk"));
        }

        if self.translation.provider == TranslationProvider::Ollama {
            url::Url::parse(&self.translation.endpoint)
                .map_err(|e| anyhow!("Invalid endpoint '{}': {}", self.translation.endpoint, e))?;
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            paths: PathsConfig::default(),
            translation: TranslationConfig::default(),
            batch: BatchConfig::default(),
            filters: FilterConfig::default(),
            publish: PublishConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
