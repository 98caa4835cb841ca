/*!
 * Error types for the ptradutor pipeline.
 *
 * This module contains custom error types for the different layers of the
 * pipeline, using the thiserror crate for ergonomic error definitions.
 * Per-item translation errors and rule errors are recoverable; store and
 * naming errors abort the run.
 */

use thiserror::Error;

/// Errors returned by a translation backend for a single text
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The backend answered with nothing usable
    #[error("Empty translation returned")]
    EmptyTranslation,
}

/// Errors raised while evaluating a rule on a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// A field the rule needs is absent from the record
    #[error("Record {idx} is missing required field '{field}'")]
    MissingField { idx: u64, field: &'static str },
}

/// Errors from the durable translation store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the store file failed
    #[error("Store I/O error for '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The persisted state could not be (de)serialized
    #[error("Store serialization error for '{name}': {source}")]
    Serde {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The temporary checkpoint could not be swapped into place
    #[error("Failed to persist checkpoint for '{name}': {message}")]
    Persist { name: String, message: String },
}

/// Errors for names that are not part of the closed vocabularies
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("Dataset {0} not found")]
    UnknownCorpus(String),

    #[error("Unknown domain: {0}")]
    UnknownDomain(String),

    #[error("Unknown split: {0}")]
    UnknownSplit(String),

    #[error("Unknown tier: {0} (expected raw, clean or superclean)")]
    UnknownTier(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from the translation store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Unknown corpus, domain, split or tier
    #[error("Name error: {0}")]
    Name(#[from] NameError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
