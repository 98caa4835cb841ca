/*!
 * Subword tokenization used for length measurement.
 *
 * Token-count bounds are measured with an injected `Tokenizer`, built once
 * and shared read-only by every worker. The bundled `BpeTokenizer` wraps a
 * byte-level BPE vocabulary from `tiktoken-rs`.
 */

use anyhow::{Context, Result, anyhow};
use tiktoken_rs::{CoreBPE, cl100k_base, get_bpe_from_model, o200k_base};

/// Default minimum number of tokens of a pair
pub const MIN_N_TOKENS: usize = 10;

/// Default maximum number of tokens of a pair
pub const MAX_N_TOKENS: usize = 900;

/// Encoding used when the configuration names none
pub const DEFAULT_ENCODING: &str = "cl100k_base";

/// Upper bound of characters per token used for the cheap pre-check
const CHARS_PER_TOKEN_BOUND: usize = 8;

/// Anything that maps text to a sequence of token ids
pub trait Tokenizer: Send + Sync {
    /// Encode `text` into token ids
    fn encode(&self, text: &str) -> Vec<u32>;

    /// Number of tokens of `text`
    fn count(&self, text: &str) -> usize {
        self.encode(text).len()
    }
}

/// Byte-level BPE tokenizer
pub struct BpeTokenizer {
    name: String,
    bpe: CoreBPE,
}

impl std::fmt::Debug for BpeTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BpeTokenizer").field("name", &self.name).finish()
    }
}

impl BpeTokenizer {
    /// Load the vocabulary of a model name ("gpt-4") or an encoding name
    /// ("cl100k_base", "o200k_base"), case-insensitive
    pub fn new(model_or_encoding: &str) -> Result<Self> {
        let lower = model_or_encoding.trim().to_ascii_lowercase();

        let bpe = match get_bpe_from_model(&lower) {
            Ok(bpe) => bpe,
            Err(_) => match lower.as_str() {
                "o200k_base" => o200k_base().context("Failed to load o200k_base")?,
                "cl100k_base" => cl100k_base().context("Failed to load cl100k_base")?,
                _ => return Err(anyhow!("Unsupported model or encoding: {}", model_or_encoding)),
            },
        };

        Ok(Self { name: lower, bpe })
    }

    /// The default `cl100k_base` tokenizer
    pub fn cl100k() -> Result<Self> {
        Self::new(DEFAULT_ENCODING)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Tokenizer for BpeTokenizer {
    fn encode(&self, text: &str) -> Vec<u32> {
        self.bpe.encode_ordinary(text).into_iter().map(|id| id as u32).collect()
    }

    fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

/// Inclusive token-count bounds with a character-length pre-check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenBounds {
    pub min: usize,
    pub max: usize,
    /// Texts longer than this many characters are rejected without tokenizing
    pub max_chars: usize,
}

impl Default for TokenBounds {
    fn default() -> Self {
        Self::new(MIN_N_TOKENS, MAX_N_TOKENS)
    }
}

impl TokenBounds {
    pub fn new(min: usize, max: usize) -> Self {
        Self {
            min,
            max,
            max_chars: max.saturating_mul(CHARS_PER_TOKEN_BOUND),
        }
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }
}

/// Whether the tokenized length of `text` lies within `bounds`.
///
/// Every token covers at least one character, so texts shorter than
/// `bounds.min` characters cannot reach the minimum and are rejected
/// without tokenizing; oversized texts are rejected the same way.
pub fn valid_token_count(tokenizer: &dyn Tokenizer, text: &str, bounds: &TokenBounds) -> bool {
    let n_chars = text.chars().count();
    if n_chars < bounds.min || n_chars > bounds.max_chars {
        return false;
    }
    let n_tokens = tokenizer.count(text);
    bounds.min <= n_tokens && n_tokens <= bounds.max
}
