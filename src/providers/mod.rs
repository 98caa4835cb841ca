/*!
 * Translator backends.
 *
 * This module contains the backends that turn one Portuguese text into
 * English:
 * - Ollama: local LLM server through its generate endpoint
 * - Mock: scripted behaviors for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::TranslationError;

pub mod mock;
pub mod ollama;

pub use mock::{MockBehavior, MockTranslator};
pub use ollama::{Ollama, OllamaTranslator};

/// Common trait for all translation backends
///
/// Implementations are shared read-only between concurrent workers, so a
/// single instance is built per run and handed out behind an `Arc`.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate `text` from `source_language` into `target_language`
    ///
    /// # Returns
    /// * `Result<String, TranslationError>` - The translation or the reason it failed
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError>;
}

/// Build the backend selected in the configuration
pub fn create_translator(config: &TranslationConfig) -> Arc<dyn Translator> {
    match config.provider {
        TranslationProvider::Ollama => Arc::new(OllamaTranslator::from_config(config)),
        TranslationProvider::Mock => Arc::new(MockTranslator::working()),
    }
}
