/*!
 * Mock translator for testing.
 *
 * This module provides a translator that simulates different behaviors:
 * - `MockTranslator::working()` - Always succeeds with a tagged translation
 * - `MockTranslator::intermittent(n)` - Fails every n-th request
 * - `MockTranslator::failing()` - Always fails with an error
 * - `MockTranslator::empty()` - Answers with an empty translation
 * - `MockTranslator::slow(ms)` - Succeeds after a delay
 *
 * Clones share their counters and call log, so a test can hand a clone to
 * the orchestrator and inspect the original afterwards.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::TranslationError;
use crate::providers::Translator;

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails every Nth request
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns an empty translation
    Empty,
    /// Succeeds after a delay
    Slow { delay_ms: u64 },
}

/// Mock translator for testing orchestration behavior
#[derive(Debug)]
pub struct MockTranslator {
    behavior: MockBehavior,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
    /// Requests currently running
    in_flight: Arc<AtomicUsize>,
    /// Highest number of simultaneous requests seen
    max_in_flight: Arc<AtomicUsize>,
    /// Texts received, in call order
    calls: Arc<Mutex<Vec<String>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&str) -> String>,
}

impl MockTranslator {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent {
            fail_every: fail_every.max(1),
        })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set a custom response generator
    ///
    /// An empty generated string is reported as an empty translation.
    pub fn with_custom_response(mut self, generator: fn(&str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Highest number of requests that were running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Texts received so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn respond(&self, text: &str, target_language: &str) -> Result<String, TranslationError> {
        let translation = match self.custom_response {
            Some(generator) => generator(text),
            None => format!("[TRANSLATED to {}] {}", target_language, text),
        };
        if translation.trim().is_empty() {
            return Err(TranslationError::EmptyTranslation);
        }
        Ok(translation)
    }
}

impl Clone for MockTranslator {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            in_flight: Arc::clone(&self.in_flight),
            max_in_flight: Arc::clone(&self.max_in_flight),
            calls: Arc::clone(&self.calls),
            custom_response: self.custom_response,
        }
    }
}

/// Decrements the in-flight counter when a request finishes
struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        _source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push(text.to_string());

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        let _guard = InFlightGuard(&self.in_flight);

        match self.behavior {
            MockBehavior::Working => self.respond(text, target_language),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(TranslationError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    self.respond(text, target_language)
                }
            }

            MockBehavior::Failing => Err(TranslationError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Empty => Err(TranslationError::EmptyTranslation),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                self.respond(text, target_language)
            }
        }
    }
}
