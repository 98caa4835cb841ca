use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_config::TranslationConfig;
use crate::errors::TranslationError;
use crate::providers::Translator;

/// Ollama client for the generate endpoint
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Generated text
    #[serde(default)]
    pub response: String,
    /// Whether the generation is complete
    #[serde(default = "default_done")]
    pub done: bool,
}

fn default_done() -> bool {
    true
}

impl GenerationRequest {
    /// Create a new non-streaming generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: Some(false),
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        match &mut self.options {
            Some(options) => options.temperature = Some(temperature),
            None => {
                self.options = Some(GenerationOptions {
                    temperature: Some(temperature),
                })
            }
        }
        self
    }
}

/// Parse a generate response body.
///
/// The endpoint answers with a single JSON object when streaming is off,
/// but some server versions still stream JSON lines; in that case the
/// `response` pieces of every line are concatenated.
pub fn parse_generation_response(body: &str) -> Result<GenerationResponse, TranslationError> {
    if let Ok(response) = serde_json::from_str::<GenerationResponse>(body) {
        return Ok(response);
    }

    let mut model = String::new();
    let mut full_response = String::new();
    let mut done = false;
    let mut parsed_any = false;

    for line in body.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(line) else {
            continue;
        };
        parsed_any = true;
        if let Some(part) = value.get("response").and_then(|v| v.as_str()) {
            full_response.push_str(part);
        }
        if let Some(name) = value.get("model").and_then(|v| v.as_str()) {
            model = name.to_string();
        }
        done |= value.get("done").and_then(|v| v.as_bool()).unwrap_or(false);
    }

    if !parsed_any {
        let preview: String = body.chars().take(500).collect();
        return Err(TranslationError::ParseError(format!(
            "Response contains invalid JSON: {}",
            preview
        )));
    }

    Ok(GenerationResponse {
        model,
        response: full_response,
        done,
    })
}

impl Ollama {
    /// Create a client for `endpoint` (e.g. `http://localhost:11434`)
    ///
    /// Ollama speaks HTTP/1.1; connections are pooled so concurrent workers
    /// reuse them.
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64, max_retries: u32, backoff_base_ms: u64) -> Self {
        let base_url = endpoint.into().trim_end_matches('/').to_string();

        Self {
            base_url,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .http1_only()
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
        }
    }

    /// URL of the generate endpoint
    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.backoff_base_ms.saturating_mul(1u64 << shift))
    }

    /// Generate text with retry logic
    ///
    /// Server and network errors are retried with exponential backoff;
    /// client errors are returned immediately.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, TranslationError> {
        let url = self.generate_url();

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            match self.client.post(&url).json(request).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response.text().await.map_err(|e| {
                            TranslationError::RequestFailed(format!("Failed to get response text: {}", e))
                        })?;
                        return parse_generation_response(&body);
                    }

                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to get error response text".to_string());

                    if status.as_u16() == 429 {
                        last_error = Some(TranslationError::RateLimitExceeded(error_text));
                    } else if status.is_server_error() {
                        error!(
                            "Ollama API error ({}): {} - attempt {}/{}",
                            status,
                            error_text,
                            attempt + 1,
                            self.max_retries + 1
                        );
                        last_error = Some(TranslationError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                    } else {
                        error!("Ollama API error ({}): {}", status, error_text);
                        return Err(TranslationError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                    }
                }
                Err(e) => {
                    error!(
                        "Ollama API network error: {} - attempt {}/{}",
                        e,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(TranslationError::ConnectionError(e.to_string()));
                }
            }

            attempt += 1;

            if attempt <= self.max_retries {
                tokio::time::sleep(self.backoff_delay(attempt)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            TranslationError::RequestFailed(format!(
                "Ollama API request failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }
}

/// Translator backed by a local Ollama model
#[derive(Debug)]
pub struct OllamaTranslator {
    client: Ollama,
    model: String,
    system_prompt: String,
    temperature: f32,
}

impl OllamaTranslator {
    pub fn new(client: Ollama, model: impl Into<String>, system_prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            client,
            model: model.into(),
            system_prompt: system_prompt.into(),
            temperature,
        }
    }

    pub fn from_config(config: &TranslationConfig) -> Self {
        let client = Ollama::new(
            config.endpoint.clone(),
            config.timeout_secs,
            config.common.retry_count,
            config.common.retry_backoff_ms,
        );
        Self::new(
            client,
            config.model.clone(),
            config.common.system_prompt.clone(),
            config.common.temperature,
        )
    }

    /// Fill the language placeholders of the system prompt
    pub fn render_system_prompt(&self, source_language: &str, target_language: &str) -> String {
        let source_name = crate::language_utils::get_language_name(source_language)
            .unwrap_or_else(|_| source_language.to_string());
        let target_name = crate::language_utils::get_language_name(target_language)
            .unwrap_or_else(|_| target_language.to_string());

        self.system_prompt
            .replace("{source_language}", &source_name)
            .replace("{target_language}", &target_name)
    }
}

#[async_trait]
impl Translator for OllamaTranslator {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let request = GenerationRequest::new(&self.model, text)
            .system(self.render_system_prompt(source_language, target_language))
            .temperature(self.temperature);

        let response = self.client.generate(&request).await?;
        let translation = response.response.trim().to_string();
        debug!("Ollama ({}) translated {} chars", response.model, translation.chars().count());

        if translation.is_empty() {
            return Err(TranslationError::EmptyTranslation);
        }
        Ok(translation)
    }
}
