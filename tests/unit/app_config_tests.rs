/*!
 * Tests for application configuration functionality
 */

use ptradutor::app_config::{Config, LogLevel, MAX_BATCH_SIZE, TranslationProvider};
use ptradutor::pipeline::RuleTarget;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "pt");
    assert_eq!(config.target_language, "en");
    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.translation.endpoint, "http://localhost:11434");
    assert_eq!(config.translation.common.retry_count, 3);
    assert_eq!(config.batch.batch_size, 1000);
    assert_eq!(config.batch.max_workers, 5);
    assert_eq!(config.filters.min_tokens, 10);
    assert_eq!(config.filters.max_tokens, 900);
    assert_eq!(config.filters.window_size, 60);
    assert_eq!(config.filters.clean_target, RuleTarget::Pt);
    assert_eq!(config.publish.train_chunks, 5);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    // Source must stay Portuguese
    config.source_language = "es".to_string();
    assert!(config.validate().is_err());
    config.source_language = "por".to_string();
    assert!(config.validate().is_ok());

    // Invalid target language
    config.target_language = "".to_string();
    assert!(config.validate().is_err());
    config.target_language = "en".to_string();

    // Batch size bounds are inclusive
    config.batch.batch_size = MAX_BATCH_SIZE;
    assert!(config.validate().is_ok());
    config.batch.batch_size = 0;
    assert!(config.validate().is_err());
    config.batch.batch_size = 1;

    // Token bounds must be ordered
    config.filters.min_tokens = 1000;
    assert!(config.validate().is_err());
    config.filters.min_tokens = 10;

    // Ratio bounds must be ordered
    config.filters.min_length_ratio = 1.5;
    assert!(config.validate().is_err());
    config.filters.min_length_ratio = 0.8;

    // Endpoint must be a URL
    config.translation.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
    config.translation.provider = TranslationProvider::Mock;
    assert!(config.validate().is_ok());
}

/// Test that a configuration survives a JSON round trip through conf.json
#[test]
fn test_config_serialization_shouldUseLowercaseNames() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Mock;
    config.filters.superclean_target = RuleTarget::En;

    let json = serde_json::to_string_pretty(&config).unwrap();
    assert!(json.contains("\"provider\": \"mock\""));
    assert!(json.contains("\"superclean_target\": \"en\""));

    let parsed: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.translation.provider, TranslationProvider::Mock);
    assert_eq!(parsed.filters.superclean_target, RuleTarget::En);
}

/// Test provider name parsing
#[test]
fn test_translationProvider_fromStr_shouldIgnoreCase() {
    assert_eq!("Ollama".parse::<TranslationProvider>().unwrap(), TranslationProvider::Ollama);
    assert_eq!("mock".parse::<TranslationProvider>().unwrap(), TranslationProvider::Mock);
    assert!("openai".parse::<TranslationProvider>().is_err());
}
