/*!
 * Tests for error types
 */

use ptradutor::corpus::{CorpusName, Domain, Split, Tier, TranslationRecord};
use ptradutor::errors::{AppError, NameError, RuleError, StoreError, TranslationError};

/// Test that unknown names are rejected with the matching variant
#[test]
fn test_nameParsing_unknownNames_shouldReturnNameErrors() {
    assert_eq!(
        "wikipedia".parse::<CorpusName>().unwrap_err(),
        NameError::UnknownCorpus("wikipedia".to_string())
    );
    assert!(matches!("sports".parse::<Domain>(), Err(NameError::UnknownDomain(_))));
    assert!(matches!("dev".parse::<Split>(), Err(NameError::UnknownSplit(_))));
    assert!(matches!("gold".parse::<Tier>(), Err(NameError::UnknownTier(_))));
}

/// Test that a missing translation surfaces as a rule error
#[test]
fn test_record_en_missing_shouldReturnMissingField() {
    let record = TranslationRecord::new(5, CorpusName::Frmt, Domain::Default, Split::Train, "Olá");
    assert_eq!(
        record.en().unwrap_err(),
        RuleError::MissingField { idx: 5, field: "en" }
    );
}

/// Test error conversion into the application error
#[test]
fn test_appError_from_shouldWrapEveryLayer() {
    let error: AppError = TranslationError::EmptyTranslation.into();
    assert!(matches!(error, AppError::Translation(_)));

    let error: AppError = StoreError::Persist {
        name: "s".to_string(),
        message: "disk full".to_string(),
    }
    .into();
    assert!(error.to_string().contains("disk full"));

    let error: AppError = NameError::UnknownTier("gold".to_string()).into();
    assert!(matches!(error, AppError::Name(_)));

    let error: AppError = std::io::Error::other("boom").into();
    assert!(matches!(error, AppError::File(_)));
}

/// Test API error display
#[test]
fn test_translationError_display_shouldIncludeStatus() {
    let error = TranslationError::ApiError {
        status_code: 503,
        message: "overloaded".to_string(),
    };
    assert_eq!(error.to_string(), "API responded with error: 503 - overloaded");
}
