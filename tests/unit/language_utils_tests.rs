/*!
 * Tests for ISO language code utilities
 */

use ptradutor::language_utils::{get_language_name, language_codes_match, normalize_to_part2t};

/// Test normalization of both code lengths
#[test]
fn test_normalizeToPart2t_shouldAcceptBothForms() {
    assert_eq!(normalize_to_part2t("pt").unwrap(), "por");
    assert_eq!(normalize_to_part2t(" EN ").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert!(normalize_to_part2t("portuguese").is_err());
}

/// Test that code comparison ignores the code form
#[test]
fn test_languageCodesMatch_withMixedForms_shouldMatch() {
    assert!(language_codes_match("pt", "POR"));
    assert!(!language_codes_match("pt", "es"));
}

/// Test English language names
#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("pt").unwrap(), "Portuguese");
    assert_eq!(get_language_name("eng").unwrap(), "English");
}
