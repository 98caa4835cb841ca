/*!
 * Tests for the text-quality rule library
 */

use ptradutor::rules::{
    self, BpeTokenizer, RatioBounds, TokenBounds, Tokenizer, bad_translation, bad_translation_with,
    normalize, valid_token_count,
};

use crate::common::{GOOD_EN, GOOD_PT};

/// Test that normalizing twice gives the same text as normalizing once
#[test]
fn test_normalize_appliedTwice_shouldBeIdempotent() {
    let inputs = [
        "RT @user: Check this out #cool https://t.co/abc",
        "1. Primeiro ponto da lista",
        "<p>Olá &amp; adeus</p><script>x()</script>",
        "--- citação --- COD_ABC123 texto",
        GOOD_PT,
    ];

    for input in inputs {
        let once = normalize(input);
        assert_eq!(normalize(&once), once, "normalize not idempotent for {:?}", input);
    }
}

/// Test that the social media noise is removed without leaving punctuation behind
#[test]
fn test_normalize_tweet_shouldKeepOnlyProse() {
    let text = "RT @jornal: Novo orçamento aprovado #politica https://example.com/artigo";
    assert_eq!(normalize(text), "Novo orçamento aprovado");
}

/// Test the predicates on a clean sentence
#[test]
fn test_predicates_cleanSentence_shouldAllPass() {
    assert!(!rules::starts_with_month(GOOD_PT));
    assert!(!rules::is_unfinished(GOOD_PT));
    assert!(!rules::is_pagination(GOOD_PT));
    assert!(!rules::has_too_long_word(GOOD_PT, 20));
    assert!(!rules::has_invalid_start(GOOD_PT));
    assert!(!rules::has_invalid_middle(GOOD_PT));
    assert!(!rules::has_invalid_end(GOOD_PT));
    assert!(!rules::has_more_than_three_points(GOOD_PT));
    assert!(!rules::has_invalid_character(GOOD_PT));
    assert!(rules::has_valid_brackets(GOOD_PT));
    assert!(rules::has_valid_quotes(GOOD_PT));
    assert!(!rules::is_empty(GOOD_PT));
}

/// Test the boilerplate predicates on scraped web text
#[test]
fn test_predicates_boilerplate_shouldBeDetected() {
    assert!(rules::has_invalid_start("Home | Notícias | Desporto"));
    assert!(rules::has_invalid_middle("Autor @ Jornal"));
    assert!(rules::has_invalid_end("E então ele disse que [...]"));
    assert!(rules::is_unfinished("Leia mais (...) no site"));
    assert!(rules::is_pagination("Results/Page 1 of 10"));
    assert!(rules::starts_with_month("MARCH 3, 2020: Eleições"));
    assert!(rules::has_more_than_three_points("Espera...."));
}

/// Test the length ratio band and its inclusive edges
#[test]
fn test_badTranslation_ratioBand_shouldBeInclusive() {
    assert!(!bad_translation(GOOD_PT, GOOD_EN));
    assert!(bad_translation(GOOD_PT, "Budget."));

    let bounds = RatioBounds {
        min_ratio: 0.5,
        max_ratio: 2.0,
    };
    assert!(!bad_translation_with("abcd", "ab", &bounds));
    assert!(!bad_translation_with("abcd", "abcdefgh", &bounds));
    assert!(bad_translation_with("abcd", "a", &bounds));
}

/// Test token bounds with the bundled tokenizer
#[test]
fn test_validTokenCount_withBpeTokenizer_shouldApplyBounds() {
    let tokenizer = BpeTokenizer::cl100k().unwrap();
    let bounds = TokenBounds::new(10, 900);
    let pair = format!("{} {}", GOOD_PT, GOOD_EN);

    assert!(tokenizer.count(&pair) >= 10);
    assert!(valid_token_count(&tokenizer, &pair, &bounds));
    assert!(!valid_token_count(&tokenizer, "Olá Hello", &bounds));
}

/// Test that a custom tokenizer can be injected
#[test]
fn test_validTokenCount_customTokenizer_shouldBeUsed() {
    struct WordTokenizer;

    impl Tokenizer for WordTokenizer {
        fn encode(&self, text: &str) -> Vec<u32> {
            text.split_whitespace().map(|_| 0).collect()
        }
    }

    let bounds = TokenBounds::new(2, 3);
    assert!(valid_token_count(&WordTokenizer, "um dois", &bounds));
    assert!(valid_token_count(&WordTokenizer, "um dois três", &bounds));
    assert!(!valid_token_count(&WordTokenizer, "um dois três quatro", &bounds));
    assert!(!valid_token_count(&WordTokenizer, "um", &bounds));
}
