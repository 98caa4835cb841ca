/*!
 * Length-ratio sanity check between a text and its translation.
 *
 * This is a cheap heuristic, not a semantic check: a translation whose
 * character length falls outside a band around the source length is
 * flagged as suspicious.
 */

/// Default minimum length ratio (translation / source)
pub const DEFAULT_MIN_LENGTH_RATIO: f64 = 0.8;

/// Default maximum length ratio (translation / source)
pub const DEFAULT_MAX_LENGTH_RATIO: f64 = 1.2;

/// Inclusive band of acceptable length ratios
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioBounds {
    pub min_ratio: f64,
    pub max_ratio: f64,
}

impl Default for RatioBounds {
    fn default() -> Self {
        Self {
            min_ratio: DEFAULT_MIN_LENGTH_RATIO,
            max_ratio: DEFAULT_MAX_LENGTH_RATIO,
        }
    }
}

/// Calculate length ratio between translated and source text
pub fn calculate_ratio(source: &str, translated: &str) -> f64 {
    let source_len = source.chars().count();
    let translated_len = translated.chars().count();

    if source_len == 0 {
        if translated_len == 0 {
            1.0 // Both empty = ratio of 1
        } else {
            f64::INFINITY
        }
    } else {
        translated_len as f64 / source_len as f64
    }
}

/// Whether `en` is NOT within the default 80%-120% of the length of `pt`
pub fn bad_translation(pt: &str, en: &str) -> bool {
    bad_translation_with(pt, en, &RatioBounds::default())
}

/// `bad_translation` with explicit ratio bounds
pub fn bad_translation_with(pt: &str, en: &str, bounds: &RatioBounds) -> bool {
    let ratio = calculate_ratio(pt, en);
    !(bounds.min_ratio..=bounds.max_ratio).contains(&ratio)
}
