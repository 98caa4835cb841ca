/*!
 * Boolean text-quality predicates.
 *
 * Every predicate is a pure function over a single string (or a string pair
 * for the ratio check in `length`). They are the building blocks of the
 * filter stages in `pipeline`.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Any opening tag, closing tag or self-closing tag
pub(crate) static HTML_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]+>").expect("Invalid HTML regex")
});

/// Web address with an optional scheme and a 2 to 6 letter extension
pub(crate) static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"((http|https)://)?[a-zA-Z0-9./?:@\-_=\#]+\.([a-zA-Z]){2,6}([a-zA-Z0-9.\&/?:@\-_=\#…])*",
    )
    .expect("Invalid URL regex")
});

pub(crate) static HASHTAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\#(\w+)").expect("Invalid hashtag regex")
});

pub(crate) static MENTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@(\w+)").expect("Invalid mention regex")
});

/// Scraped navigation and licensing boilerplate found at the start of web text
pub const INVALID_START: [&str; 6] = [
    "List of recent changes",
    "Sort by",
    "Home |",
    "> Home",
    "useful tips",
    "Licenses:",
];

/// Separators that only show up in menus, bylines and breadcrumbs
pub const INVALID_MIDDLE: [&str; 3] = [" @ ", " / ", " | "];

/// Endings of truncated excerpts and dangling separators
pub const INVALID_END: [&str; 6] = ["...", "…", "[...]", "(...)", " -", "/"];

pub const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Accented Latin letters accepted besides ASCII alphanumerics
const VALID_LETTERS: &str = "àáâãåāèéêëěėēîïíìįīĵłñńôöòóøōõšśûüùúūÿýžźżçćčäß";

/// Typographic punctuation and symbols accepted besides ASCII punctuation
const VALID_SYMBOLS: &str = "“”‘’«»–—…ºª°€£§¿¡·•´";

pub fn has_hashtag(text: &str) -> bool {
    HASHTAG_REGEX.is_match(text)
}

/// A bare `@` is not a mention
pub fn has_mention(text: &str) -> bool {
    MENTION_REGEX.is_match(text)
}

pub fn has_url(text: &str) -> bool {
    URL_REGEX.is_match(text)
}

pub fn has_html_tags(text: &str) -> bool {
    HTML_REGEX.is_match(text)
}

/// Case-insensitive prefix test against the English month names
pub fn starts_with_month(text: &str) -> bool {
    let lower = text.to_lowercase();
    MONTHS.iter().any(|month| lower.starts_with(month))
}

pub fn is_unfinished(text: &str) -> bool {
    text.contains("[...]") || text.contains("(...)")
}

pub fn is_pagination(text: &str) -> bool {
    text.contains("Results/Page")
}

/// Whether any whitespace separated token is longer than `max_len` characters
pub fn has_too_long_word(text: &str, max_len: usize) -> bool {
    text.split_whitespace().any(|word| word.chars().count() > max_len)
}

pub fn has_invalid_start(text: &str) -> bool {
    INVALID_START.iter().any(|start| text.starts_with(start))
}

pub fn has_invalid_middle(text: &str) -> bool {
    INVALID_MIDDLE.iter().any(|middle| text.contains(middle))
}

pub fn has_invalid_end(text: &str) -> bool {
    INVALID_END.iter().any(|end| text.ends_with(end))
}

pub fn has_more_than_three_points(text: &str) -> bool {
    text.contains("....")
}

/// Round, square and curly brackets each open as often as they close
pub fn has_valid_brackets(text: &str) -> bool {
    [('(', ')'), ('[', ']'), ('{', '}')]
        .iter()
        .all(|(open, close)| count_char(text, *open) == count_char(text, *close))
}

/// Straight double quotes come in pairs and curly quotes are balanced
pub fn has_valid_quotes(text: &str) -> bool {
    count_char(text, '"') % 2 == 0 && count_char(text, '“') == count_char(text, '”')
}

pub fn is_empty(text: &str) -> bool {
    text.is_empty()
}

/// True when some character is neither a letter or digit of the accepted
/// alphabets, whitespace, nor common punctuation
pub fn has_invalid_character(text: &str) -> bool {
    !text.chars().all(is_valid_character)
}

fn is_valid_character(ch: char) -> bool {
    if ch.is_ascii_alphanumeric() || ch.is_whitespace() || ch.is_ascii_punctuation() {
        return true;
    }
    if VALID_SYMBOLS.contains(ch) {
        return true;
    }
    ch.to_lowercase().all(|lower| VALID_LETTERS.contains(lower))
}

fn count_char(text: &str, target: char) -> usize {
    text.chars().filter(|ch| *ch == target).count()
}
