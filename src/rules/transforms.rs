/*!
 * Normalizing text transforms.
 *
 * Each transform removes one category of noise and trims the result. Order
 * matters because some patterns nest inside others: a retweet marker embeds
 * a mention, and URLs may carry `#` fragments. `normalize` applies them in
 * the fixed order.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use super::patterns::{HASHTAG_REGEX, MENTION_REGEX, URL_REGEX};

static RETWEET_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"RT @(\w+):").expect("Invalid retweet regex")
});

/// Literature reference codes such as `COD _ L0009P0298X`
static CITATION_CODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"COD\s*_\s*[A-Z0-9]+\s*").expect("Invalid citation code regex")
});

static BULLET_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+\.\s+").expect("Invalid bullet regex")
});

/// Forum quote headers such as `--- Citação de: x em 29 de Novembro ---`
static THREE_DASHES_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"---.*?---").expect("Invalid dashes regex")
});

/// Tags after which text from adjacent blocks would otherwise run together
const BLOCK_TAGS: [&str; 12] = ["p", "br", "div", "li", "tr", "td", "h1", "h2", "h3", "h4", "h5", "h6"];

/// A named transform, in application order
pub type Transform = (&'static str, fn(&str) -> String);

/// Every transform in the order `normalize` applies them
pub const TRANSFORMS: [Transform; 8] = [
    ("remove_retweets", remove_retweets),
    ("remove_mentions", remove_mentions),
    ("remove_hashtags", remove_hashtags),
    ("remove_urls", remove_urls),
    ("remove_html_tags", remove_html_tags),
    ("remove_citation_codes", remove_citation_codes),
    ("remove_bullets", remove_bullets),
    ("remove_three_dashes", remove_three_dashes),
];

/// Apply every transform in order
pub fn normalize(text: &str) -> String {
    TRANSFORMS
        .iter()
        .fold(text.to_string(), |current, (_, transform)| transform(&current))
}

pub fn remove_retweets(text: &str) -> String {
    RETWEET_REGEX.replace_all(text, "").trim().to_string()
}

pub fn remove_mentions(text: &str) -> String {
    MENTION_REGEX.replace_all(text, "").trim().to_string()
}

pub fn remove_hashtags(text: &str) -> String {
    HASHTAG_REGEX.replace_all(text, "").trim().to_string()
}

pub fn remove_urls(text: &str) -> String {
    URL_REGEX.replace_all(text, "").trim().to_string()
}

pub fn remove_citation_codes(text: &str) -> String {
    CITATION_CODE_REGEX.replace_all(text, "").trim().to_string()
}

/// Only a numbered bullet at the very start is removed
pub fn remove_bullets(text: &str) -> String {
    BULLET_REGEX.replace(text, "").trim().to_string()
}

pub fn remove_three_dashes(text: &str) -> String {
    THREE_DASHES_REGEX.replace_all(text, "").trim().to_string()
}

/// Extract the text content of an HTML fragment.
///
/// Walks the input once: markup between `<` and `>` is dropped (quoted
/// attribute values may contain `>`), `<script>`/`<style>` bodies are
/// skipped, and common character references are decoded. A `<` that cannot
/// start a tag is kept as text.
pub fn remove_html_tags(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut skip_until: Option<&'static str> = None;

    while let Some(ch) = chars.next() {
        match ch {
            '<' if chars.peek().is_some_and(|next| starts_tag(*next)) => {
                let Some(tag) = read_tag(&mut chars) else {
                    // no closing `>`: plain text
                    if skip_until.is_none() {
                        result.push('<');
                    }
                    continue;
                };
                let name = tag_name(&tag);

                if let Some(closing) = skip_until {
                    if name == closing {
                        skip_until = None;
                    }
                    continue;
                }
                if name == "script" {
                    skip_until = Some("/script");
                } else if name == "style" {
                    skip_until = Some("/style");
                } else if BLOCK_TAGS.contains(&name.trim_start_matches('/'))
                    && !result.is_empty()
                    && !result.ends_with(char::is_whitespace)
                {
                    result.push(' ');
                }
            }
            _ if skip_until.is_some() => {}
            '&' => result.push_str(&decode_entity(&mut chars)),
            _ => result.push(ch),
        }
    }

    result.trim().to_string()
}

fn starts_tag(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '/' || ch == '!' || ch == '?'
}

/// Consume a tag body up to its closing `>`, honoring quoted attributes.
///
/// Returns `None` and consumes nothing when the input ends before the tag
/// is closed.
fn read_tag(chars: &mut std::iter::Peekable<std::str::Chars>) -> Option<String> {
    let mut lookahead = chars.clone();
    let mut tag = String::new();
    let mut quote: Option<char> = None;

    while let Some(ch) = lookahead.next() {
        match (quote, ch) {
            (None, '>') => {
                *chars = lookahead;
                return Some(tag);
            }
            (None, '"' | '\'') => quote = Some(ch),
            (Some(open), _) if ch == open => quote = None,
            _ => {}
        }
        tag.push(ch);
    }

    None
}

fn tag_name(tag: &str) -> String {
    tag.split(|ch: char| ch.is_whitespace() || ch == '>')
        .next()
        .unwrap_or_default()
        .trim_end_matches('/')
        .to_ascii_lowercase()
}

/// Decode one character reference; the leading `&` is already consumed
fn decode_entity(chars: &mut std::iter::Peekable<std::str::Chars>) -> String {
    let mut entity = String::new();
    let mut terminated = false;

    for _ in 0..10 {
        match chars.peek() {
            Some(';') => {
                chars.next();
                terminated = true;
                break;
            }
            Some(&ch) if ch.is_ascii_alphanumeric() || ch == '#' => {
                entity.push(ch);
                chars.next();
            }
            _ => break,
        }
    }

    let decoded = match entity.as_str() {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        numeric if numeric.starts_with('#') => {
            let digits = &numeric[1..];
            let hex = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X'));
            let code = match hex {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => digits.parse::<u32>().ok(),
            };
            code.and_then(char::from_u32)
        }
        _ => None,
    };

    match (decoded, terminated) {
        (Some(ch), true) => ch.to_string(),
        (_, true) => format!("&{};", entity),
        (_, false) => format!("&{}", entity),
    }
}
