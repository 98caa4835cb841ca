/*!
 * Text-quality rule library.
 *
 * Independent, composable predicates and normalizing transforms over a
 * single string or a string pair:
 * - `patterns`: boilerplate, markup and character-set predicates
 * - `transforms`: noise-removing transforms and `normalize`
 * - `tokens`: tokenizer abstraction and token-count bounds
 * - `length`: length-ratio translation sanity check
 */

pub mod length;
pub mod patterns;
pub mod tokens;
pub mod transforms;

pub use length::{RatioBounds, bad_translation, bad_translation_with};
pub use patterns::{
    has_hashtag, has_html_tags, has_invalid_character, has_invalid_end, has_invalid_middle,
    has_invalid_start, has_mention, has_more_than_three_points, has_too_long_word, has_url,
    has_valid_brackets, has_valid_quotes, is_empty, is_pagination, is_unfinished,
    starts_with_month,
};
pub use tokens::{BpeTokenizer, TokenBounds, Tokenizer, valid_token_count};
pub use transforms::{
    normalize, remove_bullets, remove_citation_codes, remove_hashtags, remove_html_tags,
    remove_mentions, remove_retweets, remove_three_dashes, remove_urls,
};
