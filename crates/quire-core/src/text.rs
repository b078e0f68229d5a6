//! String normalization helpers.
//!
//! These turn free-form text into the tokens the rest of the crate relies on:
//! underscored metadata keys, dasherized CSS class fragments, human-readable
//! titles, and word-boundary excerpts. Every function is pure and safe on
//! multi-byte UTF-8 input.
//!
//! ```
//! use quire_core::text::{clean_token, humanize, titleize};
//!
//! assert_eq!(clean_token("Hello World", false), "hello-world");
//! assert_eq!(clean_token("Multi word", true), "multi_word");
//! assert_eq!(titleize(&humanize("some-example-file")), "Some Example File");
//! ```

use regex::Regex;
use std::sync::LazyLock;

/// Lowercase letter or digit directly followed by an uppercase run (`fooBar`).
#[allow(clippy::unwrap_used)]
static CAMEL_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z\d])([A-Z]+)").unwrap());

#[allow(clippy::unwrap_used)]
static DASH_OR_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-\s]+").unwrap());

#[allow(clippy::unwrap_used)]
static UPPERCASE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([A-Z])").unwrap());

#[allow(clippy::unwrap_used)]
static SEPARATOR_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_\s]+").unwrap());

#[allow(clippy::unwrap_used)]
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?[^>]+>").unwrap());

/// Convert text to `lower_snake_case`.
///
/// Splits camel-case boundaries, collapses runs of dashes and whitespace into a
/// single underscore, and lowercases the result.
///
/// ```
/// use quire_core::text::underscored;
///
/// assert_eq!(underscored("Multi word"), "multi_word");
/// assert_eq!(underscored("pageSort"), "page_sort");
/// assert_eq!(underscored("  some-key "), "some_key");
/// ```
pub fn underscored(text: &str) -> String {
    let split = CAMEL_BOUNDARY_RE.replace_all(text.trim(), "${1}_${2}");
    DASH_OR_SPACE_RE.replace_all(&split, "_").to_lowercase()
}

/// Convert text to `lower-kebab-case`.
///
/// Every uppercase letter starts a new segment, so `"HelloWorld"` becomes
/// `"-hello-world"`. Use [`clean_token`] for a token without edge dashes.
pub fn dasherize(text: &str) -> String {
    let marked = UPPERCASE_RE.replace_all(text.trim(), "-${1}");
    SEPARATOR_RUN_RE.replace_all(&marked, "-").to_lowercase()
}

/// Make a filesystem and CSS safe token out of arbitrary text.
///
/// Path separators become word breaks. With `use_underscore` the token is
/// underscored (metadata keys), otherwise dasherized with edge dashes removed
/// (category classes).
///
/// ```
/// use quire_core::text::clean_token;
///
/// assert_eq!(
///     clean_token("/some/directory-example/hello/", false),
///     "some-directory-example-hello"
/// );
/// assert_eq!(clean_token("with trailing space ", false), "with-trailing-space");
/// assert_eq!(
///     clean_token("/some/directory-example/underscores/", true),
///     "some_directory_example_underscores"
/// );
/// ```
pub fn clean_token(text: &str, use_underscore: bool) -> String {
    let spaced = text.replace('/', " ");
    let trimmed = spaced.trim();
    if use_underscore {
        underscored(trimmed)
    } else {
        dasherize(trimmed).trim_matches('-').to_string()
    }
}

/// Turn an identifier into a sentence-cased phrase.
///
/// `"some_example_file"` and `"some-example-file"` both become
/// `"Some example file"`. A trailing `_id` is dropped.
pub fn humanize(text: &str) -> String {
    let underscored = underscored(text);
    let stem = underscored.strip_suffix("_id").unwrap_or(&underscored);
    capitalize(stem.replace('_', " ").trim())
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Title-case every word.
///
/// The text is lowercased, then the first character of the string and every
/// character following whitespace or a dash is uppercased.
pub fn titleize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut capitalize_next = true;

    for c in text.to_lowercase().chars() {
        if capitalize_next && !c.is_whitespace() {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
        if c.is_whitespace() || c == '-' {
            capitalize_next = true;
        }
    }

    out
}

/// Remove every markup tag from `html`.
pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

/// Collapse every whitespace run into a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Truncate `text` to at most `max_chars` characters at a word boundary.
///
/// Text that already fits is returned unchanged. Otherwise the cut backs off
/// to the start of the word it would split, trailing whitespace is dropped and
/// `...` is appended. A single word longer than `max_chars` is cut hard.
///
/// ```
/// use quire_core::text::prune;
///
/// assert_eq!(prune("Hello world", 20), "Hello world");
/// assert_eq!(prune("Hello world, how are you", 8), "Hello...");
/// assert_eq!(prune("Hello world, how are you", 11), "Hello world...");
/// ```
pub fn prune(text: &str, max_chars: usize) -> String {
    let Some((cut, next)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };

    let head = &text[..cut];
    let splits_word = is_word_char(next) && head.chars().next_back().is_some_and(is_word_char);
    let head = if splits_word {
        head.rfind(|c: char| !is_word_char(c))
            .map_or(head, |pos| &head[..pos])
    } else {
        head
    };

    let pruned = format!("{}...", head.trim_end());
    if pruned.chars().count() >= text.chars().count() {
        text.to_string()
    } else {
        pruned
    }
}

/// Parse the leading integer of `value` the way lenient sort fields expect.
///
/// Leading whitespace and an optional sign are accepted, then digits up to the
/// first non-digit. `"4"`, `" 12 "` and `"3rd"` parse; `"abc"` and `""` do not.
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..digits_end].parse::<i64>().ok().map(|n| sign * n)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clean_token_dasherized() {
        assert_eq!(clean_token("Hello World", false), "hello-world");
        assert_eq!(
            clean_token("/some/directory-example/hello/", false),
            "some-directory-example-hello"
        );
        assert_eq!(clean_token("with trailing space ", false), "with-trailing-space");
    }

    #[test]
    fn test_clean_token_underscored() {
        assert_eq!(clean_token("also does underscores", true), "also_does_underscores");
        assert_eq!(
            clean_token("/some/directory-example/underscores/", true),
            "some_directory_example_underscores"
        );
        assert_eq!(clean_token("Title", true), "title");
    }

    #[test]
    fn test_underscored_camel_case() {
        assert_eq!(underscored("PicardyThird"), "picardy_third");
        assert_eq!(underscored("sortOrder"), "sort_order");
    }

    #[test]
    fn test_humanize_and_titleize() {
        assert_eq!(humanize("some-example-file"), "Some example file");
        assert_eq!(humanize("user_id"), "User");
        assert_eq!(titleize("some example file"), "Some Example File");
        assert_eq!(titleize("HELLO-world"), "Hello-World");
        assert_eq!(titleize(""), "");
    }

    #[test]
    fn test_strip_tags_and_collapse() {
        let html = "<h1>Title</h1>\n<p>Some <strong>bold</strong> text</p>\n";
        assert_eq!(collapse_whitespace(&strip_tags(html)), "Title Some bold text");
    }

    #[test]
    fn test_prune_word_boundary() {
        assert_eq!(prune("The quick brown fox", 12), "The quick...");
        assert_eq!(prune("The quick brown fox", 10), "The quick...");
        assert_eq!(prune("The quick brown fox", 100), "The quick brown fox");
        assert_eq!(prune("Supercalifragilistic", 5), "Super...");
    }

    #[test]
    fn test_prune_unicode() {
        let text = "日本語 のテキスト です";
        let pruned = prune(text, 5);
        assert!(pruned.ends_with("..."));
        assert!(pruned.starts_with("日本語"));
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("4"), Some(4));
        assert_eq!(parse_leading_int(" 12 "), Some(12));
        assert_eq!(parse_leading_int("3rd"), Some(3));
        assert_eq!(parse_leading_int("-2"), Some(-2));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
    }

    proptest! {
        #[test]
        fn prop_prune_is_bounded(text in "\\PC{0,200}", max in 0usize..120) {
            let pruned = prune(&text, max);
            let limit = max + 3;
            prop_assert!(pruned == text || pruned.chars().count() <= limit);
        }

        #[test]
        fn prop_clean_token_has_no_separators(text in "[A-Za-z0-9 /_-]{0,60}") {
            let token = clean_token(&text, false);
            prop_assert!(!token.contains('/'));
            prop_assert!(!token.contains(char::is_whitespace));
            prop_assert!(!token.starts_with('-') && !token.ends_with('-'));
        }

        #[test]
        fn prop_underscored_is_lowercase(text in "[A-Za-z0-9 -]{0,60}") {
            let key = underscored(&text);
            prop_assert_eq!(key.to_lowercase(), key.clone());
            prop_assert!(!key.contains(' ') && !key.contains('-'));
        }
    }
}
