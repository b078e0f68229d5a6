//! Leading metadata blocks.
//!
//! A document may open with a block of `Key: Value` lines in one of two
//! syntaxes:
//!
//! ```text
//! /*
//! Title: Getting Started
//! Sort: 2
//! */
//! ```
//!
//! ```text
//! ---
//! Title: Getting Started
//! Sort: 2
//! ---
//! ```
//!
//! The opening `---` line is optional, so a run of `Key: Value` lines closed by
//! a `---` line is also a block. Only the first block at the very start of the
//! text counts; anything later is ordinary content.

use crate::config::ContentVariables;
use crate::text::{clean_token, parse_leading_int};
use serde::Serialize;
use std::collections::BTreeMap;

const BYTE_ORDER_MARK: char = '\u{feff}';
const COMMENT_OPEN: &str = "/*";
const COMMENT_CLOSE: &str = "*/";
const DASH_FENCE: &str = "---";
const PAIR_SEPARATOR: &str = ": ";

/// Metadata parsed from a document's leading block.
///
/// Keys are normalized to `lower_snake_case` (`"Multi word"` is stored as
/// `"multi_word"`), values are trimmed and never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    /// Look up a value by its normalized key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// The `title` entry, if present.
    pub fn title(&self) -> Option<&str> {
        self.get("title").filter(|title| !title.is_empty())
    }

    /// Integer value of `key`, for sort fields.
    ///
    /// The key is normalized the same way block keys are, so `"Sort Order"`
    /// finds an entry written as `Sort Order: 3`. Returns `None` when the entry
    /// is absent or does not start with an integer.
    pub fn sort_value(&self, key: &str) -> Option<i64> {
        self.get(&clean_token(key, true))
            .and_then(parse_leading_int)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the document declared no metadata.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Location of the leading block inside BOM-stripped text.
struct Block<'a> {
    /// Lines between the delimiters.
    inner: &'a str,
    /// Byte offset just past the closing delimiter.
    end: usize,
}

fn strip_bom(raw: &str) -> &str {
    raw.strip_prefix(BYTE_ORDER_MARK).unwrap_or(raw)
}

fn find_block(text: &str) -> Option<Block<'_>> {
    if text.starts_with(COMMENT_OPEN) {
        return find_comment_block(text);
    }
    find_dash_block(text)
}

fn find_comment_block(text: &str) -> Option<Block<'_>> {
    let close = text[COMMENT_OPEN.len()..].find(COMMENT_CLOSE)? + COMMENT_OPEN.len();
    Some(Block {
        inner: &text[COMMENT_OPEN.len()..close],
        end: close + COMMENT_CLOSE.len(),
    })
}

fn find_dash_block(text: &str) -> Option<Block<'_>> {
    let mut offset = 0;
    let mut start = None;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let content = line.trim_end();

        match start {
            // Blank lines before the block are allowed.
            None if content.is_empty() => {}
            None if content == DASH_FENCE => start = Some(offset),
            None => start = Some(line_start),
            Some(inner_start) if content == DASH_FENCE => {
                let inner = &text[inner_start..line_start];
                return inner
                    .lines()
                    .any(|l| parse_pair(l).is_some())
                    .then_some(Block { inner, end: offset });
            }
            Some(_) => {}
        }
    }

    None
}

fn parse_pair(line: &str) -> Option<(String, &str)> {
    let (key, value) = line.split_once(PAIR_SEPARATOR)?;
    let key = clean_token(key, true);
    let value = value.trim();
    (!key.is_empty() && !value.is_empty()).then_some((key, value))
}

/// Parse the leading metadata block of `raw`.
///
/// Text without a block yields empty metadata. Lines inside the block that
/// are not `Key: Value` pairs are ignored; when a key repeats, the last value
/// wins.
///
/// ```
/// use quire_core::meta::extract_meta;
///
/// let meta = extract_meta("/*\nTitle: Hello\nMulti word: Value\n*/\nBody");
/// assert_eq!(meta.title(), Some("Hello"));
/// assert_eq!(meta.get("multi_word"), Some("Value"));
/// assert!(extract_meta("no meta here").is_empty());
/// ```
pub fn extract_meta(raw: &str) -> Metadata {
    let Some(block) = find_block(strip_bom(raw)) else {
        return Metadata::default();
    };

    let entries = block
        .inner
        .lines()
        .filter_map(parse_pair)
        .map(|(key, value)| (key, value.to_string()))
        .collect();
    Metadata(entries)
}

/// Remove the leading metadata block from `raw` and trim the rest.
///
/// Later text that looks like a block is left alone.
///
/// ```
/// use quire_core::meta::strip_meta;
///
/// assert_eq!(strip_meta("/*\nTitle: Hello\n*/\nThis is the content"), "This is the content");
/// assert_eq!(strip_meta("This is the content"), "This is the content");
/// ```
pub fn strip_meta(raw: &str) -> String {
    let text = strip_bom(raw);
    let rest = find_block(text).map_or(text, |block| &text[block.end..]);
    rest.trim().to_string()
}

/// Replace `%name%` placeholders with configured values.
///
/// `%base_url%` and `%image_url%` are replaced when set, as is every entry of
/// [`ContentVariables::extra`]. Other `%tokens%` are left verbatim.
pub fn substitute_variables(text: &str, vars: &ContentVariables) -> String {
    let mut out = text.to_string();
    for (name, value) in vars.placeholders() {
        let token = format!("%{name}%");
        if out.contains(&token) {
            out = out.replace(&token, value);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const COMMENT_DOC: &str = "/*\n\
        Title: This is a title\n\
        Description: This is a description\n\
        Sort: 4\n\
        Multi word: Value\n\
        */\n";

    #[test]
    fn test_extract_comment_block() {
        // Given: A comment-style block with four entries
        // When: Extracting metadata
        let meta = extract_meta(COMMENT_DOC);

        // Then: Every key is normalized and every value trimmed
        assert_eq!(meta.len(), 4);
        assert_eq!(meta.title(), Some("This is a title"));
        assert_eq!(meta.get("description"), Some("This is a description"));
        assert_eq!(meta.get("sort"), Some("4"));
        assert_eq!(meta.get("multi_word"), Some("Value"));
    }

    #[test]
    fn test_extract_dash_block_without_opening_fence() {
        // Given: Key/value lines closed by a dash line, after a blank line
        let raw = "\nTitle: This is a title\n\
            Description: This is a description\n\
            Sort: 4\n\
            Multi word: Value\n\
            ---\n";

        // When: Extracting metadata
        let meta = extract_meta(raw);

        // Then: The block is recognized
        assert_eq!(meta.title(), Some("This is a title"));
        assert_eq!(meta.get("multi_word"), Some("Value"));
        assert_eq!(meta.sort_value("Sort"), Some(4));
    }

    #[test]
    fn test_extract_dash_block_with_fences() {
        let meta = extract_meta("---\nTitle: Fenced\n---\n# Heading\n");
        assert_eq!(meta.title(), Some("Fenced"));
        assert_eq!(strip_meta("---\nTitle: Fenced\n---\n# Heading\n"), "# Heading");
    }

    #[test]
    fn test_extract_strips_bom() {
        // Given: Both syntaxes prefixed with a byte-order mark
        let comment = "\u{feff}/*\nTitle: Example Page With BOM\n*/\nBody";
        let dash = "\u{feff}Title: Example Page With BOM for YAML\n---\nBody";

        // When/Then: The title is found in both
        assert_eq!(extract_meta(comment).title(), Some("Example Page With BOM"));
        assert_eq!(
            extract_meta(dash).title(),
            Some("Example Page With BOM for YAML")
        );
        assert_eq!(strip_meta(comment), "Body");
    }

    #[test]
    fn test_no_block() {
        assert!(extract_meta("no meta here").is_empty());
        assert!(extract_meta("").is_empty());
        assert!(extract_meta("/* never closed\nTitle: x").is_empty());
    }

    #[test]
    fn test_paragraph_before_rule_is_not_a_block() {
        // Given: Plain prose followed by a horizontal rule
        let raw = "Just an intro paragraph\n---\nMore text";

        // When/Then: Nothing is extracted and nothing is stripped
        assert!(extract_meta(raw).is_empty());
        assert_eq!(strip_meta(raw), raw);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let meta = extract_meta("/*\nTitle: Kept\nnot a pair\nEmpty: \n: orphan\n*/");
        assert_eq!(meta.len(), 1);
        assert_eq!(meta.title(), Some("Kept"));
    }

    #[test]
    fn test_value_keeps_later_separators() {
        let meta = extract_meta("/*\nDescription: ratio: 3: 1\n*/");
        assert_eq!(meta.get("description"), Some("ratio: 3: 1"));
    }

    #[test]
    fn test_strip_only_first_block() {
        // Given: Content followed by a second comment block
        let raw = format!("{COMMENT_DOC}This is the content/*\nTitle: This is a title\n*/");

        // When: Stripping
        let stripped = strip_meta(&raw);

        // Then: Only the leading block goes
        assert_eq!(
            stripped,
            "This is the content/*\nTitle: This is a title\n*/"
        );
    }

    #[test]
    fn test_strip_without_block_trims() {
        assert_eq!(strip_meta("  This is the content \n"), "This is the content");
    }

    #[test]
    fn test_sort_value() {
        let meta = extract_meta("/*\nSort Order: 3rd\nWeight: heavy\n*/");
        assert_eq!(meta.sort_value("Sort Order"), Some(3));
        assert_eq!(meta.sort_value("sort_order"), Some(3));
        assert_eq!(meta.sort_value("weight"), None);
        assert_eq!(meta.sort_value("missing"), None);
    }

    #[test]
    fn test_substitute_variables() {
        // Given: A base URL and an extra variable
        let mut vars = ContentVariables {
            base_url: Some("/base/url".to_string()),
            ..ContentVariables::default()
        };
        vars.extra.insert("company".to_string(), "Acme".to_string());

        // When: Substituting
        let out = substitute_variables(
            "This is some Markdown with a %base_url%. %company% %image_url% %unknown%",
            &vars,
        );

        // Then: Configured placeholders are replaced, others left alone
        assert_eq!(
            out,
            "This is some Markdown with a /base/url. Acme %image_url% %unknown%"
        );
    }

    #[test]
    fn test_metadata_serializes_as_map() {
        let meta = extract_meta(COMMENT_DOC);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["multi_word"], "Value");
    }

    proptest! {
        #[test]
        fn prop_extract_never_panics(raw in "\\PC{0,300}") {
            let meta = extract_meta(&raw);
            for (key, value) in meta.iter() {
                prop_assert!(!key.is_empty());
                prop_assert!(!value.is_empty());
            }
        }

        #[test]
        fn prop_comment_block_round_trip(
            title in "[A-Za-z][A-Za-z0-9 ]{0,30}[A-Za-z0-9]",
            body in "[A-Za-z0-9 .,]{0,80}",
        ) {
            let raw = format!("/*\nTitle: {title}\n*/\n{body}");
            let meta = extract_meta(&raw);
            prop_assert_eq!(meta.title(), Some(title.as_str()));
            prop_assert_eq!(strip_meta(&raw), body.trim());
        }
    }
}
