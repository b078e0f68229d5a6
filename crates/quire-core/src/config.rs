//! Configuration for content lookups.
//!
//! A [`Config`] is owned by the caller and passed by reference into every
//! top-level call; nothing in the crate keeps a copy between calls. It is
//! usually loaded from TOML and may be adjusted from the environment.
//!
//! ## Example Configuration File
//!
//! ```toml
//! content_root = "content"
//! excerpt_length = 400
//! page_sort_meta = "sort"
//! category_sort = true
//!
//! [variables]
//! base_url = "https://docs.example.com"
//! image_url = "https://docs.example.com/images"
//!
//! [variables.extra]
//! company = "Acme"
//! ```
//!
//! ## Environment Overrides
//!
//! | Variable | Field |
//! |----------|-------|
//! | `QUIRE_CONTENT_ROOT` | `content_root` |
//! | `QUIRE_EXCERPT_LENGTH` | `excerpt_length` |
//! | `QUIRE_PAGE_SORT_META` | `page_sort_meta` |
//! | `QUIRE_CATEGORY_SORT` | `category_sort` |
//!
//! ```rust
//! use quire_core::Config;
//!
//! let config = Config::from_toml_str("content_root = \"content\"\nexcerpt_length = 120")?;
//! assert_eq!(config.excerpt_length, 120);
//! assert_eq!(config.highlight_class, "search-query");
//! # Ok::<(), quire_core::Error>(())
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default maximum excerpt length in characters.
pub const DEFAULT_EXCERPT_LENGTH: usize = 400;

/// Default name of the per-directory category sort file.
pub const DEFAULT_CATEGORY_SORT_FILE: &str = "sort";

/// Default CSS class wrapped around highlighted query matches.
pub const DEFAULT_HIGHLIGHT_CLASS: &str = "search-query";

const ENV_CONTENT_ROOT: &str = "QUIRE_CONTENT_ROOT";
const ENV_EXCERPT_LENGTH: &str = "QUIRE_EXCERPT_LENGTH";
const ENV_PAGE_SORT_META: &str = "QUIRE_PAGE_SORT_META";
const ENV_CATEGORY_SORT: &str = "QUIRE_CATEGORY_SORT";

/// Settings shared by document loading, tree building and search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the content tree.
    pub content_root: PathBuf,

    /// Maximum excerpt length in characters, before the `...` marker.
    #[serde(default = "default_excerpt_length")]
    pub excerpt_length: usize,

    /// Metadata key whose integer value orders pages within a category.
    ///
    /// Unset means every page sorts as 0 and keeps path order.
    #[serde(default)]
    pub page_sort_meta: Option<String>,

    /// Whether categories read their order from a sort file.
    #[serde(default)]
    pub category_sort: bool,

    /// Name of the sort file looked up inside each category directory.
    #[serde(default = "default_category_sort_file")]
    pub category_sort_file: String,

    /// File extensions, without the dot, treated as documents.
    ///
    /// Matched case-insensitively.
    #[serde(default = "default_document_extensions")]
    pub document_extensions: Vec<String>,

    /// CSS class used when highlighting query matches in search excerpts.
    #[serde(default = "default_highlight_class")]
    pub highlight_class: String,

    /// Values substituted for `%placeholder%` tokens in document text.
    #[serde(default)]
    pub variables: ContentVariables,
}

/// Placeholder values substituted into document text before rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentVariables {
    /// Replaces `%base_url%`.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Replaces `%image_url%`.
    #[serde(default)]
    pub image_url: Option<String>,

    /// Additional `%name%` placeholders.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl ContentVariables {
    /// Every configured placeholder name with its value.
    pub fn placeholders(&self) -> impl Iterator<Item = (&str, &str)> {
        let builtin = [
            ("base_url", self.base_url.as_deref()),
            ("image_url", self.image_url.as_deref()),
        ];
        builtin
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .chain(self.extra.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

fn default_excerpt_length() -> usize {
    DEFAULT_EXCERPT_LENGTH
}

fn default_category_sort_file() -> String {
    DEFAULT_CATEGORY_SORT_FILE.to_string()
}

fn default_document_extensions() -> Vec<String> {
    vec!["md".to_string()]
}

fn default_highlight_class() -> String {
    DEFAULT_HIGHLIGHT_CLASS.to_string()
}

impl Config {
    /// Create a configuration for `content_root` with every other field at
    /// its default.
    pub fn new(content_root: impl Into<PathBuf>) -> Self {
        Self {
            content_root: content_root.into(),
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
            page_sort_meta: None,
            category_sort: false,
            category_sort_file: default_category_sort_file(),
            document_extensions: default_document_extensions(),
            highlight_class: default_highlight_class(),
            variables: ContentVariables::default(),
        }
    }

    /// Load and validate a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read, is not valid
    /// TOML, or fails [`Config::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the lookups rely on.
    ///
    /// `content_root` and `document_extensions` must not be empty.
    pub fn validate(&self) -> Result<()> {
        if self.content_root.as_os_str().is_empty() {
            return Err(Error::Config("content_root must not be empty".to_string()));
        }
        if self.document_extensions.is_empty() {
            return Err(Error::Config(
                "document_extensions must list at least one extension".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply `QUIRE_*` environment variables over the current values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides read through `lookup` instead of the process
    /// environment.
    ///
    /// Values that do not parse are ignored with a warning.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup(ENV_CONTENT_ROOT).filter(|v| !v.trim().is_empty()) {
            self.content_root = PathBuf::from(root);
        }

        if let Some(raw) = lookup(ENV_EXCERPT_LENGTH) {
            match raw.trim().parse::<usize>() {
                Ok(length) => self.excerpt_length = length,
                Err(e) => warn!(var = ENV_EXCERPT_LENGTH, value = %raw, "ignoring override: {e}"),
            }
        }

        if let Some(key) = lookup(ENV_PAGE_SORT_META) {
            let key = key.trim();
            self.page_sort_meta = (!key.is_empty()).then(|| key.to_string());
        }

        if let Some(raw) = lookup(ENV_CATEGORY_SORT) {
            match parse_flag(&raw) {
                Some(flag) => self.category_sort = flag,
                None => warn!(
                    var = ENV_CATEGORY_SORT,
                    value = %raw,
                    "ignoring override: not a boolean"
                ),
            }
        }
    }

    /// Set the excerpt length.
    #[must_use]
    pub fn with_excerpt_length(mut self, excerpt_length: usize) -> Self {
        self.excerpt_length = excerpt_length;
        self
    }

    /// Set the metadata key used to order pages.
    #[must_use]
    pub fn with_page_sort_meta(mut self, key: impl Into<String>) -> Self {
        self.page_sort_meta = Some(key.into());
        self
    }

    /// Enable or disable category sort files.
    #[must_use]
    pub fn with_category_sort(mut self, enabled: bool) -> Self {
        self.category_sort = enabled;
        self
    }

    /// Set the `%base_url%` value.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.variables.base_url = Some(base_url.into());
        self
    }

    /// Set the `%image_url%` value.
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.variables.image_url = Some(image_url.into());
        self
    }

    /// Whether `path` has one of the configured document extensions.
    pub fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.document_extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
