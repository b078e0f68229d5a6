//! Loading a single document.
//!
//! Loading reads the file, pulls out its metadata block, substitutes content
//! variables, renders the remainder and derives a plain-text excerpt. Nothing
//! is cached: every call reads the file again.

use crate::config::Config;
use crate::meta::{extract_meta, strip_meta, substitute_variables};
use crate::render::Renderer;
use crate::slug::{path_to_slug, slug_to_title};
use crate::text::{collapse_whitespace, prune, strip_tags};
use crate::{Error, Result};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// A fully loaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Slug without a leading slash; `index` documents take their directory's slug.
    pub slug: String,
    /// Metadata title, or one derived from the slug.
    pub title: String,
    /// Rendered body.
    pub body: String,
    /// Plain-text summary of the body.
    pub excerpt: String,
}

/// Read `path` as UTF-8 text.
///
/// A missing file is [`Error::NotFound`], text that is not UTF-8 is
/// [`Error::Parse`].
pub(crate) fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::NotFound(path.display().to_string()),
        _ => Error::Io(e),
    })?;
    String::from_utf8(bytes)
        .map_err(|e| Error::Parse(format!("{} is not valid UTF-8: {e}", path.display())))
}

/// Plain-text excerpt of rendered markup, at most `max_chars` characters
/// plus the `...` marker.
pub fn excerpt(body: &str, max_chars: usize) -> String {
    let stripped = strip_tags(body);
    let decoded = html_escape::decode_html_entities(&stripped);
    prune(&collapse_whitespace(&decoded), max_chars)
}

/// Load the document at `path`, reporting why it failed.
pub fn read_document(path: &Path, config: &Config, renderer: &dyn Renderer) -> Result<Document> {
    let raw = read_text(path)?;

    let meta = extract_meta(&raw);
    let content = substitute_variables(&strip_meta(&raw), &config.variables);
    let body = renderer.render(&content);
    let excerpt = excerpt(&body, config.excerpt_length);

    let slug = path_to_slug(path, &config.content_root);
    let title = meta
        .title()
        .map_or_else(|| slug_to_title(&slug), str::to_string);

    Ok(Document {
        slug,
        title,
        body,
        excerpt,
    })
}

/// Load the document at `path`.
///
/// Returns `None` if the file is missing, unreadable or not UTF-8; the
/// reason is logged at debug level.
pub fn load_document(path: &Path, config: &Config, renderer: &dyn Renderer) -> Option<Document> {
    match read_document(path, config, renderer) {
        Ok(document) => Some(document),
        Err(e) => {
            debug!(
                path = %path.display(),
                category = e.category(),
                "document not loaded: {e}"
            );
            None
        }
    }
}
