//! Markdown rendering.
//!
//! Rendering sits behind the [`Renderer`] trait so embedders can plug in
//! their own pipeline (syntax highlighting, custom extensions). The default
//! [`MarkdownRenderer`] produces HTML with `pulldown-cmark`.

use pulldown_cmark::{Options, Parser, html};

/// Turns stripped, variable-substituted document text into the body markup.
pub trait Renderer: Send + Sync {
    /// Render `text`. Rendering never fails; malformed input renders as text.
    fn render(&self, text: &str) -> String;
}

/// CommonMark renderer with the usual GitHub extensions.
///
/// Tables, strikethrough, task lists and footnotes are enabled.
///
/// ```
/// use quire_core::render::{MarkdownRenderer, Renderer};
///
/// let html = MarkdownRenderer::new().render("# Hello\n\nSome *text*");
/// assert!(html.contains("<h1>Hello</h1>"));
/// assert!(html.contains("<em>text</em>"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    /// Create a renderer with the default extensions.
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);
        Self { options }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, text: &str) -> String {
        let parser = Parser::new_ext(text, self.options);
        let mut out = String::with_capacity(text.len() + text.len() / 2);
        html::push_html(&mut out, parser);
        out
    }
}
