//! Entry point bundling the renderer and file lister.

use crate::config::Config;
use crate::document::{self, Document};
use crate::listing::{FileLister, WalkDirLister};
use crate::render::{MarkdownRenderer, Renderer};
use crate::search;
use crate::tree::{self, Category};
use std::fmt;
use std::path::{Component, Path};
use tracing::debug;

/// Content lookups over a directory of documents.
///
/// A `Library` owns the two pluggable collaborators and nothing else; the
/// [`Config`] is passed to each call, so one library can serve several
/// content roots.
///
/// ```no_run
/// use quire_core::{Config, Library};
///
/// let library = Library::new();
/// let config = Config::new("content");
///
/// for category in library.build_tree(&config, Some("guides/install")) {
///     println!("{} ({} pages)", category.title, category.files.len());
/// }
/// for doc in library.search("install", &config) {
///     println!("{}: {}", doc.slug, doc.excerpt);
/// }
/// ```
pub struct Library {
    renderer: Box<dyn Renderer>,
    lister: Box<dyn FileLister>,
}

impl Library {
    /// Library with the Markdown renderer and the directory walker.
    pub fn new() -> Self {
        Self {
            renderer: Box::new(MarkdownRenderer::new()),
            lister: Box::new(WalkDirLister::new()),
        }
    }

    /// Replace the renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Replace the file lister.
    #[must_use]
    pub fn with_lister(mut self, lister: Box<dyn FileLister>) -> Self {
        self.lister = lister;
        self
    }

    /// Load one document. See [`document::load_document`].
    pub fn load_document(&self, path: &Path, config: &Config) -> Option<Document> {
        document::load_document(path, config, self.renderer.as_ref())
    }

    /// Load the document with `slug` under the content root.
    ///
    /// Tries `<slug>.<ext>` for each configured extension, then
    /// `<slug>/index.<ext>`. A slug with a `..` segment or a leading `.`
    /// segment resolves to nothing.
    pub fn load_by_slug(&self, slug: &str, config: &Config) -> Option<Document> {
        let slug = slug.trim().trim_matches('/');
        let stays_in_root = Path::new(slug)
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !stays_in_root {
            debug!(slug, "slug leaves the content root");
            return None;
        }
        let base = config.content_root.join(slug);

        config
            .document_extensions
            .iter()
            .flat_map(|ext| {
                let direct = (!slug.is_empty())
                    .then(|| config.content_root.join(format!("{slug}.{ext}")));
                let index = base.join("index").with_extension(ext);
                direct.into_iter().chain(std::iter::once(index))
            })
            .filter(|path| path.is_file())
            .find_map(|path| self.load_document(&path, config))
    }

    /// Build the navigation tree. See [`tree::build_tree`].
    pub fn build_tree(&self, config: &Config, current_slug: Option<&str>) -> Vec<Category> {
        tree::build_tree(config, current_slug, self.lister.as_ref())
    }

    /// Search the content. See [`search::search`].
    pub fn search(&self, query: &str, config: &Config) -> Vec<Document> {
        search::search(query, config, self.renderer.as_ref(), self.lister.as_ref())
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library").finish_non_exhaustive()
    }
}
