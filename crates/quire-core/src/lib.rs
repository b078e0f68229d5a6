//! # quire-core
//!
//! Content lookups for a directory of Markdown documents: metadata
//! extraction, slug resolution, a sorted navigation tree and ranked full-text
//! search with highlighted excerpts.
//!
//! ## Architecture
//!
//! - **Text**: string normalization (keys, CSS tokens, titles, excerpts)
//! - **Metadata**: the leading `Key: Value` block of each document
//! - **Slugs**: path to slug and slug to title conversions
//! - **Documents**: read, strip, substitute, render and summarize one file
//! - **Tree**: categories per directory, pages per document, deterministic order
//! - **Search**: a per-call in-memory tantivy index with title boosting
//! - **Library**: the entry point holding the pluggable renderer and lister
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quire_core::{Config, Library};
//! use std::path::Path;
//!
//! let config = Config::load(Path::new("quire.toml"))?;
//! let library = Library::new();
//!
//! let tree = library.build_tree(&config, Some("getting-started"));
//! println!("{} categories", tree.len());
//!
//! for doc in library.search("install", &config) {
//!     println!("{} - {}", doc.title, doc.excerpt);
//! }
//! # Ok::<(), quire_core::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! The top-level calls never fail: a missing document is `None`, and
//! unreadable files or a broken index shrink the returned collection. Failures
//! are logged through `tracing`; install a subscriber to see them. Only
//! configuration loading returns [`Result`].

/// Configuration and content variables
pub mod config;
/// Document loading
pub mod document;
/// Error types and result aliases
pub mod error;
/// Entry point bundling renderer and lister
pub mod library;
/// Content directory enumeration
pub mod listing;
/// Metadata block extraction
pub mod meta;
/// Markdown rendering
pub mod render;
/// Full-text search with Tantivy
pub mod search;
/// Path and slug conversions
pub mod slug;
/// String normalization helpers
pub mod text;
/// Category and page navigation tree
pub mod tree;

// Re-export commonly used types
pub use config::{Config, ContentVariables};
pub use document::{Document, load_document};
pub use error::{Error, Result};
pub use library::Library;
pub use listing::{Entry, FileLister, WalkDirLister};
pub use meta::Metadata;
pub use render::{MarkdownRenderer, Renderer};
pub use search::{SearchHit, search};
pub use tree::{Category, Page, build_tree};
