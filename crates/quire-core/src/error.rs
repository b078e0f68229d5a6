//! Error types and handling for quire-core operations.
//!
//! Errors stay inside the crate for the most part: the three top-level calls
//! (`load_document`, `build_tree`, `search`) fold every per-document failure
//! into an absent result or a shorter collection. The typed [`Error`] exists
//! so each internal step can use `?` and so that the point where a failure is
//! absorbed can log it with a stable [`Error::category`].
//!
//! ## Error Categories
//!
//! - **I/O Errors**: reading documents, sidecar files, directory traversal
//! - **Not Found**: missing document or content root
//! - **Parse Errors**: document text that is not valid UTF-8
//! - **Index Errors**: building or querying the in-memory search index
//! - **Configuration Errors**: unreadable or invalid configuration
//!
//! ```rust
//! use quire_core::{Error, Result};
//!
//! fn check(value: usize) -> Result<usize> {
//!     if value == 0 {
//!         return Err(Error::Config("excerpt_length must be positive".into()));
//!     }
//!     Ok(value)
//! }
//!
//! let err = check(0).unwrap_err();
//! assert_eq!(err.category(), "config");
//! ```

use thiserror::Error;

/// The main error type for quire-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers reading documents and sidecar files and walking the content
    /// directory. The underlying `std::io::Error` is preserved.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Requested document or directory was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Document content could not be decoded.
    ///
    /// Raised when a document is not valid UTF-8. Malformed metadata lines are
    /// never an error; they are skipped during extraction.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Search index operation failed.
    ///
    /// Covers schema setup, writer creation, commits, reader creation and
    /// query execution against the per-call tantivy index.
    #[error("Index error: {0}")]
    Index(String),

    /// Configuration is invalid or inaccessible.
    ///
    /// ## Common Causes
    ///
    /// - Config file missing or unreadable
    /// - Invalid TOML syntax
    /// - Empty `content_root` or `document_extensions`
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Get the error category as a string identifier.
    ///
    /// Used as a structured field when a failure is logged and absorbed:
    ///
    /// - `"io"`, `"not_found"`, `"parse"`, `"index"`, `"config"`
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::NotFound(_) => "not_found",
            Self::Parse(_) => "parse",
            Self::Index(_) => "index",
            Self::Config(_) => "config",
        }
    }

    /// Whether the failure means the target simply is not there.
    ///
    /// Missing files and I/O `NotFound` errors are the expected way a document
    /// lookup misses, so they are logged more quietly than other failures.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
