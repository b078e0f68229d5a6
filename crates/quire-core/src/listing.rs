//! Content directory enumeration.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// A file or directory found under the content root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Entry {
    /// Full path, starting with the root that was listed.
    pub path: PathBuf,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

impl Entry {
    /// Entry for a regular file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }

    /// Entry for a directory.
    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
        }
    }
}

/// Enumerates every entry beneath a root, recursively.
///
/// The root itself is not part of the listing. Order is unspecified; callers
/// sort what they need.
pub trait FileLister: Send + Sync {
    /// List the entries under `root`.
    ///
    /// # Errors
    ///
    /// Fails when `root` itself cannot be listed. Problems with individual
    /// entries below it are skipped.
    fn list(&self, root: &Path) -> Result<Vec<Entry>>;
}

/// Recursive directory walk that skips hidden entries.
///
/// Names starting with `.` are skipped together with everything beneath them.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkDirLister {
    follow_links: bool,
}

impl WalkDirLister {
    /// Lister that does not follow symbolic links.
    pub const fn new() -> Self {
        Self {
            follow_links: false,
        }
    }

    /// Follow symbolic links while walking.
    #[must_use]
    pub const fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }
}

// The root may itself be hidden (temporary directories often are).
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

impl FileLister for WalkDirLister {
    fn list(&self, root: &Path) -> Result<Vec<Entry>> {
        if !root.is_dir() {
            return Err(Error::NotFound(format!(
                "content root {} is not a directory",
                root.display()
            )));
        }

        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(self.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e));

        let mut entries = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => entries.push(Entry {
                    is_dir: entry.file_type().is_dir(),
                    path: entry.into_path(),
                }),
                Err(e) => debug!(root = %root.display(), "skipping unreadable entry: {e}"),
            }
        }

        Ok(entries)
    }
}
