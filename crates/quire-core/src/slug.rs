//! Path and slug conversions.
//!
//! A slug is a document's path relative to the content root, without its
//! extension, joined with `/`. A directory's `index` document takes the
//! directory's own slug.

use crate::text::{humanize, titleize};
use std::path::{Component, Path};

const INDEX_STEM: &str = "index";

/// Relative path of `path` under `content_root`, joined with `/`.
///
/// A path outside the root is used as given.
pub fn relative_id(path: &Path, content_root: &Path) -> String {
    let relative = path.strip_prefix(content_root).unwrap_or(path);
    join_components(relative)
}

fn join_components(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Slug of the document at `path`.
///
/// ```
/// use quire_core::slug::path_to_slug;
/// use std::path::Path;
///
/// let root = Path::new("content");
/// assert_eq!(path_to_slug(Path::new("content/page.md"), root), "page");
/// assert_eq!(path_to_slug(Path::new("content/sub/index.md"), root), "sub");
/// assert_eq!(path_to_slug(Path::new("content/index.md"), root), "");
/// ```
pub fn path_to_slug(path: &Path, content_root: &Path) -> String {
    let relative = path.strip_prefix(content_root).unwrap_or(path);
    let is_index = relative
        .file_stem()
        .is_some_and(|stem| stem == INDEX_STEM);

    let slug_path = if is_index {
        relative.parent().unwrap_or_else(|| Path::new("")).to_path_buf()
    } else {
        relative.with_extension("")
    };

    join_components(&slug_path).trim().to_string()
}

/// Human-readable title derived from a slug.
///
/// Only the last segment is used; a trailing `.md` is dropped.
///
/// ```
/// use quire_core::slug::slug_to_title;
///
/// assert_eq!(slug_to_title("hello-world"), "Hello World");
/// assert_eq!(slug_to_title("dir/some-example-file.md"), "Some Example File");
/// ```
pub fn slug_to_title(slug: &str) -> String {
    let last = slug.rsplit('/').next().unwrap_or(slug);
    let stem = last.strip_suffix(".md").unwrap_or(last);
    titleize(&humanize(stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_path_to_slug() {
        // Given: A content root and documents at several depths
        let root = Path::new("/srv/content");
        let cases = [
            ("/srv/content/page.md", "page"),
            ("/srv/content/sub/page.md", "sub/page"),
            ("/srv/content/sub/index.md", "sub"),
            ("/srv/content/a/b/index.md", "a/b"),
            ("/srv/content/index.md", ""),
            ("/srv/content/notes.txt", "notes"),
        ];

        for (path, expected) in cases {
            // When/Then: The slug drops the root, the extension and index stems
            assert_eq!(path_to_slug(Path::new(path), root), expected, "{path}");
        }
    }

    #[test]
    fn test_path_to_slug_relative_root() {
        let root = Path::new("content/");
        assert_eq!(path_to_slug(Path::new("content/sub/index.md"), root), "sub");
        assert_eq!(path_to_slug(Path::new("content/page.md"), root), "page");
    }

    #[test]
    fn test_path_to_slug_outside_root() {
        let slug = path_to_slug(Path::new("elsewhere/page.md"), Path::new("/srv/content"));
        assert_eq!(slug, "elsewhere/page");
    }

    #[test]
    fn test_path_to_slug_root_with_trailing_separator() {
        let root = PathBuf::from("/srv/content/");
        assert_eq!(
            path_to_slug(Path::new("/srv/content/sub/page.md"), &root),
            "sub/page"
        );
    }

    #[test]
    fn test_relative_id() {
        let root = Path::new("/srv/content");
        assert_eq!(
            relative_id(Path::new("/srv/content/sub/index.md"), root),
            "sub/index.md"
        );
        assert_eq!(relative_id(Path::new("/srv/content/sub"), root), "sub");
    }

    #[test]
    fn test_slug_to_title() {
        assert_eq!(slug_to_title("hello-world"), "Hello World");
        assert_eq!(slug_to_title("dir/some-example-file.md"), "Some Example File");
        assert_eq!(slug_to_title("sub/example_sub_page"), "Example Sub Page");
        assert_eq!(slug_to_title(""), "");
    }
}
