//! Navigation tree of categories and pages.
//!
//! Every directory under the content root becomes a [`Category`]; every
//! document becomes a [`Page`] inside the category of its parent directory.
//! Documents at the top level belong to the root category, which always comes
//! first.
//!
//! The tree is built in two passes over the listing: directories first so that
//! every category exists before any page is attached, then documents.

use crate::config::Config;
use crate::document::read_text;
use crate::listing::{Entry, FileLister};
use crate::meta::extract_meta;
use crate::slug::{path_to_slug, relative_id, slug_to_title};
use crate::text::{clean_token, humanize, parse_leading_int, titleize};
use crate::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Slug of the root category.
pub const ROOT_SLUG: &str = ".";

const ROOT_CLASS: &str = "category-index";
const CLASS_PREFIX: &str = "category-";

/// A directory-level group of pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Directory path relative to the content root, `.` for the root.
    pub slug: String,
    /// Display title, empty for the root.
    pub title: String,
    /// True only for the root category.
    pub is_index: bool,
    /// CSS class derived from the slug.
    pub class: String,
    /// Sort key; lower comes first.
    pub sort: i64,
    /// Pages in this category, in sort order.
    pub files: Vec<Page>,
}

/// A document entry in the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Document slug.
    pub slug: String,
    /// Metadata title, or one derived from the slug.
    pub title: String,
    /// Whether this is the page currently being viewed.
    pub active: bool,
    /// Sort key; lower comes first.
    pub sort: i64,
}

impl Category {
    fn root() -> Self {
        Self {
            slug: ROOT_SLUG.to_string(),
            title: String::new(),
            is_index: true,
            class: ROOT_CLASS.to_string(),
            sort: 0,
            files: Vec::new(),
        }
    }

    fn from_directory(slug: String, sort: i64) -> Self {
        let basename = slug.rsplit('/').next().unwrap_or(&slug);
        Self {
            title: titleize(&humanize(basename)),
            class: format!("{CLASS_PREFIX}{}", clean_token(&slug, false)),
            is_index: false,
            sort,
            files: Vec::new(),
            slug,
        }
    }
}

/// `"/"` names the root index page; an empty slug names no page.
fn normalize_current_slug(current: &str) -> Option<&str> {
    let trimmed = current.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.strip_prefix('/').unwrap_or(trimmed))
}

fn parent_slug(path: &Path, content_root: &Path) -> String {
    let parent = path.parent().map(|p| relative_id(p, content_root));
    match parent {
        Some(slug) if !slug.is_empty() => slug,
        _ => ROOT_SLUG.to_string(),
    }
}

/// Integer from a category's sort file; anything unusable sorts as 0.
fn read_category_sort(dir: &Path, config: &Config) -> i64 {
    let path = dir.join(&config.category_sort_file);
    match read_text(&path) {
        Ok(text) => parse_leading_int(&text).unwrap_or_else(|| {
            debug!(path = %path.display(), "category sort file is not an integer");
            0
        }),
        Err(e) => {
            if !e.is_missing() {
                debug!(path = %path.display(), "category sort file unreadable: {e}");
            }
            0
        }
    }
}

fn build_page(path: &Path, config: &Config, current: Option<&str>) -> Result<Page> {
    let raw = read_text(path)?;
    let meta = extract_meta(&raw);

    let slug = path_to_slug(path, &config.content_root);
    let title = meta
        .title()
        .map_or_else(|| slug_to_title(&slug), str::to_string);
    let sort = config
        .page_sort_meta
        .as_deref()
        .and_then(|key| meta.sort_value(key))
        .unwrap_or(0);
    let active = current.is_some_and(|c| c == slug);

    Ok(Page {
        slug,
        title,
        active,
        sort,
    })
}

/// Build the ordered category/page tree for `config.content_root`.
///
/// `current_slug` marks the matching page as active; a leading `/` is
/// ignored, and `"/"` marks the root index page. `None` or an empty slug
/// leaves every page inactive.
///
/// The root category is always first. Other categories are ordered by their
/// sort value, and pages within a category by theirs; ties keep path order.
/// Unreadable documents are left out rather than failing the build, and a
/// missing content root yields just the empty root category.
pub fn build_tree(
    config: &Config,
    current_slug: Option<&str>,
    lister: &dyn FileLister,
) -> Vec<Category> {
    let root = config.content_root.as_path();
    let mut entries = match lister.list(root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                root = %root.display(),
                category = e.category(),
                "content root not listed: {e}"
            );
            Vec::new()
        }
    };
    entries.sort_by(|a, b| a.path.cmp(&b.path));

    let mut categories = vec![Category::root()];
    let mut positions: HashMap<String, usize> = HashMap::new();
    positions.insert(ROOT_SLUG.to_string(), 0);

    for Entry { path, .. } in entries.iter().filter(|e| e.is_dir) {
        let slug = relative_id(path, root);
        if slug.is_empty() || positions.contains_key(&slug) {
            continue;
        }
        let sort = if config.category_sort {
            read_category_sort(path, config)
        } else {
            0
        };
        positions.insert(slug.clone(), categories.len());
        categories.push(Category::from_directory(slug, sort));
    }

    let current = current_slug.and_then(normalize_current_slug);
    let mut page_count = 0usize;

    for Entry { path, .. } in entries
        .iter()
        .filter(|e| !e.is_dir && config.is_document(&e.path))
    {
        let parent = parent_slug(path, root);
        let Some(&position) = positions.get(&parent) else {
            debug!(path = %path.display(), parent = %parent, "no category for page");
            continue;
        };

        match build_page(path, config, current) {
            Ok(page) => {
                categories[position].files.push(page);
                page_count += 1;
            }
            Err(e) => debug!(
                path = %path.display(),
                category = e.category(),
                "page left out of tree: {e}"
            ),
        }
    }

    order_categories(&mut categories);
    debug!(
        categories = categories.len(),
        pages = page_count,
        "content tree built"
    );
    categories
}

/// Sort categories and their pages, then pin the root category first.
fn order_categories(categories: &mut Vec<Category>) {
    if let Some(root_pos) = categories.iter().position(|c| c.is_index) {
        let root = categories.remove(root_pos);
        categories.sort_by_key(|c| c.sort);
        categories.insert(0, root);
    } else {
        categories.sort_by_key(|c| c.sort);
    }

    for category in categories.iter_mut() {
        category.files.sort_by_key(|p| p.sort);
    }
}
