//! Full-text search over the content directory.
//!
//! Each call builds a fresh in-memory tantivy index of every document under
//! the content root, runs the query against it and drops it again. Results are
//! reloaded through the document loader so they carry rendered bodies and
//! excerpts, and occurrences of the query in each excerpt are wrapped in a
//! highlight span.
//!
//! ## Ranking
//!
//! Query terms are matched against two stemmed fields, `title` and `body`,
//! and combined with OR. Title matches count [`TITLE_BOOST`] times as much as
//! body matches. Equal scores are ordered by document path.

use crate::config::Config;
use crate::document::{Document, load_document, read_text};
use crate::listing::FileLister;
use crate::meta::extract_meta;
use crate::render::Renderer;
use crate::slug::{relative_id, slug_to_title};
use crate::{Error, Result};
use regex::{Captures, RegexBuilder};
use serde::Serialize;
use std::time::Instant;
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::{
    Field, IndexRecordOption, STORED, STRING, Schema, TextFieldIndexing, TextOptions, Value,
};
use tantivy::tokenizer::{Language, LowerCaser, SimpleTokenizer, Stemmer, TextAnalyzer};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, doc};
use tracing::{debug, warn};

/// Weight of a title match relative to a body match.
pub const TITLE_BOOST: f32 = 10.0;

const EN_STEM: &str = "en_stem";
const WRITER_HEAP_BYTES: usize = 50_000_000;

/// A ranked match, before the document is reloaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Document path relative to the content root, `/`-separated.
    pub id: String,
    /// Relevance score; higher is better.
    pub score: f32,
}

/// In-memory index of one content directory.
struct ContentIndex {
    index: Index,
    reader: IndexReader,
    id_field: Field,
    title_field: Field,
    body_field: Field,
    doc_count: usize,
}

impl ContentIndex {
    fn schema() -> (Schema, Field, Field, Field) {
        let mut builder = Schema::builder();
        let text_options = TextOptions::default().set_indexing_options(
            TextFieldIndexing::default()
                .set_tokenizer(EN_STEM)
                .set_index_option(IndexRecordOption::WithFreqsAndPositions),
        );

        let id_field = builder.add_text_field("id", STRING | STORED);
        let title_field = builder.add_text_field("title", text_options.clone());
        let body_field = builder.add_text_field("body", text_options);
        (builder.build(), id_field, title_field, body_field)
    }

    fn register_tokenizers(index: &Index) {
        let en_stem = TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(LowerCaser)
            .filter(Stemmer::new(Language::English))
            .build();
        index.tokenizers().register(EN_STEM, en_stem);
    }

    /// Index every document under `config.content_root`.
    fn build(config: &Config, lister: &dyn FileLister) -> Result<Self> {
        let started = Instant::now();
        let root = config.content_root.as_path();

        let mut entries = lister.list(root)?;
        entries.retain(|e| !e.is_dir && config.is_document(&e.path));
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        let (schema, id_field, title_field, body_field) = Self::schema();
        let index = Index::create_in_ram(schema);
        Self::register_tokenizers(&index);

        let mut writer: IndexWriter = index
            .writer_with_num_threads(1, WRITER_HEAP_BYTES)
            .map_err(|e| Error::Index(format!("Failed to create writer: {e}")))?;

        let mut doc_count = 0usize;
        let mut total_bytes = 0usize;
        for entry in &entries {
            let raw = match read_text(&entry.path) {
                Ok(raw) => raw,
                Err(e) => {
                    debug!(
                        path = %entry.path.display(),
                        category = e.category(),
                        "document left out of index: {e}"
                    );
                    continue;
                }
            };

            let id = relative_id(&entry.path, root);
            let meta = extract_meta(&raw);
            let title = meta
                .title()
                .map_or_else(|| slug_to_title(&id), str::to_string);

            writer
                .add_document(doc!(
                    id_field => id.as_str(),
                    title_field => title,
                    body_field => raw.as_str(),
                ))
                .map_err(|e| Error::Index(format!("Failed to add document: {e}")))?;
            doc_count += 1;
            total_bytes += raw.len();
        }

        writer
            .commit()
            .map_err(|e| Error::Index(format!("Failed to commit: {e}")))?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| Error::Index(format!("Failed to create reader: {e}")))?;

        debug!(
            "Indexed {} documents ({} bytes) in {:.2}ms",
            doc_count,
            total_bytes,
            started.elapsed().as_secs_f64() * 1000.0
        );

        Ok(Self {
            index,
            reader,
            id_field,
            title_field,
            body_field,
            doc_count,
        })
    }

    fn query(&self, query_str: &str) -> Result<Vec<SearchHit>> {
        let sanitized = sanitize_query(query_str);
        if sanitized.trim().is_empty() || self.doc_count == 0 {
            return Ok(Vec::new());
        }

        let mut parser =
            QueryParser::for_index(&self.index, vec![self.title_field, self.body_field]);
        parser.set_field_boost(self.title_field, TITLE_BOOST);
        let query = parser
            .parse_query(&sanitized)
            .map_err(|e| Error::Index(format!("Failed to parse query: {e}")))?;

        let searcher = self.reader.searcher();
        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(self.doc_count))
            .map_err(|e| Error::Index(format!("Search failed: {e}")))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: TantivyDocument = searcher
                .doc(address)
                .map_err(|e| Error::Index(format!("Failed to retrieve doc: {e}")))?;
            let id = doc
                .get_first(self.id_field)
                .and_then(|v| v.as_str())
                .ok_or_else(|| Error::Index("Field not found in document".into()))?;
            hits.push(SearchHit {
                id: id.to_string(),
                score,
            });
        }

        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        Ok(hits)
    }
}

/// Reduce a free-form query to plain lowercase words.
///
/// Everything that is not alphanumeric becomes a space, which keeps query
/// syntax (`field:`, `+`, `"`, `AND`) from reaching the parser. The index
/// tokenizer splits on the same characters, so no matches are lost.
///
/// ```
/// use quire_core::search::sanitize_query;
///
/// assert_eq!(sanitize_query("title:Rust AND (docs)"), "title rust and  docs ");
/// ```
pub fn sanitize_query(query: &str) -> String {
    query
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect()
}

/// Wrap every case-insensitive occurrence of `query` in `text` with a span of
/// class `class`, preserving the matched text's casing.
///
/// ```
/// use quire_core::search::highlight;
///
/// assert_eq!(
///     highlight("An Example of examples", "example", "search-query"),
///     "An <span class=\"search-query\">Example</span> of \
///      <span class=\"search-query\">example</span>s"
/// );
/// ```
pub fn highlight(text: &str, query: &str, class: &str) -> String {
    let needle = query.trim();
    if needle.is_empty() {
        return text.to_string();
    }

    let Ok(pattern) = RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
    else {
        return text.to_string();
    };

    pattern
        .replace_all(text, |caps: &Captures<'_>| {
            format!("<span class=\"{class}\">{}</span>", &caps[0])
        })
        .into_owned()
}

/// Rank the documents under `config.content_root` against `query`.
///
/// The index is built for this call only.
pub fn find_hits(query: &str, config: &Config, lister: &dyn FileLister) -> Result<Vec<SearchHit>> {
    if sanitize_query(query).trim().is_empty() {
        return Ok(Vec::new());
    }
    ContentIndex::build(config, lister)?.query(query)
}

/// Search the content directory and return the matching documents, best
/// match first, with the query highlighted in each excerpt.
///
/// An empty query, an unreadable content root or an index failure all give
/// an empty result. Hits whose document can no longer be loaded are dropped.
pub fn search(
    query: &str,
    config: &Config,
    renderer: &dyn Renderer,
    lister: &dyn FileLister,
) -> Vec<Document> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let hits = match find_hits(query, config, lister) {
        Ok(hits) => hits,
        Err(e) => {
            warn!(
                root = %config.content_root.display(),
                category = e.category(),
                "search failed: {e}"
            );
            return Vec::new();
        }
    };

    let mut documents = Vec::with_capacity(hits.len());
    for hit in hits {
        let path = config.content_root.join(&hit.id);
        let Some(mut document) = load_document(&path, config, renderer) else {
            debug!(id = %hit.id, "search hit dropped: document did not load");
            continue;
        };
        document.excerpt = highlight(&document.excerpt, query, &config.highlight_class);
        documents.push(document);
    }

    debug!(query, results = documents.len(), "search complete");
    documents
}
