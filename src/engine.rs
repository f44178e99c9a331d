//! Query sessions over a loaded index.
//!
//! The engine is stateless after load: it owns the read-only index view
//! and every search allocates its own result page, so queries cannot
//! affect one another.

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::index::IndexReader;
use crate::query::{eval_rpn, to_rpn, tokenize};

/// One rendered result row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRow {
    pub doc_id: u32,
    pub title: String,
    pub url: String,
}

/// One page of results plus the total match count before pagination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    pub total: usize,
    pub rows: Vec<SearchRow>,
}

/// Boolean search over one index directory.
pub struct SearchEngine {
    reader: IndexReader,
}

impl SearchEngine {
    /// Load and validate the index in `index_dir`.
    pub fn open(index_dir: &Path) -> Result<Self> {
        Ok(Self {
            reader: IndexReader::open(index_dir)?,
        })
    }

    pub fn reader(&self) -> &IndexReader {
        &self.reader
    }

    /// Evaluate `query` and page the matches with `offset` and `limit`.
    ///
    /// An empty or all-noise query matches nothing rather than erroring;
    /// titles and urls fall back to empty strings for matches without
    /// forward metadata.
    pub fn search(&self, query: &str, offset: usize, limit: usize) -> Result<SearchPage> {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            return Ok(SearchPage {
                total: 0,
                rows: Vec::new(),
            });
        }

        let rpn = to_rpn(tokens)?;
        let matches = eval_rpn(&self.reader, &rpn)?;
        debug!(query, total = matches.len(), "query evaluated");

        let total = matches.len();
        let rows = matches
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|doc_id| {
                let (title, url) = self.reader.meta(doc_id);
                SearchRow {
                    doc_id,
                    title: title.to_string(),
                    url: url.to_string(),
                }
            })
            .collect();

        Ok(SearchPage { total, rows })
    }
}
