//! Accumulates a corpus into memory and commits it to an index directory.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use super::source::{parse_stemmed_line, parse_tsv_line};
use super::term_table::{TermTable, DEFAULT_CAPACITY};
use super::writer::{DocMetaRow, IndexWriter};
use crate::error::{QuarryError, Result};

/// Counters reported after a successful build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    /// Stemmed lines accepted, including documents with empty bodies
    pub documents_indexed: u64,
    /// Non-empty tokens consumed across all documents
    pub tokens_seen: u64,
    pub unique_terms: u64,
    pub total_postings: u64,
    pub docs_with_meta: u32,
}

/// One-shot builder for the three-file inverted index.
///
/// Feed it the stemmed corpus and the raw metadata TSV in any order,
/// then [`commit`](IndexBuilder::commit) to serialize. Documents must
/// arrive in non-decreasing doc id order, which the corpus pipeline
/// guarantees by construction.
pub struct IndexBuilder {
    table: TermTable,
    metas: BTreeMap<u32, DocMetaRow>,
    documents_indexed: u64,
    tokens_seen: u64,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// `hash_capacity` bounds the number of distinct terms; see
    /// [`TermTable::with_capacity`] for rounding rules.
    pub fn with_capacity(hash_capacity: usize) -> Self {
        Self {
            table: TermTable::with_capacity(hash_capacity),
            metas: BTreeMap::new(),
            documents_indexed: 0,
            tokens_seen: 0,
        }
    }

    /// Index one document's pre-stemmed, whitespace-separated tokens.
    pub fn add_document(&mut self, doc_id: u32, body: &str) -> Result<()> {
        for token in body.split_whitespace() {
            self.table.add(token.as_bytes(), doc_id)?;
            self.tokens_seen += 1;
        }
        self.documents_indexed += 1;
        Ok(())
    }

    /// Record a document's title and url. The first row for a doc id
    /// wins; later duplicates are ignored.
    pub fn add_metadata(&mut self, doc_id: u32, title: &str, url: &str) {
        self.metas.entry(doc_id).or_insert_with(|| DocMetaRow {
            title: title.to_string(),
            url: url.to_string(),
        });
    }

    /// Consume a `stemmed.txt` file, skipping malformed lines.
    pub fn index_stemmed_file(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path).map_err(|e| QuarryError::io(path, e))?;
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| QuarryError::io(path, e))?;
            if let Some((doc_id, body)) = parse_stemmed_line(&line) {
                self.add_document(doc_id, body)?;
            }
        }
        info!(
            documents = self.documents_indexed,
            tokens = self.tokens_seen,
            terms = self.table.len(),
            "indexed stemmed corpus"
        );
        Ok(())
    }

    /// Consume a `raw_text.tsv` file, skipping malformed rows.
    pub fn load_metadata_tsv(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path).map_err(|e| QuarryError::io(path, e))?;
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| QuarryError::io(path, e))?;
            if let Some(rec) = parse_tsv_line(&line) {
                self.add_metadata(rec.doc_id, rec.title, rec.url);
            }
        }
        info!(docs_with_meta = self.metas.len(), "loaded forward metadata");
        Ok(())
    }

    /// Serialize everything accumulated so far into `index_dir`.
    pub fn commit(self, index_dir: &Path) -> Result<BuildStats> {
        let unique_terms = self.table.len() as u64;
        let docs_with_meta = self.metas.len() as u32;

        let entries = self.table.into_sorted_entries();
        debug!(terms = entries.len(), dir = %index_dir.display(), "committing index");

        let writer = IndexWriter::create(index_dir)?;
        let total_postings = writer.write(&entries, &self.metas)?;

        Ok(BuildStats {
            documents_indexed: self.documents_indexed,
            tokens_seen: self.tokens_seen,
            unique_terms,
            total_postings,
            docs_with_meta,
        })
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}
