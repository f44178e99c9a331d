//! Quarry is a boolean full-text search core over a crawled document
//! corpus. `index_builder` turns a pre-stemmed token stream plus a raw
//! metadata TSV into a persistent three-file inverted index;
//! `search_cli` loads those files and answers boolean queries (`&&`,
//! `||`, `!`, parentheses, implicit conjunction) with paginated
//! `(doc_id, title, url)` pages.

pub mod analysis;
pub mod codec;
pub mod engine;
pub mod error;
pub mod index;
pub mod postings;
pub mod query;

pub use engine::{SearchEngine, SearchPage, SearchRow};
pub use error::{QuarryError, Result};
pub use index::{BuildStats, IndexBuilder, IndexReader};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
