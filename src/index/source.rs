//! Best-effort parsers for the two corpus input files.
//!
//! Both inputs are line-oriented and produced by upstream pipeline
//! stages. Malformed lines are skipped rather than fatal: the crawl is
//! noisy and a bad row should cost one document, not the build.

/// A parsed line of `stemmed.txt`: `doc_id\ttoken token ...`.
///
/// Returns `None` when the line has no tab, the doc id is not a decimal
/// `u32`, or the doc id is zero (zero is the reserved "absent" id).
/// Empty bodies are valid.
pub fn parse_stemmed_line(line: &str) -> Option<(u32, &str)> {
    let (id, body) = line.split_once('\t')?;
    let doc_id: u32 = id.parse().ok()?;
    if doc_id == 0 {
        return None;
    }
    Some((doc_id, body))
}

/// One usable row of `raw_text.tsv`.
#[derive(Debug, PartialEq, Eq)]
pub struct TsvRecord<'a> {
    pub doc_id: u32,
    pub url: &'a str,
    pub title: &'a str,
}

/// Parse a `raw_text.tsv` row: `doc_id\tsource\turl\ttitle\ttext`.
///
/// All five columns must be present; only doc id, url, and title are
/// returned. Rows with a missing column, an unparseable doc id, or
/// `doc_id == 0` are skipped.
pub fn parse_tsv_line(line: &str) -> Option<TsvRecord<'_>> {
    let mut cols = line.splitn(5, '\t');
    let id = cols.next()?;
    let _source = cols.next()?;
    let url = cols.next()?;
    let title = cols.next()?;
    let _text = cols.next()?;

    let doc_id: u32 = id.parse().ok()?;
    if doc_id == 0 {
        return None;
    }
    Some(TsvRecord { doc_id, url, title })
}
