//! Loading and validation of an index directory.
//!
//! The reader owns an exclusive, immutable view of the three files for
//! its lifetime. The postings payload stays memory-mapped; every term
//! fetch decodes a fresh owned list, so evaluation never borrows from
//! the mapping for longer than a single decode.

use std::fs::{self, File};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use memmap2::Mmap;
use tracing::debug;

use super::format::{
    FORMAT_VERSION, FORWARD_FILE, FORWARD_MAGIC, LEXICON_FILE, LEXICON_MAGIC, POSTINGS_FILE,
    POSTINGS_HEADER_LEN, POSTINGS_MAGIC,
};
use crate::codec::SliceReader;
use crate::error::{QuarryError, Result};

/// One decoded lexicon row: a term and where its postings live.
#[derive(Debug, Clone)]
pub struct LexiconEntry {
    pub term: Vec<u8>,
    /// Byte offset into the postings payload (past the file header)
    pub offset: u64,
    /// Number of `u32` doc ids in the list
    pub count: u32,
}

#[derive(Debug)]
struct DocMeta {
    title: String,
    url: String,
}

/// Read-only view over a loaded index.
#[derive(Debug)]
pub struct IndexReader {
    lexicon: Vec<LexiconEntry>,
    postings: Mmap,
    total_postings: u64,
    metas_by_id: Vec<Option<DocMeta>>,
    universe_ids: Vec<u32>,
    docs_with_meta: u32,
    max_doc_id: u32,
}

impl IndexReader {
    /// Open and validate all three index files in `dir`.
    pub fn open(dir: &Path) -> Result<Self> {
        let (postings, total_postings) = load_postings(dir)?;
        let lexicon = load_lexicon(dir)?;
        let (metas_by_id, universe_ids, docs_with_meta, max_doc_id) = load_forward(dir)?;

        debug!(
            terms = lexicon.len(),
            total_postings,
            docs_with_meta,
            max_doc_id,
            "index loaded"
        );

        Ok(Self {
            lexicon,
            postings,
            total_postings,
            metas_by_id,
            universe_ids,
            docs_with_meta,
            max_doc_id,
        })
    }

    /// Binary-search the lexicon for an exact term.
    pub fn lookup(&self, term: &[u8]) -> Option<&LexiconEntry> {
        self.lexicon
            .binary_search_by(|e| e.term.as_slice().cmp(term))
            .ok()
            .map(|i| &self.lexicon[i])
    }

    /// Decode an entry's posting list into an owned, ascending vector.
    pub fn postings(&self, entry: &LexiconEntry) -> Result<Vec<u32>> {
        let start = entry.offset as usize;
        let byte_len = entry.count as usize * 4;
        let declared = self.total_postings as usize * 4;
        let end = start
            .checked_add(byte_len)
            .filter(|&end| end <= declared)
            .ok_or_else(|| QuarryError::InvalidFormat {
                file: POSTINGS_FILE.to_string(),
                reason: format!(
                    "posting list at offset {} (count {}) escapes the payload",
                    entry.offset, entry.count
                ),
            })?;

        let payload = &self.postings[POSTINGS_HEADER_LEN..];
        let mut out = vec![0u32; entry.count as usize];
        LittleEndian::read_u32_into(&payload[start..end], &mut out);
        Ok(out)
    }

    /// Title and url for a doc id; empty strings when the document has
    /// no forward metadata.
    pub fn meta(&self, doc_id: u32) -> (&str, &str) {
        self.metas_by_id
            .get(doc_id as usize)
            .and_then(Option::as_ref)
            .map(|m| (m.title.as_str(), m.url.as_str()))
            .unwrap_or(("", ""))
    }

    /// Ascending doc ids of every document with metadata; the domain of
    /// `NOT`.
    pub fn universe(&self) -> &[u32] {
        &self.universe_ids
    }

    pub fn term_count(&self) -> usize {
        self.lexicon.len()
    }

    pub fn total_postings(&self) -> u64 {
        self.total_postings
    }

    pub fn docs_with_meta(&self) -> u32 {
        self.docs_with_meta
    }

    pub fn max_doc_id(&self) -> u32 {
        self.max_doc_id
    }

    /// Iterate lexicon entries in stored (ascending term) order.
    pub fn lexicon(&self) -> impl Iterator<Item = &LexiconEntry> {
        self.lexicon.iter()
    }
}

fn check_header(r: &mut SliceReader<'_>, file: &str, want_magic: u32) -> Result<()> {
    let magic = r.read_u32()?;
    if magic != want_magic {
        return Err(QuarryError::InvalidFormat {
            file: file.to_string(),
            reason: format!("bad magic {magic:#010x}, expected {want_magic:#010x}"),
        });
    }
    let version = r.read_u32()?;
    if version != FORMAT_VERSION {
        return Err(QuarryError::InvalidFormat {
            file: file.to_string(),
            reason: format!("unsupported version {version}, expected {FORMAT_VERSION}"),
        });
    }
    Ok(())
}

fn load_postings(dir: &Path) -> Result<(Mmap, u64)> {
    let path = dir.join(POSTINGS_FILE);
    let file = File::open(&path).map_err(|e| QuarryError::io(&path, e))?;
    let len = file
        .metadata()
        .map_err(|e| QuarryError::io(&path, e))?
        .len() as usize;
    if len < POSTINGS_HEADER_LEN {
        return Err(QuarryError::TruncatedFile {
            file: POSTINGS_FILE.to_string(),
        });
    }

    let map = unsafe { Mmap::map(&file) }.map_err(|e| QuarryError::io(&path, e))?;
    let mut r = SliceReader::new(&map, POSTINGS_FILE);
    check_header(&mut r, POSTINGS_FILE, POSTINGS_MAGIC)?;
    let total = r.read_u64()?;

    if total.checked_mul(4).map_or(true, |b| b > r.remaining() as u64) {
        return Err(QuarryError::TruncatedFile {
            file: POSTINGS_FILE.to_string(),
        });
    }
    Ok((map, total))
}

fn load_lexicon(dir: &Path) -> Result<Vec<LexiconEntry>> {
    let path = dir.join(LEXICON_FILE);
    let buf = fs::read(&path).map_err(|e| QuarryError::io(&path, e))?;
    let mut r = SliceReader::new(&buf, LEXICON_FILE);
    check_header(&mut r, LEXICON_FILE, LEXICON_MAGIC)?;

    let term_count = r.read_u32()? as usize;
    let mut lexicon: Vec<LexiconEntry> = Vec::with_capacity(term_count);
    for _ in 0..term_count {
        let term = r.read_str16()?.to_vec();
        let offset = r.read_u64()?;
        let count = r.read_u32()?;

        // Binary search depends on stored order; refuse anything else
        if let Some(prev) = lexicon.last() {
            if prev.term >= term {
                return Err(QuarryError::InvalidFormat {
                    file: LEXICON_FILE.to_string(),
                    reason: "terms are not in ascending order".to_string(),
                });
            }
        }
        lexicon.push(LexiconEntry {
            term,
            offset,
            count,
        });
    }
    Ok(lexicon)
}

type ForwardData = (Vec<Option<DocMeta>>, Vec<u32>, u32, u32);

fn load_forward(dir: &Path) -> Result<ForwardData> {
    let path = dir.join(FORWARD_FILE);
    let buf = fs::read(&path).map_err(|e| QuarryError::io(&path, e))?;
    let mut r = SliceReader::new(&buf, FORWARD_FILE);
    check_header(&mut r, FORWARD_FILE, FORWARD_MAGIC)?;

    let docs_with_meta = r.read_u32()?;
    let max_doc_id = r.read_u32()?;

    let mut metas_by_id: Vec<Option<DocMeta>> = Vec::new();
    metas_by_id.resize_with(max_doc_id as usize + 1, || None);
    let mut universe_ids = Vec::with_capacity(docs_with_meta as usize);

    for _ in 0..docs_with_meta {
        let doc_id = r.read_u32()?;
        let title_len = r.read_u16()? as usize;
        let url_len = r.read_u16()? as usize;
        let title = String::from_utf8_lossy(r.read_bytes(title_len)?).into_owned();
        let url = String::from_utf8_lossy(r.read_bytes(url_len)?).into_owned();

        if doc_id == 0 || doc_id > max_doc_id {
            return Err(QuarryError::InvalidFormat {
                file: FORWARD_FILE.to_string(),
                reason: format!("doc id {doc_id} outside 1..={max_doc_id}"),
            });
        }
        if universe_ids.last().is_some_and(|&prev| prev >= doc_id) {
            return Err(QuarryError::InvalidFormat {
                file: FORWARD_FILE.to_string(),
                reason: "doc ids are not in ascending order".to_string(),
            });
        }

        metas_by_id[doc_id as usize] = Some(DocMeta { title, url });
        universe_ids.push(doc_id);
    }

    Ok((metas_by_id, universe_ids, docs_with_meta, max_doc_id))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use tempfile::TempDir;

    use super::super::writer::{DocMetaRow, IndexWriter};
    use super::*;

    fn write_sample(dir: &Path) {
        let entries = vec![
            (b"alpha".to_vec(), vec![1, 3, 5]),
            (b"beta".to_vec(), vec![2, 3]),
            (b"gamma".to_vec(), vec![5]),
        ];
        let mut metas = BTreeMap::new();
        for id in [1u32, 2, 3, 4, 5] {
            metas.insert(
                id,
                DocMetaRow {
                    title: format!("Doc {id}"),
                    url: format!("https://example.org/{id}"),
                },
            );
        }
        IndexWriter::create(dir)
            .unwrap()
            .write(&entries, &metas)
            .unwrap();
    }

    #[test]
    fn test_open_and_lookup() {
        let tmp = TempDir::new().unwrap();
        write_sample(tmp.path());

        let reader = IndexReader::open(tmp.path()).unwrap();
        assert_eq!(reader.term_count(), 3);
        assert_eq!(reader.total_postings(), 6);
        assert_eq!(reader.docs_with_meta(), 5);
        assert_eq!(reader.max_doc_id(), 5);
        assert_eq!(reader.universe(), &[1, 2, 3, 4, 5]);

        let entry = reader.lookup(b"alpha").unwrap();
        assert_eq!(reader.postings(entry).unwrap(), vec![1, 3, 5]);
        let entry = reader.lookup(b"gamma").unwrap();
        assert_eq!(reader.postings(entry).unwrap(), vec![5]);
        assert!(reader.lookup(b"delta").is_none());
    }

    #[test]
    fn test_meta_lookup() {
        let tmp = TempDir::new().unwrap();
        write_sample(tmp.path());
        let reader = IndexReader::open(tmp.path()).unwrap();

        assert_eq!(reader.meta(3), ("Doc 3", "https://example.org/3"));
        // Absent metadata renders as empty fields, not an error
        assert_eq!(reader.meta(77), ("", ""));
        assert_eq!(reader.meta(0), ("", ""));
    }

    #[test]
    fn test_lexicon_offsets_tile_payload() {
        let tmp = TempDir::new().unwrap();
        write_sample(tmp.path());
        let reader = IndexReader::open(tmp.path()).unwrap();

        let mut expected_offset = 0u64;
        let mut sum = 0u64;
        for entry in reader.lexicon() {
            assert_eq!(entry.offset, expected_offset);
            expected_offset += entry.count as u64 * 4;
            sum += entry.count as u64;
        }
        assert_eq!(sum, reader.total_postings());
    }

    #[test]
    fn test_bad_magic_rejected() {
        let tmp = TempDir::new().unwrap();
        write_sample(tmp.path());
        let path = tmp.path().join(LEXICON_FILE);
        let mut bytes = fs::read(&path).unwrap();
        bytes[0] ^= 0xFF;
        fs::write(&path, bytes).unwrap();

        let err = IndexReader::open(tmp.path()).unwrap_err();
        assert!(matches!(err, QuarryError::InvalidFormat { file, .. } if file == LEXICON_FILE));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let tmp = TempDir::new().unwrap();
        write_sample(tmp.path());
        let path = tmp.path().join(POSTINGS_FILE);
        let mut bytes = fs::read(&path).unwrap();
        bytes[4] = 9;
        fs::write(&path, bytes).unwrap();

        let err = IndexReader::open(tmp.path()).unwrap_err();
        assert!(matches!(err, QuarryError::InvalidFormat { file, .. } if file == POSTINGS_FILE));
    }

    #[test]
    fn test_truncated_postings_rejected() {
        let tmp = TempDir::new().unwrap();
        write_sample(tmp.path());
        let path = tmp.path().join(POSTINGS_FILE);
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

        let err = IndexReader::open(tmp.path()).unwrap_err();
        assert!(matches!(err, QuarryError::TruncatedFile { file } if file == POSTINGS_FILE));
    }

    #[test]
    fn test_truncated_forward_rejected() {
        let tmp = TempDir::new().unwrap();
        write_sample(tmp.path());
        let path = tmp.path().join(FORWARD_FILE);
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() - 1]).unwrap();

        let err = IndexReader::open(tmp.path()).unwrap_err();
        assert!(matches!(err, QuarryError::TruncatedFile { file } if file == FORWARD_FILE));
    }
}
