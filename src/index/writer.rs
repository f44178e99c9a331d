//! Serialization of a built index into its three on-disk files.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::format::{
    FORMAT_VERSION, FORWARD_FILE, FORWARD_MAGIC, LEXICON_FILE, LEXICON_MAGIC, POSTINGS_FILE,
    POSTINGS_MAGIC, POSTINGS_TOTAL_OFFSET,
};
use crate::codec::BinaryWriter;
use crate::error::{QuarryError, Result};

/// Forward-metadata row for one document
#[derive(Debug, Clone)]
pub struct DocMetaRow {
    pub title: String,
    pub url: String,
}

/// Writer for a complete index directory.
pub struct IndexWriter {
    dir: PathBuf,
}

impl IndexWriter {
    /// Prepare an output directory, creating it if absent.
    pub fn create(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| QuarryError::io(dir, e))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Write all three files. `entries` must already be sorted ascending
    /// by term bytes; `metas` iterates in ascending doc id order by
    /// construction. Returns the total posting count.
    pub fn write(
        &self,
        entries: &[(Vec<u8>, Vec<u32>)],
        metas: &BTreeMap<u32, DocMetaRow>,
    ) -> Result<u64> {
        let (offsets, total_postings) = self.write_postings(entries)?;
        self.write_lexicon(entries, &offsets)?;
        self.write_forward(metas)?;
        Ok(total_postings)
    }

    /// Stream every posting list into `postings.bin` in term order and
    /// patch the header total afterwards. Returns the payload byte
    /// offset of each term's list, parallel to `entries`.
    fn write_postings(&self, entries: &[(Vec<u8>, Vec<u32>)]) -> Result<(Vec<u64>, u64)> {
        let mut w = BinaryWriter::create(&self.dir.join(POSTINGS_FILE))?;
        w.write_u32(POSTINGS_MAGIC)?;
        w.write_u32(FORMAT_VERSION)?;
        w.write_u64(0)?; // total, patched below

        let mut offsets = Vec::with_capacity(entries.len());
        let mut offset = 0u64;
        let mut total = 0u64;
        for (_, postings) in entries {
            offsets.push(offset);
            for &doc_id in postings {
                w.write_u32(doc_id)?;
            }
            offset += postings.len() as u64 * 4;
            total += postings.len() as u64;
        }

        w.patch_u64(POSTINGS_TOTAL_OFFSET, total)?;
        w.finish()?;
        debug!(terms = entries.len(), total_postings = total, "wrote postings payload");
        Ok((offsets, total))
    }

    fn write_lexicon(&self, entries: &[(Vec<u8>, Vec<u32>)], offsets: &[u64]) -> Result<()> {
        let mut w = BinaryWriter::create(&self.dir.join(LEXICON_FILE))?;
        w.write_u32(LEXICON_MAGIC)?;
        w.write_u32(FORMAT_VERSION)?;
        w.write_u32(entries.len() as u32)?;

        for ((term, postings), &offset) in entries.iter().zip(offsets) {
            w.write_str16(term)?;
            w.write_u64(offset)?;
            w.write_u32(postings.len() as u32)?;
        }
        w.finish()
    }

    fn write_forward(&self, metas: &BTreeMap<u32, DocMetaRow>) -> Result<()> {
        let max_doc_id = metas.keys().next_back().copied().unwrap_or(0);

        let mut w = BinaryWriter::create(&self.dir.join(FORWARD_FILE))?;
        w.write_u32(FORWARD_MAGIC)?;
        w.write_u32(FORMAT_VERSION)?;
        w.write_u32(metas.len() as u32)?;
        w.write_u32(max_doc_id)?;

        for (&doc_id, row) in metas {
            let title = clamp16(row.title.as_bytes());
            let url = clamp16(row.url.as_bytes());
            w.write_u32(doc_id)?;
            w.write_u16(title.len() as u16)?;
            w.write_u16(url.len() as u16)?;
            w.write_bytes(title)?;
            w.write_bytes(url)?;
        }
        w.finish()
    }
}

/// Truncate a field to what a u16 length prefix can describe
fn clamp16(bytes: &[u8]) -> &[u8] {
    &bytes[..bytes.len().min(u16::MAX as usize)]
}
