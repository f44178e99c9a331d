//! On-disk layout constants shared by the writer and the reader.
//!
//! An index directory holds three separately-versioned files. Each starts
//! with a `u32` magic and a `u32` format version; readers reject any file
//! whose magic or version does not match.

/// `postings.bin` magic, "POST" read as a little-endian u32
pub const POSTINGS_MAGIC: u32 = 0x504F5354;

/// `lexicon.bin` magic, "LEXI"
pub const LEXICON_MAGIC: u32 = 0x4C455849;

/// `forward.bin` magic, "FWRD"
pub const FORWARD_MAGIC: u32 = 0x46575244;

/// Current format version for all three files
pub const FORMAT_VERSION: u32 = 1;

pub const POSTINGS_FILE: &str = "postings.bin";
pub const LEXICON_FILE: &str = "lexicon.bin";
pub const FORWARD_FILE: &str = "forward.bin";

/// Size of the `postings.bin` header: magic, version, total posting count.
/// Byte offsets in lexicon entries are relative to the end of this header.
pub const POSTINGS_HEADER_LEN: usize = 4 + 4 + 8;

/// Byte offset of the `total_posting_count` header slot, patched in place
/// once the payload has been streamed out.
pub const POSTINGS_TOTAL_OFFSET: u64 = 8;
