//! Fixed-width little-endian encode/decode for the on-disk index formats.
//!
//! Every multi-byte integer in the index files is little-endian. Strings
//! are length-prefixed with a `u16` and carry no terminator or encoding
//! header.

use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use crate::error::{QuarryError, Result};

/// Read cursor over a borrowed byte buffer.
///
/// Reads that would run past the end of the buffer fail with
/// `TruncatedFile` carrying the label passed at construction.
pub struct SliceReader<'a> {
    buf: &'a [u8],
    pos: usize,
    label: &'a str,
}

impl<'a> SliceReader<'a> {
    pub fn new(buf: &'a [u8], label: &'a str) -> Self {
        Self { buf, pos: 0, label }
    }

    /// Current cursor position in bytes
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(QuarryError::TruncatedFile {
                file: self.label.to_string(),
            });
        }
        let out = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    /// Read `len` raw bytes
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.take(len)
    }

    /// Read a `u16`-length-prefixed byte string
    pub fn read_str16(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u16()? as usize;
        self.take(len)
    }
}

/// Buffered little-endian writer for index files.
///
/// Writes are buffered; callers must invoke [`BinaryWriter::finish`]
/// before dropping the writer or trailing bytes may be lost.
pub struct BinaryWriter<W: Write + Seek> {
    out: W,
    path: PathBuf,
}

impl BinaryWriter<BufWriter<File>> {
    /// Create (truncating) a file at `path`
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| QuarryError::io(path, e))?;
        Ok(Self {
            out: BufWriter::new(file),
            path: path.to_path_buf(),
        })
    }
}

impl<W: Write + Seek> BinaryWriter<W> {
    pub fn new(out: W, path: impl Into<PathBuf>) -> Self {
        Self {
            out,
            path: path.into(),
        }
    }

    fn io_err(&self, e: std::io::Error) -> QuarryError {
        QuarryError::io(&self.path, e)
    }

    pub fn write_u16(&mut self, v: u16) -> Result<()> {
        self.out
            .write_u16::<LittleEndian>(v)
            .map_err(|e| self.io_err(e))
    }

    pub fn write_u32(&mut self, v: u32) -> Result<()> {
        self.out
            .write_u32::<LittleEndian>(v)
            .map_err(|e| self.io_err(e))
    }

    pub fn write_u64(&mut self, v: u64) -> Result<()> {
        self.out
            .write_u64::<LittleEndian>(v)
            .map_err(|e| self.io_err(e))
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.out.write_all(bytes).map_err(|e| self.io_err(e))
    }

    /// Write a `u16`-length-prefixed byte string, truncating at 65,535 bytes
    pub fn write_str16(&mut self, bytes: &[u8]) -> Result<()> {
        let len = bytes.len().min(u16::MAX as usize);
        self.write_u16(len as u16)?;
        self.write_bytes(&bytes[..len])
    }

    /// Rewrite a `u64` slot at an absolute byte offset.
    ///
    /// Used to patch header fields whose value is only known once the
    /// payload has streamed out. Leaves the cursor at the end of the
    /// patched slot.
    pub fn patch_u64(&mut self, offset: u64, v: u64) -> Result<()> {
        self.out
            .seek(SeekFrom::Start(offset))
            .map_err(|e| self.io_err(e))?;
        self.write_u64(v)
    }

    /// Flush buffered bytes to the underlying file
    pub fn finish(mut self) -> Result<()> {
        self.out.flush().map_err(|e| self.io_err(e))
    }
}
