//! In-memory term accumulator used while indexing.
//!
//! An open-addressed hash table with linear probing, keyed by term bytes.
//! Each occupied slot owns the term's growing posting list plus the last
//! doc id appended, which is all the dedupe state needed while a
//! document's tokens arrive contiguously.

use crate::error::{QuarryError, Result};

/// Smallest capacity the table will be created with
pub const MIN_CAPACITY: usize = 1024;

/// Default capacity when the operator does not override it
pub const DEFAULT_CAPACITY: usize = 1 << 20;

struct TermSlot {
    term: Vec<u8>,
    postings: Vec<u32>,
    last_doc_id: u32,
}

/// Open-addressed term table with linear probing.
///
/// Capacity is fixed at construction; the table never rehashes. A probe
/// that wraps all the way around fails with `TermTableFull` so the
/// operator can rebuild with a larger capacity instead of silently
/// losing vocabulary.
pub struct TermTable {
    slots: Vec<Option<TermSlot>>,
    mask: usize,
    len: usize,
    hasher: ahash::RandomState,
}

impl TermTable {
    /// Create a table with at least `requested` slots, rounded up to a
    /// power of two with a floor of [`MIN_CAPACITY`].
    pub fn with_capacity(requested: usize) -> Self {
        let capacity = requested.max(MIN_CAPACITY).next_power_of_two();
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            mask: capacity - 1,
            len: 0,
            hasher: ahash::RandomState::new(),
        }
    }

    /// Number of distinct terms stored
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slot count
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Record one occurrence of `term` in `doc_id`.
    ///
    /// Repeated occurrences within the same document collapse via the
    /// last-doc-id check; a doc id smaller than the last one recorded
    /// means the input stream broke its ordering contract.
    pub fn add(&mut self, term: &[u8], doc_id: u32) -> Result<()> {
        let mut idx = (self.hasher.hash_one(term) as usize) & self.mask;

        for _ in 0..self.slots.len() {
            match &mut self.slots[idx] {
                slot @ None => {
                    *slot = Some(TermSlot {
                        term: term.to_vec(),
                        postings: vec![doc_id],
                        last_doc_id: doc_id,
                    });
                    self.len += 1;
                    return Ok(());
                }
                Some(slot) if slot.term == term => {
                    if slot.last_doc_id == doc_id {
                        return Ok(());
                    }
                    if doc_id < slot.last_doc_id {
                        return Err(QuarryError::UnorderedDocIds {
                            term: String::from_utf8_lossy(term).into_owned(),
                            prev: slot.last_doc_id,
                            next: doc_id,
                        });
                    }
                    slot.postings.push(doc_id);
                    slot.last_doc_id = doc_id;
                    return Ok(());
                }
                Some(_) => {
                    idx = (idx + 1) & self.mask;
                }
            }
        }

        Err(QuarryError::TermTableFull {
            capacity: self.slots.len(),
        })
    }

    /// Drain the table into `(term, postings)` pairs in ascending term
    /// order, ready for serialization.
    pub fn into_sorted_entries(self) -> Vec<(Vec<u8>, Vec<u32>)> {
        let mut entries: Vec<(Vec<u8>, Vec<u32>)> = self
            .slots
            .into_iter()
            .flatten()
            .map(|slot| (slot.term, slot.postings))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}
