//! Set algebra over posting lists.
//!
//! A posting list is a strictly-ascending sequence of doc ids with no
//! duplicates. All three operations are single-pass merge walks; none of
//! them allocate hash state, and each output is again strictly ascending.

/// Intersection of two posting lists.
pub fn intersect(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            out.push(a[i]);
            i += 1;
            j += 1;
        } else if a[i] < b[j] {
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}

/// Union of two posting lists, deduplicating on equal heads.
pub fn union(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            out.push(a[i]);
            i += 1;
            j += 1;
        } else if a[i] < b[j] {
            out.push(a[i]);
            i += 1;
        } else {
            out.push(b[j]);
            j += 1;
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// Complement of `a` within `universe`.
///
/// Emits every universe member absent from `a`. Members of `a` outside
/// the universe are skipped rather than assumed away: `a` may contain doc
/// ids that never received forward metadata.
pub fn complement(a: &[u32], universe: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(universe.len());
    let (mut i, mut j) = (0, 0);
    while i < universe.len() {
        if j >= a.len() {
            out.push(universe[i]);
            i += 1;
        } else if universe[i] == a[j] {
            i += 1;
            j += 1;
        } else if universe[i] < a[j] {
            out.push(universe[i]);
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}
