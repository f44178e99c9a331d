//! Suffix-stripping stemmer shared with the corpus pipeline.
//!
//! A fixed, order-sensitive rule cascade over lowercase ASCII terms. The
//! exact same cascade runs upstream when documents are stemmed, so any
//! change here must be mirrored there: a one-sided change silently
//! destroys recall because query terms stop matching indexed terms.

/// Stem a single lowercase ASCII token.
///
/// Terms of two bytes or fewer are returned unchanged. Otherwise the
/// first matching rule wins:
///
/// `-ingly` (n >= 6), `-edly` (n >= 5), `-ing` (n >= 5), `-ed` (n >= 4),
/// `-ies` (n >= 5, rewritten to `-y`), `-es` (n >= 4), `-ly` (n >= 4),
/// then a bare trailing `s` (n >= 4).
pub fn stem(term: &str) -> String {
    let mut out = term.to_string();
    stem_in_place(&mut out);
    out
}

/// In-place variant of [`stem`] for callers that own the buffer.
pub fn stem_in_place(term: &mut String) {
    let n = term.len();
    if n <= 2 {
        return;
    }

    if n >= 6 && term.ends_with("ingly") {
        term.truncate(n - 5);
    } else if n >= 5 && term.ends_with("edly") {
        term.truncate(n - 4);
    } else if n >= 5 && term.ends_with("ing") {
        term.truncate(n - 3);
    } else if n >= 4 && term.ends_with("ed") {
        term.truncate(n - 2);
    } else if n >= 5 && term.ends_with("ies") {
        // "studies" -> "study": drop the suffix, restore the y
        term.truncate(n - 3);
        term.push('y');
    } else if n >= 4 && term.ends_with("es") {
        term.truncate(n - 2);
    } else if n >= 4 && term.ends_with("ly") {
        term.truncate(n - 2);
    } else if n >= 4 && term.ends_with('s') {
        term.truncate(n - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_terms_unchanged() {
        assert_eq!(stem(""), "");
        assert_eq!(stem("a"), "a");
        assert_eq!(stem("as"), "as");
        assert_eq!(stem("gas"), "gas");
    }

    #[test]
    fn test_ingly() {
        assert_eq!(stem("amazingly"), "amaz");
        assert_eq!(stem("singly"), "s");
    }

    #[test]
    fn test_edly() {
        assert_eq!(stem("markedly"), "mark");
    }

    #[test]
    fn test_ing() {
        assert_eq!(stem("running"), "runn");
        assert_eq!(stem("going"), "go");
        // Four-letter -ing words are left alone
        assert_eq!(stem("king"), "king");
    }

    #[test]
    fn test_ed() {
        assert_eq!(stem("crawled"), "crawl");
        assert_eq!(stem("used"), "us");
    }

    #[test]
    fn test_ies_rewrites_y() {
        assert_eq!(stem("studies"), "study");
        assert_eq!(stem("queries"), "query");
        // Four letters is too short for -ies; the -es rule fires instead
        assert_eq!(stem("ties"), "ti");
    }

    #[test]
    fn test_es() {
        assert_eq!(stem("boxes"), "box");
        assert_eq!(stem("goes"), "go");
    }

    #[test]
    fn test_ly() {
        assert_eq!(stem("slowly"), "slow");
    }

    #[test]
    fn test_trailing_s() {
        assert_eq!(stem("documents"), "document");
        assert_eq!(stem("cats"), "cat");
    }

    #[test]
    fn test_first_match_wins() {
        // -ing beats the trailing s rule only when it matches first;
        // "postings" ends with s, not ing
        assert_eq!(stem("postings"), "posting");
    }

    #[test]
    fn test_idempotent_on_stemmed_corpus_sample() {
        for word in ["runn", "crawl", "box", "document", "study"] {
            let once = stem(word);
            assert_eq!(stem(&once), once, "restem of {word:?} diverged");
        }
    }
}
