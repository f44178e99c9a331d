//! Postfix evaluation against a loaded index.
//!
//! The evaluation stack carries owned posting lists; operands are moved
//! out on pop and dropped as soon as an operator has consumed them.

use super::lexer::Token;
use crate::error::{QuarryError, Result};
use crate::index::IndexReader;
use crate::postings;

/// Evaluate a postfix token sequence into one posting list.
///
/// A term absent from the lexicon contributes an empty list. `!` takes
/// its operand's complement over the metadata universe. Operand
/// underflow, or anything but exactly one list left at the end, means
/// the expression was malformed.
pub fn eval_rpn(reader: &IndexReader, rpn: &[Token]) -> Result<Vec<u32>> {
    let mut stack: Vec<Vec<u32>> = Vec::new();

    for tok in rpn {
        match tok {
            Token::Term(term) => {
                let list = match reader.lookup(term.as_bytes()) {
                    Some(entry) => reader.postings(entry)?,
                    None => Vec::new(),
                };
                stack.push(list);
            }
            Token::Not => {
                let a = stack.pop().ok_or(QuarryError::MalformedExpression)?;
                stack.push(postings::complement(&a, reader.universe()));
            }
            Token::And | Token::Or => {
                let b = stack.pop().ok_or(QuarryError::MalformedExpression)?;
                let a = stack.pop().ok_or(QuarryError::MalformedExpression)?;
                let merged = match tok {
                    Token::And => postings::intersect(&a, &b),
                    _ => postings::union(&a, &b),
                };
                stack.push(merged);
            }
            Token::LParen | Token::RParen => return Err(QuarryError::MalformedExpression),
        }
    }

    if stack.len() != 1 {
        return Err(QuarryError::MalformedExpression);
    }
    Ok(stack.pop().unwrap())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use tempfile::TempDir;

    use super::super::{lexer, parser};
    use super::*;
    use crate::index::writer::{DocMetaRow, IndexWriter};

    /// Index: alpha -> [1,2,3], beta -> [2,3,4], gamma -> [1,5];
    /// universe 1..=5.
    fn sample_reader(tmp: &TempDir) -> IndexReader {
        let entries = vec![
            (b"alpha".to_vec(), vec![1, 2, 3]),
            (b"beta".to_vec(), vec![2, 3, 4]),
            (b"gamma".to_vec(), vec![1, 5]),
        ];
        let mut metas = BTreeMap::new();
        for id in 1u32..=5 {
            metas.insert(
                id,
                DocMetaRow {
                    title: format!("Doc {id}"),
                    url: format!("https://example.org/{id}"),
                },
            );
        }
        IndexWriter::create(tmp.path())
            .unwrap()
            .write(&entries, &metas)
            .unwrap();
        IndexReader::open(tmp.path()).unwrap()
    }

    fn eval(reader: &IndexReader, query: &str) -> Result<Vec<u32>> {
        eval_rpn(reader, &parser::to_rpn(lexer::tokenize(query))?)
    }

    #[test]
    fn test_single_term() {
        let tmp = TempDir::new().unwrap();
        let reader = sample_reader(&tmp);
        assert_eq!(eval(&reader, "alpha").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_unknown_term_is_empty() {
        let tmp = TempDir::new().unwrap();
        let reader = sample_reader(&tmp);
        assert_eq!(eval(&reader, "zeta").unwrap(), Vec::<u32>::new());
        assert_eq!(eval(&reader, "alpha && zeta").unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn test_and_or() {
        let tmp = TempDir::new().unwrap();
        let reader = sample_reader(&tmp);
        assert_eq!(eval(&reader, "alpha && beta").unwrap(), vec![2, 3]);
        assert_eq!(eval(&reader, "alpha || beta").unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_not_over_universe() {
        let tmp = TempDir::new().unwrap();
        let reader = sample_reader(&tmp);
        assert_eq!(eval(&reader, "!alpha").unwrap(), vec![4, 5]);
        assert_eq!(eval(&reader, "alpha !beta").unwrap(), vec![1]);
    }

    #[test]
    fn test_grouped_or_inside_and() {
        let tmp = TempDir::new().unwrap();
        let reader = sample_reader(&tmp);
        assert_eq!(eval(&reader, "alpha && (beta || gamma)").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_operand_underflow() {
        let tmp = TempDir::new().unwrap();
        let reader = sample_reader(&tmp);
        assert!(matches!(
            eval(&reader, "&& alpha").unwrap_err(),
            QuarryError::MalformedExpression
        ));
        assert!(matches!(
            eval(&reader, "()").unwrap_err(),
            QuarryError::MalformedExpression
        ));
    }

    #[test]
    fn test_residual_operands_rejected() {
        // Two operands and no operator survive to the end of the walk
        let rpn = vec![
            Token::Term("alpha".to_string()),
            Token::Term("beta".to_string()),
        ];
        let tmp = TempDir::new().unwrap();
        let reader = sample_reader(&tmp);
        assert!(matches!(
            eval_rpn(&reader, &rpn).unwrap_err(),
            QuarryError::MalformedExpression
        ));
    }
}
