//! Shunting-yard parser producing postfix (RPN) token order.
//!
//! # Grammar
//!
//! ```text
//! query   := or_expr
//! or_expr := and_expr (`||` and_expr)*
//! and_expr:= not_expr (`&&` not_expr)*
//! not_expr:= `!`* primary
//! primary := TERM | `(` or_expr `)`
//! ```
//!
//! Operator precedence: `!` (3, right-associative) binds tighter than
//! `&&` (2, left) which binds tighter than `||` (1, left). The output
//! keeps only terms and operators; parentheses are consumed by the
//! stack discipline and any imbalance fails the parse.

use super::lexer::Token;
use crate::error::{QuarryError, Result};

fn precedence(tok: &Token) -> u8 {
    match tok {
        Token::Not => 3,
        Token::And => 2,
        Token::Or => 1,
        _ => 0,
    }
}

fn is_right_assoc(tok: &Token) -> bool {
    matches!(tok, Token::Not)
}

/// Rearrange an infix token stream into postfix order.
pub fn to_rpn(tokens: Vec<Token>) -> Result<Vec<Token>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut ops: Vec<Token> = Vec::new();

    for tok in tokens {
        match tok {
            Token::Term(_) => output.push(tok),
            Token::And | Token::Or | Token::Not => {
                while let Some(top) = ops.last() {
                    if !matches!(top, Token::And | Token::Or | Token::Not) {
                        break;
                    }
                    let p_top = precedence(top);
                    let p_cur = precedence(&tok);
                    if p_top > p_cur || (p_top == p_cur && !is_right_assoc(&tok)) {
                        output.push(ops.pop().unwrap());
                    } else {
                        break;
                    }
                }
                ops.push(tok);
            }
            Token::LParen => ops.push(tok),
            Token::RParen => loop {
                match ops.pop() {
                    Some(Token::LParen) => break,
                    Some(op) => output.push(op),
                    None => return Err(QuarryError::UnbalancedParentheses),
                }
            },
        }
    }

    while let Some(op) = ops.pop() {
        if matches!(op, Token::LParen) {
            return Err(QuarryError::UnbalancedParentheses);
        }
        output.push(op);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::super::lexer::tokenize;
    use super::*;

    fn rpn_of(query: &str) -> Vec<String> {
        to_rpn(tokenize(query))
            .unwrap()
            .into_iter()
            .map(|t| match t {
                Token::Term(s) => s,
                Token::And => "&&".to_string(),
                Token::Or => "||".to_string(),
                Token::Not => "!".to_string(),
                Token::LParen | Token::RParen => unreachable!("parens never reach RPN"),
            })
            .collect()
    }

    #[test]
    fn test_single_term() {
        assert_eq!(rpn_of("alpha"), ["alpha"]);
    }

    #[test]
    fn test_and_is_left_associative() {
        assert_eq!(rpn_of("a && b && c"), ["a", "b", "&&", "c", "&&"]);
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        assert_eq!(rpn_of("a || b && c"), ["a", "b", "c", "&&", "||"]);
        assert_eq!(rpn_of("a && b || c"), ["a", "b", "&&", "c", "||"]);
    }

    #[test]
    fn test_parens_override_precedence() {
        assert_eq!(rpn_of("(a || b) && c"), ["a", "b", "||", "c", "&&"]);
    }

    #[test]
    fn test_not_binds_tightest() {
        assert_eq!(rpn_of("!a && b"), ["a", "!", "b", "&&"]);
        assert_eq!(rpn_of("!(a || b)"), ["a", "b", "||", "!"]);
    }

    #[test]
    fn test_double_negation_is_right_associative() {
        assert_eq!(rpn_of("!!a"), ["a", "!", "!"]);
    }

    #[test]
    fn test_unmatched_right_paren() {
        let err = to_rpn(tokenize("a && b)")).unwrap_err();
        assert!(matches!(err, QuarryError::UnbalancedParentheses));
    }

    #[test]
    fn test_unmatched_left_paren() {
        let err = to_rpn(tokenize("(a && b")).unwrap_err();
        assert!(matches!(err, QuarryError::UnbalancedParentheses));
    }

    #[test]
    fn test_empty_input() {
        assert!(to_rpn(Vec::new()).unwrap().is_empty());
    }
}
