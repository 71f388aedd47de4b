//! Immutable positional view over a token sequence
//!
//! A [`Cursor`] is a slice reference plus an offset, so copying one is free and
//! every grammar rule takes and returns cursors by value. Advancing never
//! mutates the receiver: a rule that turns out not to apply just drops the
//! cursor it advanced, and the caller retries from the one it still holds.

use crate::parser::parse::ParseError;
use crate::parser::token::{Keyword, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'t> {
    tokens: &'t [Token],
    offset: usize,
}

impl<'t> Cursor<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, offset: 0 }
    }

    /// Position of the next unconsumed token within the whole sequence.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.offset
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.tokens.len()
    }

    /// The unconsumed tokens.
    pub fn rest(&self) -> &'t [Token] {
        &self.tokens[self.offset..]
    }

    /// Token `n` places ahead of the current position.
    pub fn peek(&self, n: usize) -> Result<&'t Token, ParseError> {
        self.lookahead(n).ok_or(ParseError::OutOfTokens {
            offset: self.offset + n,
        })
    }

    /// Like [`peek`](Self::peek), but `None` past the end instead of an error.
    pub fn lookahead(&self, n: usize) -> Option<&'t Token> {
        self.tokens.get(self.offset + n)
    }

    /// A new cursor `n` tokens further along, clamped to the end.
    pub fn advance(self, n: usize) -> Self {
        Self {
            tokens: self.tokens,
            offset: (self.offset + n).min(self.tokens.len()),
        }
    }

    pub fn matches_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.lookahead(0), Some(Token::Keyword(kw)) if *kw == keyword)
    }

    pub fn matches_symbol(&self, symbol: char) -> bool {
        matches!(self.lookahead(0), Some(Token::Symbol(sym)) if *sym == symbol)
    }

    pub fn matches_identifier(&self) -> bool {
        matches!(self.lookahead(0), Some(Token::Identifier(_)))
    }

    // ===== Assertive helpers for committed rules =====

    pub(crate) fn expect_keyword(self, keyword: Keyword, ctx: &str) -> Result<Self, ParseError> {
        if self.matches_keyword(keyword) {
            Ok(self.advance(1))
        } else {
            Err(self.unexpected(format!("'{}' {}", keyword, ctx)))
        }
    }

    pub(crate) fn expect_symbol(self, symbol: char, ctx: &str) -> Result<Self, ParseError> {
        if self.matches_symbol(symbol) {
            Ok(self.advance(1))
        } else {
            Err(self.unexpected(format!("'{}' {}", symbol, ctx)))
        }
    }

    pub(crate) fn expect_identifier(self, ctx: &str) -> Result<(String, Self), ParseError> {
        match self.lookahead(0) {
            Some(Token::Identifier(name)) => Ok((name.clone(), self.advance(1))),
            _ => Err(self.unexpected(format!("identifier {}", ctx))),
        }
    }

    /// Succeed only if every token has been consumed.
    pub fn expect_end(&self, unit: &'static str) -> Result<(), ParseError> {
        match self.lookahead(0) {
            None => Ok(()),
            Some(found) => Err(ParseError::TrailingTokens {
                unit,
                found: found.clone(),
                offset: self.offset,
                remaining: self.remaining(),
            }),
        }
    }

    /// Error describing the current token as not being `expected`.
    pub fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        match self.lookahead(0) {
            Some(found) => ParseError::Unexpected {
                expected: expected.into(),
                found: found.clone(),
                offset: self.offset,
            },
            None => ParseError::OutOfTokens {
                offset: self.offset,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Vec<Token> {
        vec![
            Token::Keyword(Keyword::Let),
            Token::Identifier("x".to_string()),
            Token::Symbol('='),
            Token::IntegerLiteral(1),
            Token::Symbol(';'),
        ]
    }

    #[test]
    fn test_advance_leaves_receiver_untouched() {
        let tokens = tokens();
        let start = Cursor::new(&tokens);
        let moved = start.advance(2);

        assert_eq!(start.offset(), 0);
        assert_eq!(moved.offset(), 2);
        assert_eq!(moved.peek(0).unwrap(), &Token::Symbol('='));
        assert_eq!(start.peek(2).unwrap(), &Token::Symbol('='));
        assert_eq!(moved.remaining(), 3);
    }

    #[test]
    fn test_peek_past_end() {
        let tokens = tokens();
        let cursor = Cursor::new(&tokens).advance(4);

        assert!(cursor.peek(0).is_ok());
        assert_eq!(cursor.peek(1), Err(ParseError::OutOfTokens { offset: 5 }));
        assert!(cursor.advance(1).is_at_end());
        assert!(cursor.advance(10).is_at_end());
    }

    #[test]
    fn test_matches_do_not_advance() {
        let tokens = tokens();
        let cursor = Cursor::new(&tokens);

        assert!(cursor.matches_keyword(Keyword::Let));
        assert!(!cursor.matches_keyword(Keyword::Do));
        assert!(!cursor.matches_symbol('='));
        assert!(cursor.advance(2).matches_symbol('='));
        assert_eq!(cursor.offset(), 0);
        assert!(!cursor.advance(5).matches_symbol(';'));
    }

    #[test]
    fn test_expect_helpers() {
        let tokens = tokens();
        let cursor = Cursor::new(&tokens);

        let cursor = cursor.expect_keyword(Keyword::Let, "to start").unwrap();
        let (name, cursor) = cursor.expect_identifier("after 'let'").unwrap();
        assert_eq!(name, "x");

        let err = cursor.expect_symbol('[', "after variable").unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected '[' after variable, found '=' at token 2"
        );
    }

    #[test]
    fn test_expect_end() {
        let tokens = tokens();
        let cursor = Cursor::new(&tokens);

        assert!(cursor.advance(5).expect_end("statement").is_ok());
        match cursor.advance(4).expect_end("statement") {
            Err(ParseError::TrailingTokens { remaining, offset, .. }) => {
                assert_eq!(remaining, 1);
                assert_eq!(offset, 4);
            }
            other => panic!("Expected trailing tokens error, got {:?}", other),
        }
    }
}
