//! Main parser coordinator
//!
//! This module provides the shared parsing infrastructure: the error type,
//! the result shapes every grammar rule returns, the ordered-alternative
//! dispatcher, and the [`Parser`] facade that owns a token sequence and runs a
//! rule over all of it.
//!
//! # Result shapes
//!
//! Every rule takes a [`Cursor`] by value and returns one of:
//!
//! - [`Parsed`]: `Ok(None)` when the production does not apply at this
//!   position (nothing consumed), `Ok(Some((node, rest)))` on success.
//! - [`Committed`]: the production was already chosen, so anything but
//!   success is a structural violation.
//!
//! A structural violation is always an `Err(ParseError)`; there is no partial
//! result and no recovery.

use crate::parser::ast::*;
use crate::parser::cursor::Cursor;
use crate::parser::declarations::{parse_class, parse_subroutine_declaration};
use crate::parser::expressions::parse_expression;
use crate::parser::lexer::{LexError, Lexer, SourceLocation};
use crate::parser::statements::parse_statements;
use crate::parser::token::{read_tokens, Token, TokenFileError};
use thiserror::Error;
use tracing::{debug, trace};

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A committed rule needed another token but the sequence ended
    #[error("ran out of tokens at token {offset}")]
    OutOfTokens { offset: usize },

    /// A committed rule found the wrong token
    #[error("expected {expected}, found {found} at token {offset}")]
    Unexpected {
        expected: String,
        found: Token,
        offset: usize,
    },

    /// A whole-input parse finished with tokens left over
    #[error("{unit} ends before token {offset}; {remaining} trailing token(s) starting with {found}")]
    TrailingTokens {
        unit: &'static str,
        found: Token,
        offset: usize,
        remaining: usize,
    },
}

impl ParseError {
    /// Index of the offending token.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::OutOfTokens { offset }
            | ParseError::Unexpected { offset, .. }
            | ParseError::TrailingTokens { offset, .. } => *offset,
        }
    }
}

/// Result of a rule that was committed to before it started.
pub type Committed<'t, T> = Result<(T, Cursor<'t>), ParseError>;

/// Result of an optional rule: `Ok(None)` means "does not apply here".
pub type Parsed<'t, T> = Result<Option<(T, Cursor<'t>)>, ParseError>;

/// One entry of an ordered dispatch table.
///
/// `applies` looks ahead without consuming; once it says yes, `parse` owns the
/// production and any mismatch inside it is fatal.
pub(crate) struct Alternative<T> {
    pub name: &'static str,
    pub applies: for<'t> fn(Cursor<'t>) -> bool,
    pub parse: for<'t> fn(Cursor<'t>) -> Committed<'t, T>,
}

/// Run the first alternative whose lookahead matches.
pub(crate) fn first_match<'t, T>(
    cursor: Cursor<'t>,
    alternatives: &[Alternative<T>],
) -> Parsed<'t, T> {
    for alternative in alternatives {
        if (alternative.applies)(cursor) {
            trace!(
                rule = alternative.name,
                offset = cursor.offset(),
                "alternative selected"
            );
            return (alternative.parse)(cursor).map(Some);
        }
    }
    Ok(None)
}

/// Apply an optional rule until it stops matching. Zero matches is fine.
pub(crate) fn many<'t, T>(
    mut cursor: Cursor<'t>,
    rule: impl Fn(Cursor<'t>) -> Parsed<'t, T>,
) -> Committed<'t, Vec<T>> {
    let mut items = Vec::new();
    while let Some((item, next)) = rule(cursor)? {
        items.push(item);
        cursor = next;
    }
    Ok((items, cursor))
}

/// Require an optional rule to match, and then to have consumed everything.
pub fn complete<'t, T>(
    unit: &'static str,
    cursor: Cursor<'t>,
    parsed: Parsed<'t, T>,
) -> Result<T, ParseError> {
    match parsed? {
        Some((node, rest)) => {
            rest.expect_end(unit)?;
            Ok(node)
        }
        None => Err(cursor.unexpected(unit)),
    }
}

/// Error produced while building a [`Parser`] from raw input
#[derive(Debug, Error)]
pub enum InputError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    TokenFile(#[from] TokenFileError),
}

/// Owns a token sequence and runs grammar rules over all of it.
#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    locations: Option<Vec<SourceLocation>>,
}

impl Parser {
    /// Tokenize Jack source text.
    pub fn new(source: &str) -> Result<Self, InputError> {
        let located = Lexer::new(source).tokenize_located()?;
        let (tokens, locations): (Vec<_>, Vec<_>) = located.into_iter().unzip();
        debug!(tokens = tokens.len(), "tokenized source");
        Ok(Self {
            tokens,
            locations: Some(locations),
        })
    }

    /// Decode a `"<kind> <payload>"` token file.
    pub fn from_token_file(text: &str) -> Result<Self, InputError> {
        let tokens = read_tokens(text)?;
        debug!(tokens = tokens.len(), "read token file");
        Ok(Self::from_tokens(tokens))
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            locations: None,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.tokens)
    }

    /// Source location of the token at `offset`, when the tokens came from
    /// source text. Offsets at the end map to the last token.
    pub fn location_of(&self, offset: usize) -> Option<SourceLocation> {
        let locations = self.locations.as_ref()?;
        locations
            .get(offset)
            .or_else(|| locations.last())
            .copied()
    }

    /// Parse the whole input as one class.
    pub fn parse_class(&self) -> Result<ClassDeclaration, ParseError> {
        let cursor = self.cursor();
        complete("class declaration", cursor, parse_class(cursor))
    }

    /// Parse the whole input as one subroutine declaration.
    pub fn parse_subroutine(&self) -> Result<SubroutineDeclaration, ParseError> {
        let cursor = self.cursor();
        complete(
            "subroutine declaration",
            cursor,
            parse_subroutine_declaration(cursor),
        )
    }

    /// Parse the whole input as a (possibly empty) statement block.
    pub fn parse_statements(&self) -> Result<Vec<Statement>, ParseError> {
        let cursor = self.cursor();
        complete("statements", cursor, parse_statements(cursor).map(Some))
    }

    /// Parse the whole input as one expression.
    pub fn parse_expression(&self) -> Result<Expression, ParseError> {
        let cursor = self.cursor();
        complete("expression", cursor, parse_expression(cursor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::token::Keyword;

    #[test]
    fn test_parse_simple_class() {
        let source = "class Main { function void main() { return; } }";
        let parser = Parser::new(source).unwrap();
        let class = parser.parse_class().unwrap();

        assert_eq!(class.name, "Main");
        assert!(class.variables.is_empty());
        assert_eq!(class.subroutines.len(), 1);

        let main = &class.subroutines[0];
        assert_eq!(main.name, "main");
        assert_eq!(main.kind, SubroutineKind::Function);
        assert_eq!(main.return_type, None);
        assert_eq!(main.statements, vec![Statement::Return(None)]);
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let parser = Parser::new("x + 1 )").unwrap();
        let err = parser.parse_expression().unwrap_err();

        assert!(matches!(
            err,
            ParseError::TrailingTokens {
                unit: "expression",
                offset: 3,
                remaining: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_unit_is_reported() {
        let parser = Parser::new("let x = 1;").unwrap();
        let err = parser.parse_class().unwrap_err();

        assert_eq!(
            err,
            ParseError::Unexpected {
                expected: "class declaration".to_string(),
                found: Token::Keyword(Keyword::Let),
                offset: 0,
            }
        );
    }

    #[test]
    fn test_empty_input() {
        let parser = Parser::from_tokens(Vec::new());

        assert_eq!(parser.parse_statements().unwrap(), Vec::new());
        assert_eq!(
            parser.parse_expression().unwrap_err(),
            ParseError::OutOfTokens { offset: 0 }
        );
    }

    #[test]
    fn test_location_of_error() {
        let source = "class Main {\n  field int x\n}";
        let parser = Parser::new(source).unwrap();
        let err = parser.parse_class().unwrap_err();

        assert_eq!(err.offset(), 6);
        assert_eq!(parser.location_of(err.offset()), Some(SourceLocation::new(3, 1)));
    }

    #[test]
    fn test_token_file_input() {
        let text = "keyword return\nidentifier x\nsymbol ;\n";
        let parser = Parser::from_token_file(text).unwrap();

        assert_eq!(parser.location_of(0), None);
        let statements = parser.parse_statements().unwrap();
        assert_eq!(statements.len(), 1);
    }
}
