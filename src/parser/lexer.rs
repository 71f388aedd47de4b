//! Lexer (tokenizer) for Jack source code
//!
//! Converts raw source text into the flat [`Token`] stream consumed by the
//! grammar. Whitespace, `//` line comments and `/* */` / `/** */` block
//! comments are discarded.

use super::token::{Keyword, Token, MAX_INTEGER, SYMBOLS};
use std::fmt;
use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexer error at {location}: {message}")]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl LexError {
    fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

/// Lexer for Jack source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        Ok(self
            .tokenize_located()?
            .into_iter()
            .map(|(token, _)| token)
            .collect())
    }

    /// Tokenize the entire input, keeping the location each token starts at.
    pub fn tokenize_located(&mut self) -> Result<Vec<(Token, SourceLocation)>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_trivia()?;

            let loc = self.current_location();
            let Some(ch) = self.bump() else {
                break;
            };
            tokens.push((self.token_starting_with(ch, loc)?, loc));
        }

        Ok(tokens)
    }

    fn token_starting_with(&mut self, ch: char, loc: SourceLocation) -> Result<Token, LexError> {
        match ch {
            '"' => self.string_literal(loc),
            '0'..='9' => self.integer_literal(ch, loc),
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.word(ch)),
            _ if SYMBOLS.contains(&ch) => Ok(Token::Symbol(ch)),
            _ => Err(LexError::new(format!("Unexpected character: '{}'", ch), loc)),
        }
    }

    /// Body of a string literal after its opening quote; no escapes, no line breaks
    fn string_literal(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let mut text = String::new();

        loop {
            match self.char_at(0) {
                Some('"') => {
                    self.bump();
                    return Ok(Token::StringLiteral(text));
                }
                Some(ch) if ch != '\n' && ch != '\r' => {
                    text.push(ch);
                    self.bump();
                }
                _ => return Err(LexError::new("Unterminated string literal", loc)),
            }
        }
    }

    fn integer_literal(&mut self, first: char, loc: SourceLocation) -> Result<Token, LexError> {
        let digits = self.take_while(first, |ch| ch.is_ascii_digit());

        match digits.parse::<u16>() {
            Ok(n) if n <= MAX_INTEGER => Ok(Token::IntegerLiteral(n)),
            _ => Err(LexError::new(
                format!("Integer literal {} is outside 0..={}", digits, MAX_INTEGER),
                loc,
            )),
        }
    }

    fn word(&mut self, first: char) -> Token {
        let word = self.take_while(first, |ch| ch.is_ascii_alphanumeric() || ch == '_');

        match Keyword::from_word(&word) {
            Some(kw) => Token::Keyword(kw),
            None => Token::Identifier(word),
        }
    }

    fn take_while(&mut self, first: char, accept: impl Fn(char) -> bool) -> String {
        let mut text = String::from(first);
        while let Some(ch) = self.char_at(0).filter(|ch| accept(*ch)) {
            text.push(ch);
            self.bump();
        }
        text
    }

    /// Skip whitespace, `//` comments and `/* */` comments (`/** */` included).
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match (self.char_at(0), self.char_at(1)) {
                (Some(ch), _) if ch.is_ascii_whitespace() => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    while !matches!(self.bump(), Some('\n') | None) {}
                }
                (Some('/'), Some('*')) => {
                    let start = self.current_location();
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.char_at(0) == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => return Err(LexError::new("Unterminated block comment", start)),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn char_at(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Consume one character, tracking line and column.
    fn bump(&mut self) -> Option<char> {
        let ch = self.char_at(0)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}
