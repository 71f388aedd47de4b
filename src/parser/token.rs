//! Token model shared by every token producer and the grammar
//!
//! A [`Token`] is the tagged unit the grammar consumes. Tokens come either from
//! the source [`lexer`](super::lexer) or from a token file, a line-oriented
//! encoding with one `"<kind> <payload>"` entry per line:
//!
//! ```text
//! keyword class
//! identifier Main
//! symbol {
//! number 42
//! string hello world
//! ```
//!
//! [`read_tokens`] decodes that format and [`write_tokens`] produces it.

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Largest integer constant the language accepts.
pub const MAX_INTEGER: u16 = 32767;

/// Every single-character symbol the language uses.
pub const SYMBOLS: &[char] = &[
    '{', '}', '(', ')', '[', ']', '.', ',', ';', '+', '-', '*', '/', '&', '|', '<', '>', '=', '~',
];

/// Reserved words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Class,
    Constructor,
    Function,
    Method,
    Field,
    Static,
    Var,
    Int,
    Char,
    Boolean,
    Void,
    True,
    False,
    Null,
    This,
    Let,
    Do,
    If,
    Else,
    While,
    Return,
}

impl Keyword {
    pub const ALL: [Keyword; 21] = [
        Keyword::Class,
        Keyword::Constructor,
        Keyword::Function,
        Keyword::Method,
        Keyword::Field,
        Keyword::Static,
        Keyword::Var,
        Keyword::Int,
        Keyword::Char,
        Keyword::Boolean,
        Keyword::Void,
        Keyword::True,
        Keyword::False,
        Keyword::Null,
        Keyword::This,
        Keyword::Let,
        Keyword::Do,
        Keyword::If,
        Keyword::Else,
        Keyword::While,
        Keyword::Return,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Class => "class",
            Keyword::Constructor => "constructor",
            Keyword::Function => "function",
            Keyword::Method => "method",
            Keyword::Field => "field",
            Keyword::Static => "static",
            Keyword::Var => "var",
            Keyword::Int => "int",
            Keyword::Char => "char",
            Keyword::Boolean => "boolean",
            Keyword::Void => "void",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
            Keyword::This => "this",
            Keyword::Let => "let",
            Keyword::Do => "do",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::Return => "return",
        }
    }

    /// Look up a reserved word by its spelling.
    ///
    /// Both the lexer and the token file reader classify words through this
    /// one table.
    pub fn from_word(word: &str) -> Option<Self> {
        static TABLE: OnceLock<FxHashMap<&'static str, Keyword>> = OnceLock::new();
        TABLE
            .get_or_init(|| Self::ALL.iter().map(|kw| (kw.as_str(), *kw)).collect())
            .get(word)
            .copied()
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token as consumed by the grammar.
///
/// Tokens carry no source location; equality is purely structural so that
/// token sequences from different producers compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Identifier(String),
    Keyword(Keyword),
    Symbol(char),
    IntegerLiteral(u16),
    StringLiteral(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(name) => write!(f, "identifier '{}'", name),
            Token::Keyword(kw) => write!(f, "keyword '{}'", kw),
            Token::Symbol(sym) => write!(f, "'{}'", sym),
            Token::IntegerLiteral(n) => write!(f, "integer {}", n),
            Token::StringLiteral(s) => write!(f, "string \"{}\"", s),
        }
    }
}

/// True if `text` is spelled like an identifier and is not a reserved word.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && Keyword::from_word(text).is_none()
}

/// Token file decoding error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("token file line {line}: {reason}")]
pub struct TokenFileError {
    pub line: usize,
    pub reason: String,
}

impl TokenFileError {
    fn new(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

/// Decode a token file into a token sequence.
pub fn read_tokens(text: &str) -> Result<Vec<Token>, TokenFileError> {
    text.lines()
        .enumerate()
        .map(|(index, raw)| (index + 1, raw.trim_start_matches([' ', '\t'])))
        .filter(|(_, line)| !line.trim_end_matches('\r').is_empty())
        .map(|(line_no, line)| read_token(line_no, line.trim_end_matches('\r')))
        .collect()
}

fn read_token(line_no: usize, line: &str) -> Result<Token, TokenFileError> {
    let (kind, payload) = line
        .split_once(' ')
        .ok_or_else(|| TokenFileError::new(line_no, format!("missing payload in '{}'", line)))?;

    match kind {
        "keyword" => Keyword::from_word(payload)
            .map(Token::Keyword)
            .ok_or_else(|| TokenFileError::new(line_no, format!("unknown keyword '{}'", payload))),
        "symbol" => {
            let mut chars = payload.chars();
            match (chars.next(), chars.next()) {
                (Some(sym), None) if SYMBOLS.contains(&sym) => Ok(Token::Symbol(sym)),
                _ => Err(TokenFileError::new(
                    line_no,
                    format!("unknown symbol '{}'", payload),
                )),
            }
        }
        "number" => payload
            .parse::<u16>()
            .ok()
            .filter(|n| *n <= MAX_INTEGER)
            .map(Token::IntegerLiteral)
            .ok_or_else(|| {
                TokenFileError::new(
                    line_no,
                    format!("'{}' is not an integer in 0..={}", payload, MAX_INTEGER),
                )
            }),
        "string" => {
            if payload.contains(['"', '\n', '\r']) {
                Err(TokenFileError::new(
                    line_no,
                    "string constants cannot contain '\"' or line breaks",
                ))
            } else {
                Ok(Token::StringLiteral(payload.to_string()))
            }
        }
        "identifier" => {
            if is_identifier(payload) {
                Ok(Token::Identifier(payload.to_string()))
            } else {
                Err(TokenFileError::new(
                    line_no,
                    format!("'{}' is not a valid identifier", payload),
                ))
            }
        }
        other => Err(TokenFileError::new(
            line_no,
            format!("unknown token kind '{}'", other),
        )),
    }
}

/// Encode a token sequence in the token file format.
pub fn write_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        let line = match token {
            Token::Identifier(name) => format!("identifier {}", name),
            Token::Keyword(kw) => format!("keyword {}", kw),
            Token::Symbol(sym) => format!("symbol {}", sym),
            Token::IntegerLiteral(n) => format!("number {}", n),
            Token::StringLiteral(s) => format!("string {}", s),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_each_kind() {
        let text = "keyword class\n  identifier Main\n\tsymbol {\nnumber 42\nstring hello world\n";
        let tokens = read_tokens(text).unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::Keyword(Keyword::Class),
                Token::Identifier("Main".to_string()),
                Token::Symbol('{'),
                Token::IntegerLiteral(42),
                Token::StringLiteral("hello world".to_string()),
            ]
        );
    }

    #[test]
    fn test_blank_lines_skipped() {
        let tokens = read_tokens("\nsymbol ;\n\n   \nsymbol }\n").unwrap();
        assert_eq!(tokens, vec![Token::Symbol(';'), Token::Symbol('}')]);
    }

    #[test]
    fn test_string_keeps_inner_spaces() {
        let tokens = read_tokens("string  two  spaces").unwrap();
        assert_eq!(tokens, vec![Token::StringLiteral(" two  spaces".to_string())]);
    }

    #[test]
    fn test_rejects_bad_lines() {
        let err = read_tokens("symbol ;\nkeyword goto\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.reason.contains("goto"));

        assert!(read_tokens("number 32768").is_err());
        assert!(read_tokens("symbol ==").is_err());
        assert!(read_tokens("identifier 9lives").is_err());
        assert!(read_tokens("identifier while").is_err());
        assert!(read_tokens("comment hi").is_err());
        assert!(read_tokens("keyword").is_err());
    }

    #[test]
    fn test_write_then_read() {
        let tokens = vec![
            Token::Keyword(Keyword::Return),
            Token::StringLiteral("a b".to_string()),
            Token::Symbol('~'),
            Token::IntegerLiteral(MAX_INTEGER),
            Token::Identifier("x_1".to_string()),
        ];
        assert_eq!(read_tokens(&write_tokens(&tokens)).unwrap(), tokens);
    }

    #[test]
    fn test_keyword_lookup() {
        for kw in Keyword::ALL {
            assert_eq!(Keyword::from_word(kw.as_str()), Some(kw));
        }
        assert_eq!(Keyword::from_word("Class"), None);
        assert_eq!(Keyword::from_word("classy"), None);
        assert_eq!(Keyword::from_word(""), None);
    }

    #[test]
    fn test_display_names_token_kind() {
        assert_eq!(Token::Keyword(Keyword::Let).to_string(), "keyword 'let'");
        assert_eq!(Token::Symbol('(').to_string(), "'('");
        assert_eq!(Token::Identifier("foo".into()).to_string(), "identifier 'foo'");
    }
}
