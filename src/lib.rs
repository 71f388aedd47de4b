//! # Introduction
//!
//! jackparse parses the Jack language into an abstract syntax tree and prints
//! that tree back as normalized source.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer ─┐
//!                 ├→ Tokens → Cursor → Grammar → AST → Printer
//! Token file ─────┘
//! ```
//!
//! 1. [`parser::lexer`] / [`parser::token`] — produce the [`Token`](parser::token::Token)
//!    sequence from source text or from a `"<kind> <payload>"` token file.
//! 2. [`parser`] — recursive-descent grammar over a [`Cursor`](parser::cursor::Cursor),
//!    building [`parser::ast`] nodes.
//! 3. [`printer`] — `Display` for every AST node.
//!
//! ## Example
//!
//! ```
//! use jackparse::parser::parse::Parser;
//!
//! let parser = Parser::new("class Main { function void main() { return; } }").unwrap();
//! let class = parser.parse_class().unwrap();
//! assert_eq!(
//!     class.to_string(),
//!     "class Main {\n    function void main() {\n        return;\n    }\n}"
//! );
//! ```
//!
//! ## Supported language
//!
//! Classes with `static`/`field` variables; `constructor`, `function` and
//! `method` subroutines with `var` locals; `let`, `if`/`else`, `while`, `do`
//! and `return` statements; expressions over `+ - * / & | < > =`, unary `-`
//! and `~`, subscripts, calls, and the constants `true false null this`.

pub mod parser;
pub mod printer;
