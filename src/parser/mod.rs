//! Jack parser
//!
//! This module turns a token sequence into an Abstract Syntax Tree (AST):
//! - [`token`]: the [`Token`](token::Token) model and the token file format
//! - [`lexer`]: tokenization (source text → tokens)
//! - [`cursor`]: the immutable position every grammar rule reads through
//! - [`parse`]: error type, result shapes, ordered dispatch, [`Parser`](parse::Parser) facade
//! - [`expressions`], [`statements`], [`declarations`]: the grammar rules
//! - [`ast`]: AST node definitions
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent over `Copy` cursors. A rule that does not
//! apply returns `Ok(None)` without consuming anything; once a rule has
//! committed to a production, any missing syntax is an error. Expressions are
//! kept as flat operator chains with no precedence grouping.

pub mod ast;
pub mod cursor;
pub mod declarations;
pub mod expressions;
pub mod lexer;
pub mod parse;
pub mod statements;
pub mod token;
