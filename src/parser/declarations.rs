//! Declaration parsing implementation
//!
//! This module handles classes and everything declared inside them:
//!
//! - Class variables: `static int count;`, `field Point a, b;`
//! - Subroutines: `constructor`, `function`, `method`
//! - Local variables: `var char c;`
//! - Types: `int`, `char`, `boolean`, or a class name
//!
//! # Grammar
//!
//! ```text
//! class          ::= 'class' className '{' classVarDec* subroutineDec* '}'
//! classVarDec    ::= ('static' | 'field') type varName (',' varName)* ';'
//! subroutineDec  ::= ('constructor' | 'function' | 'method') ('void' | type)
//!                    subroutineName '(' parameterList ')' subroutineBody
//! parameterList  ::= ((type varName) (',' type varName)*)?
//! subroutineBody ::= '{' varDec* statements '}'
//! varDec         ::= 'var' type varName (',' varName)* ';'
//! type           ::= 'int' | 'char' | 'boolean' | className
//! ```

use crate::parser::ast::*;
use crate::parser::cursor::Cursor;
use crate::parser::parse::{many, Committed, Parsed};
use crate::parser::statements::parse_statements;
use crate::parser::token::{Keyword, Token};
use tracing::debug;

/// Parse a whole class. `Ok(None)` if the input does not start with `class`.
pub fn parse_class(cursor: Cursor<'_>) -> Parsed<'_, ClassDeclaration> {
    if !cursor.matches_keyword(Keyword::Class) {
        return Ok(None);
    }

    let (name, cursor) = cursor.advance(1).expect_identifier("after 'class'")?;
    let cursor = cursor.expect_symbol('{', "to open class body")?;
    let (variables, cursor) = parse_class_variable_declarations(cursor)?;
    let (subroutines, cursor) = parse_subroutine_declarations(cursor)?;
    let cursor = cursor.expect_symbol('}', "to close class body")?;

    debug!(
        class = %name,
        variables = variables.len(),
        subroutines = subroutines.len(),
        "parsed class"
    );

    Ok(Some((
        ClassDeclaration {
            name,
            variables,
            subroutines,
        },
        cursor,
    )))
}

pub fn parse_class_variable_declarations(
    cursor: Cursor<'_>,
) -> Committed<'_, Vec<ClassVariableDeclaration>> {
    many(cursor, parse_class_variable_declaration)
}

/// Parse `static|field type names;`. `Ok(None)` without a scope keyword.
pub fn parse_class_variable_declaration(
    cursor: Cursor<'_>,
) -> Parsed<'_, ClassVariableDeclaration> {
    let scope = match cursor.lookahead(0) {
        Some(Token::Keyword(kw)) => ClassVariableScope::from_keyword(*kw),
        _ => None,
    };
    let Some(scope) = scope else {
        return Ok(None);
    };

    let (var_type, cursor) = parse_type(cursor.advance(1))?;
    let (names, cursor) = parse_variable_names(cursor)?;

    Ok(Some((
        ClassVariableDeclaration {
            scope,
            var_type,
            names,
        },
        cursor,
    )))
}

pub fn parse_subroutine_declarations(
    cursor: Cursor<'_>,
) -> Committed<'_, Vec<SubroutineDeclaration>> {
    many(cursor, parse_subroutine_declaration)
}

/// Parse one subroutine. `Ok(None)` without a subroutine keyword.
pub fn parse_subroutine_declaration(cursor: Cursor<'_>) -> Parsed<'_, SubroutineDeclaration> {
    let kind = match cursor.lookahead(0) {
        Some(Token::Keyword(kw)) => SubroutineKind::from_keyword(*kw),
        _ => None,
    };
    let Some(kind) = kind else {
        return Ok(None);
    };

    let cursor = cursor.advance(1);
    let (return_type, cursor) = if cursor.matches_keyword(Keyword::Void) {
        (None, cursor.advance(1))
    } else {
        let (ty, cursor) = parse_type(cursor)?;
        (Some(ty), cursor)
    };

    let (name, cursor) = cursor.expect_identifier("for subroutine name")?;
    let cursor = cursor.expect_symbol('(', "after subroutine name")?;
    let (parameters, cursor) = parse_parameter_list(cursor)?;
    let cursor = cursor.expect_symbol(')', "after parameters")?;

    let cursor = cursor.expect_symbol('{', "before subroutine body")?;
    let (locals, cursor) = parse_variable_declarations(cursor)?;
    let (statements, cursor) = parse_statements(cursor)?;
    let cursor = cursor.expect_symbol('}', "after subroutine body")?;

    debug!(
        subroutine = %name,
        parameters = parameters.len(),
        statements = statements.len(),
        "parsed subroutine"
    );

    Ok(Some((
        SubroutineDeclaration {
            kind,
            return_type,
            name,
            parameters,
            locals,
            statements,
        },
        cursor,
    )))
}

/// Parse `type name, type name, ...` up to (not including) `)`.
fn parse_parameter_list(mut cursor: Cursor<'_>) -> Committed<'_, Vec<Parameter>> {
    let mut parameters = Vec::new();

    if cursor.matches_symbol(')') {
        return Ok((parameters, cursor));
    }

    loop {
        let (param_type, next) = parse_type(cursor)?;
        let (name, next) = next.expect_identifier("for parameter name")?;
        parameters.push(Parameter { param_type, name });
        cursor = next;

        if cursor.matches_symbol(',') {
            cursor = cursor.advance(1);
        } else if cursor.matches_symbol(')') {
            break;
        } else {
            return Err(cursor.unexpected("',' or ')' in parameter list"));
        }
    }

    Ok((parameters, cursor))
}

pub fn parse_variable_declarations(cursor: Cursor<'_>) -> Committed<'_, Vec<VariableDeclaration>> {
    many(cursor, parse_variable_declaration)
}

/// Parse `var type names;`. `Ok(None)` without a leading `var`.
pub fn parse_variable_declaration(cursor: Cursor<'_>) -> Parsed<'_, VariableDeclaration> {
    if !cursor.matches_keyword(Keyword::Var) {
        return Ok(None);
    }

    let (var_type, cursor) = parse_type(cursor.advance(1))?;
    let (names, cursor) = parse_variable_names(cursor)?;

    Ok(Some((VariableDeclaration { var_type, names }, cursor)))
}

/// Parse `name (, name)* ;`, consuming the semicolon.
fn parse_variable_names(mut cursor: Cursor<'_>) -> Committed<'_, Vec<String>> {
    let mut names = Vec::new();

    loop {
        let (name, next) = cursor.expect_identifier("for variable name")?;
        names.push(name);
        cursor = next;

        if cursor.matches_symbol(',') {
            cursor = cursor.advance(1);
        } else if cursor.matches_symbol(';') {
            break;
        } else {
            return Err(cursor.unexpected("',' or ';' after variable name"));
        }
    }

    Ok((names, cursor.advance(1)))
}

/// Parse a type: `int`, `char`, `boolean` or a class name.
pub fn parse_type(cursor: Cursor<'_>) -> Committed<'_, Type> {
    let ty = match cursor.peek(0)? {
        Token::Keyword(Keyword::Int) => Type::Int,
        Token::Keyword(Keyword::Char) => Type::Char,
        Token::Keyword(Keyword::Boolean) => Type::Boolean,
        Token::Identifier(name) => Type::Class(name.clone()),
        _ => return Err(cursor.unexpected("type")),
    };
    Ok((ty, cursor.advance(1)))
}
