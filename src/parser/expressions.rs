//! Expression parsing implementation
//!
//! Expressions are flat chains of terms joined by binary operators. No
//! precedence is applied here: `1 + 2 * 3` becomes the term `1` followed by
//! `[(+, 2), (*, 3)]`, and consumers decide how to group it.
//!
//! # Grammar
//!
//! ```text
//! expression ::= term (op term)*
//! term       ::= integer | string | keywordConstant
//!              | subroutineCall
//!              | varName | varName '[' expression ']'
//!              | '(' expression ')'
//!              | unaryOp term
//! call       ::= (className | varName '.')? subroutineName '(' expressionList ')'
//! op         ::= '+' | '-' | '*' | '/' | '&' | '|' | '<' | '>' | '='
//! unaryOp    ::= '-' | '~'
//! ```
//!
//! Term alternatives are tried in the order of [`TERM_ALTERNATIVES`]. A call
//! and a variable reference both start with an identifier, so the call form
//! (identifier followed by `.` or `(`) has to be tried first.

use crate::parser::ast::*;
use crate::parser::cursor::Cursor;
use crate::parser::parse::{first_match, Alternative, Committed, ParseError, Parsed};
use crate::parser::token::Token;

/// Parse an expression. `Ok(None)` if no term starts here.
pub fn parse_expression(cursor: Cursor<'_>) -> Parsed<'_, Expression> {
    let Some((first, mut cursor)) = parse_term(cursor)? else {
        return Ok(None);
    };

    let mut rest = Vec::new();
    while let Some((pair, next)) = parse_op_term(cursor)? {
        rest.push(pair);
        cursor = next;
    }

    Ok(Some((Expression { first, rest }, cursor)))
}

/// Parse an expression that the surrounding syntax requires.
pub(crate) fn expect_expression<'t>(cursor: Cursor<'t>, ctx: &str) -> Committed<'t, Expression> {
    parse_expression(cursor)?.ok_or_else(|| cursor.unexpected(format!("expression {}", ctx)))
}

/// Parse one `(op term)` pair. If the operator is not followed by a term the
/// pair is abandoned and the caller keeps its cursor from before the operator.
pub fn parse_op_term(cursor: Cursor<'_>) -> Parsed<'_, (BinaryOp, Term)> {
    let op = match cursor.lookahead(0) {
        Some(Token::Symbol(sym)) => BinaryOp::from_char(*sym),
        _ => None,
    };
    let Some(op) = op else {
        return Ok(None);
    };

    Ok(parse_term(cursor.advance(1))?.map(|(term, next)| ((op, term), next)))
}

const TERM_ALTERNATIVES: &[Alternative<Term>] = &[
    Alternative {
        name: "constant",
        applies: starts_constant,
        parse: parse_constant_term,
    },
    Alternative {
        name: "subroutine call",
        applies: starts_subroutine_call,
        parse: parse_call_term,
    },
    Alternative {
        name: "variable",
        applies: starts_variable,
        parse: parse_variable_term,
    },
    Alternative {
        name: "parenthesized expression",
        applies: starts_parenthesized,
        parse: parse_parenthesized_term,
    },
    Alternative {
        name: "unary operation",
        applies: starts_unary,
        parse: parse_unary_term,
    },
];

/// Parse a single term. `Ok(None)` if no alternative applies.
pub fn parse_term(cursor: Cursor<'_>) -> Parsed<'_, Term> {
    first_match(cursor, TERM_ALTERNATIVES)
}

fn starts_constant(cursor: Cursor<'_>) -> bool {
    matches!(
        cursor.lookahead(0),
        Some(Token::IntegerLiteral(_) | Token::StringLiteral(_) | Token::Keyword(_))
    )
}

fn starts_subroutine_call(cursor: Cursor<'_>) -> bool {
    cursor.matches_identifier() && {
        let after = cursor.advance(1);
        after.matches_symbol('.') || after.matches_symbol('(')
    }
}

fn starts_variable(cursor: Cursor<'_>) -> bool {
    cursor.matches_identifier()
}

fn starts_parenthesized(cursor: Cursor<'_>) -> bool {
    cursor.matches_symbol('(')
}

fn starts_unary(cursor: Cursor<'_>) -> bool {
    matches!(cursor.lookahead(0), Some(Token::Symbol(sym)) if UnaryOp::from_char(*sym).is_some())
}

fn parse_constant_term(cursor: Cursor<'_>) -> Committed<'_, Term> {
    let term = match cursor.peek(0)? {
        Token::IntegerLiteral(n) => Term::IntegerConstant(*n),
        Token::StringLiteral(s) => Term::StringConstant(s.clone()),
        Token::Keyword(kw) => match KeywordConstant::from_keyword(*kw) {
            Some(constant) => Term::KeywordConstant(constant),
            None => return Err(cursor.unexpected("keyword constant in expression")),
        },
        _ => return Err(cursor.unexpected("constant")),
    };
    Ok((term, cursor.advance(1)))
}

fn parse_call_term(cursor: Cursor<'_>) -> Committed<'_, Term> {
    let (call, cursor) = parse_subroutine_call(cursor)?;
    Ok((Term::Call(call), cursor))
}

/// Parse `name(args)` or `receiver.name(args)`.
pub fn parse_subroutine_call(cursor: Cursor<'_>) -> Committed<'_, SubroutineCall> {
    let (first, cursor) = cursor.expect_identifier("to start subroutine call")?;

    let (receiver, name, cursor) = if cursor.matches_symbol('.') {
        let (name, cursor) = cursor.advance(1).expect_identifier("after '.'")?;
        (Some(first), name, cursor)
    } else {
        (None, first, cursor)
    };

    let cursor = cursor.expect_symbol('(', "to open argument list")?;
    let (arguments, cursor) = parse_arguments(cursor)?;
    let cursor = cursor.expect_symbol(')', "to close argument list")?;

    Ok((
        SubroutineCall {
            receiver,
            name,
            arguments,
        },
        cursor,
    ))
}

/// Parse a comma-separated argument list. The caller has consumed `(` and
/// consumes the closing `)`.
pub fn parse_arguments(mut cursor: Cursor<'_>) -> Committed<'_, Vec<Expression>> {
    let mut arguments = Vec::new();

    if cursor.matches_symbol(')') {
        return Ok((arguments, cursor));
    }

    loop {
        let (argument, next) = expect_expression(cursor, "in argument list")?;
        arguments.push(argument);
        cursor = next;

        if cursor.matches_symbol(',') {
            cursor = cursor.advance(1);
        } else if cursor.matches_symbol(')') {
            break;
        } else {
            return Err(cursor.unexpected("',' or ')' in argument list"));
        }
    }

    Ok((arguments, cursor))
}

fn parse_variable_term(cursor: Cursor<'_>) -> Committed<'_, Term> {
    let (name, index, cursor) = parse_variable_reference(cursor)?;
    let term = match index {
        Some(index) => Term::Subscript(name, Box::new(index)),
        None => Term::Variable(name),
    };
    Ok((term, cursor))
}

/// Parse `name` or `name[expr]`; shared with `let` targets.
pub(crate) fn parse_variable_reference(
    cursor: Cursor<'_>,
) -> Result<(String, Option<Expression>, Cursor<'_>), ParseError> {
    let (name, cursor) = cursor.expect_identifier("for variable")?;

    if !cursor.matches_symbol('[') {
        return Ok((name, None, cursor));
    }

    let (index, cursor) = expect_expression(cursor.advance(1), "inside '[ ]'")?;
    let cursor = cursor.expect_symbol(']', "after subscript")?;
    Ok((name, Some(index), cursor))
}

fn parse_parenthesized_term(cursor: Cursor<'_>) -> Committed<'_, Term> {
    let cursor = cursor.expect_symbol('(', "to open expression")?;
    let (inner, cursor) = expect_expression(cursor, "after '('")?;
    let cursor = cursor.expect_symbol(')', "to close expression")?;
    Ok((Term::Parenthesized(Box::new(inner)), cursor))
}

fn parse_unary_term(cursor: Cursor<'_>) -> Committed<'_, Term> {
    let op = match cursor.peek(0)? {
        Token::Symbol(sym) => UnaryOp::from_char(*sym),
        _ => None,
    }
    .ok_or_else(|| cursor.unexpected("unary operator"))?;

    let operand = cursor.advance(1);
    match parse_term(operand)? {
        Some((term, cursor)) => Ok((Term::Unary(op, Box::new(term)), cursor)),
        None => Err(operand.unexpected(format!("term after unary '{}'", op.as_char()))),
    }
}
