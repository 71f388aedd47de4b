//! Statement parsing implementation
//!
//! # Grammar
//!
//! ```text
//! statements ::= statement*
//! statement  ::= whileStatement | ifStatement | letStatement
//!              | returnStatement | doStatement
//! while      ::= 'while' '(' expression ')' '{' statements '}'
//! if         ::= 'if' '(' expression ')' '{' statements '}'
//!                ('else' '{' statements '}')?
//! let        ::= 'let' varName ('[' expression ']')? '=' expression ';'
//! return     ::= 'return' expression? ';'
//! do         ::= 'do' subroutineCall ';'
//! ```
//!
//! Each statement is selected by its leading keyword; after that every token
//! of the production is required.

use crate::parser::ast::*;
use crate::parser::cursor::Cursor;
use crate::parser::expressions::{
    expect_expression, parse_expression, parse_subroutine_call, parse_variable_reference,
};
use crate::parser::parse::{first_match, many, Alternative, Committed, Parsed};
use crate::parser::token::Keyword;

const STATEMENT_ALTERNATIVES: &[Alternative<Statement>] = &[
    Alternative {
        name: "while",
        applies: |cursor| cursor.matches_keyword(Keyword::While),
        parse: parse_while_statement,
    },
    Alternative {
        name: "if",
        applies: |cursor| cursor.matches_keyword(Keyword::If),
        parse: parse_if_statement,
    },
    Alternative {
        name: "let",
        applies: |cursor| cursor.matches_keyword(Keyword::Let),
        parse: parse_let_statement,
    },
    Alternative {
        name: "return",
        applies: |cursor| cursor.matches_keyword(Keyword::Return),
        parse: parse_return_statement,
    },
    Alternative {
        name: "do",
        applies: |cursor| cursor.matches_keyword(Keyword::Do),
        parse: parse_do_statement,
    },
];

/// Parse a statement. `Ok(None)` if no statement keyword starts here.
pub fn parse_statement(cursor: Cursor<'_>) -> Parsed<'_, Statement> {
    first_match(cursor, STATEMENT_ALTERNATIVES)
}

/// Parse statements until none applies. An empty block is valid.
pub fn parse_statements(cursor: Cursor<'_>) -> Committed<'_, Vec<Statement>> {
    many(cursor, parse_statement)
}

/// Parse `'{' statements '}'`.
fn parse_block<'t>(cursor: Cursor<'t>, ctx: &str) -> Committed<'t, Vec<Statement>> {
    let cursor = cursor.expect_symbol('{', &format!("to open {}", ctx))?;
    let (statements, cursor) = parse_statements(cursor)?;
    let cursor = cursor.expect_symbol('}', &format!("to close {}", ctx))?;
    Ok((statements, cursor))
}

/// Parse `'(' expression ')'`.
fn parse_condition<'t>(cursor: Cursor<'t>, keyword: &str) -> Committed<'t, Expression> {
    let cursor = cursor.expect_symbol('(', &format!("after '{}'", keyword))?;
    let (condition, cursor) = expect_expression(cursor, &format!("for '{}' condition", keyword))?;
    let cursor = cursor.expect_symbol(')', &format!("after '{}' condition", keyword))?;
    Ok((condition, cursor))
}

fn parse_while_statement(cursor: Cursor<'_>) -> Committed<'_, Statement> {
    let cursor = cursor.expect_keyword(Keyword::While, "to start loop")?;
    let (condition, cursor) = parse_condition(cursor, "while")?;
    let (body, cursor) = parse_block(cursor, "while body")?;

    Ok((Statement::While { condition, body }, cursor))
}

fn parse_if_statement(cursor: Cursor<'_>) -> Committed<'_, Statement> {
    let cursor = cursor.expect_keyword(Keyword::If, "to start conditional")?;
    let (condition, cursor) = parse_condition(cursor, "if")?;
    let (then_branch, cursor) = parse_block(cursor, "if body")?;

    let (else_branch, cursor) = if cursor.matches_keyword(Keyword::Else) {
        let (statements, cursor) = parse_block(cursor.advance(1), "else body")?;
        (Some(statements), cursor)
    } else {
        (None, cursor)
    };

    Ok((
        Statement::If {
            condition,
            then_branch,
            else_branch,
        },
        cursor,
    ))
}

fn parse_let_statement(cursor: Cursor<'_>) -> Committed<'_, Statement> {
    let cursor = cursor.expect_keyword(Keyword::Let, "to start assignment")?;
    let (variable, index, cursor) = parse_variable_reference(cursor)?;
    let cursor = cursor.expect_symbol('=', "in 'let' statement")?;
    let (value, cursor) = expect_expression(cursor, "after '='")?;
    let cursor = cursor.expect_symbol(';', "after 'let' statement")?;

    Ok((
        Statement::Let {
            variable,
            index,
            value,
        },
        cursor,
    ))
}

fn parse_return_statement(cursor: Cursor<'_>) -> Committed<'_, Statement> {
    let cursor = cursor.expect_keyword(Keyword::Return, "to start return")?;

    let (value, cursor) = match parse_expression(cursor)? {
        Some((value, cursor)) => (Some(value), cursor),
        None => (None, cursor),
    };

    let cursor = cursor.expect_symbol(';', "after return")?;
    Ok((Statement::Return(value), cursor))
}

fn parse_do_statement(cursor: Cursor<'_>) -> Committed<'_, Statement> {
    let cursor = cursor.expect_keyword(Keyword::Do, "to start call statement")?;
    let (call, cursor) = parse_subroutine_call(cursor)?;
    let cursor = cursor.expect_symbol(';', "after 'do' statement")?;

    Ok((Statement::Do(call), cursor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;
    use crate::parser::parse::ParseError;
    use crate::parser::token::Token;

    fn tokens(source: &str) -> Vec<Token> {
        Lexer::new(source).tokenize().unwrap()
    }

    fn statement(source: &str) -> Statement {
        let tokens = tokens(source);
        let (stmt, rest) = parse_statement(Cursor::new(&tokens)).unwrap().unwrap();
        assert!(rest.is_at_end(), "unconsumed tokens: {:?}", rest.rest());
        stmt
    }

    fn int(n: u16) -> Expression {
        Expression::term(Term::IntegerConstant(n))
    }

    fn var(name: &str) -> Expression {
        Expression::term(Term::Variable(name.to_string()))
    }

    #[test]
    fn test_if_without_else() {
        let stmt = statement("if (x < 1) { let y = 2; }");

        assert_eq!(
            stmt,
            Statement::If {
                condition: Expression {
                    first: Term::Variable("x".to_string()),
                    rest: vec![(BinaryOp::Lt, Term::IntegerConstant(1))],
                },
                then_branch: vec![Statement::Let {
                    variable: "y".to_string(),
                    index: None,
                    value: int(2),
                }],
                else_branch: None,
            }
        );
    }

    #[test]
    fn test_if_with_empty_else() {
        match statement("if (true) { return; } else { }") {
            Statement::If { else_branch, .. } => assert_eq!(else_branch, Some(Vec::new())),
            other => panic!("Expected if statement, got {:?}", other),
        }
    }

    #[test]
    fn test_return_forms() {
        assert_eq!(statement("return;"), Statement::Return(None));
        assert_eq!(statement("return x;"), Statement::Return(Some(var("x"))));
    }

    #[test]
    fn test_let_subscript_and_plain() {
        assert_eq!(
            statement("let a[i] = 5;"),
            Statement::Let {
                variable: "a".to_string(),
                index: Some(var("i")),
                value: int(5),
            }
        );
        assert_eq!(
            statement("let a = 5;"),
            Statement::Let {
                variable: "a".to_string(),
                index: None,
                value: int(5),
            }
        );
    }

    #[test]
    fn test_do_statement() {
        assert_eq!(
            statement("do Output.println();"),
            Statement::Do(SubroutineCall {
                receiver: Some("Output".to_string()),
                name: "println".to_string(),
                arguments: Vec::new(),
            })
        );
    }

    #[test]
    fn test_nested_blocks() {
        let stmt = statement("while (i < n) { if (i = 0) { let i = i + 1; } }");

        let Statement::While { body, .. } = stmt else {
            panic!("Expected while statement");
        };
        let [Statement::If { then_branch, .. }] = body.as_slice() else {
            panic!("Expected single if statement, got {:?}", body);
        };
        assert!(matches!(then_branch.as_slice(), [Statement::Let { .. }]));
    }

    #[test]
    fn test_statements_stop_at_non_statement() {
        let tokens = tokens("let x = 1; do f(); }");
        let (statements, rest) = parse_statements(Cursor::new(&tokens)).unwrap();

        assert_eq!(statements.len(), 2);
        assert_eq!(rest.peek(0).unwrap(), &Token::Symbol('}'));
    }

    #[test]
    fn test_not_a_statement() {
        let tokens = tokens("x = 1;");
        assert_eq!(parse_statement(Cursor::new(&tokens)), Ok(None));

        let (statements, rest) = parse_statements(Cursor::new(&tokens)).unwrap();
        assert!(statements.is_empty());
        assert_eq!(rest.offset(), 0);
    }

    #[test]
    fn test_structural_violations() {
        let cases = [
            ("while x < 1 { }", "'(' after 'while'"),
            ("if (x) let y = 1;", "'{' to open if body"),
            ("let x 1;", "'=' in 'let' statement"),
            ("return x", "';' after return"),
            ("do x;", "'(' to open argument list"),
            ("let = 2;", "identifier for variable"),
        ];

        for (source, expected_text) in cases {
            let tokens = tokens(source);
            let err = parse_statement(Cursor::new(&tokens)).unwrap_err();
            match err {
                ParseError::Unexpected { expected, .. } => {
                    assert_eq!(expected, expected_text, "source: {}", source)
                }
                ParseError::OutOfTokens { .. } => {
                    assert_eq!(source, "return x", "unexpected end for {}", source)
                }
                other => panic!("Unexpected error {:?} for {}", other, source),
            }
        }
    }
}
