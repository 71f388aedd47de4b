//! Renders AST nodes back to Jack source
//!
//! Every node implements [`Display`](fmt::Display). Output is normalized: one
//! statement or declaration per line, nested blocks indented by
//! [`INDENT`], lists joined with `", "`, and single spaces around binary
//! operators. Comments and original whitespace are gone, but lexing and
//! parsing the output yields a tree equal to the one printed.

use crate::parser::ast::*;
use std::fmt;

/// Indentation added per nesting level.
pub const INDENT: &str = "    ";

/// Render a statement block, one statement per line, without braces.
pub fn print_statements(statements: &[Statement]) -> String {
    statements
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write `{`, then each item indented on its own lines, then `}`.
fn write_block<I>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    I: IntoIterator<Item = String>,
{
    f.write_str("{\n")?;
    for item in items {
        // Empty items are blank separator lines
        if item.is_empty() {
            writeln!(f)?;
            continue;
        }
        for line in item.lines() {
            if line.is_empty() {
                writeln!(f)?;
            } else {
                writeln!(f, "{}{}", INDENT, line)?;
            }
        }
    }
    f.write_str("}")
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn block_lines(statements: &[Statement]) -> impl Iterator<Item = String> + '_ {
    statements.iter().map(ToString::to_string)
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => f.write_str("int"),
            Type::Char => f.write_str("char"),
            Type::Boolean => f.write_str("boolean"),
            Type::Class(name) => f.write_str(name),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl fmt::Display for KeywordConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first)?;
        for (op, term) in &self.rest {
            write!(f, " {} {}", op, term)?;
        }
        Ok(())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::IntegerConstant(n) => write!(f, "{}", n),
            Term::StringConstant(s) => write!(f, "\"{}\"", s),
            Term::KeywordConstant(kw) => write!(f, "{}", kw),
            Term::Variable(name) => f.write_str(name),
            Term::Subscript(name, index) => write!(f, "{}[{}]", name, index),
            Term::Call(call) => write!(f, "{}", call),
            Term::Parenthesized(inner) => write!(f, "({})", inner),
            Term::Unary(op, operand) => write!(f, "{}{}", op, operand),
        }
    }
}

impl fmt::Display for SubroutineCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(receiver) = &self.receiver {
            write!(f, "{}.", receiver)?;
        }
        write!(f, "{}(", self.name)?;
        write_joined(f, &self.arguments)?;
        f.write_str(")")
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let {
                variable,
                index,
                value,
            } => {
                write!(f, "let {}", variable)?;
                if let Some(index) = index {
                    write!(f, "[{}]", index)?;
                }
                write!(f, " = {};", value)
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                write!(f, "if ({}) ", condition)?;
                write_block(f, block_lines(then_branch))?;
                if let Some(else_branch) = else_branch {
                    f.write_str(" else ")?;
                    write_block(f, block_lines(else_branch))?;
                }
                Ok(())
            }
            Statement::While { condition, body } => {
                write!(f, "while ({}) ", condition)?;
                write_block(f, block_lines(body))
            }
            Statement::Do(call) => write!(f, "do {};", call),
            Statement::Return(Some(value)) => write!(f, "return {};", value),
            Statement::Return(None) => f.write_str("return;"),
        }
    }
}

impl fmt::Display for VariableDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "var {} ", self.var_type)?;
        write_joined(f, &self.names)?;
        f.write_str(";")
    }
}

impl fmt::Display for ClassVariableScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

impl fmt::Display for ClassVariableDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.scope, self.var_type)?;
        write_joined(f, &self.names)?;
        f.write_str(";")
    }
}

impl fmt::Display for SubroutineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.param_type, self.name)
    }
}

impl fmt::Display for SubroutineDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.kind)?;
        match &self.return_type {
            Some(ty) => write!(f, "{} ", ty)?,
            None => f.write_str("void ")?,
        }
        write!(f, "{}(", self.name)?;
        write_joined(f, &self.parameters)?;
        f.write_str(") ")?;

        let locals = self.locals.iter().map(ToString::to_string);
        write_block(f, locals.chain(block_lines(&self.statements)))
    }
}

impl fmt::Display for ClassDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {} ", self.name)?;

        let mut items: Vec<String> = self.variables.iter().map(ToString::to_string).collect();
        for subroutine in &self.subroutines {
            if !items.is_empty() {
                items.push(String::new());
            }
            items.push(subroutine.to_string());
        }
        write_block(f, items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Term {
        Term::Variable(name.to_string())
    }

    fn int(n: u16) -> Expression {
        Expression::term(Term::IntegerConstant(n))
    }

    #[test]
    fn test_expression_left_to_right() {
        let expr = Expression {
            first: Term::Unary(UnaryOp::Neg, Box::new(var("x"))),
            rest: vec![
                (BinaryOp::Add, Term::Parenthesized(Box::new(int(2)))),
                (
                    BinaryOp::Lt,
                    Term::Subscript("a".to_string(), Box::new(int(0))),
                ),
            ],
        };
        assert_eq!(expr.to_string(), "-x + (2) < a[0]");
    }

    #[test]
    fn test_call_and_constants() {
        let call = SubroutineCall {
            receiver: Some("Output".to_string()),
            name: "printString".to_string(),
            arguments: vec![
                Expression::term(Term::StringConstant("hi there".to_string())),
                Expression::term(Term::KeywordConstant(KeywordConstant::True)),
            ],
        };
        assert_eq!(
            Statement::Do(call).to_string(),
            "do Output.printString(\"hi there\", true);"
        );
    }

    #[test]
    fn test_nested_indentation() {
        let stmt = Statement::While {
            condition: Expression::term(var("go")),
            body: vec![Statement::If {
                condition: Expression::term(var("x")),
                then_branch: vec![Statement::Let {
                    variable: "y".to_string(),
                    index: Some(int(1)),
                    value: int(2),
                }],
                else_branch: Some(vec![Statement::Return(None)]),
            }],
        };

        let expected = "\
while (go) {
    if (x) {
        let y[1] = 2;
    } else {
        return;
    }
}";
        assert_eq!(stmt.to_string(), expected);
    }

    #[test]
    fn test_empty_blocks() {
        let stmt = Statement::If {
            condition: Expression::term(Term::KeywordConstant(KeywordConstant::False)),
            then_branch: Vec::new(),
            else_branch: None,
        };
        assert_eq!(stmt.to_string(), "if (false) {\n}");
    }

    #[test]
    fn test_class_layout() {
        let class = ClassDeclaration {
            name: "Counter".to_string(),
            variables: vec![ClassVariableDeclaration {
                scope: ClassVariableScope::Field,
                var_type: Type::Int,
                names: vec!["count".to_string(), "step".to_string()],
            }],
            subroutines: vec![
                SubroutineDeclaration {
                    kind: SubroutineKind::Method,
                    return_type: None,
                    name: "bump".to_string(),
                    parameters: vec![Parameter {
                        param_type: Type::Class("Counter".to_string()),
                        name: "other".to_string(),
                    }],
                    locals: vec![VariableDeclaration {
                        var_type: Type::Boolean,
                        names: vec!["done".to_string()],
                    }],
                    statements: vec![Statement::Return(None)],
                },
                SubroutineDeclaration {
                    kind: SubroutineKind::Function,
                    return_type: Some(Type::Char),
                    name: "zero".to_string(),
                    parameters: Vec::new(),
                    locals: Vec::new(),
                    statements: Vec::new(),
                },
            ],
        };

        let expected = "\
class Counter {
    field int count, step;

    method void bump(Counter other) {
        var boolean done;
        return;
    }

    function char zero() {
    }
}";
        assert_eq!(class.to_string(), expected);
    }

    #[test]
    fn test_print_statements() {
        let block = vec![Statement::Return(Some(int(1))), Statement::Return(None)];
        assert_eq!(print_statements(&block), "return 1;\nreturn;");
        assert_eq!(print_statements(&[]), "");
    }
}
