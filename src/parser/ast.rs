// AST (Abstract Syntax Tree) definitions for Jack programs
//
// Nodes are plain data: each is built once by the grammar rule for its
// production and only read afterwards.

use crate::parser::token::Keyword;

/// Variable, parameter and return types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Char,
    Boolean,
    Class(String), // Class name
}

/// Binary operators; expressions keep them in source order with no precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Lt,
    Gt,
    Eq,
}

impl BinaryOp {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(BinaryOp::Add),
            '-' => Some(BinaryOp::Sub),
            '*' => Some(BinaryOp::Mul),
            '/' => Some(BinaryOp::Div),
            '&' => Some(BinaryOp::And),
            '|' => Some(BinaryOp::Or),
            '<' => Some(BinaryOp::Lt),
            '>' => Some(BinaryOp::Gt),
            '=' => Some(BinaryOp::Eq),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
            BinaryOp::And => '&',
            BinaryOp::Or => '|',
            BinaryOp::Lt => '<',
            BinaryOp::Gt => '>',
            BinaryOp::Eq => '=',
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg, // -x
    Not, // ~x
}

impl UnaryOp {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '-' => Some(UnaryOp::Neg),
            '~' => Some(UnaryOp::Not),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            UnaryOp::Neg => '-',
            UnaryOp::Not => '~',
        }
    }
}

/// The four literal-like reserved words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordConstant {
    True,
    False,
    Null,
    This,
}

impl KeywordConstant {
    pub fn from_keyword(keyword: Keyword) -> Option<Self> {
        match keyword {
            Keyword::True => Some(KeywordConstant::True),
            Keyword::False => Some(KeywordConstant::False),
            Keyword::Null => Some(KeywordConstant::Null),
            Keyword::This => Some(KeywordConstant::This),
            _ => None,
        }
    }

    pub fn keyword(&self) -> Keyword {
        match self {
            KeywordConstant::True => Keyword::True,
            KeywordConstant::False => Keyword::False,
            KeywordConstant::Null => Keyword::Null,
            KeywordConstant::This => Keyword::This,
        }
    }
}

/// A flattened left-to-right operator chain: `first (op term)*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub first: Term,
    pub rest: Vec<(BinaryOp, Term)>,
}

impl Expression {
    /// An expression made of a single term.
    pub fn term(term: Term) -> Self {
        Self {
            first: term,
            rest: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    IntegerConstant(u16),
    StringConstant(String),
    KeywordConstant(KeywordConstant),
    Variable(String),
    Subscript(String, Box<Expression>), // name[expr]
    Call(SubroutineCall),
    Parenthesized(Box<Expression>),
    Unary(UnaryOp, Box<Term>),
}

/// `name(args)` or `receiver.name(args)`; the receiver is a class or variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubroutineCall {
    pub receiver: Option<String>,
    pub name: String,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Let {
        variable: String,
        index: Option<Expression>,
        value: Expression,
    },
    If {
        condition: Expression,
        then_branch: Vec<Statement>,
        else_branch: Option<Vec<Statement>>,
    },
    While {
        condition: Expression,
        body: Vec<Statement>,
    },
    Do(SubroutineCall),
    Return(Option<Expression>),
}

/// `var Type a, b;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDeclaration {
    pub var_type: Type,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassVariableScope {
    Static,
    Field,
}

impl ClassVariableScope {
    pub fn from_keyword(keyword: Keyword) -> Option<Self> {
        match keyword {
            Keyword::Static => Some(ClassVariableScope::Static),
            Keyword::Field => Some(ClassVariableScope::Field),
            _ => None,
        }
    }

    pub fn keyword(&self) -> Keyword {
        match self {
            ClassVariableScope::Static => Keyword::Static,
            ClassVariableScope::Field => Keyword::Field,
        }
    }
}

/// `static|field Type a, b;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassVariableDeclaration {
    pub scope: ClassVariableScope,
    pub var_type: Type,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubroutineKind {
    Constructor,
    Function,
    Method,
}

impl SubroutineKind {
    pub fn from_keyword(keyword: Keyword) -> Option<Self> {
        match keyword {
            Keyword::Constructor => Some(SubroutineKind::Constructor),
            Keyword::Function => Some(SubroutineKind::Function),
            Keyword::Method => Some(SubroutineKind::Method),
            _ => None,
        }
    }

    pub fn keyword(&self) -> Keyword {
        match self {
            SubroutineKind::Constructor => Keyword::Constructor,
            SubroutineKind::Function => Keyword::Function,
            SubroutineKind::Method => Keyword::Method,
        }
    }
}

/// Subroutine parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub param_type: Type,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubroutineDeclaration {
    pub kind: SubroutineKind,
    pub return_type: Option<Type>, // None for void
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub locals: Vec<VariableDeclaration>,
    pub statements: Vec<Statement>,
}

/// Root node for a whole source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDeclaration {
    pub name: String,
    pub variables: Vec<ClassVariableDeclaration>,
    pub subroutines: Vec<SubroutineDeclaration>,
}
