//! AST (abstract syntax tree) types for the sam language.
//!
//! The tree is built once by the parser and only read afterwards. Both the
//! analyzer and the compiler walk it with exhaustive `match`es, so adding a
//! variant here is a compile error everywhere it is not handled.

use std::fmt;

/// Static types. Declarations carry one; expressions have one inferred by the
/// analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Float,
    Bool,
}

impl Type {
    /// `int` and `float`, the operand types accepted by arithmetic and
    /// relational operators.
    pub fn is_numeric(self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Bool => write!(f, "bool"),
        }
    }
}

/// Literal constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Literal {
    pub fn ty(&self) -> Type {
        match self {
            Literal::Int(_) => Type::Int,
            Literal::Float(_) => Type::Float,
            Literal::Bool(_) => Type::Bool,
        }
    }
}

/// Binary operators, grouped by precedence level (lowest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // logical
    Or,
    And,
    // equality
    Eq,
    Ne,
    // relational
    Lt,
    Gt,
    Le,
    Ge,
    // additive
    Add,
    Sub,
    // multiplicative
    Mul,
    Div,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation `-`
    Neg,
    /// Logical negation `!`
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

/// Expressions. They have no side effects.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Ident(String),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }
}

/// An `else if (cond) { body }` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct ElseIf {
    pub cond: Expr,
    pub body: Vec<Stmt>,
}

/// An `if` chain. Clauses are tried in source order; `else_body`, when
/// present, is the terminal clause.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_body: Vec<Stmt>,
    pub else_ifs: Vec<ElseIf>,
    pub else_body: Option<Vec<Stmt>>,
}

/// Statements.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `let name: ty = expr;`
    Let {
        name: String,
        ty: Type,
        expr: Expr,
    },
    /// `name = expr;`
    Assign {
        name: String,
        expr: Expr,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    If(IfStmt),
    Break,
    Print(Expr),
    /// A bare `{ ... }` block.
    Block(Vec<Stmt>),
}

/// Entire program: the top-level statement list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}
