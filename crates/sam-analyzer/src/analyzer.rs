//! Static checks over the AST: scoping, declarations, typing and `break`
//! placement. The walk is read-only and stops at the first violation.

use sam_syntax::ast::*;
use sam_syntax::error::{semantic_error, Result};
use tracing::{debug, trace};

use crate::scope::Scopes;

pub struct Analyzer {
    scopes: Scopes,
    /// Number of `while` bodies currently being checked
    loop_depth: usize,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self { scopes: Scopes::new(), loop_depth: 0 }
    }

    /// Check a whole program. State from a previous call is discarded first.
    pub fn analyze(&mut self, program: &Program) -> Result<()> {
        self.scopes = Scopes::new();
        self.loop_depth = 0;
        for stmt in &program.stmts {
            self.check_stmt(stmt)?;
        }
        debug!(statements = program.stmts.len(), "semantic analysis passed");
        Ok(())
    }

    /// Check `body` in a fresh scope. The scope is popped on the error path too.
    fn check_block(&mut self, body: &[Stmt]) -> Result<()> {
        self.scopes.push();
        trace!(depth = self.scopes.depth(), "entered block scope");
        let res = body.iter().try_for_each(|s| self.check_stmt(s));
        self.scopes.pop();
        res
    }

    fn check_condition(&self, cond: &Expr, what: &str) -> Result<()> {
        match self.infer(cond)? {
            Type::Bool => Ok(()),
            other => semantic_error(format!("{} condition must be bool, got {}", what, other)),
        }
    }

    fn check_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Let { name, ty, expr } => {
                // initializer first: it cannot see the name being declared
                let init = self.infer(expr)?;
                if init != *ty {
                    return semantic_error(format!(
                        "Type mismatch: variable '{}' declared as {} but initialized with {}",
                        name, ty, init
                    ));
                }
                self.scopes.declare(name, *ty)
            }
            Stmt::Assign { name, expr } => {
                let Some(var_ty) = self.scopes.lookup(name) else {
                    return semantic_error(format!("Variable '{}' not declared", name));
                };
                let value_ty = self.infer(expr)?;
                if var_ty != value_ty {
                    return semantic_error(format!(
                        "Type mismatch in assignment: variable '{}' is {}, trying to assign {}",
                        name, var_ty, value_ty
                    ));
                }
                Ok(())
            }
            Stmt::While { cond, body } => {
                self.check_condition(cond, "While")?;
                self.loop_depth += 1;
                let res = self.check_block(body);
                self.loop_depth -= 1;
                res
            }
            Stmt::If(if_stmt) => {
                self.check_condition(&if_stmt.cond, "If")?;
                self.check_block(&if_stmt.then_body)?;
                for clause in &if_stmt.else_ifs {
                    self.check_condition(&clause.cond, "Else-if")?;
                    self.check_block(&clause.body)?;
                }
                if let Some(body) = &if_stmt.else_body {
                    self.check_block(body)?;
                }
                Ok(())
            }
            Stmt::Break => {
                if self.loop_depth == 0 {
                    return semantic_error("'break' outside of loop");
                }
                Ok(())
            }
            Stmt::Print(expr) => self.infer(expr).map(|_| ()),
            Stmt::Block(body) => self.check_block(body),
        }
    }

    /// Infer the static type of `expr` in the current scope.
    pub fn infer(&self, expr: &Expr) -> Result<Type> {
        match expr {
            Expr::Literal(lit) => Ok(lit.ty()),
            Expr::Ident(name) => match self.scopes.lookup(name) {
                Some(ty) => Ok(ty),
                None => semantic_error(format!("Variable '{}' not declared", name)),
            },
            Expr::Unary { op, operand } => {
                let ty = self.infer(operand)?;
                match op {
                    UnaryOp::Neg if ty.is_numeric() => Ok(ty),
                    UnaryOp::Neg => semantic_error(format!(
                        "Invalid operand type for unary '-': {} (expected int or float)",
                        ty
                    )),
                    UnaryOp::Not if ty == Type::Bool => Ok(Type::Bool),
                    UnaryOp::Not => {
                        semantic_error(format!("Logical '!' requires a bool operand, got {}", ty))
                    }
                }
            }
            Expr::Binary { op, lhs, rhs } => {
                let l = self.infer(lhs)?;
                let r = self.infer(rhs)?;
                if l != r {
                    return semantic_error(format!(
                        "Type mismatch in binary operation: {} {} {}",
                        l,
                        op.symbol(),
                        r
                    ));
                }
                match op {
                    BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => {
                        if !l.is_numeric() {
                            return semantic_error(format!(
                                "Invalid operand type for '{}': {} (expected int or float)",
                                op.symbol(),
                                l
                            ));
                        }
                        Ok(l)
                    }
                    BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => {
                        if !l.is_numeric() {
                            return semantic_error(format!(
                                "Invalid operand type for '{}': {} (expected int or float)",
                                op.symbol(),
                                l
                            ));
                        }
                        Ok(Type::Bool)
                    }
                    BinOp::Eq | BinOp::Ne => Ok(Type::Bool),
                    BinOp::And | BinOp::Or => {
                        if l != Type::Bool {
                            return semantic_error(format!(
                                "Logical operator '{}' requires bool operands, got {}",
                                op.symbol(),
                                l
                            ));
                        }
                        Ok(Type::Bool)
                    }
                }
            }
        }
    }
}

/// Check `program` with a fresh [`Analyzer`].
pub fn analyze(program: &Program) -> Result<()> {
    Analyzer::new().analyze(program)
}
