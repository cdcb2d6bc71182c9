//! Instruction builder and slot management for codegen.

use std::collections::HashMap;

use sam_bytecode::{Instruction as BC, Label, Program as BcProgram, Value};
use sam_syntax::ast::*;
use sam_syntax::error::{semantic_error, Result};

pub(crate) struct CodeBuilder {
    code: Vec<BC>,
    locals: Locals,
    /// End label of every enclosing `while`, innermost last
    loop_ends: Vec<Label>,
    next_label: u32,
}

impl CodeBuilder {
    pub(crate) fn new() -> Self {
        Self { code: Vec::new(), locals: Locals::new(), loop_ends: Vec::new(), next_label: 0 }
    }

    pub(crate) fn finish(mut self) -> BcProgram {
        self.emit(BC::Halt);
        BcProgram::new(self.code, self.locals.allocated())
    }

    pub(crate) fn labels_used(&self) -> u32 {
        self.next_label
    }

    fn emit(&mut self, i: BC) {
        self.code.push(i);
    }

    fn new_label(&mut self) -> Label {
        self.next_label += 1;
        Label(self.next_label)
    }

    fn resolve_var(&self, name: &str) -> Result<usize> {
        match self.locals.resolve(name) {
            Some(slot) => Ok(slot),
            None => semantic_error(format!("Variable '{}' not declared", name)),
        }
    }

    fn emit_block(&mut self, body: &[Stmt]) -> Result<()> {
        self.locals.push_scope();
        let res = body.iter().try_for_each(|s| self.emit_stmt(s));
        self.locals.pop_scope();
        res
    }

    pub(crate) fn emit_stmt(&mut self, s: &Stmt) -> Result<()> {
        match s {
            Stmt::Let { name, expr, .. } => {
                // the initializer still sees any outer binding of `name`
                self.emit_expr(expr)?;
                let slot = self.locals.declare(name);
                self.emit(BC::Store(slot));
                Ok(())
            }
            Stmt::Assign { name, expr } => {
                let slot = self.resolve_var(name)?;
                self.emit_expr(expr)?;
                self.emit(BC::Store(slot));
                Ok(())
            }
            Stmt::While { cond, body } => {
                let start = self.new_label();
                let end = self.new_label();
                self.emit(BC::Jmp(start));
                self.emit(BC::Label(start));
                self.emit_expr(cond)?;
                self.emit(BC::Jz(end));
                self.loop_ends.push(end);
                let res = self.emit_block(body);
                self.loop_ends.pop();
                res?;
                self.emit(BC::Jmp(start));
                self.emit(BC::Label(end));
                Ok(())
            }
            Stmt::If(if_stmt) => {
                let end = self.new_label();
                self.emit_guarded(&if_stmt.cond, &if_stmt.then_body, end)?;
                for clause in &if_stmt.else_ifs {
                    self.emit_guarded(&clause.cond, &clause.body, end)?;
                }
                if let Some(body) = &if_stmt.else_body {
                    self.emit_block(body)?;
                }
                self.emit(BC::Label(end));
                Ok(())
            }
            Stmt::Break => match self.loop_ends.last() {
                Some(&end) => {
                    self.emit(BC::Jmp(end));
                    Ok(())
                }
                None => semantic_error("'break' outside of loop"),
            },
            Stmt::Print(expr) => {
                self.emit_expr(expr)?;
                self.emit(BC::Print);
                Ok(())
            }
            Stmt::Block(body) => self.emit_block(body),
        }
    }

    /// One arm of an if chain: `cond; JZ next; body; JMP end; next:`.
    fn emit_guarded(&mut self, cond: &Expr, body: &[Stmt], end: Label) -> Result<()> {
        let next = self.new_label();
        self.emit_expr(cond)?;
        self.emit(BC::Jz(next));
        self.emit_block(body)?;
        self.emit(BC::Jmp(end));
        self.emit(BC::Label(next));
        Ok(())
    }

    fn emit_expr(&mut self, e: &Expr) -> Result<()> {
        match e {
            Expr::Literal(Literal::Int(n)) => self.emit(BC::Push(Value::Int(*n))),
            Expr::Literal(Literal::Float(x)) => self.emit(BC::Push(Value::Float(*x))),
            Expr::Literal(Literal::Bool(b)) => self.emit(BC::Push(Value::from_bool(*b))),
            Expr::Ident(name) => {
                let slot = self.resolve_var(name)?;
                self.emit(BC::Load(slot));
            }
            Expr::Unary { op: UnaryOp::Neg, operand } => {
                // 0 - operand
                self.emit_expr(operand)?;
                self.emit(BC::Push(Value::Int(0)));
                self.emit(BC::Swap);
                self.emit(BC::Sub);
            }
            Expr::Unary { op: UnaryOp::Not, operand } => {
                self.emit_expr(operand)?;
                self.emit(BC::Not);
            }
            // && and || evaluate both sides; expressions have no side effects
            Expr::Binary { op, lhs, rhs } => {
                self.emit_expr(lhs)?;
                self.emit_expr(rhs)?;
                self.emit(opcode_of(*op));
            }
        }
        Ok(())
    }
}

fn opcode_of(op: BinOp) -> BC {
    match op {
        BinOp::Add => BC::Add,
        BinOp::Sub => BC::Sub,
        BinOp::Mul => BC::Mul,
        BinOp::Div => BC::Div,
        BinOp::Lt => BC::Lt,
        BinOp::Gt => BC::Gt,
        BinOp::Le => BC::Le,
        BinOp::Ge => BC::Ge,
        BinOp::Eq => BC::Eq,
        BinOp::Ne => BC::Ne,
        BinOp::And => BC::And,
        BinOp::Or => BC::Or,
    }
}

/// Block-scoped name → slot maps over a monotonic slot counter. Slots are
/// never reused, so a shadowing declaration never clobbers the outer one.
struct Locals {
    scopes: Vec<HashMap<String, usize>>,
    next: usize,
}

impl Locals {
    fn new() -> Self {
        Self { scopes: vec![HashMap::new()], next: 0 }
    }

    fn declare(&mut self, name: &str) -> usize {
        let idx = self.next;
        self.next += 1;
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), idx);
        }
        idx
    }

    fn resolve(&self, name: &str) -> Option<usize> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name).copied())
    }

    fn allocated(&self) -> usize {
        self.next
    }

    fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }
}
