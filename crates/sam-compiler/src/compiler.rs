//! Bytecode compiler from AST to IR.

use sam_bytecode::Program as BcProgram;
use sam_syntax::ast::*;
use sam_syntax::error::Result;
use tracing::debug;

use crate::builder::CodeBuilder;

/// Lowers a checked AST to a linear instruction sequence ending in `HALT`.
///
/// Slot numbers and label numbers start fresh on every [`Compiler::compile`]
/// call, so one compiler can be reused across programs.
#[derive(Debug, Default, Clone, Copy)]
pub struct Compiler;

impl Compiler {
    pub fn new() -> Self {
        Self
    }

    pub fn compile(&self, program: &Program) -> Result<BcProgram> {
        let mut builder = CodeBuilder::new();
        for stmt in &program.stmts {
            builder.emit_stmt(stmt)?;
        }
        let labels = builder.labels_used();
        let compiled = builder.finish();
        debug!(
            instructions = compiled.code.len(),
            slots = compiled.slots,
            labels,
            "generated bytecode"
        );
        Ok(compiled)
    }
}

/// Compile `program` with a fresh [`Compiler`].
pub fn generate(program: &Program) -> Result<BcProgram> {
    Compiler::new().compile(program)
}
