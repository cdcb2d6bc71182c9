//! Block scopes for the analyzer.

use std::collections::HashMap;

use sam_syntax::ast::Type;
use sam_syntax::error::{semantic_error, Result};

/// Stack of block-local name → type maps. The bottom scope is the program's
/// top level and is never popped.
pub(crate) struct Scopes {
    scopes: Vec<HashMap<String, Type>>,
}

impl Scopes {
    pub(crate) fn new() -> Self {
        Self { scopes: vec![HashMap::new()] }
    }

    pub(crate) fn push(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub(crate) fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Declare `name` in the innermost scope. Shadowing an outer scope is
    /// fine; a second declaration in the same scope is not.
    pub(crate) fn declare(&mut self, name: &str, ty: Type) -> Result<()> {
        let top = self.scopes.len() - 1;
        if self.scopes[top].contains_key(name) {
            return semantic_error(format!("Variable '{}' already declared in this scope", name));
        }
        self.scopes[top].insert(name.to_string(), ty);
        Ok(())
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<Type> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name).copied())
    }
}
