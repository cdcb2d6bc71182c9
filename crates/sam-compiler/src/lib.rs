//! sam compiler: AST -> bytecode.

mod builder;
pub mod compiler;

pub use compiler::{generate, Compiler};
