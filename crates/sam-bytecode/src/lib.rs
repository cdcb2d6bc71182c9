//! Bytecode IR for the sam language.
//!
//! This crate defines the stack-machine instruction set, the program
//! container produced by the compiler and the label table the VM uses to
//! turn symbolic jumps into instruction indices.

pub mod instruction;
pub mod program;
pub mod value;

pub use instruction::{Instruction, Label};
pub use program::{LabelTable, Program};
pub use value::Value;
