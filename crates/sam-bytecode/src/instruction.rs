//! Instruction set for sam bytecode.

use std::fmt;

use crate::value::Value;

/// Symbolic jump target, printed as `L1`, `L2`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub u32);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    // Constants
    Push(Value),

    // Memory (slot index)
    Load(usize),
    Store(usize),

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Comparisons, push 1 or 0
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,

    // Logical, on truthiness
    And,
    Or,
    Not,

    // Stack
    Swap,

    // Control flow
    Jmp(Label),
    Jz(Label),
    /// Jump target marker; executes as a no-op.
    Label(Label),

    Print,
    Halt,
}

impl Instruction {
    pub fn opcode(&self) -> &'static str {
        match self {
            Instruction::Push(_) => "PUSH",
            Instruction::Load(_) => "LOAD",
            Instruction::Store(_) => "STORE",
            Instruction::Add => "ADD",
            Instruction::Sub => "SUB",
            Instruction::Mul => "MUL",
            Instruction::Div => "DIV",
            Instruction::Lt => "LT",
            Instruction::Gt => "GT",
            Instruction::Le => "LE",
            Instruction::Ge => "GE",
            Instruction::Eq => "EQ",
            Instruction::Ne => "NE",
            Instruction::And => "AND",
            Instruction::Or => "OR",
            Instruction::Not => "NOT",
            Instruction::Swap => "SWAP",
            Instruction::Jmp(_) => "JMP",
            Instruction::Jz(_) => "JZ",
            Instruction::Label(_) => "LABEL",
            Instruction::Print => "PRINT",
            Instruction::Halt => "HALT",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Push(v) => write!(f, "PUSH {}", v),
            Instruction::Load(slot) => write!(f, "LOAD {}", slot),
            Instruction::Store(slot) => write!(f, "STORE {}", slot),
            Instruction::Jmp(l) => write!(f, "JMP {}", l),
            Instruction::Jz(l) => write!(f, "JZ {}", l),
            Instruction::Label(l) => write!(f, "{}:", l),
            other => f.write_str(other.opcode()),
        }
    }
}
