//! Compiled programs and label resolution.

use std::collections::HashMap;
use std::fmt;

use sam_syntax::error::{runtime_error, Result};

use crate::instruction::{Instruction, Label};

/// A linear instruction sequence plus the number of memory slots it uses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub code: Vec<Instruction>,
    pub slots: usize,
}

impl Program {
    pub fn new(code: Vec<Instruction>, slots: usize) -> Self {
        Self { code, slots }
    }
}

impl fmt::Display for Program {
    /// One instruction per line; label markers sit flush left, everything
    /// else is indented.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instr in &self.code {
            match instr {
                Instruction::Label(_) => writeln!(f, "{}", instr)?,
                _ => writeln!(f, "    {}", instr)?,
            }
        }
        Ok(())
    }
}

/// Label → index of its marker in `code`. Built once before execution.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    targets: HashMap<Label, usize>,
}

impl LabelTable {
    /// Index every label marker in `code`. If a label is marked more than
    /// once, the first marker wins.
    pub fn build(code: &[Instruction]) -> Self {
        let mut targets = HashMap::new();
        for (idx, instr) in code.iter().enumerate() {
            if let Instruction::Label(label) = instr {
                targets.entry(*label).or_insert(idx);
            }
        }
        Self { targets }
    }

    pub fn resolve(&self, label: Label) -> Result<usize> {
        match self.targets.get(&label) {
            Some(&idx) => Ok(idx),
            None => runtime_error(format!("unresolved label {}", label)),
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
