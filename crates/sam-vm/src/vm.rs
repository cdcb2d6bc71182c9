//! sam VM core.

use std::io::{self, Stdout, Write};

use sam_bytecode::{Instruction, LabelTable, Program, Value};
use sam_syntax::error::{runtime_error, Error, Result};
use tracing::{debug, trace};

use crate::ops;

/// Memory slots available to a program unless configured otherwise.
pub const DEFAULT_MEMORY: usize = 1024;

type BinaryOp = fn(Value, Value) -> Result<Value>;

/// Stack machine executing compiled [`Program`]s. `PRINT` writes one line
/// per value to `out`.
pub struct Vm<W: Write = Stdout> {
    stack: Vec<Value>,
    memory: Vec<Value>,
    capacity: usize,
    pc: usize,
    out: W,
}

impl Default for Vm<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl Vm<Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl<W: Write> Vm<W> {
    pub fn with_output(out: W) -> Self {
        Self { stack: Vec::new(), memory: Vec::new(), capacity: DEFAULT_MEMORY, pc: 0, out }
    }

    /// Set the number of memory slots. Takes effect on the next run.
    pub fn with_memory(mut self, slots: usize) -> Self {
        self.capacity = slots;
        self
    }

    pub fn memory_capacity(&self) -> usize {
        self.capacity
    }

    /// Operand stack as left by the last run, bottom first.
    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn memory(&self) -> &[Value] {
        &self.memory
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Execute `program` from its first instruction until `HALT` or the end
    /// of the code. Stack, memory and pc start fresh on every call.
    pub fn run(&mut self, program: &Program) -> Result<()> {
        if program.slots > self.capacity {
            return runtime_error(format!(
                "program needs {} memory slots but only {} are available",
                program.slots, self.capacity
            ));
        }
        self.stack.clear();
        self.memory = vec![Value::default(); self.capacity];
        self.pc = 0;

        let labels = LabelTable::build(&program.code);
        debug!(
            instructions = program.code.len(),
            labels = labels.len(),
            memory = self.capacity,
            "starting execution"
        );

        let mut executed: u64 = 0;
        while let Some(instr) = program.code.get(self.pc) {
            trace!(pc = self.pc, depth = self.stack.len(), "{}", instr);
            self.pc += 1;
            executed += 1;
            match instr {
                Instruction::Push(v) => self.stack.push(*v),
                Instruction::Load(slot) => {
                    let v = *self.memory.get(*slot).ok_or_else(|| out_of_range(*slot))?;
                    self.stack.push(v);
                }
                Instruction::Store(slot) => {
                    let v = self.pop("STORE")?;
                    let cell = self.memory.get_mut(*slot).ok_or_else(|| out_of_range(*slot))?;
                    *cell = v;
                }
                Instruction::Add => self.binary("ADD", ops::add)?,
                Instruction::Sub => self.binary("SUB", ops::sub)?,
                Instruction::Mul => self.binary("MUL", ops::mul)?,
                Instruction::Div => self.binary("DIV", ops::div)?,
                Instruction::Lt => self.binary("LT", ops::lt)?,
                Instruction::Gt => self.binary("GT", ops::gt)?,
                Instruction::Le => self.binary("LE", ops::le)?,
                Instruction::Ge => self.binary("GE", ops::ge)?,
                Instruction::Eq => self.binary("EQ", ops::eq)?,
                Instruction::Ne => self.binary("NE", ops::ne)?,
                Instruction::And => self.binary("AND", ops::and)?,
                Instruction::Or => self.binary("OR", ops::or)?,
                Instruction::Not => {
                    let a = self.pop("NOT")?;
                    self.stack.push(Value::from_bool(!a.is_truthy()));
                }
                Instruction::Swap => {
                    let b = self.pop("SWAP")?;
                    let a = self.pop("SWAP")?;
                    self.stack.push(b);
                    self.stack.push(a);
                }
                Instruction::Jmp(label) => self.pc = labels.resolve(*label)?,
                Instruction::Jz(label) => {
                    let v = self.pop("JZ")?;
                    if !v.is_truthy() {
                        self.pc = labels.resolve(*label)?;
                    }
                }
                Instruction::Label(_) => {}
                Instruction::Print => {
                    let v = self.pop("PRINT")?;
                    writeln!(self.out, "{}", v).map_err(write_failed)?;
                }
                Instruction::Halt => break,
            }
        }
        self.out.flush().map_err(write_failed)?;
        debug!(executed, "execution finished");
        Ok(())
    }

    fn pop(&mut self, opcode: &str) -> Result<Value> {
        match self.stack.pop() {
            Some(v) => Ok(v),
            None => runtime_error(format!("stack underflow in {}", opcode)),
        }
    }

    /// Pop `b` then `a` and push `op(a, b)`.
    fn binary(&mut self, opcode: &str, op: BinaryOp) -> Result<()> {
        let b = self.pop(opcode)?;
        let a = self.pop(opcode)?;
        self.stack.push(op(a, b)?);
        Ok(())
    }
}

fn out_of_range(slot: usize) -> Error {
    Error::runtime(format!("memory slot {} out of range", slot))
}

fn write_failed(e: io::Error) -> Error {
    Error::runtime(format!("failed to write output: {}", e))
}
