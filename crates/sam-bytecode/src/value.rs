//! Runtime values held on the VM stack and in memory.

use std::fmt;

/// A stack-machine value. Booleans have no variant of their own: they are
/// the integers `1` and `0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn from_bool(b: bool) -> Self {
        Value::Int(b as i64)
    }

    /// Zero (int or float) is false, everything else is true.
    pub fn is_truthy(&self) -> bool {
        match *self {
            Value::Int(n) => n != 0,
            Value::Float(x) => x != 0.0,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Int(n) => n as f64,
            Value::Float(x) => x,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Int(0)
    }
}

impl fmt::Display for Value {
    /// Integers print bare; floats always keep a fractional part (`3.0`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) if x.is_finite() => {
                let text = x.to_string();
                if text.contains('.') {
                    f.write_str(&text)
                } else {
                    write!(f, "{}.0", text)
                }
            }
            Value::Float(x) => write!(f, "{}", x),
        }
    }
}
