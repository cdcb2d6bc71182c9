//! Value-level semantics of the arithmetic, comparison and logical opcodes.
//!
//! Two ints stay int (checked for overflow); any float operand promotes the
//! whole operation to float.

use std::cmp::Ordering;

use sam_bytecode::Value;
use sam_syntax::error::{runtime_error, Error, Result};

type IntOp = fn(i64, i64) -> Option<i64>;
type FloatOp = fn(f64, f64) -> f64;

fn arith(a: Value, b: Value, what: &str, int_op: IntOp, float_op: FloatOp) -> Result<Value> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => int_op(x, y)
            .map(Value::Int)
            .ok_or_else(|| Error::runtime(format!("integer overflow in {}", what))),
        (a, b) => Ok(Value::Float(float_op(a.as_f64(), b.as_f64()))),
    }
}

pub(crate) fn add(a: Value, b: Value) -> Result<Value> {
    arith(a, b, "addition", i64::checked_add, |x, y| x + y)
}

pub(crate) fn sub(a: Value, b: Value) -> Result<Value> {
    arith(a, b, "subtraction", i64::checked_sub, |x, y| x - y)
}

pub(crate) fn mul(a: Value, b: Value) -> Result<Value> {
    arith(a, b, "multiplication", i64::checked_mul, |x, y| x * y)
}

/// Floor division for two ints, IEEE division otherwise.
pub(crate) fn div(a: Value, b: Value) -> Result<Value> {
    if let (Value::Int(_), Value::Int(0)) = (a, b) {
        return runtime_error("division by zero");
    }
    arith(a, b, "division", floor_div, |x, y| x / y)
}

fn floor_div(x: i64, y: i64) -> Option<i64> {
    let q = x.checked_div(y)?;
    let r = x.checked_rem(y)?;
    if r != 0 && ((r < 0) != (y < 0)) {
        Some(q - 1)
    } else {
        Some(q)
    }
}

fn compare(a: Value, b: Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(&y)),
        (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
    }
}

pub(crate) fn lt(a: Value, b: Value) -> Result<Value> {
    Ok(Value::from_bool(compare(a, b) == Some(Ordering::Less)))
}

pub(crate) fn gt(a: Value, b: Value) -> Result<Value> {
    Ok(Value::from_bool(compare(a, b) == Some(Ordering::Greater)))
}

pub(crate) fn le(a: Value, b: Value) -> Result<Value> {
    Ok(Value::from_bool(matches!(compare(a, b), Some(Ordering::Less | Ordering::Equal))))
}

pub(crate) fn ge(a: Value, b: Value) -> Result<Value> {
    Ok(Value::from_bool(matches!(compare(a, b), Some(Ordering::Greater | Ordering::Equal))))
}

pub(crate) fn eq(a: Value, b: Value) -> Result<Value> {
    Ok(Value::from_bool(compare(a, b) == Some(Ordering::Equal)))
}

pub(crate) fn ne(a: Value, b: Value) -> Result<Value> {
    Ok(Value::from_bool(compare(a, b) != Some(Ordering::Equal)))
}

pub(crate) fn and(a: Value, b: Value) -> Result<Value> {
    Ok(Value::from_bool(a.is_truthy() && b.is_truthy()))
}

pub(crate) fn or(a: Value, b: Value) -> Result<Value> {
    Ok(Value::from_bool(a.is_truthy() || b.is_truthy()))
}
