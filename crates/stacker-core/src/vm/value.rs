//! Runtime Value Representation
//!
//! Defines the value types carried on the stack and in the heap,
//! along with the numeric rules used by arithmetic and comparison opcodes.

use std::cmp::Ordering;
use std::fmt;

use crate::bytecode::opcode::OpCode;
use crate::error::{StackerError, StackerResult};

/// Runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit signed integer
    Integer(i64),

    /// Numeric value (IEEE 754)
    Float(f64),

    /// Text literal, stored without its quotes
    Text(String),
}

/// Numeric view of a value, obtained before any arithmetic.
#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }

    fn number(&self, opcode: OpCode) -> StackerResult<Number> {
        match self {
            Value::Integer(i) => Ok(Number::Int(*i)),
            Value::Float(f) => Ok(Number::Float(*f)),
            Value::Text(_) => Err(StackerError::TypeMismatch {
                opcode,
                found: self.kind_name(),
            }),
        }
    }

    /// Apply `add`, `sub`, `mult` or `div` with `self` as the left operand.
    ///
    /// Integer operands stay integers except under `div`, which always
    /// produces a float.
    pub fn arithmetic(&self, opcode: OpCode, rhs: &Value) -> StackerResult<Value> {
        let (a, b) = (self.number(opcode)?, rhs.number(opcode)?);

        if opcode == OpCode::Div {
            if b.is_zero() {
                return Err(StackerError::DivisionByZero);
            }
            return Ok(Value::Float(a.as_f64() / b.as_f64()));
        }

        match (a, b) {
            (Number::Int(x), Number::Int(y)) => {
                let result = match opcode {
                    OpCode::Add => x.checked_add(y),
                    OpCode::Sub => x.checked_sub(y),
                    OpCode::Mult => x.checked_mul(y),
                    _ => unreachable!("not an arithmetic opcode: {}", opcode),
                };
                result
                    .map(Value::Integer)
                    .ok_or(StackerError::IntegerOverflow(opcode))
            }
            _ => {
                let (x, y) = (a.as_f64(), b.as_f64());
                let result = match opcode {
                    OpCode::Add => x + y,
                    OpCode::Sub => x - y,
                    OpCode::Mult => x * y,
                    _ => unreachable!("not an arithmetic opcode: {}", opcode),
                };
                Ok(Value::Float(result))
            }
        }
    }

    /// Apply a comparison opcode with `self` as the left operand.
    pub fn compare(&self, opcode: OpCode, rhs: &Value) -> StackerResult<bool> {
        let (a, b) = (self.number(opcode)?, rhs.number(opcode)?);

        let ordering = match (a, b) {
            (Number::Int(x), Number::Int(y)) => Some(x.cmp(&y)),
            _ => a.as_f64().partial_cmp(&b.as_f64()),
        };

        // NaN compares false against everything
        let Some(ordering) = ordering else {
            return Ok(false);
        };

        Ok(match opcode {
            OpCode::Gthan => ordering == Ordering::Greater,
            OpCode::Lthan => ordering == Ordering::Less,
            OpCode::Gthanoeq => ordering != Ordering::Less,
            OpCode::Lthanoeq => ordering != Ordering::Greater,
            OpCode::Eq => ordering == Ordering::Equal,
            _ => unreachable!("not a comparison opcode: {}", opcode),
        })
    }

    /// Condition test used by `if`: false only for numbers less than 1.
    pub fn is_truthy(&self) -> StackerResult<bool> {
        Ok(match self.number(OpCode::If)? {
            Number::Int(i) => i >= 1,
            // NaN is not less than 1, so it counts as true
            Number::Float(f) => !(f < 1.0),
        })
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Integer(b as i64)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            // Debug keeps the fractional part on whole floats (`2.0`)
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Text(s) => f.write_str(s),
        }
    }
}
