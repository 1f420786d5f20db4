//! VM Stack Implementation
//!
//! Stack data structure for VM execution.
//! Depth 0 is always the top of the stack (TOS).
//! No execution semantics.

use crate::error::{StackerError, StackerResult};
use super::value::Value;

/// VM execution stack
#[derive(Debug)]
pub struct Stack {
    // Last element is the top
    values: Vec<Value>,
    max_size: Option<usize>,
}

impl Stack {
    /// Create new stack, optionally bounded
    pub fn new(max_size: Option<usize>) -> Self {
        Stack {
            values: Vec::new(),
            max_size,
        }
    }

    /// Push value onto stack
    pub fn push(&mut self, value: Value) -> StackerResult<()> {
        if self.max_size.is_some_and(|max| self.values.len() >= max) {
            return Err(StackerError::StackOverflow);
        }
        self.values.push(value);
        Ok(())
    }

    /// Pop value from stack
    pub fn pop(&mut self) -> StackerResult<Value> {
        self.values.pop().ok_or(StackerError::StackUnderflow)
    }

    /// Discard the top value, promoting the next one
    pub fn drop(&mut self) -> StackerResult<()> {
        self.pop().map(|_| ())
    }

    /// Peek at top of stack without removing
    pub fn top(&self) -> StackerResult<&Value> {
        self.peek(0)
    }

    /// Peek at the value `depth` places below the top
    pub fn peek(&self, depth: usize) -> StackerResult<&Value> {
        self.values
            .len()
            .checked_sub(depth + 1)
            .and_then(|idx| self.values.get(idx))
            .ok_or(StackerError::StackUnderflow)
    }

    /// Duplicate top value
    pub fn dup(&mut self) -> StackerResult<()> {
        let value = self.top()?.clone();
        self.push(value)
    }

    /// Push a copy of the second value
    pub fn over(&mut self) -> StackerResult<()> {
        let value = self.peek(1)?.clone();
        self.push(value)
    }

    /// Exchange the top two values
    pub fn swap(&mut self) -> StackerResult<()> {
        let len = self.values.len();
        if len < 2 {
            return Err(StackerError::StackUnderflow);
        }
        self.values.swap(len - 1, len - 2);
        Ok(())
    }

    /// Pop the top two values as `(second, top)`
    pub fn pop_pair(&mut self) -> StackerResult<(Value, Value)> {
        if self.values.len() < 2 {
            return Err(StackerError::StackUnderflow);
        }
        let top = self.pop()?;
        let second = self.pop()?;
        Ok((second, top))
    }

    /// Get current stack size
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Check if stack is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate from the top down
    pub fn iter_top_down(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().rev()
    }
}
