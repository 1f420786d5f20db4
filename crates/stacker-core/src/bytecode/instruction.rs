//! Bytecode Instruction Representation
//!
//! Defines the parsed instruction format and the immutable program.
//! This layer contains no execution semantics.

use std::fmt;

use super::opcode::OpCode;
use crate::vm::value::Value;

/// Instruction operand
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),
    Ident(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Value(Value::Text(s)) => write!(f, "\"{}\"", s),
            Operand::Value(v) => write!(f, "{}", v),
            Operand::Ident(name) => f.write_str(name),
        }
    }
}

/// Parsed instruction
///
/// `opcode` is `None` when the mnemonic is not part of the instruction set;
/// such instructions only fail once the VM reaches them.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub mnemonic: String,
    pub opcode: Option<OpCode>,
    pub operands: Vec<Operand>,
    /// 1-based source line
    pub line: usize,
}

impl Instruction {
    /// Create an instruction with no operands
    pub fn new(opcode: OpCode) -> Self {
        Instruction {
            mnemonic: opcode.mnemonic().to_string(),
            opcode: Some(opcode),
            operands: Vec::new(),
            line: 0,
        }
    }

    /// Create an instruction with a single operand
    pub fn with_operand(opcode: OpCode, operand: Operand) -> Self {
        Instruction {
            operands: vec![operand],
            ..Instruction::new(opcode)
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    pub fn operand(&self) -> Option<&Operand> {
        self.operands.first()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mnemonic)?;
        for operand in &self.operands {
            write!(f, " {}", operand)?;
        }
        Ok(())
    }
}

/// Immutable, zero-indexed instruction sequence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub(crate) fn new(instructions: Vec<Instruction>) -> Self {
        Program { instructions }
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}
