//! Bytecode Opcode Definitions
//!
//! Defines the opcode set of the Stacker text format.
//! This file contains no execution semantics.
//! Mnemonics are the on-disk contract.

use std::fmt;

/// Operand shape accepted by an opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    None,
    /// A single literal value (`push`)
    Value,
    /// A single bare identifier (`store`, `fetch`)
    Ident,
    /// A single absolute instruction index (`jump`)
    Target,
}

/// Bytecode opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    // Stack operations
    Push,
    Pop,
    Drop,
    Dup,
    Over,
    Swap,

    // Arithmetic
    Add,
    Sub,
    Mult,
    Div,

    // Comparison
    Gthan,
    Lthan,
    Gthanoeq,
    Lthanoeq,
    Eq,

    // Control flow
    If,
    Jump,
    End,

    // Output
    Print,

    // Variable store
    Store,
    Fetch,
}

impl OpCode {
    pub const ALL: [OpCode; 21] = [
        OpCode::Push,
        OpCode::Pop,
        OpCode::Drop,
        OpCode::Dup,
        OpCode::Over,
        OpCode::Swap,
        OpCode::Add,
        OpCode::Sub,
        OpCode::Mult,
        OpCode::Div,
        OpCode::Gthan,
        OpCode::Lthan,
        OpCode::Gthanoeq,
        OpCode::Lthanoeq,
        OpCode::Eq,
        OpCode::If,
        OpCode::Jump,
        OpCode::End,
        OpCode::Print,
        OpCode::Store,
        OpCode::Fetch,
    ];

    /// Convert a source mnemonic to an opcode
    pub fn from_mnemonic(word: &str) -> Option<Self> {
        match word {
            "push" => Some(OpCode::Push),
            "pop" => Some(OpCode::Pop),
            "drop" => Some(OpCode::Drop),
            "dup" => Some(OpCode::Dup),
            "over" => Some(OpCode::Over),
            "swap" => Some(OpCode::Swap),

            "add" => Some(OpCode::Add),
            "sub" => Some(OpCode::Sub),
            "mult" => Some(OpCode::Mult),
            "div" => Some(OpCode::Div),

            "gthan" => Some(OpCode::Gthan),
            "lthan" => Some(OpCode::Lthan),
            "gthanoeq" => Some(OpCode::Gthanoeq),
            "lthanoeq" => Some(OpCode::Lthanoeq),
            "eq" => Some(OpCode::Eq),

            "if" => Some(OpCode::If),
            "jump" => Some(OpCode::Jump),
            "end" => Some(OpCode::End),

            "print" => Some(OpCode::Print),

            "store" => Some(OpCode::Store),
            "fetch" => Some(OpCode::Fetch),

            _ => None,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Push => "push",
            OpCode::Pop => "pop",
            OpCode::Drop => "drop",
            OpCode::Dup => "dup",
            OpCode::Over => "over",
            OpCode::Swap => "swap",
            OpCode::Add => "add",
            OpCode::Sub => "sub",
            OpCode::Mult => "mult",
            OpCode::Div => "div",
            OpCode::Gthan => "gthan",
            OpCode::Lthan => "lthan",
            OpCode::Gthanoeq => "gthanoeq",
            OpCode::Lthanoeq => "lthanoeq",
            OpCode::Eq => "eq",
            OpCode::If => "if",
            OpCode::Jump => "jump",
            OpCode::End => "end",
            OpCode::Print => "print",
            OpCode::Store => "store",
            OpCode::Fetch => "fetch",
        }
    }

    pub fn operand_kind(self) -> OperandKind {
        match self {
            OpCode::Push => OperandKind::Value,
            OpCode::Store | OpCode::Fetch => OperandKind::Ident,
            OpCode::Jump => OperandKind::Target,
            _ => OperandKind::None,
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
