//! Stacker Error Types
//!
//! Defines every error condition produced by the parser and the virtual machine.
//! All errors are fatal to the current run; callers decide what to do with them.

use std::io;

use thiserror::Error;

use crate::bytecode::opcode::OpCode;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StackerError {
    // Parse errors
    #[error("line {line}: unrecognized token `{token}`")]
    UnrecognizedToken { line: usize, token: String },

    #[error("line {line}: malformed literal `{token}`")]
    MalformedLiteral { line: usize, token: String },

    #[error("line {line}: `{opcode}` takes {expected} operand(s), found {found}")]
    OperandCount {
        line: usize,
        opcode: OpCode,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: `{opcode}` expects {expected}")]
    InvalidOperand {
        line: usize,
        opcode: OpCode,
        expected: &'static str,
    },

    // Execution errors
    #[error("unknown opcode `{0}`")]
    UnknownOpcode(String),

    #[error("stack underflow")]
    StackUnderflow,

    #[error("stack overflow")]
    StackOverflow,

    #[error("no binding named `{0}`")]
    HeapLookup(String),

    #[error("`{opcode}` requires a numeric operand, found {found}")]
    TypeMismatch { opcode: OpCode, found: &'static str },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in `{0}`")]
    IntegerOverflow(OpCode),

    #[error("instruction index {index} is outside the program (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("step limit of {0} instructions exceeded")]
    StepLimitExceeded(u64),

    /// A runtime error annotated with where it happened.
    #[error("instruction {pc} (line {line}): {error}")]
    Fault {
        pc: usize,
        line: usize,
        error: Box<StackerError>,
    },

    // IO boundary
    #[error("io error: {0}")]
    Io(String),
}

impl StackerError {
    /// Strip any `Fault` location wrappers and return the underlying error.
    pub fn root(&self) -> &StackerError {
        match self {
            StackerError::Fault { error, .. } => error.root(),
            other => other,
        }
    }

    /// True for errors raised while turning text into a program.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self.root(),
            StackerError::UnrecognizedToken { .. }
                | StackerError::MalformedLiteral { .. }
                | StackerError::OperandCount { .. }
                | StackerError::InvalidOperand { .. }
        )
    }

    pub(crate) fn at(self, pc: usize, line: usize) -> StackerError {
        match self {
            fault @ StackerError::Fault { .. } => fault,
            other => StackerError::Fault {
                pc,
                line,
                error: Box::new(other),
            },
        }
    }
}

impl From<io::Error> for StackerError {
    fn from(err: io::Error) -> Self {
        StackerError::Io(err.to_string())
    }
}

pub type StackerResult<T> = Result<T, StackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_unwraps_nested_faults() {
        let err = StackerError::DivisionByZero.at(3, 4);
        assert_eq!(err.root(), &StackerError::DivisionByZero);
        assert_eq!(err.to_string(), "instruction 3 (line 4): division by zero");
    }

    #[test]
    fn at_does_not_double_wrap() {
        let err = StackerError::StackUnderflow.at(1, 2).at(5, 6);
        match err {
            StackerError::Fault { pc, line, .. } => assert_eq!((pc, line), (1, 2)),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn parse_errors_are_classified() {
        let err = StackerError::MalformedLiteral {
            line: 1,
            token: "1.2.3".into(),
        };
        assert!(err.is_parse_error());
        assert!(!StackerError::StackUnderflow.is_parse_error());
    }
}
