//! Program Loader
//!
//! Turns line-oriented program text into an immutable `Program`.
//! One instruction per line: `<opcode> [operand ...]`.
//! This layer performs structural validation only; unknown opcodes are
//! kept and left for the VM to reject.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::bytecode::instruction::{Instruction, Operand, Program};
use crate::bytecode::opcode::{OpCode, OperandKind};
use crate::error::{StackerError, StackerResult};
use crate::vm::value::Value;

/// Program loader
pub struct BytecodeLoader;

impl BytecodeLoader {
    /// Parse program text
    pub fn parse(source: &str) -> StackerResult<Program> {
        let instructions = source
            .lines()
            .enumerate()
            .map(|(idx, text)| Self::parse_line(text, idx + 1))
            .collect::<StackerResult<Vec<_>>>()?;

        debug!(instructions = instructions.len(), "program parsed");
        Ok(Program::new(instructions))
    }

    /// Read and parse a program file
    pub fn load_file(path: impl AsRef<Path>) -> StackerResult<Program> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading program");
        let source = fs::read_to_string(path)?;
        Self::parse(&source)
    }

    fn parse_line(text: &str, line: usize) -> StackerResult<Instruction> {
        let mut tokens = text.split_whitespace();
        // Blank lines keep their slot with an empty mnemonic
        let mnemonic = tokens.next().unwrap_or("");
        let opcode = OpCode::from_mnemonic(mnemonic);

        let operands: Vec<Operand> = match opcode.map(OpCode::operand_kind) {
            Some(OperandKind::Ident) => tokens.map(|t| Operand::Ident(t.to_string())).collect(),
            _ => tokens
                .map(|t| Self::parse_literal(t, line).map(Operand::Value))
                .collect::<StackerResult<_>>()?,
        };

        let instruction = Instruction {
            mnemonic: mnemonic.to_string(),
            opcode,
            operands,
            line,
        };

        if let Some(opcode) = opcode {
            Self::check_operands(&instruction, opcode)?;
        }
        Ok(instruction)
    }

    fn check_operands(instruction: &Instruction, opcode: OpCode) -> StackerResult<()> {
        let kind = opcode.operand_kind();
        let expected = if kind == OperandKind::None { 0 } else { 1 };
        let found = instruction.operands.len();
        if found != expected {
            return Err(StackerError::OperandCount {
                line: instruction.line,
                opcode,
                expected,
                found,
            });
        }

        if kind == OperandKind::Target
            && !matches!(instruction.operand(), Some(Operand::Value(Value::Integer(_))))
        {
            return Err(StackerError::InvalidOperand {
                line: instruction.line,
                opcode,
                expected: "an integer instruction index",
            });
        }
        Ok(())
    }

    /// Classify a single operand token
    fn parse_literal(token: &str, line: usize) -> StackerResult<Value> {
        if let Some(text) = Self::strip_quotes(token) {
            return Ok(Value::Text(text.to_string()));
        }
        if token.starts_with(|c: char| c.is_ascii_digit()) {
            return Self::parse_number(token, line);
        }
        Err(StackerError::UnrecognizedToken {
            line,
            token: token.to_string(),
        })
    }

    /// `'...'` or `"..."`, outer quotes must match
    fn strip_quotes(token: &str) -> Option<&str> {
        let quote = token.chars().next().filter(|c| *c == '\'' || *c == '"')?;
        token.strip_prefix(quote)?.strip_suffix(quote)
    }

    /// `[0-9]+(\.[0-9]+)?`
    fn parse_number(token: &str, line: usize) -> StackerResult<Value> {
        let malformed = || StackerError::MalformedLiteral {
            line,
            token: token.to_string(),
        };

        let mut is_float = false;
        for c in token.chars() {
            match c {
                '0'..='9' => {}
                '.' if !is_float => is_float = true,
                '.' => return Err(malformed()),
                _ => {
                    return Err(StackerError::UnrecognizedToken {
                        line,
                        token: token.to_string(),
                    })
                }
            }
        }

        if is_float {
            if token.ends_with('.') {
                return Err(malformed());
            }
            token.parse::<f64>().map(Value::Float).map_err(|_| malformed())
        } else {
            token.parse::<i64>().map(Value::Integer).map_err(|_| malformed())
        }
    }
}

impl Program {
    /// Parse program text
    pub fn parse(source: &str) -> StackerResult<Program> {
        BytecodeLoader::parse(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn single(source: &str) -> Instruction {
        let program = BytecodeLoader::parse(source).expect("parse failed");
        assert_eq!(program.len(), 1);
        program.get(0).cloned().expect("missing instruction")
    }

    #[rstest]
    #[case("push 42", Value::Integer(42))]
    #[case("push 007", Value::Integer(7))]
    #[case("push 3.25", Value::Float(3.25))]
    #[case("push 'hello'", Value::Text("hello".into()))]
    #[case("push \"hello\"", Value::Text("hello".into()))]
    #[case("push ''", Value::Text(String::new()))]
    #[case("push \"it's\"", Value::Text("it's".into()))]
    fn push_literals(#[case] source: &str, #[case] expected: Value) {
        let instr = single(source);
        assert_eq!(instr.opcode, Some(OpCode::Push));
        assert_eq!(instr.operands, vec![Operand::Value(expected)]);
    }

    #[test]
    fn store_and_fetch_take_identifiers_verbatim() {
        let instr = single("store 42");
        assert_eq!(instr.operands, vec![Operand::Ident("42".into())]);
        let instr = single("fetch 'x'");
        assert_eq!(instr.operands, vec![Operand::Ident("'x'".into())]);
    }

    #[test]
    fn single_token_lines_have_no_operands() {
        let program = BytecodeLoader::parse("add\nprint\nend").unwrap();
        let opcodes: Vec<_> = program.iter().map(|i| i.opcode).collect();
        assert_eq!(
            opcodes,
            vec![Some(OpCode::Add), Some(OpCode::Print), Some(OpCode::End)]
        );
        assert!(program.iter().all(|i| i.operands.is_empty()));
    }

    #[test]
    fn lines_are_numbered_in_order() {
        let program = BytecodeLoader::parse("push 1\r\npush 2\nend\n").unwrap();
        assert_eq!(program.len(), 3);
        let lines: Vec<_> = program.iter().map(|i| i.line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
    }

    #[test]
    fn extra_whitespace_is_ignored() {
        let instr = single("   push \t 5   ");
        let expected =
            Instruction::with_operand(OpCode::Push, Operand::Value(Value::Integer(5))).at_line(1);
        assert_eq!(instr, expected);
    }

    #[test]
    fn blank_line_keeps_an_empty_slot() {
        let program = BytecodeLoader::parse("push 1\n\n   \nend").unwrap();
        assert_eq!(program.len(), 4);
        let blank = program.get(1).unwrap();
        assert_eq!(blank.mnemonic, "");
        assert_eq!(blank.opcode, None);
        assert_eq!(program.get(2).unwrap().mnemonic, "");
    }

    #[test]
    fn unknown_mnemonic_is_kept() {
        let instr = single("frobnicate 1 'a'");
        assert_eq!(instr.mnemonic, "frobnicate");
        assert_eq!(instr.opcode, None);
        assert_eq!(instr.operands.len(), 2);
    }

    #[rstest]
    #[case("push 1.2.3")]
    #[case("push 1.")]
    #[case("push 99999999999999999999")]
    fn malformed_numbers(#[case] source: &str) {
        let err = BytecodeLoader::parse(source).unwrap_err();
        assert!(
            matches!(err, StackerError::MalformedLiteral { line: 1, .. }),
            "unexpected error: {:?}",
            err
        );
    }

    #[rstest]
    #[case("push 12abc")]
    #[case("push abc")]
    #[case("push -1")]
    #[case("push .5")]
    #[case("push 'unterminated")]
    #[case("push 'mismatched\"")]
    #[case("push '")]
    #[case("bogus x")]
    fn unrecognized_tokens(#[case] source: &str) {
        let err = BytecodeLoader::parse(source).unwrap_err();
        assert!(
            matches!(err, StackerError::UnrecognizedToken { line: 1, .. }),
            "unexpected error: {:?}",
            err
        );
    }

    #[test]
    fn error_reports_source_line() {
        let err = BytecodeLoader::parse("push 1\npush 2\npush 1.2.3").unwrap_err();
        assert_eq!(
            err,
            StackerError::MalformedLiteral {
                line: 3,
                token: "1.2.3".into()
            }
        );
    }

    #[rstest]
    #[case("push", OpCode::Push, 1, 0)]
    #[case("push 1 2", OpCode::Push, 1, 2)]
    #[case("store", OpCode::Store, 1, 0)]
    #[case("fetch a b", OpCode::Fetch, 1, 2)]
    #[case("add 1", OpCode::Add, 0, 1)]
    #[case("jump", OpCode::Jump, 1, 0)]
    fn operand_counts_are_checked(
        #[case] source: &str,
        #[case] opcode: OpCode,
        #[case] expected: usize,
        #[case] found: usize,
    ) {
        let err = BytecodeLoader::parse(source).unwrap_err();
        assert_eq!(
            err,
            StackerError::OperandCount {
                line: 1,
                opcode,
                expected,
                found
            }
        );
    }

    #[rstest]
    #[case("jump 1.5")]
    #[case("jump 'x'")]
    fn jump_needs_integer_target(#[case] source: &str) {
        let err = BytecodeLoader::parse(source).unwrap_err();
        assert!(matches!(
            err,
            StackerError::InvalidOperand {
                opcode: OpCode::Jump,
                ..
            }
        ));
    }

    #[test]
    fn display_reconstructs_source() {
        let program = BytecodeLoader::parse("push 'a'\nstore x\njump 0").unwrap();
        let rendered: Vec<String> = program.iter().map(|i| i.to_string()).collect();
        assert_eq!(rendered, vec!["push \"a\"", "store x", "jump 0"]);
    }

    #[test]
    fn load_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prog.bc");
        fs::write(&path, "push 1\nprint\nend\n").unwrap();
        let program = BytecodeLoader::load_file(&path).unwrap();
        assert_eq!(program.len(), 3);
    }

    #[test]
    fn load_file_missing_is_io_error() {
        let err = BytecodeLoader::load_file("/definitely/not/here.bc").unwrap_err();
        assert!(matches!(err, StackerError::Io(_)));
    }
}
