//! Virtual Machine Core
//!
//! Defines the Stacker virtual machine structure and its fetch-decode-execute loop.
//! The loop is iterative: program length and jumps bound resource use, never call depth.

use std::io::{self, Write};

use tracing::{debug, trace};

use crate::bytecode::instruction::{Instruction, Operand, Program};
use crate::bytecode::opcode::OpCode;
use crate::config::VmConfig;
use crate::error::{StackerError, StackerResult};

use super::memory::Heap;
use super::stack::Stack;
use super::value::Value;

/// Result of executing a single instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Halted,
}

/// Mutable machine state, kept apart from the program so an instruction
/// can be borrowed while it executes.
#[derive(Debug)]
struct State<W> {
    stack: Stack,
    heap: Heap,
    out: W,
    /// Index of the next instruction to fetch
    pc: usize,
    halted: bool,
}

/// Stacker Virtual Machine
#[derive(Debug)]
pub struct VirtualMachine<W: Write = io::Stdout> {
    config: VmConfig,
    program: Program,
    state: State<W>,
    steps: u64,
}

impl VirtualMachine<io::Stdout> {
    /// Create a new VM instance printing to stdout
    pub fn new(config: VmConfig, program: Program) -> Self {
        Self::with_output(config, program, io::stdout())
    }
}

impl<W: Write> VirtualMachine<W> {
    /// Create a new VM instance printing to `out`
    pub fn with_output(config: VmConfig, program: Program, out: W) -> Self {
        VirtualMachine {
            state: State {
                stack: Stack::new(config.max_stack_size),
                heap: Heap::new(),
                out,
                pc: 0,
                halted: false,
            },
            program,
            steps: 0,
            config,
        }
    }

    /// Execute until `end` or error
    pub fn execute(&mut self) -> StackerResult<()> {
        debug!(instructions = self.program.len(), "execution started");
        while self.step()? == StepOutcome::Continue {}
        debug!(steps = self.steps, "execution finished");
        Ok(())
    }

    /// Execute a single instruction
    pub fn step(&mut self) -> StackerResult<StepOutcome> {
        if self.state.halted {
            return Ok(StepOutcome::Halted);
        }
        if let Some(limit) = self.config.max_steps {
            if self.steps >= limit {
                return Err(StackerError::StepLimitExceeded(limit));
            }
        }

        let pc = self.state.pc;
        let instruction = self.program.get(pc).ok_or(StackerError::IndexOutOfRange {
            index: pc,
            len: self.program.len(),
        })?;

        self.state.pc += 1;
        self.steps += 1;

        self.state
            .dispatch(instruction, self.program.len())
            .map_err(|e| e.at(pc, instruction.line))?;

        Ok(if self.state.halted {
            StepOutcome::Halted
        } else {
            StepOutcome::Continue
        })
    }

    /// Index of the next instruction to execute
    pub fn pc(&self) -> usize {
        self.state.pc
    }

    /// Next instruction to execute, if the counter is in range
    pub fn current_instruction(&self) -> Option<&Instruction> {
        self.program.get(self.state.pc)
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_halted(&self) -> bool {
        self.state.halted
    }

    pub fn stack(&self) -> &Stack {
        &self.state.stack
    }

    pub fn heap(&self) -> &Heap {
        &self.state.heap
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Peek at the top of the stack
    pub fn peek_top(&self) -> StackerResult<Value> {
        self.state.stack.top().cloned()
    }

    pub fn into_output(self) -> W {
        self.state.out
    }
}

impl<W: Write> State<W> {
    fn dispatch(&mut self, instruction: &Instruction, program_len: usize) -> StackerResult<()> {
        let opcode = instruction
            .opcode
            .ok_or_else(|| StackerError::UnknownOpcode(instruction.mnemonic.clone()))?;

        trace!(
            pc = self.pc - 1,
            opcode = %opcode,
            depth = self.stack.size(),
            "dispatch"
        );

        match opcode {
            // Stack
            OpCode::Push => {
                let value = value_operand(instruction, opcode)?.clone();
                self.stack.push(value)
            }
            OpCode::Pop => self.stack.pop().map(|_| ()),
            OpCode::Drop => self.stack.drop(),
            OpCode::Dup => self.stack.dup(),
            OpCode::Over => self.stack.over(),
            OpCode::Swap => self.stack.swap(),

            // Arithmetic
            OpCode::Add | OpCode::Sub | OpCode::Mult | OpCode::Div => {
                let (lhs, rhs) = self.stack.pop_pair()?;
                let result = lhs.arithmetic(opcode, &rhs)?;
                self.stack.push(result)
            }

            // Comparison
            OpCode::Gthan | OpCode::Lthan | OpCode::Gthanoeq | OpCode::Lthanoeq | OpCode::Eq => {
                let (lhs, rhs) = self.stack.pop_pair()?;
                let result = lhs.compare(opcode, &rhs)?;
                self.stack.push(Value::from(result))
            }

            // Control flow
            OpCode::If => {
                if !self.stack.pop()?.is_truthy()? {
                    self.pc += 1;
                }
                Ok(())
            }
            OpCode::Jump => {
                let target = match value_operand(instruction, opcode)? {
                    Value::Integer(i) => usize::try_from(*i).ok(),
                    _ => None,
                };
                match target {
                    Some(target) if target < program_len => {
                        self.pc = target;
                        Ok(())
                    }
                    _ => Err(StackerError::IndexOutOfRange {
                        index: target.unwrap_or(usize::MAX),
                        len: program_len,
                    }),
                }
            }
            OpCode::End => {
                self.halted = true;
                Ok(())
            }

            // Output
            OpCode::Print => {
                let value = self.stack.pop()?;
                writeln!(self.out, "{}", value)?;
                Ok(())
            }

            // Variable store
            OpCode::Store => {
                let name = ident_operand(instruction, opcode)?;
                let value = self.stack.pop()?;
                self.heap.store(name, value);
                Ok(())
            }
            OpCode::Fetch => {
                let name = ident_operand(instruction, opcode)?;
                let value = self.heap.fetch(name)?.clone();
                self.stack.push(value)
            }
        }
    }
}

fn value_operand(instruction: &Instruction, opcode: OpCode) -> StackerResult<&Value> {
    match instruction.operand() {
        Some(Operand::Value(value)) => Ok(value),
        _ => Err(StackerError::InvalidOperand {
            line: instruction.line,
            opcode,
            expected: "a literal operand",
        }),
    }
}

fn ident_operand(instruction: &Instruction, opcode: OpCode) -> StackerResult<&str> {
    match instruction.operand() {
        Some(Operand::Ident(name)) => Ok(name),
        _ => Err(StackerError::InvalidOperand {
            line: instruction.line,
            opcode,
            expected: "an identifier operand",
        }),
    }
}
