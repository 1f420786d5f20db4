//! Stacker - Core Library
//!
//! A single-stack virtual machine for a line-oriented instruction format.
//! Public API surface for the parser and the execution engine.

pub mod error;
pub mod config;
pub mod bytecode;
pub mod vm;
pub mod loader;

use std::io::Write;

// Re-export commonly used types
pub use error::{StackerError, StackerResult};
pub use config::VmConfig;
pub use bytecode::{Instruction, OpCode, Operand, Program};
pub use vm::{StepOutcome, Value, VirtualMachine};
pub use loader::BytecodeLoader;

/// Parse `source` and run it to completion, writing `print` output to `out`.
pub fn run_source<W: Write>(source: &str, config: VmConfig, out: W) -> StackerResult<W> {
    let program = BytecodeLoader::parse(source)?;
    let mut vm = VirtualMachine::with_output(config, program, out);
    vm.execute()?;
    Ok(vm.into_output())
}
