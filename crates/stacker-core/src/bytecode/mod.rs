pub mod instruction;
pub mod opcode;

pub use instruction::{Instruction, Operand, Program};
pub use opcode::{OpCode, OperandKind};
