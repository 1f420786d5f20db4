pub mod memory;
pub mod stack;
pub mod value;
pub mod vm;

pub use memory::{Binding, Heap};
pub use stack::Stack;
pub use vm::{StepOutcome, VirtualMachine};
pub use value::Value;
