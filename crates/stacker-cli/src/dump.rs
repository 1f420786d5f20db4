//! Machine state dumps for `--debug`.

use std::io::{self, Write};

use stacker_core::VirtualMachine;

/// Write the stack (top first), TOS, heap bindings and the next instruction.
pub fn write_state<W: Write, O: Write>(out: &mut W, vm: &VirtualMachine<O>) -> io::Result<()> {
    let stack: Vec<String> = vm.stack().iter_top_down().map(|v| format!("{:?}", v)).collect();
    writeln!(out, "STACK [{}]", stack.join(", "))?;

    match vm.stack().top() {
        Ok(tos) => writeln!(out, "TOS   {:?}", tos)?,
        Err(_) => writeln!(out, "TOS   <empty>")?,
    }

    let heap: Vec<String> = vm
        .heap()
        .bindings()
        .iter()
        .map(|b| format!("{} = {:?}", b.name, b.value))
        .collect();
    writeln!(out, "HEAP  [{}]", heap.join(", "))?;

    match vm.current_instruction() {
        Some(instr) => writeln!(out, "NEXT  {:>4}  {}", vm.pc(), instr)?,
        None => writeln!(out, "NEXT  {:>4}  <out of program>", vm.pc())?,
    }
    Ok(())
}
