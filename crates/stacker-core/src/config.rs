//! Stacker Configuration
//!
//! Defines runtime limits for the Stacker virtual machine.
//! Configuration specifies constraints only; enforcement is handled by the VM.

/// VM Configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmConfig {
    /// Maximum stack depth (`None` = unbounded)
    pub max_stack_size: Option<usize>,

    /// Maximum number of executed instructions (`None` = unbounded)
    pub max_steps: Option<u64>,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            max_stack_size: None,
            max_steps: None,
        }
    }
}

impl VmConfig {
    /// Create a new configuration with default limits
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_stack_size(mut self, max_stack_size: Option<usize>) -> Self {
        self.max_stack_size = max_stack_size;
        self
    }

    pub fn with_max_steps(mut self, max_steps: Option<u64>) -> Self {
        self.max_steps = max_steps;
        self
    }
}
