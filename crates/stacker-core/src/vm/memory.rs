//! VM Memory Model
//!
//! The variable store ("heap"): a flat namespace populated by `store`
//! and read by `fetch`. Bindings are never mutated or removed; storing a
//! name again appends a new binding that shadows the earlier ones, so
//! `fetch` always sees the most recent store.

use std::collections::HashMap;

use crate::error::{StackerError, StackerResult};
use super::value::Value;

/// A single `store` record
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub value: Value,
}

/// Append-only variable store
#[derive(Debug, Default)]
pub struct Heap {
    bindings: Vec<Binding>,
    // name -> index of its latest binding
    latest: HashMap<String, usize>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&mut self, name: &str, value: Value) {
        let index = self.bindings.len();
        self.bindings.push(Binding {
            name: name.to_string(),
            value,
        });
        self.latest.insert(name.to_string(), index);
    }

    pub fn fetch(&self, name: &str) -> StackerResult<&Value> {
        self.latest
            .get(name)
            .map(|&index| &self.bindings[index].value)
            .ok_or_else(|| StackerError::HeapLookup(name.to_string()))
    }

    /// Every binding ever stored, oldest first, shadowed ones included
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Number of distinct names bound
    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
