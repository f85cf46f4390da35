//! Typed handles into inspected-process memory.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An (address, type) pair referring to a value in the inspected process.
///
/// Handles are views: they own no target bytes and are only meaningful
/// for the inspection that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypedHandle {
    /// Display name of the value (variable, field or `[i]` child name)
    pub name: String,
    /// Address of the first byte of the value
    pub address: u64,
    /// Fully-qualified name of the value's static type
    pub type_name: String,
}

impl TypedHandle {
    pub fn new(name: impl Into<String>, address: u64, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address,
            type_name: type_name.into(),
        }
    }

    /// The same value viewed under another name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

impl fmt::Display for TypedHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} @ {:#x}", self.name, self.type_name, self.address)
    }
}

/// Name given to the synthetic child at `index`.
pub fn child_name(index: usize) -> String {
    format!("[{}]", index)
}
