//! Pass-through provider for values that are not Arrow arrays.

use crate::core::TypedHandle;
use crate::error::Result;
use crate::introspect::Introspector;
use crate::providers::{ChildValue, SyntheticProvider};

/// Forwards the container protocol to the introspector's own view of a value.
pub struct DefaultProvider<'a> {
    introspector: &'a dyn Introspector,
    handle: TypedHandle,
    count: usize,
}

impl<'a> DefaultProvider<'a> {
    pub fn new(introspector: &'a dyn Introspector, handle: &TypedHandle) -> Result<Self> {
        let count = introspector.num_children(handle)?;
        Ok(Self {
            introspector,
            handle: handle.clone(),
            count,
        })
    }

    pub fn handle(&self) -> &TypedHandle {
        &self.handle
    }
}

impl SyntheticProvider for DefaultProvider<'_> {
    fn num_children(&self) -> usize {
        self.count
    }

    fn child_index(&self, name: &str) -> Option<usize> {
        self.introspector.index_of_child(&self.handle, name)
    }

    fn child_at_index(&self, index: usize) -> Result<ChildValue> {
        self.introspector
            .child_at_index(&self.handle, index)
            .map(ChildValue::Element)
    }

    fn update(&mut self) -> Result<()> {
        self.count = self.introspector.num_children(&self.handle)?;
        Ok(())
    }

    fn has_children(&self) -> bool {
        self.count > 0
    }
}
