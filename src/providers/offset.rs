//! Provider for a bare `OffsetBuffer<O>`: one child per offset.

use crate::core::TypedHandle;
use crate::error::Result;
use crate::introspect::InspectContext;
use crate::parsers::OffsetBufferParser;
use crate::providers::{check_bounds, ChildValue, SyntheticProvider};

pub struct OffsetBufferProvider<'a> {
    ctx: InspectContext<'a>,
    handle: TypedHandle,
    offsets: OffsetBufferParser<'a>,
}

impl<'a> OffsetBufferProvider<'a> {
    pub fn new(ctx: InspectContext<'a>, handle: &TypedHandle) -> Result<Self> {
        Ok(Self {
            ctx,
            handle: handle.clone(),
            offsets: OffsetBufferParser::new(ctx, handle, None)?,
        })
    }
}

impl SyntheticProvider for OffsetBufferProvider<'_> {
    fn num_children(&self) -> usize {
        self.offsets.len()
    }

    fn child_at_index(&self, index: usize) -> Result<ChildValue> {
        check_bounds(&self.handle, index, self.num_children())?;
        Ok(ChildValue::Element(self.offsets.value_at(index)))
    }

    fn update(&mut self) -> Result<()> {
        self.offsets = OffsetBufferParser::new(self.ctx, &self.handle, None)?;
        Ok(())
    }
}
