//! Provider for a bare `BooleanBuffer`.
//!
//! Children are the decoded flags. A boolean buffer has no validity bitmap
//! of its own, so no child is ever `None`.

use crate::core::handle::child_name;
use crate::core::TypedHandle;
use crate::error::Result;
use crate::introspect::InspectContext;
use crate::parsers::BooleanBufferParser;
use crate::providers::{check_bounds, ChildValue, SyntheticProvider};

pub struct BooleanBufferProvider<'a> {
    ctx: InspectContext<'a>,
    handle: TypedHandle,
    bits: BooleanBufferParser<'a>,
}

impl<'a> BooleanBufferProvider<'a> {
    pub fn new(ctx: InspectContext<'a>, handle: &TypedHandle) -> Result<Self> {
        Ok(Self {
            ctx,
            handle: handle.clone(),
            bits: BooleanBufferParser::new(ctx, handle)?,
        })
    }

    pub fn bit_offset(&self) -> u64 {
        self.bits.bit_offset()
    }
}

impl SyntheticProvider for BooleanBufferProvider<'_> {
    fn num_children(&self) -> usize {
        self.bits.len()
    }

    fn child_at_index(&self, index: usize) -> Result<ChildValue> {
        check_bounds(&self.handle, index, self.num_children())?;
        Ok(ChildValue::Bool {
            name: child_name(index),
            value: self.bits.value_at(index)?,
        })
    }

    fn update(&mut self) -> Result<()> {
        self.bits = BooleanBufferParser::new(self.ctx, &self.handle)?;
        Ok(())
    }
}
