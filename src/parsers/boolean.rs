//! `BooleanBuffer`: bit-packed flags.
//!
//! ```text
//! struct BooleanBuffer { buffer: Buffer, offset: usize, len: usize }
//! ```
//!
//! Logical index `i` lives at bit `(offset + i) % 8` (LSB first) of byte
//! `(offset + i) / 8` of the backing buffer.

use tracing::trace;

use crate::core::handle::child_name;
use crate::core::{DataType, TypedHandle};
use crate::error::Result;
use crate::introspect::InspectContext;
use crate::parsers::{buffer_geometry, unsigned_field};

/// Decoder for a bit-packed boolean buffer.
#[derive(Clone)]
pub struct BooleanBufferParser<'a> {
    ctx: InspectContext<'a>,
    u8_type: DataType,
    data_ptr: u64,
    bit_offset: u64,
    bit_len: usize,
}

impl<'a> BooleanBufferParser<'a> {
    pub fn new(ctx: InspectContext<'a>, handle: &TypedHandle) -> Result<Self> {
        let u8_type = ctx.require_type("u8")?;

        // `len` is taken verbatim: the backing buffer may be shared or over-allocated.
        let bit_len = unsigned_field(&ctx, handle, "len")? as usize;
        let bit_offset = unsigned_field(&ctx, handle, "offset")?;
        let buffer = ctx.introspector.child_member(handle, "buffer")?;
        let (data_ptr, _) = buffer_geometry(&ctx, &buffer)?;

        trace!(
            buffer = %handle.type_name,
            data_ptr = data_ptr,
            bit_offset = bit_offset,
            bit_len = bit_len,
            "Parsed boolean buffer"
        );

        Ok(Self {
            ctx,
            u8_type,
            data_ptr,
            bit_offset,
            bit_len,
        })
    }

    /// Number of logical bits.
    pub fn len(&self) -> usize {
        self.bit_len
    }

    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    pub fn bit_offset(&self) -> u64 {
        self.bit_offset
    }

    /// Byte address and bit position holding logical index `index`.
    pub fn bit_position(&self, index: usize) -> (u64, u32) {
        let pos = (index as u64).wrapping_add(self.bit_offset);
        (self.data_ptr.wrapping_add(pos / 8), (pos % 8) as u32)
    }

    /// Flag at logical index `index`; unchecked against `len()`.
    pub fn value_at(&self, index: usize) -> Result<bool> {
        let (address, bit) = self.bit_position(index);
        let byte = self.ctx.introspector.create_value_from_address(
            &child_name(index),
            address,
            &self.u8_type,
        );
        let byte = self.ctx.introspector.value_as_unsigned(&byte)?;
        Ok(byte & (1 << bit) != 0)
    }
}
