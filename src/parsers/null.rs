//! `NullBuffer`: the validity bitmap of an array.
//!
//! ```text
//! struct NullBuffer { buffer: BooleanBuffer, null_count: usize }
//! ```
//!
//! Arrays hold it as `Option<NullBuffer>`. A set bit means the slot is
//! valid, so `is_null` is the negated bitmap value. An absent buffer and a
//! buffer with `null_count == 0` both mean "no nulls" and are never read
//! past the count.

use tracing::trace;

use crate::core::TypedHandle;
use crate::error::Result;
use crate::introspect::{InspectContext, OptionState};
use crate::parsers::{unsigned_field, BooleanBufferParser};

/// Decoder for an optional validity bitmap.
#[derive(Clone)]
pub struct NullBufferParser<'a> {
    null_count: u64,
    bitmap: Option<BooleanBufferParser<'a>>,
}

impl<'a> NullBufferParser<'a> {
    /// Parse the null buffer behind `handle`.
    ///
    /// With `optional` set, `handle` is an `Option<NullBuffer>`; its empty
    /// state is detected before any field of the payload is touched.
    pub fn new(ctx: InspectContext<'a>, handle: &TypedHandle, optional: bool) -> Result<Self> {
        let null_buffer = if optional {
            match ctx.introspector.option_state(handle)? {
                OptionState::Some(inner) => inner,
                OptionState::None => return Ok(Self::absent()),
            }
        } else {
            handle.clone()
        };

        let null_count = unsigned_field(&ctx, &null_buffer, "null_count")?;
        if null_count == 0 {
            return Ok(Self::absent());
        }

        let buffer = ctx.introspector.child_member(&null_buffer, "buffer")?;
        let bitmap = BooleanBufferParser::new(ctx, &buffer)?;
        trace!(null_count = null_count, "Parsed null buffer");

        Ok(Self {
            null_count,
            bitmap: Some(bitmap),
        })
    }

    /// A parser for a value that cannot contain nulls.
    pub fn absent() -> Self {
        Self {
            null_count: 0,
            bitmap: None,
        }
    }

    pub fn has_nulls(&self) -> bool {
        self.bitmap.is_some()
    }

    /// Declared number of null slots.
    pub fn null_count(&self) -> u64 {
        self.null_count
    }

    /// Whether slot `index` is null; unchecked against the array length.
    pub fn is_null(&self, index: usize) -> Result<bool> {
        match &self.bitmap {
            Some(bitmap) => Ok(!bitmap.value_at(index)?),
            None => Ok(false),
        }
    }
}
