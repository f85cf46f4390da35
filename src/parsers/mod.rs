//! Decoders for the physical buffer encodings.
//!
//! Each parser is built from a typed handle to one buffer struct, reads the
//! handful of header fields it needs once, and then answers length and
//! per-index queries with plain address arithmetic. Parsers never check
//! indices against their length; the providers above them do.

pub mod boolean;
pub mod null;
pub mod offset;
pub mod scalar;

pub use boolean::BooleanBufferParser;
pub use null::NullBufferParser;
pub use offset::OffsetBufferParser;
pub use scalar::ScalarBufferParser;

use crate::core::TypedHandle;
use crate::error::Result;
use crate::introspect::InspectContext;

/// Base address and byte length of an `arrow_buffer::Buffer` value.
pub(crate) fn buffer_geometry(ctx: &InspectContext<'_>, buffer: &TypedHandle) -> Result<(u64, u64)> {
    let intro = ctx.introspector;
    let ptr = intro.child_member(buffer, "ptr")?;
    let data_ptr = intro.pointer_value(&ptr)?;
    let length = intro.child_member(buffer, "length")?;
    let byte_length = intro.value_as_unsigned(&length)?;
    Ok((data_ptr, byte_length))
}

/// Read an unsigned integer field of a struct value.
pub(crate) fn unsigned_field(ctx: &InspectContext<'_>, handle: &TypedHandle, field: &str) -> Result<u64> {
    let intro = ctx.introspector;
    let child = intro.child_member(handle, field)?;
    intro.value_as_unsigned(&child)
}
