//! `ScalarBuffer<T>`: a dense run of fixed-width elements.
//!
//! ```text
//! struct ScalarBuffer<T> { buffer: Buffer, phantom: PhantomData<T> }
//! struct Buffer { data: Arc<Bytes>, ptr: *const u8, length: usize }
//! ```

use tracing::trace;

use crate::core::handle::child_name;
use crate::core::{DataType, TypedHandle};
use crate::error::{InspectError, Result};
use crate::introspect::InspectContext;
use crate::parsers::buffer_geometry;

/// Decoder for a fixed-width element buffer.
#[derive(Clone)]
pub struct ScalarBufferParser<'a> {
    ctx: InspectContext<'a>,
    element_type: DataType,
    data_ptr: u64,
    length: usize,
}

impl<'a> ScalarBufferParser<'a> {
    /// Parse the buffer behind `handle` as elements of `element_type`.
    ///
    /// A size-0 element type goes through the typedef fallback first; a
    /// byte length that is not a multiple of the element size is a layout
    /// mismatch and fails.
    pub fn new(ctx: InspectContext<'a>, handle: &TypedHandle, element_type: DataType) -> Result<Self> {
        let element_type = ctx.resolve_concrete(element_type)?;
        let element_size = element_type.size;

        let buffer = ctx.introspector.child_member(handle, "buffer")?;
        let (data_ptr, byte_length) = buffer_geometry(&ctx, &buffer)?;

        if byte_length % element_size != 0 {
            return Err(InspectError::UnevenLength {
                type_name: handle.type_name.clone(),
                byte_length,
                element_size,
            });
        }
        let length = (byte_length / element_size) as usize;

        trace!(
            buffer = %handle.type_name,
            element = %element_type.name,
            data_ptr = data_ptr,
            byte_length = byte_length,
            length = length,
            "Parsed scalar buffer"
        );

        Ok(Self {
            ctx,
            element_type,
            data_ptr,
            length,
        })
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Concrete element type the buffer is read as.
    pub fn element_type(&self) -> &DataType {
        &self.element_type
    }

    /// Address of the first element.
    pub fn data_ptr(&self) -> u64 {
        self.data_ptr
    }

    /// Address of element `index`; unchecked against `len()`.
    pub fn address_of(&self, index: usize) -> u64 {
        self.data_ptr
            .wrapping_add((index as u64).wrapping_mul(self.element_type.size))
    }

    /// Handle to element `index`, typed as the element type.
    pub fn value_at(&self, index: usize) -> TypedHandle {
        self.ctx.introspector.create_value_from_address(
            &child_name(index),
            self.address_of(index),
            &self.element_type,
        )
    }
}
