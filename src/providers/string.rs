//! Provider for `GenericByteArray<GenericStringType<O>>` (`StringArray`,
//! `LargeStringArray`).
//!
//! ```text
//! struct GenericByteArray<T> {
//!     data_type: DataType,
//!     value_offsets: OffsetBuffer<T::Offset>,
//!     value_data: Buffer,
//!     nulls: Option<NullBuffer>,
//! }
//! ```

use tracing::debug;

use crate::core::handle::child_name;
use crate::core::{DataType, TypedHandle};
use crate::error::{InspectError, Result};
use crate::introspect::InspectContext;
use crate::parsers::{buffer_geometry, NullBufferParser, OffsetBufferParser};
use crate::providers::{check_bounds, ChildValue, SyntheticProvider};

/// Type name null string slots are shown as `Option` of.
pub const STRING_ELEMENT_TYPE: &str = "&str";

struct State<'a> {
    offsets: OffsetBufferParser<'a>,
    nulls: NullBufferParser<'a>,
    data_ptr: u64,
    data_len: u64,
    u8_type: DataType,
    length: usize,
}

pub struct StringArrayProvider<'a> {
    ctx: InspectContext<'a>,
    handle: TypedHandle,
    state: State<'a>,
}

impl<'a> StringArrayProvider<'a> {
    pub fn new(ctx: InspectContext<'a>, handle: &TypedHandle) -> Result<Self> {
        let state = Self::parse(ctx, handle)?;
        Ok(Self {
            ctx,
            handle: handle.clone(),
            state,
        })
    }

    /// Offset integer type: `GenericByteArray<T>` -> `T = GenericStringType<O>` -> `O`.
    fn offset_type(ctx: InspectContext<'a>, handle: &TypedHandle) -> Result<DataType> {
        let intro = ctx.introspector;
        let array_type = intro.type_of(handle)?;
        let byte_type = intro.typedefed_type(&intro.template_argument(&array_type, 0)?)?;
        intro.typedefed_type(&intro.template_argument(&byte_type, 0)?)
    }

    fn parse(ctx: InspectContext<'a>, handle: &TypedHandle) -> Result<State<'a>> {
        let intro = ctx.introspector;
        let offset_type = Self::offset_type(ctx, handle)?;

        let value_data = intro.child_member(handle, "value_data")?;
        let (data_ptr, data_len) = buffer_geometry(&ctx, &value_data)?;

        let value_offsets = intro.child_member(handle, "value_offsets")?;
        let offsets = OffsetBufferParser::new(ctx, &value_offsets, Some(offset_type))?;
        if offsets.is_empty() {
            return Err(InspectError::EmptyOffsets(handle.type_name.clone()));
        }
        // N offsets delimit N - 1 strings.
        let length = offsets.len() - 1;

        let nulls_handle = intro.child_member(handle, "nulls")?;
        let nulls = NullBufferParser::new(ctx, &nulls_handle, true)?;

        debug!(
            array = %handle.type_name,
            offset_width = offsets.element_type().size,
            len = length,
            null_count = nulls.null_count(),
            "Parsed string array"
        );

        Ok(State {
            offsets,
            nulls,
            data_ptr,
            data_len,
            u8_type: ctx.require_type("u8")?,
            length,
        })
    }

    fn value_offset(&self, index: usize) -> Result<u64> {
        self.ctx
            .introspector
            .value_as_unsigned(&self.state.offsets.value_at(index))
    }

    /// Byte range `[start, end)` of string `index` in `value_data`,
    /// checked against the data length.
    pub fn value_range(&self, index: usize) -> Result<(u64, u64)> {
        let start = self.value_offset(index)?;
        let end = self.value_offset(index + 1)?;
        if end < start {
            return Err(InspectError::DecreasingOffsets { index, start, end });
        }
        if end > self.state.data_len {
            return Err(InspectError::OffsetOutOfBounds {
                index,
                end,
                len: self.state.data_len,
            });
        }
        Ok((start, end))
    }

    /// String `index` without consulting the validity bitmap.
    pub fn value_unchecked(&self, index: usize) -> Result<String> {
        let (start, end) = self.value_range(index)?;
        if start == end {
            return Ok(String::new());
        }

        let intro = self.ctx.introspector;
        let mut bytes = Vec::with_capacity((end - start) as usize);
        for offset in start..end {
            let byte = intro.create_value_from_address(
                &child_name(offset as usize),
                self.state.data_ptr.wrapping_add(offset),
                &self.state.u8_type,
            );
            bytes.push(intro.value_as_unsigned(&byte)? as u8);
        }
        String::from_utf8(bytes).map_err(|_| InspectError::InvalidUtf8 { index })
    }

    pub fn null_count(&self) -> u64 {
        self.state.nulls.null_count()
    }
}

impl SyntheticProvider for StringArrayProvider<'_> {
    fn num_children(&self) -> usize {
        self.state.length
    }

    fn child_at_index(&self, index: usize) -> Result<ChildValue> {
        check_bounds(&self.handle, index, self.num_children())?;
        if self.state.nulls.has_nulls() && self.state.nulls.is_null(index)? {
            return Ok(ChildValue::Absent {
                name: child_name(index),
                type_name: STRING_ELEMENT_TYPE.to_string(),
            });
        }
        Ok(ChildValue::Str {
            name: child_name(index),
            value: self.value_unchecked(index)?,
        })
    }

    fn update(&mut self) -> Result<()> {
        self.state = Self::parse(self.ctx, &self.handle)?;
        Ok(())
    }
}
