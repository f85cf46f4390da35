//! `OffsetBuffer<O>`: monotonic offsets delimiting variable-length values.
//!
//! ```text
//! struct OffsetBuffer<O>(ScalarBuffer<O>);
//! ```
//!
//! An offset buffer of length N delimits N - 1 values; value `i` spans
//! `[offsets[i], offsets[i + 1])`.

use crate::core::{DataType, TypedHandle};
use crate::error::Result;
use crate::introspect::InspectContext;
use crate::parsers::ScalarBufferParser;

/// Decoder for an offset buffer.
#[derive(Clone)]
pub struct OffsetBufferParser<'a> {
    parser: ScalarBufferParser<'a>,
}

impl<'a> OffsetBufferParser<'a> {
    /// Parse `handle`, taking the offset type from its generic parameter
    /// unless the caller already knows it.
    pub fn new(
        ctx: InspectContext<'a>,
        handle: &TypedHandle,
        element_type: Option<DataType>,
    ) -> Result<Self> {
        let intro = ctx.introspector;
        let element_type = match element_type {
            Some(ty) => ty,
            None => {
                let ty = intro.type_of(handle)?;
                let arg = intro.template_argument(&ty, 0)?;
                intro.typedefed_type(&arg)?
            }
        };

        // The wrapped ScalarBuffer is the tuple struct's only field.
        let inner = intro.child_at_index(handle, 0)?;
        let parser = ScalarBufferParser::new(ctx, &inner, element_type)?;
        Ok(Self { parser })
    }

    /// Number of offsets (one more than the number of delimited values).
    pub fn len(&self) -> usize {
        self.parser.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parser.is_empty()
    }

    pub fn element_type(&self) -> &DataType {
        self.parser.element_type()
    }

    /// Handle to offset `index`; unchecked against `len()`.
    pub fn value_at(&self, index: usize) -> TypedHandle {
        self.parser.value_at(index)
    }
}
