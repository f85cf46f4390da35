//! Provider for `PrimitiveArray<T>`.
//!
//! ```text
//! struct PrimitiveArray<T> { data_type: DataType, values: ScalarBuffer<T::Native>, nulls: Option<NullBuffer> }
//! ```

use tracing::debug;

use crate::core::handle::child_name;
use crate::core::{DataType, TypedHandle};
use crate::error::Result;
use crate::introspect::InspectContext;
use crate::parsers::{NullBufferParser, ScalarBufferParser};
use crate::providers::{check_bounds, ChildValue, SyntheticProvider};

struct State<'a> {
    element_type: DataType,
    values: ScalarBufferParser<'a>,
    nulls: NullBufferParser<'a>,
}

pub struct PrimitiveArrayProvider<'a> {
    ctx: InspectContext<'a>,
    handle: TypedHandle,
    state: State<'a>,
}

impl<'a> PrimitiveArrayProvider<'a> {
    pub fn new(ctx: InspectContext<'a>, handle: &TypedHandle) -> Result<Self> {
        let state = Self::parse(ctx, handle)?;
        Ok(Self {
            ctx,
            handle: handle.clone(),
            state,
        })
    }

    fn parse(ctx: InspectContext<'a>, handle: &TypedHandle) -> Result<State<'a>> {
        let intro = ctx.introspector;

        // The native element type is the generic parameter of the values
        // ScalarBuffer, not of the array itself.
        let values = intro.child_member(handle, "values")?;
        let values_type = intro.type_of(&values)?;
        let element_type = ctx.resolve_concrete(intro.template_argument(&values_type, 0)?)?;

        let values = ScalarBufferParser::new(ctx, &values, element_type.clone())?;
        let nulls_handle = intro.child_member(handle, "nulls")?;
        let nulls = NullBufferParser::new(ctx, &nulls_handle, true)?;

        debug!(
            array = %handle.type_name,
            element = %element_type.name,
            len = values.len(),
            null_count = nulls.null_count(),
            "Parsed primitive array"
        );

        Ok(State {
            element_type,
            values,
            nulls,
        })
    }

    pub fn element_type(&self) -> &DataType {
        &self.state.element_type
    }

    pub fn null_count(&self) -> u64 {
        self.state.nulls.null_count()
    }

    /// Element `index` without consulting the validity bitmap.
    pub fn value_unchecked(&self, index: usize) -> TypedHandle {
        self.state.values.value_at(index)
    }
}

impl SyntheticProvider for PrimitiveArrayProvider<'_> {
    fn num_children(&self) -> usize {
        self.state.values.len()
    }

    fn child_at_index(&self, index: usize) -> Result<ChildValue> {
        check_bounds(&self.handle, index, self.num_children())?;
        if self.state.nulls.has_nulls() && self.state.nulls.is_null(index)? {
            return Ok(ChildValue::Absent {
                name: child_name(index),
                type_name: self.state.element_type.name.clone(),
            });
        }
        Ok(ChildValue::Element(self.value_unchecked(index)))
    }

    fn update(&mut self) -> Result<()> {
        self.state = Self::parse(self.ctx, &self.handle)?;
        Ok(())
    }
}
