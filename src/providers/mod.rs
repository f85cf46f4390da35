//! Synthetic providers: Arrow values as indexed virtual containers.
//!
//! A provider composes the buffer parsers for one array kind and exposes
//! the container protocol a debugger visualizer expects: child count,
//! child by index, index by child name, and a refresh step that re-reads
//! everything from target memory. Providers are bounds authorities for
//! their parsers.

pub mod boolean;
pub mod default;
pub mod offset;
pub mod primitive;
pub mod string;

pub use boolean::BooleanBufferProvider;
pub use default::DefaultProvider;
pub use offset::OffsetBufferProvider;
pub use primitive::PrimitiveArrayProvider;
pub use string::StringArrayProvider;

use crate::classify::ArrayClassification;
use crate::core::TypedHandle;
use crate::error::{InspectError, Result};
use crate::introspect::Introspector;

/// A child produced by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildValue {
    /// A value living in target memory
    Element(TypedHandle),
    /// A decoded flag
    Bool { name: String, value: bool },
    /// A decoded string
    Str { name: String, value: String },
    /// A null slot, shown as `None` of `Option<type_name>`
    Absent { name: String, type_name: String },
}

impl ChildValue {
    pub fn name(&self) -> &str {
        match self {
            ChildValue::Element(handle) => &handle.name,
            ChildValue::Bool { name, .. }
            | ChildValue::Str { name, .. }
            | ChildValue::Absent { name, .. } => name,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, ChildValue::Absent { .. })
    }

    /// Display text for the child.
    pub fn render(&self, intro: &dyn Introspector) -> Result<String> {
        match self {
            ChildValue::Element(handle) => render_scalar(intro, handle),
            ChildValue::Bool { value, .. } => Ok(value.to_string()),
            ChildValue::Str { value, .. } => Ok(format!("{:?}", value)),
            ChildValue::Absent { .. } => Ok("None".to_string()),
        }
    }
}

/// Render a scalar in target memory according to its type name.
fn render_scalar(intro: &dyn Introspector, handle: &TypedHandle) -> Result<String> {
    let ty = intro.type_of(handle)?;
    let raw = intro.value_as_unsigned(handle)?;
    let bits = ty.size * 8;
    let sign_extend = |v: u64| -> i64 {
        if bits == 0 || bits >= 64 {
            v as i64
        } else {
            let shift = 64 - bits;
            ((v << shift) as i64) >> shift
        }
    };
    let name = ty.name.as_str();
    let text = match name {
        "f32" | "float" => f32::from_bits(raw as u32).to_string(),
        "f64" | "double" => f64::from_bits(raw).to_string(),
        "bool" => (raw != 0).to_string(),
        "i8" | "i16" | "i32" | "i64" | "isize" | "signed char" | "short" | "int" | "long"
        | "long long" => sign_extend(raw).to_string(),
        _ => raw.to_string(),
    };
    Ok(text)
}

/// Parse a child key such as `[3]` back to its index.
///
/// Brackets are stripped from both ends; anything that is not a plain
/// decimal number afterwards names no child.
pub fn child_index_for_key(key: &str) -> Option<usize> {
    let digits = key.trim_start_matches('[').trim_end_matches(']');
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// The container protocol shared by all providers.
pub trait SyntheticProvider {
    /// Number of synthetic children.
    fn num_children(&self) -> usize;

    /// Index of the child named `name`, if any.
    fn child_index(&self, name: &str) -> Option<usize> {
        child_index_for_key(name)
    }

    /// Child at `index`.
    fn child_at_index(&self, index: usize) -> Result<ChildValue>;

    /// Re-read all derived state from target memory.
    fn update(&mut self) -> Result<()>;

    fn has_children(&self) -> bool {
        true
    }
}

pub(crate) fn check_bounds(handle: &TypedHandle, index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(InspectError::MissingChild {
            type_name: handle.type_name.clone(),
            index,
        });
    }
    Ok(())
}

/// Provider selected for one value.
pub enum ArrayProvider<'a> {
    Primitive(PrimitiveArrayProvider<'a>),
    String(StringArrayProvider<'a>),
    Boolean(BooleanBufferProvider<'a>),
    Offset(OffsetBufferProvider<'a>),
    Default(DefaultProvider<'a>),
}

impl ArrayProvider<'_> {
    /// Classification this provider decodes; pass-through providers are `Unknown`.
    pub fn classification(&self) -> ArrayClassification {
        match self {
            ArrayProvider::Primitive(_) => ArrayClassification::PrimitiveArray,
            ArrayProvider::String(_) => ArrayClassification::StringArray,
            ArrayProvider::Boolean(_) => ArrayClassification::BooleanBuffer,
            ArrayProvider::Offset(_) => ArrayClassification::OffsetBuffer,
            ArrayProvider::Default(_) => ArrayClassification::Unknown,
        }
    }

    fn inner(&self) -> &dyn SyntheticProvider {
        match self {
            ArrayProvider::Primitive(p) => p,
            ArrayProvider::String(p) => p,
            ArrayProvider::Boolean(p) => p,
            ArrayProvider::Offset(p) => p,
            ArrayProvider::Default(p) => p,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn SyntheticProvider {
        match self {
            ArrayProvider::Primitive(p) => p,
            ArrayProvider::String(p) => p,
            ArrayProvider::Boolean(p) => p,
            ArrayProvider::Offset(p) => p,
            ArrayProvider::Default(p) => p,
        }
    }
}

impl SyntheticProvider for ArrayProvider<'_> {
    fn num_children(&self) -> usize {
        self.inner().num_children()
    }

    fn child_index(&self, name: &str) -> Option<usize> {
        self.inner().child_index(name)
    }

    fn child_at_index(&self, index: usize) -> Result<ChildValue> {
        self.inner().child_at_index(index)
    }

    fn update(&mut self) -> Result<()> {
        self.inner_mut().update()
    }

    fn has_children(&self) -> bool {
        self.inner().has_children()
    }
}
