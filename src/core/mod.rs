//! Core data types for arrow-lens.
//!
//! Type descriptors and typed handles: the vocabulary shared between the
//! introspection layer and the decoders.

pub mod data_type;
pub mod handle;

pub use data_type::{DataType, DataTypeKind, Field, TypeData};
pub use handle::TypedHandle;
