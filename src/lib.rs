//! Debugger-side decoding of Apache Arrow in-memory arrays.
//!
//! Given a typed handle into a suspended process, `arrow-lens` recognises
//! Arrow array and buffer structs by name, decodes their physical layout
//! straight from memory, and exposes them as indexed containers with a
//! short summary.

/// Classification of type names into physical encodings
pub mod classify;
/// Inspection and registration settings
pub mod config;
/// Core data types module
pub mod core;
/// Provider and summary selection
pub mod dispatch;
/// Error types
pub mod error;
/// The type/memory collaborator boundary
pub mod introspect;
/// Memory dump loading
pub mod io;
/// Tracing setup and macros
pub mod logging;
/// Raw memory views
pub mod memory;
/// Buffer decoders
pub mod parsers;
/// Synthetic children providers
pub mod providers;
/// Host debugger hook registration
pub mod registration;

pub use classify::{classify, classify_type, ArrayClassification};
pub use config::InspectConfig;
pub use core::{DataType, DataTypeKind, Field, TypeData, TypedHandle};
pub use dispatch::Dispatcher;
pub use error::{InspectError, Result};
pub use introspect::{InspectContext, Introspector, OptionState, ProcessSnapshot, SnapshotBuilder};
pub use memory::{Endianness, MemoryRegion, MemoryView, RegionMemoryView};
pub use providers::{ArrayProvider, ChildValue, SyntheticProvider};
