//! Error types for arrow-lens.
//!
//! Parsers and providers raise these on detected layout problems; the
//! dispatch layer is the only place that retries or logs them.

use thiserror::Error;

use crate::io::error::DumpError;
use crate::memory::MemoryError;

/// Main error type for inspection operations.
#[derive(Debug, Error)]
pub enum InspectError {
    /// A struct did not carry a field the decoder relies on
    #[error("type `{type_name}` has no field `{field}`")]
    MissingField { type_name: String, field: String },

    /// A child index past the declared children of a value
    #[error("type `{type_name}` has no child at index {index}")]
    MissingChild { type_name: String, index: usize },

    /// Element type resolved to a size-0 type even after typedef resolution
    #[error("type `{0}` resolved to a zero-size type")]
    ZeroSizeType(String),

    /// Buffer byte length is not a multiple of the element size
    #[error("buffer of `{type_name}` has {byte_length} bytes, not a multiple of element size {element_size}")]
    UnevenLength {
        type_name: String,
        byte_length: u64,
        element_size: u64,
    },

    /// Generic parameter could not be resolved
    #[error("type `{type_name}` has no resolvable generic parameter at index {index}")]
    UnresolvedGenericParameter { type_name: String, index: usize },

    /// Type id or name unknown to the introspection layer
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// Pointer operation on a non-pointer value
    #[error("type `{0}` is not a pointer")]
    NotAPointer(String),

    /// Optional discrimination on a non-optional value
    #[error("type `{0}` is not an optional")]
    NotAnOptional(String),

    /// Pointer chain longer than the configured bound
    #[error("pointer unwrapping exceeded {limit} levels")]
    PointerDepthExceeded { limit: usize },

    /// Offsets that run backwards
    #[error("offsets of element {index} decrease ({start} > {end})")]
    DecreasingOffsets { index: usize, start: u64, end: u64 },

    /// Offsets reaching past the end of the value data
    #[error("element {index} ends at byte {end}, past the {len}-byte value data")]
    OffsetOutOfBounds { index: usize, end: u64, len: u64 },

    /// An offset buffer without even the leading zero offset
    #[error("offset buffer of `{0}` holds no offsets")]
    EmptyOffsets(String),

    /// String bytes that do not decode as UTF-8
    #[error("string element {index} is not valid UTF-8")]
    InvalidUtf8 { index: usize },

    /// Raw memory read failures
    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),

    /// Memory dump loading failures
    #[error("dump error: {0}")]
    Io(#[from] DumpError),

    /// Configuration parsing failures
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for inspection operations
pub type Result<T> = std::result::Result<T, InspectError>;

impl InspectError {
    pub(crate) fn missing_field(type_name: &str, field: &str) -> Self {
        InspectError::MissingField {
            type_name: type_name.to_string(),
            field: field.to_string(),
        }
    }
}
