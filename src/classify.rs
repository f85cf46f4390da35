//! Structural classification of Arrow types by name.
//!
//! Maps a fully-qualified type name (plus the knowledge that the type has
//! fields at all) onto one of the physical encodings the decoders
//! understand. The four name patterns are disjoint: the module path may
//! only contain identifiers and `::`, so the first `<` is always part of
//! the final segment.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{DataType, DataTypeKind, Field};

// Optional reference/raw-pointer qualifiers, then a non-empty module path.
macro_rules! arrow_pattern {
    ($tail:literal) => {
        concat!(
            r"^(?:&(?:mut )?|\*(?:const|mut) )*(?:[A-Za-z_][A-Za-z0-9_]*::)+",
            $tail
        )
    };
}

pub static RE_PRIMITIVE_ARRAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(arrow_pattern!(r"PrimitiveArray<.+>$")).expect("valid primitive array regex")
});
pub static RE_STRING_ARRAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(arrow_pattern!(
        r"GenericByteArray<(?:[A-Za-z_][A-Za-z0-9_]*::)+GenericStringType<.+>>$"
    ))
    .expect("valid string array regex")
});
pub static RE_BOOLEAN_BUFFER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(arrow_pattern!(r"BooleanBuffer$")).expect("valid boolean buffer regex")
});
pub static RE_OFFSET_BUFFER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(arrow_pattern!(r"OffsetBuffer<[^,]+>$")).expect("valid offset buffer regex")
});

/// Physical encoding of a classified value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArrayClassification {
    PrimitiveArray,
    StringArray,
    BooleanBuffer,
    OffsetBuffer,
    Unknown,
}

impl ArrayClassification {
    /// Every classification with a decoder, in registration order.
    pub const KNOWN: [ArrayClassification; 4] = [
        ArrayClassification::PrimitiveArray,
        ArrayClassification::StringArray,
        ArrayClassification::BooleanBuffer,
        ArrayClassification::OffsetBuffer,
    ];

    /// Name pattern selecting this classification.
    pub fn pattern(self) -> Option<&'static Regex> {
        match self {
            ArrayClassification::PrimitiveArray => Some(&RE_PRIMITIVE_ARRAY),
            ArrayClassification::StringArray => Some(&RE_STRING_ARRAY),
            ArrayClassification::BooleanBuffer => Some(&RE_BOOLEAN_BUFFER),
            ArrayClassification::OffsetBuffer => Some(&RE_OFFSET_BUFFER),
            ArrayClassification::Unknown => None,
        }
    }

    pub fn is_known(self) -> bool {
        self != ArrayClassification::Unknown
    }
}

impl fmt::Display for ArrayClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArrayClassification::PrimitiveArray => "PrimitiveArray",
            ArrayClassification::StringArray => "StringArray",
            ArrayClassification::BooleanBuffer => "BooleanBuffer",
            ArrayClassification::OffsetBuffer => "OffsetBuffer",
            ArrayClassification::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Classify a struct by name. Types without fields are never classified.
pub fn classify(name: &str, fields: &[Field]) -> ArrayClassification {
    if fields.is_empty() {
        return ArrayClassification::Unknown;
    }
    ArrayClassification::KNOWN
        .into_iter()
        .find(|c| c.pattern().is_some_and(|re| re.is_match(name)))
        .unwrap_or(ArrayClassification::Unknown)
}

/// Classify a resolved type. Only structs carry Arrow layouts; unions and
/// every other type class are `Unknown`.
pub fn classify_type(ty: &DataType) -> ArrayClassification {
    match ty.kind {
        DataTypeKind::Struct => classify(&ty.name, ty.fields()),
        _ => ArrayClassification::Unknown,
    }
}
