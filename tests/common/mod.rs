//! Common test utilities and helpers.
//!
//! `ArrowFixture` lays out arrow-rs structs in a `ProcessSnapshot` exactly as
//! a 64-bit little-endian process holds them:
//!
//! ```text
//! Buffer                 { data @0, ptr @8, length @16 }                          24 bytes
//! ScalarBuffer<T>        { buffer @0 }                                            24 bytes
//! OffsetBuffer<O>        { __0: ScalarBuffer<O> @0 }                              24 bytes
//! BooleanBuffer          { buffer @0, offset @24, len @32 }                       40 bytes
//! NullBuffer             { buffer: BooleanBuffer @0, null_count @40 }             48 bytes
//! Option<NullBuffer>     niche in Buffer::data                                    48 bytes
//! PrimitiveArray<T>      { data_type @0, values @24, nulls @48 }                  96 bytes
//! GenericByteArray<T>    { data_type @0, value_offsets @24, value_data @48, nulls @72 } 120 bytes
//! ```

#![allow(dead_code)]

pub mod test_utils;

use arrow_lens::{
    DataType, Endianness, Field, InspectConfig, ProcessSnapshot, SnapshotBuilder, TypedHandle,
};

pub const BUFFER: &str = "arrow_buffer::buffer::immutable::Buffer";
pub const BOOLEAN_BUFFER: &str = "arrow_buffer::buffer::boolean::BooleanBuffer";
pub const NULL_BUFFER: &str = "arrow_buffer::buffer::null::NullBuffer";
pub const OPTION_NULL_BUFFER: &str =
    "core::option::Option<arrow_buffer::buffer::null::NullBuffer>";
pub const ARROW_DATA_TYPE: &str = "arrow_schema::datatype::DataType";

/// Validity bitmap of an array: set bits are valid slots.
#[derive(Debug, Clone, Copy)]
pub struct Validity<'a> {
    pub bits: &'a [u8],
    pub offset: u64,
    pub null_count: u64,
}

impl<'a> Validity<'a> {
    pub fn new(bits: &'a [u8], null_count: u64) -> Self {
        Self {
            bits,
            offset: 0,
            null_count,
        }
    }
}

/// How the generic parameter of a values buffer is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRepr {
    /// The native type itself, e.g. `u32`
    Native,
    /// The zero-size logical type, e.g. `arrow_array::types::UInt32Type`
    Logical,
}

pub fn scalar_buffer_name(native: &str) -> String {
    format!("arrow_buffer::buffer::scalar::ScalarBuffer<{}>", native)
}

pub fn offset_buffer_name(native: &str) -> String {
    format!("arrow_buffer::buffer::offset::OffsetBuffer<{}>", native)
}

pub fn string_type_name(native: &str) -> String {
    format!("arrow_array::types::GenericStringType<{}>", native)
}

pub fn string_array_name(native: &str) -> String {
    format!(
        "arrow_array::array::byte_array::GenericByteArray<{}>",
        string_type_name(native)
    )
}

pub fn primitive_array_name(logical: &str) -> String {
    format!("arrow_array::array::primitive_array::PrimitiveArray<{}>", logical)
}

/// Logical arrow type name for a native type (`u32` -> `UInt32Type`).
pub fn logical_type_name(native: &str) -> String {
    let (kind, bits) = native.split_at(1);
    let kind = match kind {
        "u" => "UInt",
        "i" => "Int",
        _ => "Float",
    };
    format!("arrow_array::types::{}{}Type", kind, bits)
}

pub fn words(values: &[u64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub struct ArrowFixture {
    builder: SnapshotBuilder,
}

impl ArrowFixture {
    pub fn new() -> Self {
        let mut builder = SnapshotBuilder::new(Endianness::Little, 8);
        for (name, size) in [
            ("u8", 1),
            ("u16", 2),
            ("u32", 4),
            ("u64", 8),
            ("i8", 1),
            ("i16", 2),
            ("i32", 4),
            ("i64", 8),
            ("f32", 4),
            ("f64", 8),
            ("usize", 8),
        ] {
            builder.define(DataType::new_primitive(name, size));
        }
        builder
            .define(DataType::new_pointer("*const u8", 8, "u8"))
            .define(DataType::new_struct(
                ARROW_DATA_TYPE,
                24,
                vec![Field::new("tag", "u8", 0)],
            ))
            .define(DataType::new_struct(
                BUFFER,
                24,
                vec![
                    Field::new("data", "*const u8", 0),
                    Field::new("ptr", "*const u8", 8),
                    Field::new("length", "usize", 16),
                ],
            ))
            .define(DataType::new_struct(
                BOOLEAN_BUFFER,
                40,
                vec![
                    Field::new("buffer", BUFFER, 0),
                    Field::new("offset", "usize", 24),
                    Field::new("len", "usize", 32),
                ],
            ))
            .define(DataType::new_struct(
                NULL_BUFFER,
                48,
                vec![
                    Field::new("buffer", BOOLEAN_BUFFER, 0),
                    Field::new("null_count", "usize", 40),
                ],
            ))
            .define(DataType::new_optional(OPTION_NULL_BUFFER, 48, NULL_BUFFER, 0));
        Self { builder }
    }

    pub fn builder(&mut self) -> &mut SnapshotBuilder {
        &mut self.builder
    }

    pub fn build(self) -> ProcessSnapshot {
        self.builder.build().unwrap()
    }

    /// Place raw data and return the 24-byte `Buffer` header pointing at it.
    pub fn buffer_header(&mut self, data: &[u8]) -> Vec<u8> {
        let ptr = self.builder.alloc(data);
        // `data` is the Arc<Bytes> and never null.
        words(&[0xA7C0, ptr, data.len() as u64])
    }

    fn boolean_header(&mut self, bits: &[u8], offset: u64, len: u64) -> Vec<u8> {
        let mut header = self.buffer_header(bits);
        header.extend(words(&[offset, len]));
        header
    }

    fn nulls_header(&mut self, validity: Option<Validity<'_>>, len: u64) -> Vec<u8> {
        match validity {
            Some(v) => {
                let mut header = self.boolean_header(v.bits, v.offset, len);
                header.extend(words(&[v.null_count]));
                header
            }
            None => vec![0; 48],
        }
    }

    fn define_scalar_buffer(&mut self, native: &str, reported: &str) -> String {
        let name = scalar_buffer_name(native);
        self.builder.define(
            DataType::new_struct(&name, 24, vec![Field::new("buffer", BUFFER, 0)])
                .with_template_args([reported]),
        );
        name
    }

    /// `PrimitiveArray<T>` over little-endian `values`.
    pub fn primitive_array(
        &mut self,
        native: &str,
        repr: ElementRepr,
        values: &[u8],
        validity: Option<Validity<'_>>,
    ) -> TypedHandle {
        let elem_size = self
            .builder_type_size(native)
            .expect("native element type is predefined");
        let logical = logical_type_name(native);
        self.builder.define(DataType::new_typedef(&logical, 0, native));
        let reported = match repr {
            ElementRepr::Native => native.to_string(),
            ElementRepr::Logical => logical.clone(),
        };
        let values_type = self.define_scalar_buffer(native, &reported);
        let array_type = primitive_array_name(&logical);
        self.builder.define(
            DataType::new_struct(
                &array_type,
                96,
                vec![
                    Field::new("data_type", ARROW_DATA_TYPE, 0),
                    Field::new("values", values_type, 24),
                    Field::new("nulls", OPTION_NULL_BUFFER, 48),
                ],
            )
            .with_template_args([logical]),
        );

        let len = values.len() as u64 / elem_size;
        let mut bytes = vec![0x0B; 24];
        bytes.extend(self.buffer_header(values));
        bytes.extend(self.nulls_header(validity, len));
        let address = self.builder.alloc(&bytes);
        TypedHandle::new("array", address, array_type)
    }

    fn builder_type_size(&self, native: &str) -> Option<u64> {
        match native {
            "u8" | "i8" => Some(1),
            "u16" | "i16" => Some(2),
            "u32" | "i32" | "f32" => Some(4),
            "u64" | "i64" | "f64" => Some(8),
            _ => None,
        }
    }

    fn define_offset_buffer(&mut self, native: &str) -> String {
        let inner = self.define_scalar_buffer(native, native);
        let name = offset_buffer_name(native);
        self.builder.define(
            DataType::new_struct(&name, 24, vec![Field::new("__0", inner, 0)])
                .with_template_args([native]),
        );
        name
    }

    /// `GenericByteArray<GenericStringType<O>>` over already-encoded offsets.
    fn byte_array(
        &mut self,
        native: &str,
        raw_offsets: &[u8],
        count: usize,
        data: &[u8],
        validity: Option<Validity<'_>>,
    ) -> TypedHandle {
        let offsets_type = self.define_offset_buffer(native);
        let string_type = string_type_name(native);
        let array_type = string_array_name(native);
        self.builder
            .define(DataType::new_struct(&string_type, 0, vec![]).with_template_args([native]))
            .define(
                DataType::new_struct(
                    &array_type,
                    120,
                    vec![
                        Field::new("data_type", ARROW_DATA_TYPE, 0),
                        Field::new("value_offsets", offsets_type, 24),
                        Field::new("value_data", BUFFER, 48),
                        Field::new("nulls", OPTION_NULL_BUFFER, 72),
                    ],
                )
                .with_template_args([string_type]),
            );

        let len = count.saturating_sub(1) as u64;
        let mut bytes = vec![0x0C; 24];
        bytes.extend(self.buffer_header(raw_offsets));
        bytes.extend(self.buffer_header(data));
        bytes.extend(self.nulls_header(validity, len));
        let address = self.builder.alloc(&bytes);
        TypedHandle::new("strings", address, array_type)
    }

    /// `StringArray`: `GenericByteArray<GenericStringType<i32>>`.
    pub fn string_array(
        &mut self,
        offsets: &[i32],
        data: &[u8],
        validity: Option<Validity<'_>>,
    ) -> TypedHandle {
        let raw: Vec<u8> = offsets.iter().flat_map(|o| o.to_le_bytes()).collect();
        self.byte_array("i32", &raw, offsets.len(), data, validity)
    }

    /// `LargeStringArray`: `GenericByteArray<GenericStringType<i64>>`.
    pub fn large_string_array(
        &mut self,
        offsets: &[i64],
        data: &[u8],
        validity: Option<Validity<'_>>,
    ) -> TypedHandle {
        let raw: Vec<u8> = offsets.iter().flat_map(|o| o.to_le_bytes()).collect();
        self.byte_array("i64", &raw, offsets.len(), data, validity)
    }

    /// A bare `BooleanBuffer` of `len` bits starting at bit `offset`.
    pub fn boolean_buffer(&mut self, bits: &[u8], offset: u64, len: u64) -> TypedHandle {
        let header = self.boolean_header(bits, offset, len);
        let address = self.builder.alloc(&header);
        TypedHandle::new("flags", address, BOOLEAN_BUFFER)
    }

    /// A bare `OffsetBuffer<i32>`.
    pub fn offset_buffer(&mut self, offsets: &[i32]) -> TypedHandle {
        let name = self.define_offset_buffer("i32");
        let raw: Vec<u8> = offsets.iter().flat_map(|o| o.to_le_bytes()).collect();
        let header = self.buffer_header(&raw);
        let address = self.builder.alloc(&header);
        TypedHandle::new("offsets", address, name)
    }

    /// A `*const T` variable pointing at `target`.
    pub fn pointer_to(&mut self, target: &TypedHandle) -> TypedHandle {
        let name = format!("*const {}", target.type_name);
        self.builder
            .define(DataType::new_pointer(&name, 8, target.type_name.clone()));
        let address = self.builder.alloc(&target.address.to_le_bytes());
        TypedHandle::new("ptr", address, name)
    }

    /// A `&T` variable pointing at `target`.
    pub fn reference_to(&mut self, target: &TypedHandle) -> TypedHandle {
        let name = format!("&{}", target.type_name);
        self.builder
            .define(DataType::new_pointer(&name, 8, target.type_name.clone()));
        let address = self.builder.alloc(&target.address.to_le_bytes());
        TypedHandle::new("reference", address, name)
    }
}

impl Default for ArrowFixture {
    fn default() -> Self {
        Self::new()
    }
}

pub fn u32_values(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn default_config() -> InspectConfig {
    InspectConfig::default()
}
