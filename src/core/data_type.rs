//! Type descriptors as reported by the introspection layer.
//!
//! A `DataType` is the debugger's view of one type in the inspected
//! process: its fully-qualified name, byte size, structural shape and
//! resolved generic parameters. Types refer to each other by name, so a
//! set of descriptors forms a registry rather than a tree.

use serde::{Deserialize, Serialize};

/// Represents the different kinds of data types in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataTypeKind {
    /// Integers, floats, bool and other scalars
    Primitive,
    /// Pointer or reference to another type
    Pointer,
    /// Struct with named fields (tuple structs use `__0`, `__1`, ...)
    Struct,
    /// Untagged union
    Union,
    /// Type alias
    Typedef,
    /// Niche-encoded optional wrapper (`Option<T>` over a non-null payload)
    Optional,
}

/// Represents a field in a struct or union.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Name of the field's type
    pub type_name: String,
    /// Offset from the start of the struct/union in bytes
    pub offset: u64,
}

impl Field {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, offset: u64) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            offset,
        }
    }
}

/// Represents the data specific to each data type kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeData {
    Primitive {},
    Pointer {
        /// Name of the pointed-to type
        pointee: String,
    },
    Struct {
        /// Ordered list of fields
        fields: Vec<Field>,
    },
    Union {
        /// List of fields (all at offset 0)
        fields: Vec<Field>,
    },
    Typedef {
        /// Name of the aliased type
        target: String,
    },
    Optional {
        /// Name of the wrapped type, stored at offset 0
        payload: String,
        /// Offset of the pointer-width word that is zero exactly when the
        /// optional is empty
        niche_offset: u64,
    },
}

/// Represents a type in the inspected process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataType {
    /// Fully-qualified name, unique within a registry
    pub name: String,
    /// The kind of data type this represents
    pub kind: DataTypeKind,
    /// Size in bytes; 0 for zero-sized and placeholder types
    pub size: u64,
    /// Type-specific data
    pub type_data: TypeData,
    /// Resolved generic parameters, by type name, in declaration order
    pub template_args: Vec<String>,
}

impl DataType {
    /// Create a new primitive data type.
    pub fn new_primitive(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            kind: DataTypeKind::Primitive,
            size,
            type_data: TypeData::Primitive {},
            template_args: Vec::new(),
        }
    }

    /// Create a new pointer data type.
    pub fn new_pointer(name: impl Into<String>, size: u64, pointee: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DataTypeKind::Pointer,
            size,
            type_data: TypeData::Pointer {
                pointee: pointee.into(),
            },
            template_args: Vec::new(),
        }
    }

    /// Create a new struct data type.
    pub fn new_struct(name: impl Into<String>, size: u64, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            kind: DataTypeKind::Struct,
            size,
            type_data: TypeData::Struct { fields },
            template_args: Vec::new(),
        }
    }

    /// Create a new union data type.
    pub fn new_union(name: impl Into<String>, size: u64, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            kind: DataTypeKind::Union,
            size,
            type_data: TypeData::Union { fields },
            template_args: Vec::new(),
        }
    }

    /// Create a new typedef data type.
    ///
    /// The size is given explicitly: some front-ends report a logical
    /// generic type as a size-0 alias of its native representation.
    pub fn new_typedef(name: impl Into<String>, size: u64, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DataTypeKind::Typedef,
            size,
            type_data: TypeData::Typedef {
                target: target.into(),
            },
            template_args: Vec::new(),
        }
    }

    /// Create a new niche-encoded optional data type.
    pub fn new_optional(
        name: impl Into<String>,
        size: u64,
        payload: impl Into<String>,
        niche_offset: u64,
    ) -> Self {
        Self {
            name: name.into(),
            kind: DataTypeKind::Optional,
            size,
            type_data: TypeData::Optional {
                payload: payload.into(),
                niche_offset,
            },
            template_args: Vec::new(),
        }
    }

    /// Attach resolved generic parameters.
    pub fn with_template_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.template_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Validate the data type for consistency.
    pub fn is_valid(&self) -> bool {
        if self.name.trim().is_empty() {
            return false;
        }

        match &self.type_data {
            TypeData::Primitive {} => matches!(self.size, 0 | 1 | 2 | 4 | 8 | 16),
            TypeData::Pointer { pointee } => {
                !pointee.trim().is_empty() && matches!(self.size, 4 | 8)
            }
            TypeData::Struct { fields } | TypeData::Union { fields } => {
                let mut names = std::collections::HashSet::new();
                for field in fields {
                    if field.name.trim().is_empty() || !names.insert(&field.name) {
                        return false;
                    }
                    if field.type_name.trim().is_empty() {
                        return false;
                    }
                    if matches!(self.type_data, TypeData::Union { .. }) && field.offset != 0 {
                        return false;
                    }
                    if field.offset > self.size {
                        return false;
                    }
                }
                true
            }
            TypeData::Typedef { target } => !target.trim().is_empty() && *target != self.name,
            TypeData::Optional {
                payload,
                niche_offset,
            } => !payload.trim().is_empty() && *niche_offset < self.size.max(1),
        }
    }

    /// Check if this type is a pointer.
    pub fn is_pointer(&self) -> bool {
        matches!(self.kind, DataTypeKind::Pointer)
    }

    /// Check if this type is a composite type (struct/union).
    pub fn is_composite(&self) -> bool {
        matches!(self.kind, DataTypeKind::Struct | DataTypeKind::Union)
    }

    /// Get the fields if this is a struct or union.
    pub fn fields(&self) -> &[Field] {
        match &self.type_data {
            TypeData::Struct { fields } | TypeData::Union { fields } => fields,
            _ => &[],
        }
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Target of a pointer or typedef.
    pub fn base_type_name(&self) -> Option<&str> {
        match &self.type_data {
            TypeData::Pointer { pointee } => Some(pointee),
            TypeData::Typedef { target } => Some(target),
            _ => None,
        }
    }

    /// Generic parameter at `index`, by name.
    pub fn template_arg(&self, index: usize) -> Option<&str> {
        self.template_args.get(index).map(String::as_str)
    }
}
