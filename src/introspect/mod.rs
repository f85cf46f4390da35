//! The memory/type introspection boundary.
//!
//! Decoders see the inspected process only through `Introspector`. A host
//! debugger binding implements the four required methods (type lookup,
//! byte order, pointer width, raw reads) and may override any of the
//! value-level operations with its own native ones; `ProcessSnapshot` is
//! the built-in implementation over captured memory.

pub mod snapshot;

use crate::config::InspectConfig;
use crate::core::handle::TypedHandle;
use crate::core::{DataType, DataTypeKind, TypeData};
use crate::error::{InspectError, Result};
use crate::memory::{Endianness, MemoryError};

pub use snapshot::{ProcessSnapshot, SnapshotBuilder};

/// Discriminated state of an optional wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionState {
    /// The wrapper holds a value; the handle addresses the payload
    Some(TypedHandle),
    /// The wrapper is empty; its payload must not be read
    None,
}

/// Read-only access to the types and memory of an inspected process.
pub trait Introspector {
    /// Resolve a type by its fully-qualified name.
    fn find_type(&self, name: &str) -> Option<DataType>;

    /// Byte order of the inspected process.
    fn byte_order(&self) -> Endianness;

    /// Pointer width of the inspected process in bytes.
    fn pointer_size(&self) -> u64;

    /// Read raw bytes from the inspected process.
    fn read_memory(&self, address: u64, len: u64) -> std::result::Result<Vec<u8>, MemoryError>;

    /// Static type of a handle.
    fn type_of(&self, handle: &TypedHandle) -> Result<DataType> {
        self.find_type(&handle.type_name)
            .ok_or_else(|| InspectError::UnknownType(handle.type_name.clone()))
    }

    /// One step of typedef resolution; non-typedefs resolve to themselves.
    fn typedefed_type(&self, ty: &DataType) -> Result<DataType> {
        match &ty.type_data {
            TypeData::Typedef { target } => self
                .find_type(target)
                .ok_or_else(|| InspectError::UnknownType(target.clone())),
            _ => Ok(ty.clone()),
        }
    }

    /// Generic parameter `index` of `ty`.
    fn template_argument(&self, ty: &DataType, index: usize) -> Result<DataType> {
        ty.template_arg(index)
            .and_then(|name| self.find_type(name))
            .ok_or_else(|| InspectError::UnresolvedGenericParameter {
                type_name: ty.name.clone(),
                index,
            })
    }

    /// Synthesize a handle at `address` without reading target memory.
    fn create_value_from_address(&self, name: &str, address: u64, ty: &DataType) -> TypedHandle {
        TypedHandle::new(name, address, ty.name.clone())
    }

    /// Child field `name` of a struct value. Pointers are followed one level.
    fn child_member(&self, handle: &TypedHandle, name: &str) -> Result<TypedHandle> {
        let mut target = handle.clone();
        let mut ty = self.type_of(&target)?;
        if ty.is_pointer() {
            target = self.dereference(&target)?;
            ty = self.type_of(&target)?;
        }
        let field = ty
            .field(name)
            .ok_or_else(|| InspectError::missing_field(&ty.name, name))?;
        Ok(TypedHandle::new(
            name,
            target.address.wrapping_add(field.offset),
            field.type_name.clone(),
        ))
    }

    /// Child at `index` in declaration order.
    fn child_at_index(&self, handle: &TypedHandle, index: usize) -> Result<TypedHandle> {
        let ty = self.type_of(handle)?;
        let missing = || InspectError::MissingChild {
            type_name: ty.name.clone(),
            index,
        };
        match ty.kind {
            DataTypeKind::Pointer => {
                let pointee = self.dereference(handle)?;
                self.child_at_index(&pointee, index)
            }
            DataTypeKind::Optional => match self.option_state(handle)? {
                OptionState::Some(payload) if index == 0 => Ok(payload),
                _ => Err(missing()),
            },
            _ => {
                let field = ty.fields().get(index).ok_or_else(missing)?;
                Ok(TypedHandle::new(
                    field.name.clone(),
                    handle.address.wrapping_add(field.offset),
                    field.type_name.clone(),
                ))
            }
        }
    }

    /// Number of declared children.
    fn num_children(&self, handle: &TypedHandle) -> Result<usize> {
        let ty = self.type_of(handle)?;
        match ty.kind {
            DataTypeKind::Pointer => {
                let pointee = self.dereference(handle)?;
                self.num_children(&pointee)
            }
            DataTypeKind::Optional => Ok(match self.option_state(handle)? {
                OptionState::Some(_) => 1,
                OptionState::None => 0,
            }),
            _ => Ok(ty.fields().len()),
        }
    }

    /// Declaration index of the child named `name`.
    fn index_of_child(&self, handle: &TypedHandle, name: &str) -> Option<usize> {
        let ty = self.type_of(handle).ok()?;
        ty.fields().iter().position(|f| f.name == name)
    }

    /// Unsigned integer backing a scalar value, zero-extended.
    fn value_as_unsigned(&self, handle: &TypedHandle) -> Result<u64> {
        let ty = self.type_of(handle)?;
        let width = ty.size;
        let bytes = self.read_memory(handle.address, width)?;
        let value = match (width, self.byte_order()) {
            (1, _) => u64::from(bytes[0]),
            (2 | 4 | 8, Endianness::Little) => bytes
                .iter()
                .rev()
                .fold(0u64, |acc, b| (acc << 8) | u64::from(*b)),
            (2 | 4 | 8, Endianness::Big) => {
                bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
            }
            (other, _) => return Err(MemoryError::UnsupportedWidth(other).into()),
        };
        Ok(value)
    }

    /// Address held by a pointer value.
    fn pointer_value(&self, handle: &TypedHandle) -> Result<u64> {
        let ty = self.type_of(handle)?;
        if !ty.is_pointer() {
            return Err(InspectError::NotAPointer(ty.name));
        }
        let bytes = self.read_memory(handle.address, self.pointer_size())?;
        let value = match self.byte_order() {
            Endianness::Little => bytes
                .iter()
                .rev()
                .fold(0u64, |acc, b| (acc << 8) | u64::from(*b)),
            Endianness::Big => bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)),
        };
        Ok(value)
    }

    /// The value a pointer points at.
    fn dereference(&self, handle: &TypedHandle) -> Result<TypedHandle> {
        let ty = self.type_of(handle)?;
        let pointee = match &ty.type_data {
            TypeData::Pointer { pointee } => pointee.clone(),
            _ => return Err(InspectError::NotAPointer(ty.name)),
        };
        let address = self.pointer_value(handle)?;
        Ok(TypedHandle::new(format!("*{}", handle.name), address, pointee))
    }

    /// Discriminate an optional wrapper.
    fn option_state(&self, handle: &TypedHandle) -> Result<OptionState> {
        let ty = self.type_of(handle)?;
        let (payload, niche_offset) = match &ty.type_data {
            TypeData::Optional {
                payload,
                niche_offset,
            } => (payload.clone(), *niche_offset),
            _ => return Err(InspectError::NotAnOptional(ty.name)),
        };
        let niche = self.read_memory(
            handle.address.wrapping_add(niche_offset),
            self.pointer_size(),
        )?;
        if niche.iter().all(|b| *b == 0) {
            return Ok(OptionState::None);
        }
        Ok(OptionState::Some(TypedHandle::new(
            "__0",
            handle.address,
            payload,
        )))
    }
}

/// Shared state of one inspection: the collaborator plus tuning knobs.
#[derive(Clone, Copy)]
pub struct InspectContext<'a> {
    pub introspector: &'a dyn Introspector,
    pub config: &'a InspectConfig,
}

impl<'a> InspectContext<'a> {
    pub fn new(introspector: &'a dyn Introspector, config: &'a InspectConfig) -> Self {
        Self {
            introspector,
            config,
        }
    }

    /// Resolve a type by name, failing with `UnknownType`.
    pub fn require_type(&self, name: &str) -> Result<DataType> {
        self.introspector
            .find_type(name)
            .ok_or_else(|| InspectError::UnknownType(name.to_string()))
    }

    /// Zero-size compatibility shim.
    ///
    /// Some debugger front-ends report a generic parameter as its logical
    /// Rust type (e.g. `arrow_array::types::UInt16Type`, a zero-sized
    /// marker) instead of the native representation (`u16`). Such a type
    /// shows up with byte size 0; follow its typedef chain, at most
    /// `config.max_typedef_depth` steps, until a sized type appears.
    /// Whether the placeholder appears at all depends on the front-end,
    /// not on the data format.
    pub fn resolve_concrete(&self, ty: DataType) -> Result<DataType> {
        if ty.size != 0 {
            return Ok(ty);
        }
        let original = ty.name.clone();
        let mut current = ty;
        for _ in 0..self.config.max_typedef_depth {
            if current.kind != DataTypeKind::Typedef {
                break;
            }
            current = self.introspector.typedefed_type(&current)?;
            if current.size != 0 {
                tracing::trace!(
                    placeholder = %original,
                    resolved = %current.name,
                    "Resolved zero-size placeholder type"
                );
                return Ok(current);
            }
        }
        Err(InspectError::ZeroSizeType(original))
    }
}
