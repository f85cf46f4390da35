//! A self-contained introspector over captured memory.
//!
//! `ProcessSnapshot` pairs a type registry with a `RegionMemoryView`. It is
//! what offline tooling (memory dumps plus type descriptions exported from
//! debug info) and the test-suites inspect. `SnapshotBuilder` lays out
//! values at fresh addresses so that Arrow-shaped structures can be
//! reproduced byte for byte.

use std::collections::HashMap;

use crate::core::DataType;
use crate::introspect::Introspector;
use crate::memory::{Endianness, MemoryError, MemoryRegion, MemoryView, RegionMemoryView};

/// Captured types and memory of one process.
#[derive(Debug, Clone)]
pub struct ProcessSnapshot {
    types: HashMap<String, DataType>,
    memory: RegionMemoryView,
    endianness: Endianness,
    pointer_size: u64,
}

impl ProcessSnapshot {
    pub fn new(memory: RegionMemoryView, endianness: Endianness, pointer_size: u64) -> Self {
        Self {
            types: HashMap::new(),
            memory,
            endianness,
            pointer_size,
        }
    }

    /// Register (or replace) a type description.
    pub fn register_type(&mut self, ty: DataType) {
        self.types.insert(ty.name.clone(), ty);
    }

    pub fn with_types<I: IntoIterator<Item = DataType>>(mut self, types: I) -> Self {
        for ty in types {
            self.register_type(ty);
        }
        self
    }

    pub fn memory(&self) -> &RegionMemoryView {
        &self.memory
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

impl Introspector for ProcessSnapshot {
    fn find_type(&self, name: &str) -> Option<DataType> {
        self.types.get(name).cloned()
    }

    fn byte_order(&self) -> Endianness {
        self.endianness
    }

    fn pointer_size(&self) -> u64 {
        self.pointer_size
    }

    fn read_memory(&self, address: u64, len: u64) -> Result<Vec<u8>, MemoryError> {
        self.memory.read_bytes(address, len)
    }
}

const DEFAULT_BASE: u64 = 0x1_0000;
const ALLOC_ALIGN: u64 = 16;
// Unmapped gap between allocations so that over-reads fail loudly.
const ALLOC_GAP: u64 = 16;

/// Incrementally lays out values for a `ProcessSnapshot`.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    types: Vec<DataType>,
    allocations: Vec<(u64, Vec<u8>)>,
    mapped: Vec<MemoryRegion>,
    next_address: u64,
    endianness: Endianness,
    pointer_size: u64,
}

impl SnapshotBuilder {
    pub fn new(endianness: Endianness, pointer_size: u64) -> Self {
        Self {
            types: Vec::new(),
            allocations: Vec::new(),
            mapped: Vec::new(),
            next_address: DEFAULT_BASE,
            endianness,
            pointer_size,
        }
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub fn pointer_size(&self) -> u64 {
        self.pointer_size
    }

    /// Add a type description.
    pub fn define(&mut self, ty: DataType) -> &mut Self {
        self.types.push(ty);
        self
    }

    /// Place `bytes` at a fresh address and return it.
    pub fn alloc(&mut self, bytes: &[u8]) -> u64 {
        let address = self.next_address;
        let len = (bytes.len() as u64).max(1);
        self.next_address = (address + len + ALLOC_GAP).div_ceil(ALLOC_ALIGN) * ALLOC_ALIGN;
        self.allocations.push((address, bytes.to_vec()));
        address
    }

    /// Place `len` zero bytes at a fresh address and return it.
    pub fn alloc_zeroed(&mut self, len: usize) -> u64 {
        self.alloc(&vec![0; len])
    }

    /// Map an externally captured region, e.g. one loaded from a dump.
    ///
    /// It must not overlap the allocations; `build` rejects overlaps.
    pub fn map_region(&mut self, region: MemoryRegion) -> &mut Self {
        self.mapped.push(region);
        self
    }

    /// Overwrite bytes inside an existing allocation.
    pub fn write(&mut self, address: u64, bytes: &[u8]) -> Result<(), MemoryError> {
        let len = bytes.len() as u64;
        let (base, data) = self
            .allocations
            .iter_mut()
            .find(|(base, data)| address >= *base && address + len <= *base + data.len() as u64)
            .ok_or(MemoryError::Unmapped { address, len })?;
        let start = (address - *base) as usize;
        data[start..start + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Write an unsigned integer of `width` bytes in the snapshot byte order.
    pub fn write_uint(&mut self, address: u64, value: u64, width: u64) -> Result<(), MemoryError> {
        let bytes = self.encode_uint(value, width)?;
        self.write(address, &bytes)
    }

    /// Write a pointer-width value.
    pub fn write_pointer(&mut self, address: u64, value: u64) -> Result<(), MemoryError> {
        self.write_uint(address, value, self.pointer_size)
    }

    /// Encode `value` as `width` bytes in the snapshot byte order.
    pub fn encode_uint(&self, value: u64, width: u64) -> Result<Vec<u8>, MemoryError> {
        if !matches!(width, 1 | 2 | 4 | 8) {
            return Err(MemoryError::UnsupportedWidth(width));
        }
        let w = width as usize;
        Ok(match self.endianness {
            Endianness::Little => value.to_le_bytes()[..w].to_vec(),
            Endianness::Big => value.to_be_bytes()[8 - w..].to_vec(),
        })
    }

    pub fn build(self) -> Result<ProcessSnapshot, MemoryError> {
        let mut memory = RegionMemoryView::new();
        for (base, data) in self.allocations {
            memory.add_region(MemoryRegion::new(base, data))?;
        }
        for region in self.mapped {
            memory.add_region(region)?;
        }
        Ok(ProcessSnapshot::new(memory, self.endianness, self.pointer_size).with_types(self.types))
    }
}
