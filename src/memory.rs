//! MemoryView: bounded reads of inspected-process memory by address.
//!
//! Decoders never touch target memory directly. Every read goes through a
//! `MemoryView`, which enforces bounds and reports unmapped addresses as
//! errors instead of panicking.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Byte order of the inspected process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endianness {
    Little,
    Big,
}

/// Errors that can occur during memory reads.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MemoryError {
    #[error("unsupported integer width: {0} bytes")]
    UnsupportedWidth(u64),
    #[error("address {address:#x} (len={len}) is not mapped")]
    Unmapped { address: u64, len: u64 },
    #[error("address overflow at {address:#x} + {len}")]
    Overflow { address: u64, len: u64 },
    #[error("overlapping regions at {0:#x}")]
    Overlap(u64),
}

/// Bounded memory reads by address.
pub trait MemoryView {
    /// Read `len` bytes starting at `address`.
    fn read_bytes(&self, address: u64, len: u64) -> Result<Vec<u8>, MemoryError>;

    /// Convenience: read one byte.
    fn read_u8(&self, address: u64) -> Result<u8, MemoryError> {
        let b = self.read_bytes(address, 1)?;
        Ok(b[0])
    }

    /// Convenience: read a little/big-endian u16.
    fn read_u16(&self, address: u64, endian: Endianness) -> Result<u16, MemoryError> {
        let b = self.read_bytes(address, 2)?;
        Ok(match endian {
            Endianness::Little => u16::from_le_bytes([b[0], b[1]]),
            Endianness::Big => u16::from_be_bytes([b[0], b[1]]),
        })
    }

    /// Convenience: read a little/big-endian u32.
    fn read_u32(&self, address: u64, endian: Endianness) -> Result<u32, MemoryError> {
        let b = self.read_bytes(address, 4)?;
        Ok(match endian {
            Endianness::Little => u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            Endianness::Big => u32::from_be_bytes([b[0], b[1], b[2], b[3]]),
        })
    }

    /// Convenience: read a little/big-endian u64.
    fn read_u64(&self, address: u64, endian: Endianness) -> Result<u64, MemoryError> {
        let b = self.read_bytes(address, 8)?;
        Ok(match endian {
            Endianness::Little => {
                u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
            }
            Endianness::Big => u64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]),
        })
    }

    /// Read an unsigned integer of `width` bytes (1, 2, 4 or 8), zero-extended.
    fn read_uint(&self, address: u64, width: u64, endian: Endianness) -> Result<u64, MemoryError> {
        match width {
            1 => self.read_u8(address).map(u64::from),
            2 => self.read_u16(address, endian).map(u64::from),
            4 => self.read_u32(address, endian).map(u64::from),
            8 => self.read_u64(address, endian),
            other => Err(MemoryError::UnsupportedWidth(other)),
        }
    }
}

/// A contiguous run of captured process memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRegion {
    /// Address of the first byte
    pub base: u64,
    /// Captured contents
    pub data: Bytes,
}

impl MemoryRegion {
    pub fn new(base: u64, data: impl Into<Bytes>) -> Self {
        Self {
            base,
            data: data.into(),
        }
    }

    /// One past the last mapped address.
    pub fn end(&self) -> u64 {
        self.base.saturating_add(self.data.len() as u64)
    }

    fn contains(&self, address: u64, len: u64) -> bool {
        match address.checked_add(len) {
            Some(end) => address >= self.base && end <= self.end(),
            None => false,
        }
    }
}

/// A memory view over a set of non-overlapping captured regions.
#[derive(Debug, Clone, Default)]
pub struct RegionMemoryView {
    // sorted by base
    regions: Vec<MemoryRegion>,
}

impl RegionMemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a region. Overlapping an existing region is rejected.
    pub fn add_region(&mut self, region: MemoryRegion) -> Result<(), MemoryError> {
        if region.data.is_empty() {
            return Ok(());
        }
        if let Some(existing) = self
            .regions
            .iter()
            .find(|r| region.base < r.end() && r.base < region.end())
        {
            return Err(MemoryError::Overlap(existing.base.max(region.base)));
        }
        let pos = self.regions.partition_point(|r| r.base < region.base);
        self.regions.insert(pos, region);
        Ok(())
    }

    pub fn with_region(mut self, region: MemoryRegion) -> Result<Self, MemoryError> {
        self.add_region(region)?;
        Ok(self)
    }

    pub fn regions(&self) -> &[MemoryRegion] {
        &self.regions
    }
}

impl MemoryView for RegionMemoryView {
    fn read_bytes(&self, address: u64, len: u64) -> Result<Vec<u8>, MemoryError> {
        if len == 0 {
            return Ok(Vec::new());
        }
        if address.checked_add(len).is_none() {
            return Err(MemoryError::Overflow { address, len });
        }

        // Reads never span two regions, even adjacent ones.
        let idx = self.regions.partition_point(|r| r.base <= address);
        let region = idx
            .checked_sub(1)
            .map(|i| &self.regions[i])
            .filter(|r| r.contains(address, len))
            .ok_or(MemoryError::Unmapped { address, len })?;

        let start = (address - region.base) as usize;
        Ok(region.data[start..start + len as usize].to_vec())
    }
}
