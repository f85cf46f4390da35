//! Loading raw memory dumps as inspectable regions.
//!
//! A dump is a flat file holding a copy of a process memory range. The
//! `DumpReader` memory-maps it under strict size limits and hands out
//! windows of it as `MemoryRegion`s placed at caller-supplied addresses.

pub mod error;

use crate::io::error::{DumpError, Result};
use crate::memory::MemoryRegion;
use bytes::Bytes;
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Defines the resource limits for dump loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpLimits {
    /// The absolute maximum dump size that can be opened.
    pub max_file_size: u64,
    /// The maximum total number of bytes that can be copied out across all reads.
    pub max_read_bytes: u64,
}

impl Default for DumpLimits {
    fn default() -> Self {
        Self {
            max_file_size: 1024 * 1024 * 1024, // 1GB
            max_read_bytes: 256 * 1024 * 1024, // 256MB
        }
    }
}

/// A bounded reader over a memory-mapped dump file.
pub struct DumpReader {
    path: PathBuf,
    // None when the file size is zero; memmap cannot map empty files.
    mmap: Option<Mmap>,
    limits: DumpLimits,
    bytes_read: u64,
    file_size: u64,
}

impl DumpReader {
    /// Opens a dump file and memory-maps it read-only.
    ///
    /// Fails if the file size exceeds `limits.max_file_size`.
    pub fn open<P: AsRef<Path>>(path: P, limits: DumpLimits) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();

        debug!(
            path = %path.display(),
            size = file_size,
            limits.max_file_size = limits.max_file_size,
            "Opening memory dump"
        );

        if file_size > limits.max_file_size {
            warn!(
                path = %path.display(),
                size = file_size,
                limit = limits.max_file_size,
                "Dump is too large"
            );
            return Err(DumpError::DumpTooLarge {
                limit: limits.max_file_size,
                found: file_size,
            });
        }

        let mmap = if file_size == 0 {
            None
        } else {
            // Safety: read-only map of a regular file; the map is never handed out mutably.
            Some(unsafe { Mmap::map(&file)? })
        };

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
            limits,
            bytes_read: 0,
            file_size,
        })
    }

    /// Returns the total size of the dump in bytes.
    pub fn size(&self) -> u64 {
        self.file_size
    }

    /// Returns the total number of bytes copied out so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Returns the `DumpLimits` enforced by this reader.
    pub fn limits(&self) -> &DumpLimits {
        &self.limits
    }

    /// Copies `len` bytes at file `offset` into a region based at `base`.
    ///
    /// Unlike a file reader, a short window is an error: a truncated region
    /// would make decoders report wrong lengths instead of failing.
    pub fn region_at(&mut self, offset: u64, len: u64, base: u64) -> Result<MemoryRegion> {
        if self.bytes_read.saturating_add(len) > self.limits.max_read_bytes {
            warn!(
                path = %self.path.display(),
                current_read = self.bytes_read,
                requested = len,
                limit = self.limits.max_read_bytes,
                "Read limit exceeded"
            );
            return Err(DumpError::ReadLimitExceeded {
                limit: self.limits.max_read_bytes,
                current: self.bytes_read,
            });
        }

        let end = offset.checked_add(len).filter(|end| *end <= self.file_size);
        let end = match end {
            Some(end) => end,
            None => {
                return Err(DumpError::OutOfBounds {
                    offset,
                    len,
                    size: self.file_size,
                })
            }
        };

        let data = match &self.mmap {
            Some(map) => Bytes::copy_from_slice(&map[offset as usize..end as usize]),
            None => Bytes::new(),
        };
        self.bytes_read += len;

        trace!(
            path = %self.path.display(),
            offset = offset,
            len = len,
            base = base,
            total_read = self.bytes_read,
            "Loaded dump window"
        );

        Ok(MemoryRegion::new(base, data))
    }

    /// The whole dump as one region based at `base`.
    pub fn region(&mut self, base: u64) -> Result<MemoryRegion> {
        self.region_at(0, self.file_size, base)
    }
}
