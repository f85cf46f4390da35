//! Custom error types for memory dump loading.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DumpError {
    #[error("Dump size of {found} bytes exceeds the maximum allowed size of {limit} bytes.")]
    DumpTooLarge { limit: u64, found: u64 },

    #[error(
        "A read operation would exceed the total read limit of {limit} bytes. (already read: {current})"
    )]
    ReadLimitExceeded { limit: u64, current: u64 },

    #[error("Dump window {offset}+{len} lies outside the {size}-byte file.")]
    OutOfBounds { offset: u64, len: u64, size: u64 },

    #[error("An underlying I/O error occurred.")]
    StdIo(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DumpError>;
