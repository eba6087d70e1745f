//! # Core Error Types
//!
//! All errors that can occur in the allocator and the containers built on it.

use thiserror::Error;

/// Errors that can occur in the core containers and allocators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An argument was rejected before any work was done.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Index outside the live element range.
    #[error("index out of range: index {index}, len {len}")]
    OutOfRange {
        /// The offending index.
        index: usize,
        /// Number of live elements at the time of the call.
        len: usize,
    },

    /// A `[start, end)` range that is reversed or runs past the end.
    #[error("invalid range: {start}..{end} for len {len}")]
    InvalidRange {
        /// Range start.
        start: usize,
        /// Range end (exclusive).
        end: usize,
        /// Number of live elements at the time of the call.
        len: usize,
    },

    /// Front/back access on an empty container.
    #[error("container is empty")]
    Empty,

    /// Every allocation path failed.
    #[error("out of memory: requested {bytes} bytes aligned to {align}")]
    OutOfMemory {
        /// Requested size in bytes.
        bytes: usize,
        /// Requested alignment.
        align: usize,
    },

    /// Element count times element size does not fit in `isize`.
    #[error("capacity overflow")]
    CapacityOverflow,

    /// Invalid configuration file or values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
