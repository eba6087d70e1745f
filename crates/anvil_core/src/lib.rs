//! # ANVIL Core
//!
//! Allocator-aware containers for engine code that wants control over where
//! its memory comes from:
//! - Contiguous growable arrays with a deterministic growth policy
//! - Pluggable memory resources (global heap, fixed-block pools)
//! - Byte buffers with plain-data read/write helpers
//!
//! ## Architecture Rules
//!
//! 1. **Fallible by default** - Anything that may allocate returns a `CoreResult`
//! 2. **No hidden fallback** - A bound resource that fails is reported, not bypassed
//! 3. **Unsafe is fenced** - Only the memory-owning modules may use `unsafe`
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use anvil_core::{Allocator, Array, PoolResource};
//!
//! let pool = Arc::new(PoolResource::new(1024, 16, 32)?);
//! let mut array: Array<u32> = Array::new_in(Allocator::with_resource(pool));
//! array.append_copied(&[1, 2, 3])?;
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod container;
pub mod error;
pub mod memory;

pub use config::GrowthPolicy;
pub use container::{Array, Cursor, CursorIter, IntoIter};
pub use error::{CoreError, CoreResult};
pub use memory::{Allocator, ByteArray, HeapResource, MemoryResource, PoolResource};
