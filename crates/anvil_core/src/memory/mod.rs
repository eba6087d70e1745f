//! # Memory Management
//!
//! Typed allocation over pluggable memory resources.
//!
//! ## Design Philosophy
//!
//! Containers never talk to the heap directly. They hold an [`Allocator`],
//! which either forwards to the global heap or to a shared
//! [`MemoryResource`]:
//! - No hidden fallback when a bound resource runs dry
//! - Pools can be sized once at startup and shared through `Arc`
//! - Zero-sized types never touch a resource

mod allocator;
mod bytes;
mod pool;
mod resource;

pub use allocator::Allocator;
pub use bytes::ByteArray;
pub use pool::PoolResource;
pub use resource::{HeapResource, MemoryResource};
