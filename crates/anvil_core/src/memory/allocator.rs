//! # Typed Allocator
//!
//! Turns "`count` elements of `T`" into a raw allocation, optionally routed
//! through a shared [`MemoryResource`].

// SAFETY: This module performs raw allocation and deallocation.
// Layouts are always derived from `Layout::array::<T>(count)`.
#![allow(unsafe_code)]

use std::alloc::{alloc, dealloc, Layout};
use std::fmt;
use std::ptr::NonNull;
use std::sync::Arc;

use super::resource::MemoryResource;
use crate::error::{CoreError, CoreResult};

/// Typed front-end over a memory resource.
///
/// Holds at most a shared handle to a resource and never owns the memory it
/// returns: whoever calls [`allocate`](Allocator::allocate) owns the block
/// and must hand it back through [`deallocate`](Allocator::deallocate) with
/// the same element type and count.
///
/// With no resource bound, memory comes from the global allocator.
#[derive(Clone, Default)]
pub struct Allocator {
    /// Bound resource, or `None` for the global heap.
    resource: Option<Arc<dyn MemoryResource>>,
}

impl Allocator {
    /// Creates an allocator backed by the global heap.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { resource: None }
    }

    /// Creates an allocator bound to `resource`.
    #[must_use]
    pub fn with_resource(resource: Arc<dyn MemoryResource>) -> Self {
        Self {
            resource: Some(resource),
        }
    }

    /// Returns the bound resource, if any.
    #[inline]
    #[must_use]
    pub fn resource(&self) -> Option<&Arc<dyn MemoryResource>> {
        self.resource.as_ref()
    }

    /// Whether memory allocated by `self` can be released by `other`.
    #[must_use]
    pub fn is_equal(&self, other: &Self) -> bool {
        let is_heap = |r: Option<&Arc<dyn MemoryResource>>| r.map_or(true, |r| r.is_global_heap());
        match (&self.resource, &other.resource) {
            (Some(a), Some(b)) => a.is_equal(&**b),
            _ => is_heap(self.resource()) && is_heap(other.resource()),
        }
    }

    /// Allocates uninitialized storage for `count` values of `T`.
    ///
    /// Zero-sized `T` never touches a resource; a dangling, well-aligned
    /// pointer is returned instead.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidArgument`] if `count` is zero.
    /// - [`CoreError::CapacityOverflow`] if `count * size_of::<T>()` does not
    ///   fit in `isize`.
    /// - [`CoreError::OutOfMemory`] if the bound resource (or, with none
    ///   bound, the global allocator) cannot satisfy the request.
    pub fn allocate<T>(&self, count: usize) -> CoreResult<NonNull<T>> {
        let layout = Self::layout_for::<T>(count)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }

        let raw = match &self.resource {
            Some(resource) => resource.malloc(layout),
            // SAFETY: layout has non-zero size
            None => NonNull::new(unsafe { alloc(layout) }),
        };

        match raw {
            Some(ptr) => Ok(ptr.cast()),
            None => {
                tracing::warn!(
                    "allocation of {} bytes (align {}) failed",
                    layout.size(),
                    layout.align()
                );
                Err(CoreError::OutOfMemory {
                    bytes: layout.size(),
                    align: layout.align(),
                })
            }
        }
    }

    /// Releases storage obtained from [`allocate`](Allocator::allocate).
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidArgument`] if `count` is zero;
    /// [`CoreError::CapacityOverflow`] if the byte size overflows (which
    /// implies the pairing precondition below was already broken).
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate::<T>(count)` on this
    /// allocator (or one it [`is_equal`](Allocator::is_equal) to) with the
    /// same `count`, and must not have been released already. Violations are
    /// undefined behavior; nothing is recorded to detect them.
    pub unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize) -> CoreResult<()> {
        let layout = Self::layout_for::<T>(count)?;
        if layout.size() == 0 {
            return Ok(());
        }

        match &self.resource {
            Some(resource) => resource.free(ptr.cast(), layout),
            None => dealloc(ptr.as_ptr().cast(), layout),
        }
        Ok(())
    }

    /// Byte layout of `count` values of `T`.
    fn layout_for<T>(count: usize) -> CoreResult<Layout> {
        if count == 0 {
            return Err(CoreError::InvalidArgument("allocation count must be positive"));
        }
        Layout::array::<T>(count).map_err(|_| CoreError::CapacityOverflow)
    }
}

impl fmt::Debug for Allocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Allocator")
            .field("resource", &self.resource.as_ref().map(|_| "dyn MemoryResource"))
            .finish()
    }
}
