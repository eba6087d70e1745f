//! # Memory Resources
//!
//! The pluggable raw-byte capability behind [`Allocator`](super::Allocator).

// SAFETY: This module hands out raw heap memory.
// Every unsafe block is paired with the layout that produced it.
#![allow(unsafe_code)]

use std::alloc::{alloc, dealloc, Layout};
use std::ptr::NonNull;

/// A source of raw, uninitialized bytes.
///
/// Resources are shared (`Arc`) between every allocator bound to them and
/// must outlive every allocation they hand out. Containers only call
/// [`malloc`](MemoryResource::malloc) and [`free`](MemoryResource::free).
pub trait MemoryResource: Send + Sync {
    /// Returns a block of at least `layout.size()` bytes aligned to
    /// `layout.align()`, or `None` if this resource cannot satisfy it.
    ///
    /// `layout.size()` is never zero.
    fn malloc(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Returns a block to this resource.
    ///
    /// # Safety
    ///
    /// `ptr` must come from [`malloc`](MemoryResource::malloc) on a resource
    /// that [`is_equal`](MemoryResource::is_equal) to this one, called with
    /// the same `layout`, and must not have been freed already.
    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout);

    /// Whether memory from `other` can be freed through `self`.
    ///
    /// The default is identity.
    fn is_equal(&self, other: &dyn MemoryResource) -> bool {
        std::ptr::eq(
            (self as *const Self).cast::<u8>(),
            (other as *const dyn MemoryResource).cast::<u8>(),
        )
    }

    /// Whether this resource forwards to the global heap.
    fn is_global_heap(&self) -> bool {
        false
    }
}

/// The process-wide heap.
///
/// Equivalent to binding no resource at all; exists so the heap can be
/// passed where a resource is expected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeapResource;

impl MemoryResource for HeapResource {
    fn malloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        debug_assert!(layout.size() > 0, "zero-sized resource request");
        // SAFETY: layout has non-zero size
        NonNull::new(unsafe { alloc(layout) })
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        dealloc(ptr.as_ptr(), layout);
    }

    fn is_equal(&self, other: &dyn MemoryResource) -> bool {
        other.is_global_heap()
    }

    fn is_global_heap(&self) -> bool {
        true
    }
}
