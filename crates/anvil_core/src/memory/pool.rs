//! # Pool Resource
//!
//! Fixed-size block resource for containers that are frequently created and
//! destroyed with similar footprints.

// SAFETY: The pool owns one raw allocation and hands out disjoint blocks of it.
// Block indices are validated before any pointer arithmetic.
#![allow(unsafe_code)]

use std::alloc::{alloc, dealloc, Layout};
use std::ptr::NonNull;

use parking_lot::Mutex;

use super::resource::MemoryResource;
use crate::error::{CoreError, CoreResult};

/// A memory resource serving fixed-size blocks from one upfront allocation.
///
/// Requests larger than the block size, stricter than the block alignment,
/// or made while every block is in use return `None`; the bound
/// [`Allocator`](super::Allocator) reports that as
/// [`CoreError::OutOfMemory`].
///
/// # Thread Safety
///
/// The free list sits behind a mutex so the pool can be shared through an
/// `Arc` by allocators on different threads.
///
/// # Example
///
/// ```rust,ignore
/// let pool = Arc::new(PoolResource::new(256, 16, 64)?);
/// let mut array: Array<u32> = Array::new_in(Allocator::with_resource(pool.clone()));
/// array.push(7)?;
/// assert_eq!(pool.used_blocks(), 1);
/// ```
pub struct PoolResource {
    /// Start of the backing allocation.
    base: NonNull<u8>,
    /// Layout of the backing allocation.
    storage_layout: Layout,
    /// Size of every block in bytes.
    block_size: usize,
    /// Alignment of every block.
    block_align: usize,
    /// Total number of blocks.
    block_count: usize,
    /// Indices of free blocks, popped from the back.
    free_list: Mutex<Vec<usize>>,
}

impl PoolResource {
    /// Creates a pool of `block_count` blocks of `block_size` bytes.
    ///
    /// `block_size` is rounded up to a multiple of `block_align`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidArgument`] for a zero size or count, or a
    ///   non-power-of-two alignment.
    /// - [`CoreError::CapacityOverflow`] if the pool size overflows.
    /// - [`CoreError::OutOfMemory`] if the backing allocation fails.
    pub fn new(block_size: usize, block_align: usize, block_count: usize) -> CoreResult<Self> {
        if block_size == 0 {
            return Err(CoreError::InvalidArgument("pool block size must be positive"));
        }
        if block_count == 0 {
            return Err(CoreError::InvalidArgument("pool block count must be positive"));
        }
        if !block_align.is_power_of_two() {
            return Err(CoreError::InvalidArgument("pool alignment must be a power of two"));
        }

        let block_size = block_size
            .checked_add(block_align - 1)
            .ok_or(CoreError::CapacityOverflow)?
            & !(block_align - 1);
        let total = block_size
            .checked_mul(block_count)
            .ok_or(CoreError::CapacityOverflow)?;
        let storage_layout =
            Layout::from_size_align(total, block_align).map_err(|_| CoreError::CapacityOverflow)?;

        // SAFETY: total > 0 because both factors are positive
        let base = NonNull::new(unsafe { alloc(storage_layout) }).ok_or(CoreError::OutOfMemory {
            bytes: total,
            align: block_align,
        })?;

        tracing::debug!(
            "pool resource created: {} blocks of {} bytes (align {})",
            block_count,
            block_size,
            block_align
        );

        Ok(Self {
            base,
            storage_layout,
            block_size,
            block_align,
            block_count,
            // Reversed so the lowest block is handed out first
            free_list: Mutex::new((0..block_count).rev().collect()),
        })
    }

    /// Returns the size of one block in bytes.
    #[inline]
    #[must_use]
    pub const fn block_size(&self) -> usize {
        self.block_size
    }

    /// Returns the alignment of every block.
    #[inline]
    #[must_use]
    pub const fn block_align(&self) -> usize {
        self.block_align
    }

    /// Returns the total number of blocks.
    #[inline]
    #[must_use]
    pub const fn block_count(&self) -> usize {
        self.block_count
    }

    /// Returns the number of blocks currently handed out.
    #[must_use]
    pub fn used_blocks(&self) -> usize {
        self.block_count - self.free_list.lock().len()
    }

    /// Returns the number of free blocks.
    #[must_use]
    pub fn free_blocks(&self) -> usize {
        self.free_list.lock().len()
    }

    /// Whether `ptr` points at the start of one of this pool's blocks.
    #[must_use]
    pub fn contains(&self, ptr: NonNull<u8>) -> bool {
        self.block_index(ptr).is_some()
    }

    /// Maps a block pointer back to its index.
    fn block_index(&self, ptr: NonNull<u8>) -> Option<usize> {
        let offset = (ptr.as_ptr() as usize).checked_sub(self.base.as_ptr() as usize)?;
        if offset >= self.storage_layout.size() || offset % self.block_size != 0 {
            return None;
        }
        Some(offset / self.block_size)
    }
}

impl MemoryResource for PoolResource {
    fn malloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() > self.block_size || layout.align() > self.block_align {
            return None;
        }

        let Some(index) = self.free_list.lock().pop() else {
            tracing::warn!("pool resource exhausted ({} blocks)", self.block_count);
            return None;
        };

        // SAFETY: index < block_count, so the block lies inside the backing allocation
        Some(unsafe { NonNull::new_unchecked(self.base.as_ptr().add(index * self.block_size)) })
    }

    unsafe fn free(&self, ptr: NonNull<u8>, _layout: Layout) {
        match self.block_index(ptr) {
            Some(index) => self.free_list.lock().push(index),
            None => debug_assert!(false, "pointer was not allocated by this pool"),
        }
    }
}

impl Drop for PoolResource {
    fn drop(&mut self) {
        // SAFETY: base was allocated in `new` with exactly this layout
        unsafe {
            dealloc(self.base.as_ptr(), self.storage_layout);
        }
    }
}

// SAFETY: the backing allocation is owned by the pool and the free list is locked
unsafe impl Send for PoolResource {}
// SAFETY: all shared mutation goes through the mutex
unsafe impl Sync for PoolResource {}
