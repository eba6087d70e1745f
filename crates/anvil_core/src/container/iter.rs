//! Owning iteration over an [`Array`].

// SAFETY: IntoIter takes over an array's storage and tracks the still-live
// window `[start, end)` by hand.
#![allow(unsafe_code)]

use std::marker::PhantomData;
use std::ptr::{self, NonNull};
use std::slice;

use super::array::Array;
use crate::memory::Allocator;

/// Iterator that moves elements out of an [`Array`].
///
/// Remaining elements and the storage are released on drop.
pub struct IntoIter<T> {
    data: Option<NonNull<T>>,
    capacity: usize,
    alloc: Allocator,
    start: usize,
    end: usize,
    _marker: PhantomData<T>,
}

impl<T> IntoIter<T> {
    /// The elements not yet yielded.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [start, end) are live
        unsafe { slice::from_raw_parts(self.ptr().add(self.start), self.end - self.start) }
    }

    #[inline]
    fn ptr(&self) -> *mut T {
        self.data.map_or(NonNull::dangling().as_ptr(), NonNull::as_ptr)
    }
}

impl<T> IntoIterator for Array<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let (data, len, capacity, alloc) = self.into_raw_parts();
        IntoIter {
            data,
            capacity,
            alloc,
            start: 0,
            end: len,
            _marker: PhantomData,
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: slot `start` is live and leaves the window before it is read again
        let item = unsafe { ptr::read(self.ptr().add(self.start)) };
        self.start += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: slot `end` was live and is now outside the window
        Some(unsafe { ptr::read(self.ptr().add(self.end)) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let remaining = self.end - self.start;
        self.end = self.start;
        // SAFETY: the window was live; storage came from allocate::<T>(capacity)
        unsafe {
            ptr::drop_in_place(slice::from_raw_parts_mut(self.ptr().add(self.start), remaining));
            if let Some(data) = self.data.take() {
                let released = self.alloc.deallocate(data, self.capacity);
                debug_assert!(released.is_ok());
            }
        }
    }
}

// SAFETY: same ownership as the array it came from
unsafe impl<T: Send> Send for IntoIter<T> {}
// SAFETY: shared access only exposes `&[T]`
unsafe impl<T: Sync> Sync for IntoIter<T> {}
