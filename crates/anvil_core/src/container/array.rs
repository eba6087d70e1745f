//! # Dynamic Array
//!
//! Owning, contiguous, growable sequence with explicit element lifetimes.
//!
//! ## Memory Layout
//!
//! ```text
//!           data      len   capacity
//!         +--------+-------+--------+
//!         |   ...  |   2   |   4    |
//!         +--------+-------+--------+
//!             |
//!             v
//!         +--------+--------+--------+--------+
//!         |  live  |  live  | uninit | uninit |
//!         +--------+--------+--------+--------+
//! ```
//!
//! Slots `[0, len)` hold constructed values, `[len, capacity)` are raw
//! storage. `data` is `None` exactly when `capacity == 0`.
//!
//! Relocation (growth, shifting on insert/erase) is a bitwise move, so it
//! cannot fail halfway: a failed reallocation leaves the array untouched.

// SAFETY: This module manages element lifetimes over raw storage by hand.
// Every unsafe block states which slots are live at that point.
#![allow(unsafe_code)]

use std::alloc::{handle_alloc_error, Layout};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter;
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop};
use std::ops::{Add, AddAssign, Bound, Index, IndexMut, RangeBounds};
use std::ptr::{self, NonNull};
use std::slice;

use super::cursor::Cursor;
use crate::config::GrowthPolicy;
use crate::error::{CoreError, CoreResult};
use crate::memory::Allocator;

/// A contiguous growable array.
///
/// Storage is allocated lazily through an [`Allocator`] and grown according
/// to a [`GrowthPolicy`]. Every operation that may allocate returns a
/// [`CoreResult`]; trait impls that cannot (`Clone`, `FromIterator`,
/// `Extend`, `Add`) treat allocation failure like the standard collections
/// do and abort through [`handle_alloc_error`].
///
/// # Thread Safety
///
/// No internal synchronization. `Array<T>` is `Send`/`Sync` when `T` is.
///
/// # Example
///
/// ```rust,ignore
/// let mut array: Array<u32> = Array::new();
/// array.push(1)?;
/// array.push(3)?;
/// array.insert(1, 2)?;
/// assert_eq!(array, [1, 2, 3]);
/// assert_eq!(array.capacity(), 16);
/// ```
pub struct Array<T> {
    /// Start of storage, `None` iff `capacity == 0`.
    data: Option<NonNull<T>>,
    /// Number of live elements.
    len: usize,
    /// Number of allocated slots.
    capacity: usize,
    /// Source of storage.
    alloc: Allocator,
    /// Capacity growth parameters.
    growth: GrowthPolicy,
    /// Ownership of `T` values for drop check.
    _marker: PhantomData<T>,
}

impl<T> Array<T> {
    // ========================================================================
    // CONSTRUCTION
    // ========================================================================

    /// Creates an empty array on the global heap. Does not allocate.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::new_with(Allocator::new(), GrowthPolicy::DEFAULT)
    }

    /// Creates an empty array drawing storage from `alloc`.
    #[inline]
    #[must_use]
    pub const fn new_in(alloc: Allocator) -> Self {
        Self::new_with(alloc, GrowthPolicy::DEFAULT)
    }

    /// Creates an empty array with an explicit allocator and growth policy.
    #[inline]
    #[must_use]
    pub const fn new_with(alloc: Allocator, growth: GrowthPolicy) -> Self {
        Self {
            data: None,
            len: 0,
            capacity: 0,
            alloc,
            growth,
            _marker: PhantomData,
        }
    }

    /// Creates an empty array with exactly `capacity` slots.
    ///
    /// # Errors
    ///
    /// Allocation errors from [`Allocator::allocate`].
    pub fn with_capacity(capacity: usize) -> CoreResult<Self> {
        Self::with_capacity_in(capacity, Allocator::new())
    }

    /// Creates an empty array with exactly `capacity` slots from `alloc`.
    ///
    /// # Errors
    ///
    /// Allocation errors from [`Allocator::allocate`].
    pub fn with_capacity_in(capacity: usize, alloc: Allocator) -> CoreResult<Self> {
        let mut array = Self::new_in(alloc);
        if capacity > 0 {
            array.data = Some(array.alloc.allocate::<T>(capacity)?);
            array.capacity = capacity;
        }
        Ok(array)
    }

    /// Creates `count` default-constructed elements in exactly `count` slots.
    ///
    /// # Errors
    ///
    /// Allocation errors from [`Allocator::allocate`].
    pub fn with_len(count: usize) -> CoreResult<Self>
    where
        T: Default,
    {
        let mut array = Self::with_capacity(count)?;
        while array.len < count {
            array.push_within_capacity(T::default());
        }
        Ok(array)
    }

    /// Creates `count` clones of `value` in exactly `count` slots.
    ///
    /// # Errors
    ///
    /// Allocation errors from [`Allocator::allocate`].
    pub fn filled(count: usize, value: T) -> CoreResult<Self>
    where
        T: Clone,
    {
        let mut array = Self::with_capacity(count)?;
        if count > 0 {
            while array.len + 1 < count {
                array.push_within_capacity(value.clone());
            }
            array.push_within_capacity(value);
        }
        Ok(array)
    }

    /// Copies `items` into a new array of exactly `items.len()` slots.
    ///
    /// # Errors
    ///
    /// Allocation errors from [`Allocator::allocate`].
    pub fn from_slice(items: &[T]) -> CoreResult<Self>
    where
        T: Clone,
    {
        let mut array = Self::with_capacity(items.len())?;
        for item in items {
            array.push_within_capacity(item.clone());
        }
        Ok(array)
    }

    /// Copies the elements between two cursors of the same sequence.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidRange`] if the cursors belong to different
    ///   sequences or directions, or `first` is after `last`.
    /// - Allocation errors from [`Allocator::allocate`].
    pub fn from_range(first: Cursor<'_, T>, last: Cursor<'_, T>) -> CoreResult<Self>
    where
        T: Clone,
    {
        let count = first.distance_to(&last).ok_or(CoreError::InvalidRange {
            start: first.index_hint(),
            end: last.index_hint(),
            len: first.sequence_len(),
        })?;
        let mut array = Self::with_capacity(count)?;
        for item in first.iter().take(count) {
            array.push_within_capacity(item.clone());
        }
        Ok(array)
    }

    /// Moves the contents out, leaving `self` empty with no storage.
    #[must_use]
    pub fn take(&mut self) -> Self {
        let empty = Self::new_with(self.alloc.clone(), self.growth);
        mem::replace(self, empty)
    }

    // ========================================================================
    // ACCESS
    // ========================================================================

    /// Bounds-checked element access.
    ///
    /// # Errors
    ///
    /// [`CoreError::OutOfRange`] if `index >= len`.
    pub fn at(&self, index: usize) -> CoreResult<&T> {
        self.as_slice().get(index).ok_or(CoreError::OutOfRange {
            index,
            len: self.len,
        })
    }

    /// Bounds-checked mutable element access.
    ///
    /// # Errors
    ///
    /// [`CoreError::OutOfRange`] if `index >= len`.
    pub fn at_mut(&mut self, index: usize) -> CoreResult<&mut T> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(CoreError::OutOfRange { index, len })
    }

    /// First element.
    ///
    /// # Errors
    ///
    /// [`CoreError::Empty`] if the array is empty.
    pub fn front(&self) -> CoreResult<&T> {
        self.as_slice().first().ok_or(CoreError::Empty)
    }

    /// Mutable first element.
    ///
    /// # Errors
    ///
    /// [`CoreError::Empty`] if the array is empty.
    pub fn front_mut(&mut self) -> CoreResult<&mut T> {
        self.as_mut_slice().first_mut().ok_or(CoreError::Empty)
    }

    /// Last element.
    ///
    /// # Errors
    ///
    /// [`CoreError::Empty`] if the array is empty.
    pub fn back(&self) -> CoreResult<&T> {
        self.as_slice().last().ok_or(CoreError::Empty)
    }

    /// Mutable last element.
    ///
    /// # Errors
    ///
    /// [`CoreError::Empty`] if the array is empty.
    pub fn back_mut(&mut self) -> CoreResult<&mut T> {
        self.as_mut_slice().last_mut().ok_or(CoreError::Empty)
    }

    /// Start of storage, or `None` when no storage is held.
    #[inline]
    #[must_use]
    pub fn data(&self) -> Option<NonNull<T>> {
        self.data
    }

    /// Raw pointer to the first slot. Dangling (never null) without storage.
    #[inline]
    #[must_use]
    pub fn as_ptr(&self) -> *const T {
        self.ptr()
    }

    /// Mutable raw pointer to the first slot.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr()
    }

    /// The live elements.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [0, len) are live and ptr() is non-null and aligned
        unsafe { slice::from_raw_parts(self.ptr(), self.len) }
    }

    /// The live elements, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: [0, len) are live and we hold the only reference
        unsafe { slice::from_raw_parts_mut(self.ptr(), self.len) }
    }

    /// Iterates over the elements.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Iterates mutably over the elements.
    #[inline]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Cursor at the first element.
    #[inline]
    #[must_use]
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), 0, false)
    }

    /// Cursor one past the last element.
    #[inline]
    #[must_use]
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), self.len_isize(), false)
    }

    /// Reverse cursor at the last element.
    #[inline]
    #[must_use]
    pub fn rbegin(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), 0, true)
    }

    /// Reverse cursor one before the first element.
    #[inline]
    #[must_use]
    pub fn rend(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), self.len_isize(), true)
    }

    // ========================================================================
    // CAPACITY
    // ========================================================================

    /// Number of live elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no live elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots available before the next reallocation.
    #[inline]
    #[must_use]
    pub const fn remain(&self) -> usize {
        self.capacity - self.len
    }

    /// Bytes occupied by the live elements.
    #[inline]
    #[must_use]
    pub const fn byte_size(&self) -> usize {
        self.len * mem::size_of::<T>()
    }

    /// Largest element count an allocation could ever describe.
    #[inline]
    #[must_use]
    pub const fn max_size(&self) -> usize {
        let size = mem::size_of::<T>();
        if size == 0 {
            usize::MAX
        } else {
            isize::MAX as usize / size
        }
    }

    /// Whether `index` addresses a live element.
    #[inline]
    #[must_use]
    pub const fn is_valid_index(&self, index: usize) -> bool {
        index < self.len
    }

    /// The allocator storage is drawn from.
    #[inline]
    #[must_use]
    pub fn allocator(&self) -> &Allocator {
        &self.alloc
    }

    /// The growth policy applied by [`reserve`](Array::reserve).
    #[inline]
    #[must_use]
    pub const fn growth_policy(&self) -> &GrowthPolicy {
        &self.growth
    }

    /// Replaces the growth policy. Takes effect on the next reallocation.
    pub fn set_growth_policy(&mut self, growth: GrowthPolicy) {
        self.growth = growth;
    }

    /// Ensures room for at least `requested` elements.
    ///
    /// No-op when `requested <= capacity`. Otherwise the new capacity comes
    /// from the [`GrowthPolicy`], live elements are relocated and the old
    /// storage is released.
    ///
    /// # Errors
    ///
    /// [`CoreError::CapacityOverflow`] or [`CoreError::OutOfMemory`]. On
    /// error the array is unchanged.
    pub fn reserve(&mut self, requested: usize) -> CoreResult<()> {
        if requested <= self.capacity {
            return Ok(());
        }
        let new_capacity = self.growth.next_capacity(self.capacity, requested)?;
        tracing::debug!(
            "array grow: {} -> {} slots ({} live)",
            self.capacity,
            new_capacity,
            self.len
        );
        self.reallocate(new_capacity)
    }

    /// Releases unused slots so that `capacity == len`.
    ///
    /// With no live elements the storage is released entirely.
    ///
    /// # Errors
    ///
    /// [`CoreError::OutOfMemory`] if the smaller block cannot be obtained;
    /// the array is unchanged.
    pub fn shrink(&mut self) -> CoreResult<()> {
        if self.len == self.capacity {
            return Ok(());
        }
        self.reallocate(self.len)
    }

    /// Resizes to `new_len`, default-constructing new elements.
    ///
    /// Capacity never shrinks.
    ///
    /// # Errors
    ///
    /// Allocation errors from [`reserve`](Array::reserve).
    pub fn resize(&mut self, new_len: usize) -> CoreResult<()>
    where
        T: Default,
    {
        self.resize_with(new_len, T::default)
    }

    /// Resizes to `new_len`, constructing new elements with `make`.
    ///
    /// # Errors
    ///
    /// Allocation errors from [`reserve`](Array::reserve).
    pub fn resize_with<F>(&mut self, new_len: usize, mut make: F) -> CoreResult<()>
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        self.reserve(new_len)?;
        while self.len < new_len {
            self.push_within_capacity(make());
        }
        Ok(())
    }

    /// Destroys elements from `new_len` on. No-op if `new_len >= len`.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let tail = self.len - new_len;
        // Shorten first so a panicking drop cannot cause a double drop
        self.len = new_len;
        // SAFETY: [new_len, new_len + tail) were live and are now outside len
        unsafe {
            ptr::drop_in_place(slice::from_raw_parts_mut(self.ptr().add(new_len), tail));
        }
    }

    /// Destroys all elements. Capacity is kept.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Destroys all elements and releases storage.
    pub fn reset(&mut self) {
        self.clear();
        self.release_storage();
    }

    // ========================================================================
    // END OPERATIONS
    // ========================================================================

    /// Appends `value` and returns a reference to it.
    ///
    /// Amortized O(1): storage grows only when the array is full.
    ///
    /// # Errors
    ///
    /// Allocation errors from [`reserve`](Array::reserve).
    pub fn push(&mut self, value: T) -> CoreResult<&mut T> {
        self.grow_for(1)?;
        Ok(self.push_within_capacity(value))
    }

    /// Appends the value produced by `make`, constructed after any growth.
    ///
    /// # Errors
    ///
    /// Allocation errors from [`reserve`](Array::reserve); `make` is not
    /// called in that case.
    pub fn emplace<F>(&mut self, make: F) -> CoreResult<&mut T>
    where
        F: FnOnce() -> T,
    {
        self.grow_for(1)?;
        Ok(self.push_within_capacity(make()))
    }

    /// Removes and returns the last element, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot `len` was live and is now outside the live range
        Some(unsafe { ptr::read(self.ptr().add(self.len)) })
    }

    /// Inserts `value` at the front.
    ///
    /// # Errors
    ///
    /// Allocation errors from [`reserve`](Array::reserve).
    pub fn unshift(&mut self, value: T) -> CoreResult<&mut T> {
        self.insert(0, value)
    }

    /// Removes and returns the first element, or `None` if empty.
    pub fn shift(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.remove(0).ok()
    }

    // ========================================================================
    // POSITIONAL OPERATIONS
    // ========================================================================

    /// Inserts `value` at `index`, shifting later elements back.
    ///
    /// # Errors
    ///
    /// - [`CoreError::OutOfRange`] if `index > len`.
    /// - Allocation errors from [`reserve`](Array::reserve).
    pub fn insert(&mut self, index: usize, value: T) -> CoreResult<&mut T> {
        self.check_position(index)?;
        self.grow_for(1)?;
        Ok(self.insert_within_capacity(index, value))
    }

    /// Inserts the value produced by `make` at `index`.
    ///
    /// `make` runs after validation and growth, before any element moves.
    ///
    /// # Errors
    ///
    /// As [`insert`](Array::insert).
    pub fn emplace_at<F>(&mut self, index: usize, make: F) -> CoreResult<&mut T>
    where
        F: FnOnce() -> T,
    {
        self.check_position(index)?;
        self.grow_for(1)?;
        Ok(self.insert_within_capacity(index, make()))
    }

    /// Inserts `count` clones of `value` at `index`.
    ///
    /// Returns the inserted run.
    ///
    /// # Errors
    ///
    /// As [`insert`](Array::insert).
    pub fn insert_n(&mut self, index: usize, count: usize, value: T) -> CoreResult<&mut [T]>
    where
        T: Clone,
    {
        self.check_position(index)?;
        let inserted = self.insert_iter_at(index, iter::repeat(value).take(count))?;
        Ok(&mut self.as_mut_slice()[index..index + inserted])
    }

    /// Inserts clones of `items` at `index`.
    ///
    /// A panicking `clone` leaves the array as it was.
    ///
    /// # Errors
    ///
    /// As [`insert`](Array::insert).
    pub fn insert_slice(&mut self, index: usize, items: &[T]) -> CoreResult<&mut [T]>
    where
        T: Clone,
    {
        self.check_position(index)?;
        let inserted = self.insert_iter_at(index, items.iter().cloned())?;
        Ok(&mut self.as_mut_slice()[index..index + inserted])
    }

    /// Inserts a bitwise copy of `items` at `index`.
    ///
    /// # Errors
    ///
    /// As [`insert`](Array::insert).
    pub fn insert_copied(&mut self, index: usize, items: &[T]) -> CoreResult<&mut [T]>
    where
        T: Copy,
    {
        self.check_position(index)?;
        let count = items.len();
        self.grow_for(count)?;
        // SAFETY: capacity covers len + count; `items` cannot alias self
        // because we hold `&mut self`
        unsafe {
            let gap = self.ptr().add(index);
            ptr::copy(gap, gap.add(count), self.len - index);
            ptr::copy_nonoverlapping(items.as_ptr(), gap, count);
        }
        self.len += count;
        Ok(&mut self.as_mut_slice()[index..index + count])
    }

    /// Removes the element at `index`, shifting later elements forward.
    ///
    /// # Errors
    ///
    /// [`CoreError::OutOfRange`] if `index >= len`.
    pub fn erase(&mut self, index: usize) -> CoreResult<()> {
        self.remove(index).map(drop)
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Errors
    ///
    /// [`CoreError::OutOfRange`] if `index >= len`.
    pub fn remove(&mut self, index: usize) -> CoreResult<T> {
        if index >= self.len {
            return Err(CoreError::OutOfRange {
                index,
                len: self.len,
            });
        }
        // SAFETY: index < len; the tail is moved down over the vacated slot
        unsafe {
            let slot = self.ptr().add(index);
            let value = ptr::read(slot);
            ptr::copy(slot.add(1), slot, self.len - index - 1);
            self.len -= 1;
            Ok(value)
        }
    }

    /// Removes the elements in `[first, last)`. Capacity is unchanged.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidRange`] if `first > last` or `last > len`.
    pub fn erase_range(&mut self, first: usize, last: usize) -> CoreResult<()> {
        if first > last || last > self.len {
            return Err(CoreError::InvalidRange {
                start: first,
                end: last,
                len: self.len,
            });
        }
        let count = last - first;
        if count == 0 {
            return Ok(());
        }
        let tail = self.len - last;
        // Anything past `first` leaks rather than double-drops if a destructor panics
        self.len = first;
        // SAFETY: [first, last) are live, the tail [last, last + tail) is
        // moved over them after they are destroyed
        unsafe {
            let base = self.ptr();
            ptr::drop_in_place(slice::from_raw_parts_mut(base.add(first), count));
            ptr::copy(base.add(last), base.add(first), tail);
        }
        self.len = first + tail;
        Ok(())
    }

    // ========================================================================
    // BULK OPERATIONS
    // ========================================================================

    /// Moves every element of `other` to the end of `self`.
    ///
    /// `other` is left empty but keeps its storage.
    ///
    /// # Errors
    ///
    /// Allocation errors from [`reserve`](Array::reserve); both arrays are
    /// unchanged.
    pub fn append(&mut self, other: &mut Self) -> CoreResult<()> {
        self.move_in(self.len, other)
    }

    /// Appends clones of `items` with a single reservation.
    ///
    /// # Errors
    ///
    /// Allocation errors from [`reserve`](Array::reserve).
    pub fn append_slice(&mut self, items: &[T]) -> CoreResult<()>
    where
        T: Clone,
    {
        self.grow_for(items.len())?;
        for item in items {
            self.push_within_capacity(item.clone());
        }
        Ok(())
    }

    /// Appends a bitwise copy of `items`: the trivially copyable fast path.
    ///
    /// # Errors
    ///
    /// Allocation errors from [`reserve`](Array::reserve).
    pub fn append_copied(&mut self, items: &[T]) -> CoreResult<()>
    where
        T: Copy,
    {
        self.grow_for(items.len())?;
        // SAFETY: capacity covers len + items.len(); `items` cannot alias self
        unsafe {
            ptr::copy_nonoverlapping(items.as_ptr(), self.ptr().add(self.len), items.len());
        }
        self.len += items.len();
        Ok(())
    }

    /// Appends every item of `items`.
    ///
    /// Reserves once for the iterator's lower size bound.
    ///
    /// # Errors
    ///
    /// Allocation errors from [`reserve`](Array::reserve). Items appended
    /// before the failure stay.
    pub fn append_iter<I>(&mut self, items: I) -> CoreResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        let items = items.into_iter();
        self.grow_for(items.size_hint().0)?;
        for item in items {
            self.push(item)?;
        }
        Ok(())
    }

    /// Appends clones of this array's own elements in `range`.
    ///
    /// `array.append_within(..)` doubles the array.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidRange`] for a reversed or overlong range.
    /// - Allocation errors from [`reserve`](Array::reserve).
    pub fn append_within<R>(&mut self, range: R) -> CoreResult<()>
    where
        R: RangeBounds<usize>,
        T: Clone,
    {
        let (start, end) = self.resolve_range(range)?;
        self.grow_for(end - start)?;
        for index in start..end {
            // SAFETY: index < original len, so the source stays live and is
            // never the slot being written; no reallocation happens here
            let item = unsafe { (*self.ptr().add(index)).clone() };
            self.push_within_capacity(item);
        }
        Ok(())
    }

    /// Moves every element of `other` to the front of `self`.
    ///
    /// # Errors
    ///
    /// As [`append`](Array::append).
    pub fn prepend(&mut self, other: &mut Self) -> CoreResult<()> {
        self.move_in(0, other)
    }

    /// Prepends clones of `items`.
    ///
    /// # Errors
    ///
    /// Allocation errors from [`reserve`](Array::reserve).
    pub fn prepend_slice(&mut self, items: &[T]) -> CoreResult<()>
    where
        T: Clone,
    {
        self.insert_slice(0, items).map(drop)
    }

    /// Prepends a bitwise copy of `items`.
    ///
    /// # Errors
    ///
    /// Allocation errors from [`reserve`](Array::reserve).
    pub fn prepend_copied(&mut self, items: &[T]) -> CoreResult<()>
    where
        T: Copy,
    {
        self.insert_copied(0, items).map(drop)
    }

    /// Prepends every item of `items`, keeping their order.
    ///
    /// # Errors
    ///
    /// Allocation errors; `self` is unchanged on error.
    pub fn prepend_iter<I>(&mut self, items: I) -> CoreResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.insert_iter_at(0, items.into_iter()).map(drop)
    }

    /// Prepends clones of this array's own elements in `range`.
    ///
    /// The range is cloned onto the end, then rotated to the front.
    ///
    /// # Errors
    ///
    /// As [`append_within`](Array::append_within).
    pub fn prepend_within<R>(&mut self, range: R) -> CoreResult<()>
    where
        R: RangeBounds<usize>,
        T: Clone,
    {
        let (start, end) = self.resolve_range(range)?;
        let old_len = self.len;
        self.append_within(start..end)?;
        let added = self.len - old_len;
        self.as_mut_slice().rotate_right(added);
        Ok(())
    }

    // ========================================================================
    // SEARCH
    // ========================================================================

    /// Whether any element equals `value`.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|item| item == value)
    }

    /// Cursor at the first element equal to `value`, or [`end`](Array::end).
    #[must_use]
    pub fn find(&self, value: &T) -> Cursor<'_, T>
    where
        T: PartialEq,
    {
        match self.index_of(value, 0) {
            Some(index) => Cursor::new(self.as_slice(), index as isize, false),
            None => self.end(),
        }
    }

    /// Cursor at the last element equal to `value`, or [`end`](Array::end).
    #[must_use]
    pub fn find_last(&self, value: &T) -> Cursor<'_, T>
    where
        T: PartialEq,
    {
        match self.last_index_of(value, None) {
            Some(index) => Cursor::new(self.as_slice(), index as isize, false),
            None => self.end(),
        }
    }

    /// Index of the first element equal to `value` at or after `start`.
    #[must_use]
    pub fn index_of(&self, value: &T, start: usize) -> Option<usize>
    where
        T: PartialEq,
    {
        self.as_slice()
            .get(start..)?
            .iter()
            .position(|item| item == value)
            .map(|offset| start + offset)
    }

    /// Index of the last element equal to `value` at or before `start`.
    ///
    /// `None` or an out-of-range `start` searches from the last element.
    #[must_use]
    pub fn last_index_of(&self, value: &T, start: Option<usize>) -> Option<usize>
    where
        T: PartialEq,
    {
        let end = match start {
            Some(start) if start < self.len => start + 1,
            _ => self.len,
        };
        self.as_slice()[..end].iter().rposition(|item| item == value)
    }

    // ========================================================================
    // REORDERING
    // ========================================================================

    /// Reverses the elements in place.
    pub fn reverse(&mut self) {
        if self.len <= 1 {
            return;
        }
        let elements = self.as_mut_slice();
        let (mut left, mut right) = (0, elements.len() - 1);
        while left < right {
            elements.swap(left, right);
            left += 1;
            right -= 1;
        }
    }

    /// Exchanges contents, storage, allocator and policy with `other`. O(1).
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    /// Pointer to slot 0, dangling without storage.
    #[inline]
    fn ptr(&self) -> *mut T {
        self.data.map_or(NonNull::dangling().as_ptr(), NonNull::as_ptr)
    }

    #[inline]
    fn len_isize(&self) -> isize {
        // len never exceeds isize::MAX: allocations are capped there
        self.len as isize
    }

    /// Like `with_capacity_in` + `from_slice`, sized exactly.
    fn from_slice_in(items: &[T], alloc: Allocator) -> CoreResult<Self>
    where
        T: Clone,
    {
        let mut array = Self::with_capacity_in(items.len(), alloc)?;
        for item in items {
            array.push_within_capacity(item.clone());
        }
        Ok(array)
    }

    /// Writes `value` into slot `len`.
    ///
    /// Caller guarantees `len < capacity`.
    #[inline]
    fn push_within_capacity(&mut self, value: T) -> &mut T {
        debug_assert!(self.len < self.capacity);
        // SAFETY: slot `len` is allocated and uninitialized
        unsafe {
            let slot = self.ptr().add(self.len);
            ptr::write(slot, value);
            self.len += 1;
            &mut *slot
        }
    }

    /// Shifts `[index, len)` back one slot and writes `value` at `index`.
    ///
    /// Caller guarantees `index <= len < capacity`.
    fn insert_within_capacity(&mut self, index: usize, value: T) -> &mut T {
        debug_assert!(index <= self.len && self.len < self.capacity);
        // SAFETY: the shifted range ends at `len`, which is allocated
        unsafe {
            let slot = self.ptr().add(index);
            ptr::copy(slot, slot.add(1), self.len - index);
            ptr::write(slot, value);
            self.len += 1;
            &mut *slot
        }
    }

    /// Moves all of `source` into `self` at `index`, leaving `source` empty.
    /// Pushes `items` onto the end, then rotates them down to `index`.
    ///
    /// If pushing fails or panics the array is cut back to its old length.
    fn insert_iter_at<I>(&mut self, index: usize, items: I) -> CoreResult<usize>
    where
        I: Iterator<Item = T>,
    {
        debug_assert!(index <= self.len);
        let old_len = self.len;
        let mut guard = TruncateOnUnwind {
            array: &mut *self,
            len: old_len,
        };
        guard.array.grow_for(items.size_hint().0)?;
        for item in items {
            guard.array.push(item)?;
        }
        mem::forget(guard);

        let inserted = self.len - old_len;
        self.as_mut_slice()[index..].rotate_right(inserted);
        Ok(inserted)
    }

    fn move_in(&mut self, index: usize, source: &mut Self) -> CoreResult<()> {
        debug_assert!(index <= self.len);
        let count = source.len;
        if count == 0 {
            return Ok(());
        }
        self.grow_for(count)?;
        // SAFETY: capacity covers len + count; `source` is a distinct array,
        // and its elements are forgotten there once copied here
        unsafe {
            let gap = self.ptr().add(index);
            ptr::copy(gap, gap.add(count), self.len - index);
            ptr::copy_nonoverlapping(source.ptr(), gap, count);
        }
        source.len = 0;
        self.len += count;
        Ok(())
    }

    /// Reserves room for `additional` more elements.
    #[inline]
    fn grow_for(&mut self, additional: usize) -> CoreResult<()> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(CoreError::CapacityOverflow)?;
        if required > self.capacity {
            self.reserve(required)?;
        }
        Ok(())
    }

    /// Insert positions may equal `len`.
    #[inline]
    fn check_position(&self, index: usize) -> CoreResult<()> {
        if index > self.len {
            return Err(CoreError::OutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(())
    }

    /// Converts range bounds into a validated `[start, end)`.
    fn resolve_range<R: RangeBounds<usize>>(&self, range: R) -> CoreResult<(usize, usize)> {
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.checked_add(1).ok_or(CoreError::CapacityOverflow)?,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end.checked_add(1).ok_or(CoreError::CapacityOverflow)?,
            Bound::Excluded(&end) => end,
            Bound::Unbounded => self.len,
        };
        if start > end || end > self.len {
            return Err(CoreError::InvalidRange {
                start,
                end,
                len: self.len,
            });
        }
        Ok((start, end))
    }

    /// Moves live elements into a block of exactly `new_capacity` slots.
    ///
    /// The new block is obtained before anything is touched.
    fn reallocate(&mut self, new_capacity: usize) -> CoreResult<()> {
        debug_assert!(new_capacity >= self.len);
        let new_data = if new_capacity == 0 {
            None
        } else {
            Some(self.alloc.allocate::<T>(new_capacity)?)
        };
        if let (Some(old), Some(new)) = (self.data, new_data) {
            // SAFETY: both blocks hold at least `len` slots and are distinct
            unsafe { ptr::copy_nonoverlapping(old.as_ptr(), new.as_ptr(), self.len) };
        }
        self.release_storage();
        self.data = new_data;
        self.capacity = new_capacity;
        Ok(())
    }

    /// Returns storage to the allocator. Live elements must already have
    /// been destroyed or relocated.
    fn release_storage(&mut self) {
        if let Some(old) = self.data.take() {
            // SAFETY: `old` came from allocate::<T>(capacity) on this allocator
            let released = unsafe { self.alloc.deallocate(old, self.capacity) };
            debug_assert!(released.is_ok());
        }
        self.capacity = 0;
    }

    /// Splits into raw parts without running `Drop`.
    pub(super) fn into_raw_parts(self) -> (Option<NonNull<T>>, usize, usize, Allocator) {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never used or dropped again, so the allocator is
        // moved out exactly once
        let alloc = unsafe { ptr::read(&this.alloc) };
        (this.data, this.len, this.capacity, alloc)
    }
}

/// Unwraps results inside trait impls that cannot return an error.
/// Cuts an array back to `len` when dropped.
struct TruncateOnUnwind<'a, T> {
    array: &'a mut Array<T>,
    len: usize,
}

impl<T> Drop for TruncateOnUnwind<'_, T> {
    fn drop(&mut self) {
        self.array.truncate(self.len);
    }
}

fn infallible<R>(result: CoreResult<R>) -> R {
    match result {
        Ok(value) => value,
        Err(CoreError::OutOfMemory { bytes, align }) => {
            handle_alloc_error(Layout::from_size_align(bytes, align).unwrap_or(Layout::new::<u8>()))
        }
        Err(err) => panic!("array operation failed: {err}"),
    }
}

impl<T> Drop for Array<T> {
    fn drop(&mut self) {
        self.clear();
        self.release_storage();
    }
}

impl<T> Default for Array<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Array<T> {
    /// Deep copy into storage sized to the source's length.
    fn clone(&self) -> Self {
        let mut array = infallible(Self::from_slice_in(self.as_slice(), self.alloc.clone()));
        array.growth = self.growth;
        array
    }
}

impl<T: fmt::Debug> fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Array<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for Array<T> {}

impl<T: PartialEq> PartialEq<[T]> for Array<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for Array<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialOrd> PartialOrd for Array<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord> Ord for Array<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash> Hash for Array<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T> Index<usize> for Array<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T> IndexMut<usize> for Array<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

impl<T> AsRef<[T]> for Array<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for Array<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

/// Concatenation into a new array; neither operand changes.
impl<T: Clone> Add<&Array<T>> for &Array<T> {
    type Output = Array<T>;

    fn add(self, rhs: &Array<T>) -> Array<T> {
        let mut result = infallible(Array::with_capacity_in(
            self.len + rhs.len,
            self.alloc.clone(),
        ));
        infallible(result.append_slice(self.as_slice()));
        infallible(result.append_slice(rhs.as_slice()));
        result
    }
}

impl<T: Clone> AddAssign<&Array<T>> for Array<T> {
    fn add_assign(&mut self, rhs: &Array<T>) {
        infallible(self.append_slice(rhs.as_slice()));
    }
}

impl<T> FromIterator<T> for Array<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut array = match iter.size_hint() {
            // Exact-size sources get exactly-sized storage
            (lower, Some(upper)) if lower == upper => infallible(Self::with_capacity(lower)),
            _ => Self::new(),
        };
        infallible(array.append_iter(iter));
        array
    }
}

impl<T> Extend<T> for Array<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        infallible(self.append_iter(iter));
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for Array<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        infallible(self.append_iter(iter.into_iter().copied()));
    }
}

impl<T, const N: usize> From<[T; N]> for Array<T> {
    fn from(items: [T; N]) -> Self {
        let mut array = infallible(Self::with_capacity(N));
        for item in items {
            array.push_within_capacity(item);
        }
        array
    }
}

impl<T: Clone> From<&[T]> for Array<T> {
    fn from(items: &[T]) -> Self {
        infallible(Self::from_slice(items))
    }
}

impl<'a, T> IntoIterator for &'a Array<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Array<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

// SAFETY: Array owns its elements; the allocator handle is Send + Sync
unsafe impl<T: Send> Send for Array<T> {}
// SAFETY: shared access only hands out `&T`
unsafe impl<T: Sync> Sync for Array<T> {}

/// Builds an [`Array`](crate::Array) from a list of elements or `value; count`.
///
/// ```rust,ignore
/// let a = array![1, 2, 3];
/// let b = array![0u8; 4];
/// ```
#[macro_export]
macro_rules! array {
    () => {
        $crate::Array::new()
    };
    ($elem:expr; $count:expr) => {
        <$crate::Array<_> as ::core::iter::FromIterator<_>>::from_iter(
            ::core::iter::repeat($elem).take($count),
        )
    };
    ($($item:expr),+ $(,)?) => {
        $crate::Array::from([$($item),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts drops through a shared counter.
    #[derive(Clone)]
    struct DropCounter(Rc<Cell<usize>>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_new_is_unallocated() {
        let array: Array<u32> = Array::new();
        assert_eq!(array.len(), 0);
        assert_eq!(array.capacity(), 0);
        assert!(array.data().is_none());
    }

    #[test]
    fn test_filled() {
        let array = Array::filled(5, 7).unwrap();
        assert_eq!(array.len(), 5);
        assert_eq!(array.capacity(), 5);
        assert!(array.iter().all(|&v| v == 7));
    }

    #[test]
    fn test_with_len_default_constructs() {
        let array: Array<String> = Array::with_len(3).unwrap();
        assert_eq!(array.capacity(), 3);
        assert!(array.iter().all(String::is_empty));
    }

    #[test]
    fn test_first_push_allocates_sixteen() {
        let mut array = Array::new();
        let slot = array.push(42u32).unwrap();
        assert_eq!(*slot, 42);
        assert_eq!(array.capacity(), 16);
        assert!(array.data().is_some());
    }

    #[test]
    fn test_at_bounds() {
        let mut array = array![1, 2, 3];
        assert_eq!(*array.at(2).unwrap(), 3);
        assert_eq!(array.at(3), Err(CoreError::OutOfRange { index: 3, len: 3 }));
        *array.at_mut(0).unwrap() = 10;
        assert_eq!(array[0], 10);
    }

    #[test]
    fn test_front_back_empty() {
        let mut array: Array<u8> = Array::new();
        assert_eq!(array.front(), Err(CoreError::Empty));
        assert_eq!(array.back_mut(), Err(CoreError::Empty));
        array.push(1).unwrap();
        array.push(2).unwrap();
        assert_eq!(*array.front().unwrap(), 1);
        assert_eq!(*array.back().unwrap(), 2);
    }

    #[test]
    fn test_insert_middle() {
        let mut array = array![1, 2, 3];
        array.insert(1, 99).unwrap();
        assert_eq!(array, [1, 99, 2, 3]);
        assert_eq!(array.len(), 4);
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut array = array![1, 2, 3];
        assert_eq!(
            array.insert(4, 0).unwrap_err(),
            CoreError::OutOfRange { index: 4, len: 3 }
        );
        assert_eq!(array, [1, 2, 3]);
    }

    #[test]
    fn test_insert_n_and_slice() {
        let mut array = array![1, 5];
        let run = array.insert_n(1, 3, 0).unwrap();
        assert_eq!(run, &[0, 0, 0]);
        array.insert_slice(4, &[7, 8]).unwrap();
        assert_eq!(array, [1, 0, 0, 0, 7, 8, 5]);
        array.insert_copied(0, &[9]).unwrap();
        assert_eq!(array, [9, 1, 0, 0, 0, 7, 8, 5]);
    }

    #[test]
    fn test_inserts_within_capacity_keep_storage() {
        let mut array: Array<u32> = Array::with_capacity(16).unwrap();
        array.append_copied(&[1, 6]).unwrap();
        let storage = array.data();

        array.insert_slice(1, &[2, 3]).unwrap();
        array.insert_n(3, 2, 4).unwrap();
        array.prepend_slice(&[0]).unwrap();
        array.prepend_iter([8, 9]).unwrap();
        array.prepend_within(2..4).unwrap();

        assert_eq!(array, [0, 1, 8, 9, 0, 1, 2, 3, 4, 4, 6]);
        assert_eq!(array.capacity(), 16);
        assert_eq!(array.data(), storage);
    }

    #[test]
    fn test_panicking_clone_during_insert() {
        use std::panic::{catch_unwind, AssertUnwindSafe};

        #[derive(Debug, PartialEq)]
        struct Fragile(u32);

        impl Clone for Fragile {
            fn clone(&self) -> Self {
                assert_ne!(self.0, 0, "refusing to clone");
                Fragile(self.0)
            }
        }

        let mut array = array![Fragile(1), Fragile(2)];
        let items = [Fragile(3), Fragile(0)];
        let result = catch_unwind(AssertUnwindSafe(|| array.insert_slice(1, &items).map(drop)));
        assert!(result.is_err());
        assert_eq!(array, [Fragile(1), Fragile(2)]);

        let result = catch_unwind(AssertUnwindSafe(|| array.prepend_slice(&items)));
        assert!(result.is_err());
        assert_eq!(array, [Fragile(1), Fragile(2)]);
    }

    #[test]
    fn test_erase_range_keeps_capacity() {
        let mut array = array![1, 2, 3];
        let capacity = array.capacity();
        array.erase_range(0, 2).unwrap();
        assert_eq!(array, [3]);
        assert_eq!(array.capacity(), capacity);
    }

    #[test]
    fn test_erase_range_invalid() {
        let mut array = array![1, 2, 3];
        assert!(matches!(array.erase_range(2, 1), Err(CoreError::InvalidRange { .. })));
        assert!(matches!(array.erase_range(1, 4), Err(CoreError::InvalidRange { .. })));
        assert_eq!(array.erase(3), Err(CoreError::OutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn test_erase_drops_exactly_removed() {
        let drops = Rc::new(Cell::new(0));
        let mut array: Array<DropCounter> =
            (0..5).map(|_| DropCounter(drops.clone())).collect();
        array.erase_range(1, 3).unwrap();
        assert_eq!(drops.get(), 2);
        assert_eq!(array.len(), 3);
        drop(array);
        assert_eq!(drops.get(), 5);
    }

    #[test]
    fn test_pop_and_shift() {
        let mut array = array![1, 2, 3];
        assert_eq!(array.pop(), Some(3));
        assert_eq!(array.shift(), Some(1));
        assert_eq!(array, [2]);
        array.unshift(0).unwrap();
        assert_eq!(array, [0, 2]);

        let mut empty: Array<u8> = Array::new();
        assert_eq!(empty.pop(), None);
        assert_eq!(empty.shift(), None);
    }

    #[test]
    fn test_resize() {
        let mut array: Array<u32> = Array::new();
        array.resize(5).unwrap();
        assert_eq!(array, [0, 0, 0, 0, 0]);
        assert_eq!(array.capacity(), 16);

        array.resize(2).unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array.capacity(), 16);

        let mut next = 10;
        array
            .resize_with(4, || {
                next += 1;
                next
            })
            .unwrap();
        assert_eq!(array, [0, 0, 11, 12]);
    }

    #[test]
    fn test_shrink() {
        let mut array = array![1, 2, 3];
        array.reserve(40).unwrap();
        array.shrink().unwrap();
        assert_eq!(array.capacity(), 3);
        assert_eq!(array, [1, 2, 3]);

        array.clear();
        array.shrink().unwrap();
        assert_eq!(array.capacity(), 0);
        assert!(array.data().is_none());
    }

    #[test]
    fn test_reset_releases() {
        let mut array = array![1, 2, 3];
        array.reset();
        assert_eq!(array.len(), 0);
        assert_eq!(array.capacity(), 0);
        assert!(array.data().is_none());
    }

    #[test]
    fn test_take_leaves_source_empty() {
        let mut a = array![1, 2, 3];
        let b = a.take();
        assert_eq!(a.len(), 0);
        assert_eq!(a.capacity(), 0);
        assert_eq!(b, [1, 2, 3]);
    }

    #[test]
    fn test_clone_is_exact() {
        let mut a: Array<String> = Array::new();
        a.push("x".into()).unwrap();
        a.push("y".into()).unwrap();
        let b = a.clone();
        assert_eq!(b.capacity(), 2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_append_variants() {
        let mut a = array![1, 2];
        let mut b = array![3, 4];
        a.append(&mut b).unwrap();
        assert_eq!(a, [1, 2, 3, 4]);
        assert!(b.is_empty());

        a.append_slice(&[5]).unwrap();
        a.append_copied(&[6, 7]).unwrap();
        a.append_iter(8..=9).unwrap();
        assert_eq!(a, [1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_self_append() {
        let mut a = array![1, 2, 3];
        a.append_within(..).unwrap();
        assert_eq!(a, [1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_self_append_across_growth() {
        let mut a: Array<String> = (0..16).map(|i| i.to_string()).collect();
        assert_eq!(a.capacity(), 16);
        a.append_within(..).unwrap();
        assert_eq!(a.len(), 32);
        assert_eq!(a[16], "0");
        assert_eq!(a[31], "15");
    }

    #[test]
    fn test_prepend_variants() {
        let mut a = array![3, 4];
        let mut b = array![1, 2];
        a.prepend(&mut b).unwrap();
        assert_eq!(a, [1, 2, 3, 4]);

        a.prepend_slice(&[0]).unwrap();
        a.prepend_copied(&[-1]).unwrap();
        a.prepend_iter([-3, -2]).unwrap();
        assert_eq!(a, [-3, -2, -1, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_self_prepend() {
        let mut a = array![1, 2, 3];
        a.prepend_within(1..).unwrap();
        assert_eq!(a, [2, 3, 1, 2, 3]);
        assert!(matches!(a.prepend_within(4..9), Err(CoreError::InvalidRange { .. })));
    }

    #[test]
    fn test_search() {
        let a = array![1, 2, 3, 2, 1];
        assert!(a.contains(&3));
        assert!(!a.contains(&9));
        assert_eq!(a.index_of(&2, 0), Some(1));
        assert_eq!(a.index_of(&2, 2), Some(3));
        assert_eq!(a.index_of(&2, 10), None);
        assert_eq!(a.last_index_of(&1, None), Some(4));
        assert_eq!(a.last_index_of(&1, Some(3)), Some(0));
        assert_eq!(a.last_index_of(&9, None), None);
        assert_eq!(a.find(&2).index(), Some(1));
        assert_eq!(a.find_last(&2).index(), Some(3));
        assert_eq!(a.find(&9), a.end());
    }

    #[test]
    fn test_reverse_and_swap() {
        let mut a = array![1, 2, 3, 4];
        a.reverse();
        assert_eq!(a, [4, 3, 2, 1]);

        let mut b: Array<i32> = Array::new();
        a.swap(&mut b);
        assert!(a.is_empty());
        assert_eq!(a.capacity(), 0);
        assert_eq!(b, [4, 3, 2, 1]);
    }

    #[test]
    fn test_comparisons() {
        let a = array![1, 2, 3];
        let b = array![1, 2, 4];
        let c = array![1, 2];
        assert!(a < b);
        assert!(c < a);
        assert!(a >= c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_concatenation() {
        let a = array![1, 2];
        let b = array![3];
        let c = &a + &b;
        assert_eq!(c, [1, 2, 3]);
        assert_eq!(a, [1, 2]);

        let mut d = a.clone();
        d += &b;
        assert_eq!(d, c);
    }

    #[test]
    fn test_drop_releases_every_element() {
        let drops = Rc::new(Cell::new(0));
        {
            let mut array = Array::new();
            for _ in 0..40 {
                array.push(DropCounter(drops.clone())).unwrap();
            }
            array.truncate(30);
            assert_eq!(drops.get(), 10);
        }
        assert_eq!(drops.get(), 40);
    }

    #[test]
    fn test_zero_sized_elements() {
        let mut array = Array::new();
        for _ in 0..100 {
            array.push(()).unwrap();
        }
        assert_eq!(array.len(), 100);
        array.erase_range(0, 50).unwrap();
        assert_eq!(array.len(), 50);
    }

    #[test]
    fn test_macro_repeat() {
        let array: Array<u8> = array![9; 4];
        assert_eq!(array, [9, 9, 9, 9]);
        assert_eq!(array.capacity(), 4);
        let empty: Array<u8> = array![];
        assert!(empty.is_empty());
    }
}
