//! # Cursors
//!
//! Random-access positions over an [`Array`](super::Array), forward or
//! reverse. A cursor is a plain position: it may sit one past the end (or
//! anywhere else) and only dereferences when it addresses a live element.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A random-access position in an array's element sequence.
///
/// Forward cursors walk indices `0, 1, ..`; reverse cursors walk
/// `len - 1, len - 2, ..`. In both cases the *position* counts steps from
/// the cursor's own beginning, so arithmetic and ordering read the same in
/// either direction.
///
/// Cursors borrow the array, so no mutation can invalidate one while it is
/// alive.
pub struct Cursor<'a, T> {
    elements: &'a [T],
    position: isize,
    reversed: bool,
}

impl<'a, T> Cursor<'a, T> {
    #[inline]
    pub(crate) fn new(elements: &'a [T], position: isize, reversed: bool) -> Self {
        Self {
            elements,
            position,
            reversed,
        }
    }

    /// Steps from the beginning in traversal order.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> isize {
        self.position
    }

    /// Whether this cursor walks back to front.
    #[inline]
    #[must_use]
    pub const fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Array index of the addressed element, if it is live.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index_at(self.position)
    }

    /// The addressed element.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&'a T> {
        self.index().map(|index| &self.elements[index])
    }

    /// The element `offset` steps away, without moving.
    #[must_use]
    pub fn at(&self, offset: isize) -> Option<&'a T> {
        let index = self.index_at(self.position.checked_add(offset)?)?;
        Some(&self.elements[index])
    }

    /// Number of steps from `self` forward to `last`.
    ///
    /// `None` if the two cursors are not over the same sequence in the same
    /// direction, or `last` comes before `self`.
    #[must_use]
    pub fn distance_to(&self, last: &Self) -> Option<usize> {
        if !self.same_sequence(last) || last.position < self.position {
            return None;
        }
        usize::try_from(last.position.checked_sub(self.position)?).ok()
    }

    /// Iterates from this position to the end of the sequence.
    ///
    /// The cursor itself does not move.
    #[must_use]
    pub fn iter(&self) -> CursorIter<'a, T> {
        CursorIter { cursor: *self }
    }

    pub(crate) fn index_hint(&self) -> usize {
        usize::try_from(self.position).unwrap_or(0)
    }

    pub(crate) fn sequence_len(&self) -> usize {
        self.elements.len()
    }

    fn index_at(&self, position: isize) -> Option<usize> {
        let position = usize::try_from(position).ok()?;
        if position >= self.elements.len() {
            return None;
        }
        Some(if self.reversed {
            self.elements.len() - 1 - position
        } else {
            position
        })
    }

    fn same_sequence(&self, other: &Self) -> bool {
        std::ptr::eq(self.elements, other.elements) && self.reversed == other.reversed
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position)
            .field("len", &self.elements.len())
            .field("reversed", &self.reversed)
            .finish()
    }
}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.same_sequence(other) && self.position == other.position
    }
}

impl<T> Eq for Cursor<'_, T> {}

/// Cursors over different sequences are unordered.
impl<T> PartialOrd for Cursor<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !self.same_sequence(other) {
            return None;
        }
        Some(self.position.cmp(&other.position))
    }
}

impl<T> Add<isize> for Cursor<'_, T> {
    type Output = Self;

    fn add(mut self, offset: isize) -> Self {
        self.position = self.position.wrapping_add(offset);
        self
    }
}

impl<T> Sub<isize> for Cursor<'_, T> {
    type Output = Self;

    fn sub(mut self, offset: isize) -> Self {
        self.position = self.position.wrapping_sub(offset);
        self
    }
}

impl<T> AddAssign<isize> for Cursor<'_, T> {
    fn add_assign(&mut self, offset: isize) {
        self.position = self.position.wrapping_add(offset);
    }
}

impl<T> SubAssign<isize> for Cursor<'_, T> {
    fn sub_assign(&mut self, offset: isize) {
        self.position = self.position.wrapping_sub(offset);
    }
}

/// Signed distance between two cursors of the same sequence.
impl<T> Sub for Cursor<'_, T> {
    type Output = isize;

    fn sub(self, other: Self) -> isize {
        debug_assert!(self.same_sequence(&other), "cursors over different sequences");
        self.position.wrapping_sub(other.position)
    }
}

/// Elements from a cursor's position to the end, in the cursor's direction.
///
/// Created by [`Cursor::iter`].
pub struct CursorIter<'a, T> {
    cursor: Cursor<'a, T>,
}

impl<'a, T> CursorIter<'a, T> {
    /// Position of the next element to yield.
    #[must_use]
    pub fn cursor(&self) -> Cursor<'a, T> {
        self.cursor
    }
}

impl<T> Clone for CursorIter<'_, T> {
    fn clone(&self) -> Self {
        Self { cursor: self.cursor }
    }
}

impl<T> fmt::Debug for CursorIter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorIter").field(&self.cursor).finish()
    }
}

impl<'a, T> Iterator for CursorIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let item = self.cursor.get()?;
        self.cursor.position += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match usize::try_from(self.cursor.position) {
            Ok(position) => self.cursor.elements.len().saturating_sub(position),
            Err(_) => 0,
        };
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for CursorIter<'_, T> {}
