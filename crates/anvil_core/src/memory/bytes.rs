//! # Byte Buffers
//!
//! A growable byte buffer over [`Array<u8>`] with `Pod` read/write helpers
//! for packing plain-data values.

use std::fmt;
use std::ops::{Add, AddAssign, Index};

use bytemuck::Pod;

use crate::container::Array;
use crate::error::{CoreError, CoreResult};

/// A growable byte buffer.
///
/// Positions are validated: an out-of-range position is an error, never a
/// silent no-op. Windows that run past the end (`replace`, `remove`) are
/// clamped.
///
/// # Example
///
/// ```rust,ignore
/// let mut bytes = ByteArray::new();
/// bytes.push_pod(&0xDEAD_BEEF_u32)?;
/// assert_eq!(bytes.read_pod::<u32>(0)?, 0xDEAD_BEEF);
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteArray {
    bytes: Array<u8>,
}

impl ByteArray {
    /// Creates an empty buffer. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self { bytes: Array::new() }
    }

    /// Creates `len` zero bytes.
    ///
    /// # Errors
    ///
    /// Allocation errors.
    pub fn with_len(len: usize) -> CoreResult<Self> {
        Ok(Self {
            bytes: Array::with_len(len)?,
        })
    }

    /// Creates `len` copies of `byte`.
    ///
    /// # Errors
    ///
    /// Allocation errors.
    pub fn filled(len: usize, byte: u8) -> CoreResult<Self> {
        Ok(Self {
            bytes: Array::filled(len, byte)?,
        })
    }

    /// Copies `data` into a new buffer.
    ///
    /// # Errors
    ///
    /// Allocation errors.
    pub fn from_bytes(data: &[u8]) -> CoreResult<Self> {
        let mut bytes = Array::with_capacity(data.len())?;
        bytes.append_copied(data)?;
        Ok(Self { bytes })
    }

    /// Copies the raw bytes of a `Pod` slice.
    ///
    /// # Errors
    ///
    /// Allocation errors.
    pub fn from_pod_slice<P: Pod>(values: &[P]) -> CoreResult<Self> {
        Self::from_bytes(bytemuck::cast_slice(values))
    }

    /// Byte at `index`.
    ///
    /// # Errors
    ///
    /// [`CoreError::OutOfRange`] if `index >= len`.
    pub fn at(&self, index: usize) -> CoreResult<u8> {
        self.bytes.at(index).copied()
    }

    /// First byte.
    ///
    /// # Errors
    ///
    /// [`CoreError::Empty`] if the buffer is empty.
    pub fn front(&self) -> CoreResult<u8> {
        self.bytes.front().copied()
    }

    /// Last byte.
    ///
    /// # Errors
    ///
    /// [`CoreError::Empty`] if the buffer is empty.
    pub fn back(&self) -> CoreResult<u8> {
        self.bytes.back().copied()
    }

    /// The bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// The bytes, mutably.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.bytes.as_mut_slice()
    }

    /// Number of bytes.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the buffer holds no bytes.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Allocated bytes.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// Bytes available before the next reallocation.
    #[inline]
    #[must_use]
    pub const fn remain(&self) -> usize {
        self.bytes.remain()
    }

    /// Empties the buffer, keeping its storage.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Empties the buffer and releases its storage.
    pub fn reset(&mut self) {
        self.bytes.reset();
    }

    /// Ensures room for `capacity` bytes.
    ///
    /// # Errors
    ///
    /// Allocation errors.
    pub fn reserve(&mut self, capacity: usize) -> CoreResult<()> {
        self.bytes.reserve(capacity)
    }

    /// Resizes to `len`, zero-filling new bytes.
    ///
    /// # Errors
    ///
    /// Allocation errors.
    pub fn resize(&mut self, len: usize) -> CoreResult<()> {
        self.bytes.resize(len)
    }

    /// Releases unused capacity.
    ///
    /// # Errors
    ///
    /// Allocation errors.
    pub fn shrink(&mut self) -> CoreResult<()> {
        self.bytes.shrink()
    }

    /// Appends one byte.
    ///
    /// # Errors
    ///
    /// Allocation errors.
    pub fn push(&mut self, byte: u8) -> CoreResult<()> {
        self.bytes.push(byte).map(drop)
    }

    /// Appends the raw bytes of `value`.
    ///
    /// # Errors
    ///
    /// Allocation errors.
    pub fn push_pod<P: Pod>(&mut self, value: &P) -> CoreResult<()> {
        self.bytes.append_copied(bytemuck::bytes_of(value))
    }

    /// Reads a `P` from the bytes at `offset`. No alignment is required.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidRange`] if the value would extend past the end.
    pub fn read_pod<P: Pod>(&self, offset: usize) -> CoreResult<P> {
        let end = offset
            .checked_add(std::mem::size_of::<P>())
            .ok_or(CoreError::CapacityOverflow)?;
        let window = self.as_bytes().get(offset..end).ok_or(CoreError::InvalidRange {
            start: offset,
            end,
            len: self.len(),
        })?;
        Ok(bytemuck::pod_read_unaligned(window))
    }

    /// Overwrites up to `len` bytes at `pos` with the start of `source`.
    ///
    /// Copies `min(len, self.len() - pos, source.len())` bytes; the buffer
    /// never grows.
    ///
    /// # Errors
    ///
    /// [`CoreError::OutOfRange`] if `pos > self.len()`.
    pub fn replace(&mut self, pos: usize, len: usize, source: &[u8]) -> CoreResult<()> {
        let window = self.window(pos, len, pos > self.len())?;
        let count = window.min(source.len());
        self.as_bytes_mut()[pos..pos + count].copy_from_slice(&source[..count]);
        Ok(())
    }

    /// Sets every byte to `byte`.
    pub fn fill(&mut self, byte: u8) {
        self.as_bytes_mut().fill(byte);
    }

    /// Appends `data`.
    ///
    /// # Errors
    ///
    /// Allocation errors.
    pub fn append(&mut self, data: &[u8]) -> CoreResult<()> {
        self.bytes.append_copied(data)
    }

    /// Prepends `data`.
    ///
    /// # Errors
    ///
    /// Allocation errors.
    pub fn prepend(&mut self, data: &[u8]) -> CoreResult<()> {
        self.bytes.prepend_copied(data)
    }

    /// Inserts `count` copies of `byte` at `index`.
    ///
    /// # Errors
    ///
    /// [`CoreError::OutOfRange`] if `index > len`, or allocation errors.
    pub fn insert(&mut self, index: usize, count: usize, byte: u8) -> CoreResult<()> {
        self.bytes.insert_n(index, count, byte).map(drop)
    }

    /// Inserts `data` at `index`.
    ///
    /// # Errors
    ///
    /// [`CoreError::OutOfRange`] if `index > len`, or allocation errors.
    pub fn insert_bytes(&mut self, index: usize, data: &[u8]) -> CoreResult<()> {
        self.bytes.insert_copied(index, data).map(drop)
    }

    /// Removes up to `len` bytes starting at `pos`.
    ///
    /// # Errors
    ///
    /// [`CoreError::OutOfRange`] if `pos >= self.len()`.
    pub fn remove(&mut self, pos: usize, len: usize) -> CoreResult<()> {
        let count = self.window(pos, len, pos >= self.len())?;
        self.bytes.erase_range(pos, pos + count)
    }

    /// Whether `byte` occurs.
    #[must_use]
    pub fn contains(&self, byte: u8) -> bool {
        self.bytes.contains(&byte)
    }

    /// Number of occurrences of `byte`.
    #[must_use]
    pub fn count(&self, byte: u8) -> usize {
        self.as_bytes().iter().filter(|&&b| b == byte).count()
    }

    /// Index of the first `byte` at or after `start`.
    #[must_use]
    pub fn index_of(&self, byte: u8, start: usize) -> Option<usize> {
        self.bytes.index_of(&byte, start)
    }

    /// Index of the last `byte` at or before `start` (`None` = from the end).
    #[must_use]
    pub fn last_index_of(&self, byte: u8, start: Option<usize>) -> Option<usize> {
        self.bytes.last_index_of(&byte, start)
    }

    /// Exchanges contents with `other`.
    pub fn swap(&mut self, other: &mut Self) {
        self.bytes.swap(&mut other.bytes);
    }

    /// Length of the `[pos, pos + len)` window clamped to the end.
    fn window(&self, pos: usize, len: usize, out_of_range: bool) -> CoreResult<usize> {
        if out_of_range {
            return Err(CoreError::OutOfRange {
                index: pos,
                len: self.len(),
            });
        }
        Ok(len.min(self.len() - pos))
    }
}

impl fmt::Debug for ByteArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteArray(")?;
        for byte in self.as_bytes() {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

impl Index<usize> for ByteArray {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.bytes[index]
    }
}

impl AsRef<[u8]> for ByteArray {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl PartialEq<[u8]> for ByteArray {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl<const N: usize> PartialEq<[u8; N]> for ByteArray {
    fn eq(&self, other: &[u8; N]) -> bool {
        self.as_bytes() == other.as_slice()
    }
}

impl Add<&ByteArray> for &ByteArray {
    type Output = ByteArray;

    fn add(self, rhs: &ByteArray) -> ByteArray {
        ByteArray {
            bytes: &self.bytes + &rhs.bytes,
        }
    }
}

impl AddAssign<&ByteArray> for ByteArray {
    fn add_assign(&mut self, rhs: &ByteArray) {
        self.bytes += &rhs.bytes;
    }
}

impl From<&[u8]> for ByteArray {
    fn from(data: &[u8]) -> Self {
        Self {
            bytes: Array::from(data),
        }
    }
}
