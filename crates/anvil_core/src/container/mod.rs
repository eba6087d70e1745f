//! # Containers
//!
//! Growable sequences built on [`Allocator`](crate::memory::Allocator).

mod array;
mod cursor;
mod iter;

pub use array::Array;
pub use cursor::{Cursor, CursorIter};
pub use iter::IntoIter;
