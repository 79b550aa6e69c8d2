//! Garbage-collected containers on top of [`scavo_gc`].
//!
//! A singly linked [`List`], a FIFO [`Queue`] built over it, and a
//! [`Cursor`] for stateful traversal with removal and insertion. Handles and
//! nodes are ordinary GC allocations on the process-wide heap
//! ([`scavo_gc::global`]); a collection may relocate any of them, and the
//! collector's in-place root rewrite keeps live handles valid as long as
//! they reside in stack memory across the collection.
//!
//! Entries are one-word [`Elem`] values: scalars are stored bit-cast in the
//! node's traced entry slot, GC pointers are traced and kept alive through
//! the containers.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_panics_doc)]

use std::fmt;

mod cursor;
mod elem;
mod fifo_queue;
mod linked_list;

pub use cursor::Cursor;
pub use elem::Elem;
pub use fifo_queue::Queue;
pub use linked_list::{EqFn, Iter, List};

/// Errors surfaced by container operations.
#[derive(Debug)]
pub enum Error {
    /// An index beyond the container's length.
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The container length at the time.
        len: usize,
    },
    /// The container holds no elements.
    Empty,
    /// The cursor is not positioned on an element.
    InvalidCursor,
    /// The underlying heap refused the allocation.
    Alloc(scavo_gc::HeapError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Self::Empty => write!(f, "the container is empty"),
            Self::InvalidCursor => write!(f, "the cursor is not positioned on an element"),
            Self::Alloc(err) => write!(f, "allocation failed: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Alloc(err) => Some(err),
            _ => None,
        }
    }
}

impl From<scavo_gc::HeapError> for Error {
    fn from(err: scavo_gc::HeapError) -> Self {
        Self::Alloc(err)
    }
}
