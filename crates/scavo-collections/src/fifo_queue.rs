//! A FIFO queue over the garbage-collected list.

use crate::cursor::Cursor;
use crate::linked_list::{Iter, List};
use crate::{Elem, Error};

fn raw_eq(a: Elem, b: Elem) -> bool {
    a.raw() == b.raw()
}

/// A first-in first-out queue of one-word entries.
///
/// Enqueue and dequeue are O(1) through the list's first/last pointers.
pub struct Queue {
    list: List,
}

impl Queue {
    /// Create an empty queue.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`] when the handle allocation fails.
    ///
    /// # Panics
    ///
    /// Panics when no global heap is initialized.
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            list: List::new(raw_eq)?,
        })
    }

    /// Add an entry at the back.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`] when the node allocation fails; the queue is
    /// unchanged in that case.
    pub fn enqueue(&self, element: Elem) -> Result<(), Error> {
        self.list.append(element)
    }

    /// Remove and return the front entry.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] on an empty queue.
    pub fn dequeue(&self) -> Result<Elem, Error> {
        self.list.remove(0).map_err(|_| Error::Empty)
    }

    /// The front entry, without removing it.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] on an empty queue.
    pub fn peek(&self) -> Result<Elem, Error> {
        self.list.get(0).map_err(|_| Error::Empty)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Whether the queue holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.list.clear();
    }

    /// Iterate front to back.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        self.list.iter()
    }

    /// A cursor positioned before the front entry.
    #[must_use]
    pub fn cursor(&self) -> Cursor<'_> {
        self.list.cursor()
    }
}
