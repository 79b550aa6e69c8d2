//! Stateful traversal over a list, with removal and insertion.

use std::ptr;

use crate::linked_list::{new_node, node_entry, node_next, List};
use crate::{Elem, Error};

/// A cursor over a [`List`], starting before the first entry.
///
/// [`Cursor::next`] steps onto the following entry and returns it; removal
/// and insertion act relative to the entry most recently returned. The
/// cursor holds raw node pointers, so like any container handle it must
/// stay in stack memory across a collection.
pub struct Cursor<'a> {
    list: &'a List,
    /// Node before the cursor position; null means the head.
    prev: *mut u8,
    /// Node most recently returned; null when not positioned on an entry.
    current: *mut u8,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(list: &'a List) -> Self {
        Self {
            list,
            prev: ptr::null_mut(),
            current: ptr::null_mut(),
        }
    }

    fn upcoming(&self) -> *mut u8 {
        unsafe {
            if !self.current.is_null() {
                node_next(self.current)
            } else if self.prev.is_null() {
                self.list.first_node()
            } else {
                node_next(self.prev)
            }
        }
    }

    /// Whether another entry can be stepped onto.
    #[must_use]
    pub fn has_next(&self) -> bool {
        !self.upcoming().is_null()
    }

    /// Step onto the next entry and return it.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] when the cursor is exhausted.
    pub fn next(&mut self) -> Result<Elem, Error> {
        let node = self.upcoming();
        if node.is_null() {
            return Err(Error::Empty);
        }
        if !self.current.is_null() {
            self.prev = self.current;
        }
        self.current = node;
        Ok(unsafe { node_entry(node) })
    }

    /// The entry the cursor is positioned on.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCursor`] before the first [`Cursor::next`], after a
    /// removal, or after a reset.
    pub fn current(&self) -> Result<Elem, Error> {
        if self.current.is_null() {
            return Err(Error::InvalidCursor);
        }
        Ok(unsafe { node_entry(self.current) })
    }

    /// Remove and return the entry the cursor is positioned on. The cursor
    /// moves into the gap; the following [`Cursor::next`] continues with the
    /// entry after the removed one.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCursor`] when not positioned on an entry.
    pub fn remove(&mut self) -> Result<Elem, Error> {
        if self.current.is_null() {
            return Err(Error::InvalidCursor);
        }
        let entry = self.list.unlink(self.prev, self.current);
        self.current = ptr::null_mut();
        Ok(entry)
    }

    /// Insert an entry at the cursor: it becomes the next entry returned.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`] when the node allocation fails.
    pub fn insert(&mut self, element: Elem) -> Result<(), Error> {
        let node = new_node(element)?;
        // Read positions only after the allocation: a collection inside it
        // may have moved every node the cursor points at.
        let anchor = if self.current.is_null() {
            self.prev
        } else {
            self.current
        };
        self.list.link_after(anchor, node);
        Ok(())
    }

    /// Return to the position before the first entry.
    pub fn reset(&mut self) {
        self.prev = ptr::null_mut();
        self.current = ptr::null_mut();
    }
}
