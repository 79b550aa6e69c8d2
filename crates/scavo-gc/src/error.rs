//! Error types for heap construction and allocation.

use std::fmt;
use std::io;

/// Errors surfaced by heap construction, allocation and the global-heap
/// registry.
///
/// Fatal conditions (malformed layout descriptors, reachability violations
/// discovered mid-collection) are not represented here: the collector cannot
/// continue without trustworthy type information, so those abort via panic.
#[derive(Debug)]
pub enum HeapError {
    /// The requested heap size is below one page.
    SizeTooSmall {
        /// Requested heap size in bytes.
        requested: usize,
        /// Minimum accepted size (one page).
        minimum: usize,
    },
    /// The collection trigger threshold is outside `(0, 1]`.
    InvalidThreshold(f32),
    /// The operating system refused the virtual-memory reservation.
    ReservationFailed(io::Error),
    /// The allocation does not fit in a single page.
    ObjectTooLarge {
        /// Requested total size (header included).
        requested: usize,
        /// Largest total size a page can hold.
        maximum: usize,
    },
    /// A zero-byte raw allocation was requested.
    ZeroAllocation,
    /// The allocation could not be satisfied even after a forced collection.
    OutOfMemory,
    /// `init_global` was called while a global heap is already registered.
    AlreadyInitialized,
    /// The global heap was used or deleted before `init_global`.
    Uninitialized,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeTooSmall { requested, minimum } => write!(
                f,
                "heap size {requested} is smaller than the minimum of {minimum} bytes"
            ),
            Self::InvalidThreshold(t) => {
                write!(f, "gc threshold {t} is outside the accepted range (0, 1]")
            }
            Self::ReservationFailed(err) => {
                write!(f, "virtual-memory reservation failed: {err}")
            }
            Self::ObjectTooLarge { requested, maximum } => write!(
                f,
                "allocation of {requested} bytes exceeds the page capacity of {maximum} bytes"
            ),
            Self::ZeroAllocation => write!(f, "zero-byte allocations are not supported"),
            Self::OutOfMemory => write!(f, "out of memory after a forced collection"),
            Self::AlreadyInitialized => write!(f, "a global heap is already initialized"),
            Self::Uninitialized => write!(f, "the global heap is not initialized"),
        }
    }
}

impl std::error::Error for HeapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReservationFailed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for HeapError {
    fn from(err: io::Error) -> Self {
        Self::ReservationFailed(err)
    }
}
