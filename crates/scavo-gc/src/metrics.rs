//! Collection statistics.

use std::time::Duration;

/// Statistics from the most recent collection of a heap.
#[derive(Debug, Clone, Copy)]
pub struct CollectStats {
    /// Wall-clock duration of the collection.
    pub duration: Duration,
    /// Bytes returned to the free pages.
    pub bytes_reclaimed: usize,
    /// Bytes copied into to-space.
    pub bytes_surviving: usize,
    /// Objects that were unreachable.
    pub objects_reclaimed: usize,
    /// Objects evacuated.
    pub objects_surviving: usize,
    /// From-space pages returned to the free list.
    pub pages_released: usize,
    /// Collections run on this heap since creation.
    pub collections: usize,
}

impl CollectStats {
    /// All-zero statistics, the state before the first collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            duration: Duration::from_secs(0),
            bytes_reclaimed: 0,
            bytes_surviving: 0,
            objects_reclaimed: 0,
            objects_surviving: 0,
            pages_released: 0,
            collections: 0,
        }
    }
}

impl Default for CollectStats {
    fn default() -> Self {
        Self::new()
    }
}
