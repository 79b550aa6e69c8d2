//! Stop-the-world collection: root scan, mark, evacuate, rewrite, reclaim.
//!
//! A collection runs the four phases of the compactor back to back and
//! either completes them all or leaves the heap untouched (to-space
//! sufficiency is checked before any object moves). The mutator is the
//! caller, so it is paused by construction.

use std::time::Instant;

use crate::heap::Heap;
use crate::metrics::CollectStats;
use crate::scan;
use crate::stack::RegisterSnapshot;

mod compact;
mod mark;

impl Heap {
    /// Collect unreachable allocations and compact the survivors.
    ///
    /// Scans the caller's stack and register file for roots, traces the
    /// declared pointer slots of every reachable object, evacuates survivors
    /// into fresh pages, rewrites every surviving pointer (roots included,
    /// in place) and returns the from-space pages to the free list.
    ///
    /// Returns the number of bytes reclaimed. Reentrant calls are no-ops.
    #[inline(never)]
    pub fn collect(&self) -> usize {
        {
            let st = unsafe { &mut *self.state_ptr() };
            if st.collecting {
                return 0;
            }
            st.collecting = true;
        }

        // Fresh register snapshot; its spill slots are scanned and rewritten
        // like stack words. The floor marker bounds the stack scan so frames
        // below this one (the collector's own) are never taken for roots.
        let mut regs = RegisterSnapshot::capture();
        let scan_floor: usize = 0;
        let scan_floor_addr = std::ptr::addr_of!(scan_floor) as usize;

        let reclaimed = self.run_collection(&mut regs, scan_floor_addr);
        std::hint::black_box(&regs);

        let st = unsafe { &mut *self.state_ptr() };
        st.collecting = false;
        reclaimed
    }

    fn run_collection(&self, regs: &mut RegisterSnapshot, stack_top: usize) -> usize {
        let started = Instant::now();
        let st = unsafe { &mut *self.state_ptr() };
        let used_before = st.used;
        let objects_before = st.objects;

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("collect", used_before, objects_before).entered();

        let roots = scan::collect_roots(st, regs, stack_top);

        #[cfg(feature = "tracing")]
        tracing::debug!(roots = roots.len(), "root scan finished");

        let marked = mark::mark(st, &roots);
        let outcome = compact::compact(st, &roots);

        st.used = st
            .in_use
            .iter()
            .map(|&page| st.pages[page as usize].cursor)
            .sum();
        st.objects = if outcome.completed {
            marked.objects
        } else {
            objects_before
        };

        let reclaimed = used_before - st.used;
        st.last_stats = CollectStats {
            duration: started.elapsed(),
            bytes_reclaimed: reclaimed,
            bytes_surviving: marked.bytes,
            objects_reclaimed: if outcome.completed {
                objects_before - marked.objects
            } else {
                0
            },
            objects_surviving: marked.objects,
            pages_released: outcome.pages_released,
            collections: st.last_stats.collections + 1,
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            bytes_reclaimed = reclaimed,
            bytes_surviving = marked.bytes,
            objects_surviving = marked.objects,
            pages_released = outcome.pages_released,
            completed = outcome.completed,
            "collection finished"
        );

        reclaimed
    }
}
