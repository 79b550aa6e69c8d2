//! Reachability tracing from verified roots.

use std::ptr::NonNull;

use crate::header::Header;
use crate::heap::HeapState;
use crate::layout::{self, Slot};
use crate::scan::Root;

/// Totals for the survivor set of one collection.
pub(crate) struct MarkStats {
    pub objects: usize,
    pub bytes: usize,
}

/// Mark every object reachable from `roots` through declared pointer slots.
///
/// Depth-first with an explicit work stack; the mark bit guarantees each
/// object is visited once, so cycles need no special handling. Per-page live
/// counts are bumped as a side effect for the compactor.
pub(crate) fn mark(st: &mut HeapState, roots: &[Root]) -> MarkStats {
    let mut work: Vec<NonNull<Header>> = Vec::with_capacity(64);
    let mut stats = MarkStats {
        objects: 0,
        bytes: 0,
    };

    for root in roots {
        try_mark(st, root.header, &mut work, &mut stats);
    }

    while let Some(header) = work.pop() {
        let object_layout = st.layout_of(header.as_ptr());
        let Some(fmt) = object_layout.format() else {
            // Raw allocations carry no traced slots.
            continue;
        };
        let payload = unsafe { Header::payload(header.as_ptr()) };

        for (offset, slot) in layout::slots(fmt) {
            if slot != Slot::Ptr {
                continue;
            }
            let value = unsafe { payload.add(offset).cast::<usize>().read() };
            if value == 0 {
                continue;
            }
            // Declared pointer slots may carry one-word scalars (container
            // entries do); values that fail the exact payload probe are left
            // alone rather than treated as corruption.
            if let Some((child, _)) = st.resolve_live(value, false) {
                try_mark(st, child, &mut work, &mut stats);
            }
        }
    }

    stats
}

fn try_mark(
    st: &mut HeapState,
    header: NonNull<Header>,
    work: &mut Vec<NonNull<Header>>,
    stats: &mut MarkStats,
) {
    let object = unsafe { &mut *header.as_ptr() };
    if object.is_marked() {
        return;
    }
    object.set_mark();

    let page = st
        .page_of_addr(header.as_ptr() as usize)
        .expect("marked object lies inside the heap");
    st.pages[page as usize].live += 1;

    stats.objects += 1;
    stats.bytes += object.total_size();
    work.push(header);
}
