//! Evacuation, forwarding, pointer rewriting and page reclamation.
//!
//! Pages holding at least one survivor become from-space; survivors are
//! copied in allocation order into to-space pages drawn from the free list.
//! Forwarding addresses live in the originals' headers until from-space is
//! released, so every stale pointer (object slot or root) can be translated
//! exactly once.

use crate::header::Header;
use crate::heap::{HeapState, PageState, PAGE_SIZE};
use crate::layout::{self, Slot};
use crate::scan::Root;

pub(crate) struct CompactOutcome {
    /// False when to-space could not hold the survivors and the collection
    /// degenerated to mark-only with nothing reclaimed.
    pub completed: bool,
    /// From-space pages returned to the free list.
    pub pages_released: usize,
}

/// Run the evacuate / forward / rewrite / reclaim phases.
///
/// Marking must have run: mark bits and per-page live counts drive the page
/// partitioning. On return all mark bits are clear and no forwarding slot is
/// set, whether or not the compaction went ahead.
pub(crate) fn compact(st: &mut HeapState, roots: &[Root]) -> CompactOutcome {
    // To-space sufficiency check before anything moves: a collection either
    // runs all phases or leaves the heap exactly as marked it.
    if tospace_pages_needed(st) > st.free.len() {
        clear_marks(st);
        return CompactOutcome {
            completed: false,
            pages_released: 0,
        };
    }

    let from: Vec<u32> = std::mem::take(&mut st.in_use);
    st.active = None;
    let mut pages_released = 0;

    // Pages without survivors go back wholesale; the rest are from-space.
    let mut evacuating: Vec<u32> = Vec::with_capacity(from.len());
    for &page in &from {
        if st.pages[page as usize].live == 0 {
            st.release_page(page);
            pages_released += 1;
        } else {
            st.pages[page as usize].state = PageState::Evacuating;
            evacuating.push(page);
        }
    }

    // Survivors in allocation order: pages in acquisition order, objects in
    // address order within each page.
    let mut survivors: Vec<*mut Header> = Vec::new();
    for &page in &evacuating {
        walk_objects(st, page, |header| {
            if unsafe { &*header }.is_marked() {
                survivors.push(header);
            }
        });
    }

    // Phase 1: evacuate. Copy header and payload verbatim, clear the copy's
    // transient bits, leave the forwarding address in the original.
    let mut evacuated: Vec<*mut Header> = Vec::with_capacity(survivors.len());
    for &old in &survivors {
        let total = unsafe { &*old }.total_size();
        let destination = tospace_alloc(st, total);
        unsafe {
            std::ptr::copy_nonoverlapping(old.cast::<u8>(), destination, total);
            let copy = destination.cast::<Header>();
            (*copy).clear_mark();
            (*copy).clear_forwarding();
            (*old).set_forwarding(Header::payload(copy));
            evacuated.push(copy);
        }
    }

    // Phase 2: rewrite the pointer slots of every evacuated object through
    // the forwarding addresses still readable in from-space.
    for &copy in &evacuated {
        let object_layout = st.layout_of(copy);
        let Some(fmt) = object_layout.format() else {
            continue;
        };
        let payload = unsafe { Header::payload(copy) };
        for (offset, slot) in layout::slots(fmt) {
            if slot != Slot::Ptr {
                continue;
            }
            let slot_ptr = unsafe { payload.add(offset).cast::<usize>() };
            let value = unsafe { slot_ptr.read() };
            if value == 0 {
                continue;
            }
            if let Some((old_target, interior)) = st.resolve_from_space(value) {
                debug_assert_eq!(interior, 0);
                let forwarded = unsafe { &*old_target.as_ptr() }.forwarding();
                match forwarded {
                    Some(to) => unsafe { slot_ptr.write(to.as_ptr() as usize) },
                    None => panic!(
                        "reachability invariant violated: traced slot {value:#x} \
                         points at an object marking never reached"
                    ),
                }
            }
            // Values outside from-space are scalars or foreign pointers.
        }
    }

    // Phase 3: rewrite roots in place. Conservative candidates all resolved
    // to live objects, so every root has a forwarding address by now.
    for root in roots {
        let forwarded = unsafe { &*root.header.as_ptr() }.forwarding();
        if let Some(to) = forwarded {
            unsafe {
                root.location.write_volatile(to.as_ptr() as usize + root.offset);
            }
        }
    }

    // Phase 4: from-space pages go back zeroed, which also erases the stale
    // mark bits and forwarding slots.
    for &page in &evacuating {
        st.release_page(page);
        pages_released += 1;
    }

    CompactOutcome {
        completed: true,
        pages_released,
    }
}

/// To-space pages the survivor set will occupy, by simulating the bump
/// packing evacuation uses.
fn tospace_pages_needed(st: &HeapState) -> usize {
    let mut needed = 0;
    let mut space = 0;
    for &page in &st.in_use {
        walk_objects(st, page, |header| {
            let object = unsafe { &*header };
            if !object.is_marked() {
                return;
            }
            let total = object.total_size();
            if space < total {
                needed += 1;
                space = PAGE_SIZE;
            }
            space -= total;
        });
    }
    needed
}

/// Undo marking without moving anything.
fn clear_marks(st: &mut HeapState) {
    for i in 0..st.in_use.len() {
        let page = st.in_use[i];
        walk_objects(st, page, |header| unsafe { (*header).clear_mark() });
        st.pages[page as usize].live = 0;
    }
}

/// Bump space for an evacuated object, opening to-space pages as needed.
fn tospace_alloc(st: &mut HeapState, total: usize) -> *mut u8 {
    if let Some(base) = st.bump_space(total) {
        return base;
    }
    let Some(next) = st.free.pop() else {
        // The sufficiency check ran before evacuation started.
        panic!("heap exhausted while evacuating survivors");
    };
    if let Some(previous) = st.active {
        st.pages[previous as usize].state = PageState::Full;
    }
    st.pages[next as usize].state = PageState::Active;
    st.in_use.push(next);
    st.active = Some(next);
    st.bump_space(total).expect("a fresh page holds any object")
}

/// Visit every object header in a page, in address order.
fn walk_objects(st: &HeapState, page: u32, mut visit: impl FnMut(*mut Header)) {
    let base = st.page_base(page) as usize;
    let end = base + st.pages[page as usize].cursor;
    let mut cursor = base;
    while cursor < end {
        let header = cursor as *mut Header;
        let total = unsafe { &*header }.total_size();
        visit(header);
        cursor += total;
    }
}
