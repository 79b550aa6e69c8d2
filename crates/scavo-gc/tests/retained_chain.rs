//! Survivor preservation, content identity and compaction address order.

use std::hint::black_box;
use std::ptr;

use scavo_gc::test_util::scrub_stack;
use scavo_gc::{Heap, HeapConfig, PAGE_SIZE};

// A chain node: a long value and a next pointer.
const NODE: &str = "l*";
const NODE_TOTAL: usize = 40;

fn new_heap(pages: usize) -> Heap {
    Heap::new(HeapConfig {
        size: pages * PAGE_SIZE,
        unsafe_stack: false,
        gc_threshold: 1.0,
    })
    .expect("heap")
}

#[inline(never)]
fn build_chain(heap: &Heap, count: usize) -> usize {
    let mut head: *mut u8 = ptr::null_mut();
    for value in (0..count).rev() {
        let node = heap.alloc_struct(NODE).expect("alloc").as_ptr();
        unsafe {
            node.cast::<u64>().write(value as u64);
            node.add(8).cast::<*mut u8>().write(head);
        }
        head = node;
    }
    head as usize
}

#[test]
fn retained_chain_survives_with_contents_intact() {
    let heap = new_heap(32);
    let mut head_slot: usize = 0;
    let head_loc: *mut usize = black_box(&raw mut head_slot);

    unsafe { head_loc.write_volatile(build_chain(&heap, 50)) };
    scrub_stack();

    // Payload addresses are word aligned, so the tagged copy can never be
    // taken for a root (and thus never rewritten) by the collection below.
    let old_head_tagged = unsafe { head_loc.read_volatile() } | 1;

    heap.collect();

    let new_head = unsafe { head_loc.read_volatile() };
    assert_ne!(new_head, 0);
    assert!(
        new_head < old_head_tagged,
        "survivors are evacuated into fresh lower pages"
    );

    let mut node = new_head as *mut u8;
    for expected in 0..50u64 {
        assert!(!node.is_null(), "chain truncated at entry {expected}");
        unsafe {
            assert_eq!(node.cast::<u64>().read(), expected);
            node = node.add(8).cast::<*mut u8>().read();
        }
    }
    assert!(node.is_null());
    assert_eq!(heap.used(), 50 * NODE_TOTAL);
}

#[test]
fn compaction_preserves_allocation_order() {
    let heap = new_heap(32);
    let mut head_slot: usize = 0;
    let head_loc: *mut usize = black_box(&raw mut head_slot);

    unsafe { head_loc.write_volatile(build_chain(&heap, 20)) };
    scrub_stack();
    heap.collect();

    // The chain was built tail first, so following next pointers walks the
    // survivors in reverse allocation order: addresses must descend.
    let mut node = unsafe { head_loc.read_volatile() } as *mut u8;
    let mut previous = usize::MAX;
    while !node.is_null() {
        assert!((node as usize) < previous);
        previous = node as usize;
        node = unsafe { node.add(8).cast::<*mut u8>().read() };
    }
}

#[inline(never)]
fn build_cycle(heap: &Heap) -> usize {
    let a = heap.alloc_struct(NODE).expect("alloc").as_ptr();
    let b = heap.alloc_struct(NODE).expect("alloc").as_ptr();
    unsafe {
        a.cast::<u64>().write(1);
        b.cast::<u64>().write(2);
        a.add(8).cast::<*mut u8>().write(b);
        b.add(8).cast::<*mut u8>().write(a);
    }
    a as usize
}

#[test]
fn cycles_survive_and_stay_cyclic() {
    let heap = new_heap(8);
    let mut slot: usize = 0;
    let loc: *mut usize = black_box(&raw mut slot);

    unsafe { loc.write_volatile(build_cycle(&heap)) };
    scrub_stack();
    heap.collect();

    let a = unsafe { loc.read_volatile() } as *mut u8;
    unsafe {
        let b = a.add(8).cast::<*mut u8>().read();
        assert_eq!(a.cast::<u64>().read(), 1);
        assert_eq!(b.cast::<u64>().read(), 2);
        assert_eq!(b.add(8).cast::<*mut u8>().read(), a, "cycle closed");
    }
    assert_eq!(heap.used(), 2 * NODE_TOTAL);
}
