//! Allocation and collection throughput.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::ptr;

use scavo_gc::{Heap, HeapConfig, PAGE_SIZE};

fn new_heap(pages: usize) -> Heap {
    Heap::new(HeapConfig {
        size: pages * PAGE_SIZE,
        unsafe_stack: true,
        gc_threshold: 1.0,
    })
    .expect("heap")
}

fn bench_alloc_churn(c: &mut Criterion) {
    let heap = new_heap(4096);
    c.bench_function("alloc_1000_pairs_then_collect", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                black_box(heap.alloc_struct("**").expect("alloc"));
            }
            heap.collect()
        });
    });
}

fn bench_collect_with_survivors(c: &mut Criterion) {
    let heap = new_heap(4096);

    // A rooted chain of 512 nodes that survives every collection.
    let mut head: *mut u8 = ptr::null_mut();
    for value in 0..512u64 {
        let node = heap.alloc_struct("l*").expect("alloc").as_ptr();
        unsafe {
            node.cast::<u64>().write(value);
            node.add(8).cast::<*mut u8>().write(head);
        }
        head = node;
    }
    let head_slot = black_box(&mut head as *mut *mut u8);

    c.bench_function("collect_512_survivors", |b| {
        b.iter(|| {
            for _ in 0..256 {
                black_box(heap.alloc_raw(64).expect("alloc"));
            }
            let reclaimed = heap.collect();
            black_box(unsafe { head_slot.read_volatile() });
            reclaimed
        });
    });
}

criterion_group!(benches, bench_alloc_churn, bench_collect_with_survivors);
criterion_main!(benches);
