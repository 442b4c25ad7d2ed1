// Copyright 2024 Persistent Collections Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use imm_hamt_trie::Hamt;

fn build_hamt(size: usize) -> Hamt<String, usize> {
    let mut h = Hamt::empty();
    for i in 0..size {
        h = h.set(format!("key-{i}"), i);
    }
    h
}

fn bench_get(c: &mut Criterion) {
    let h = build_hamt(10_000);
    c.bench_function("hamt get", |b| {
        b.iter(|| {
            for i in (0..10_000).step_by(97) {
                black_box(h.get(&format!("key-{i}")));
            }
        })
    });
}

fn bench_set(c: &mut Criterion) {
    let h = build_hamt(10_000);
    c.bench_function("hamt set", |b| {
        b.iter(|| black_box(h.set("new-key".to_string(), 1)))
    });
}

fn bench_transient_batch(c: &mut Criterion) {
    c.bench_function("transient batch of 5000 inserts", |b| {
        b.iter(|| {
            let owner = imm_bitops::next_owner_id();
            let mut t = Hamt::<String, usize>::empty().transient(owner);
            for i in 0..5_000 {
                t.set(format!("key-{i}"), i);
            }
            black_box(t.persist())
        })
    });
}

criterion_group!(benches, bench_get, bench_set, bench_transient_batch);
criterion_main!(benches);
