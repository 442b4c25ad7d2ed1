// Copyright 2024 Persistent Collections Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use imm_vector_trie::Trie;

fn build_trie(size: usize) -> Trie<u64> {
    let elements: Vec<u64> = (0..size as u64).collect();
    Trie::from_full_elements(&elements).unwrap()
}

fn bench_get(c: &mut Criterion) {
    let trie = build_trie(32 * 32 * 32);
    c.bench_function("trie get", |b| {
        b.iter(|| {
            for i in (0..trie.size()).step_by(97) {
                black_box(trie.get(i).unwrap());
            }
        })
    });
}

fn bench_push_leaf(c: &mut Criterion) {
    let trie = build_trie(32 * 32 * 32);
    let leaf: Vec<u64> = (0..32).collect();
    c.bench_function("trie push_leaf", |b| {
        b.iter(|| black_box(trie.push_leaf(leaf.clone()).unwrap()))
    });
}

fn bench_transient_batch(c: &mut Criterion) {
    let elements: Vec<u64> = (0..32 * 512).collect();
    c.bench_function("transient batch of 512 leaves", |b| {
        b.iter(|| {
            let owner = imm_bitops::next_owner_id();
            let mut t = Trie::<u64>::empty().transient(owner);
            for chunk in elements.chunks(32) {
                t.push_leaf(chunk.to_vec()).unwrap();
            }
            black_box(t.persist())
        })
    });
}

criterion_group!(benches, bench_get, bench_push_leaf, bench_transient_batch);
criterion_main!(benches);
