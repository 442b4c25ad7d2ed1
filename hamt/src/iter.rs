// Copyright 2024 Persistent Collections Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::node::{Node, Pointer};

/// A restartable, lazy walk over a HAMT's key/value pairs. Order is
/// bitmap/slot order at each depth, depth-first; stable across repeated
/// iterations of the same value, unspecified otherwise.
pub struct Iter<'a, K, V> {
    // (node, next slot index, position within that slot's bucket if any)
    stack: Vec<(&'a Node<K, V>, usize, usize)>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(root: &'a Node<K, V>) -> Self {
        Iter {
            stack: vec![(root, 0, 0)],
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, slot_idx, bucket_pos) = self.stack.last_mut()?;
            let slots = node.slots();
            if *slot_idx >= slots.len() {
                self.stack.pop();
                continue;
            }
            match &slots[*slot_idx] {
                Pointer::Values(bucket) => {
                    if *bucket_pos < bucket.len() {
                        let (k, v) = &bucket[*bucket_pos];
                        *bucket_pos += 1;
                        return Some((k, v));
                    }
                    *slot_idx += 1;
                    *bucket_pos = 0;
                }
                Pointer::Link(child) => {
                    *slot_idx += 1;
                    *bucket_pos = 0;
                    self.stack.push((child, 0, 0));
                }
            }
        }
    }
}
