// Copyright 2024 Persistent Collections Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Pluggable hashing strategy used to spread HAMT keys across the trie.
///
/// Implementations only need to be deterministic for a given process run;
/// the HAMT never persists a hash across runs, so stability across builds
/// (unlike `Hash` + `Hasher` contracts that ship bytes over the wire) is not
/// required.
pub trait HashAlgorithm {
    fn hash<K: Hash + ?Sized>(key: &K) -> u64;
}

/// Default algorithm: the standard library's SipHash-backed [`DefaultHasher`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SipHashAlgorithm;

impl HashAlgorithm for SipHashAlgorithm {
    fn hash<K: Hash + ?Sized>(key: &K) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }
}
