// Copyright 2024 Persistent Collections Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bit-partitioned persistent hash-array-mapped trie.
//!
//! Each node packs a 32-bit bitmap plus a compact, popcount-indexed slot
//! array; a slot holds either a small collision bucket or a link one level
//! deeper (see [`node::Pointer`]). A bucket only turns into a link once a
//! second distinct key actually needs to be distinguished at that depth, so
//! the common case never pays for a whole child node per key.
//!
//! Like the vector trie, mutation is persistent by default (every write
//! clones its path) or transient (in-place once a [`imm_bitops::OwnerId`]
//! proves unique ownership) via [`TransientHamt`]. See
//! [`node::Node::for_mutate`] for the shared mechanism.

mod error;
mod hamt;
mod iter;
mod node;

pub use error::Error;
pub use hamt::{Hamt, TransientHamt};
pub use iter::Iter;
