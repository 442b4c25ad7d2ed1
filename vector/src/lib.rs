// Copyright 2024 Persistent Collections Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bit-partitioned persistent vector trie.
//!
//! Holds a number of elements that is always a multiple of the branching
//! factor (see [`imm_bitops::WIDTH`]); the partially filled tail block that
//! makes append/pop effectively O(1) lives one layer up, in
//! `imm_collections::Vector`.
//!
//! Every element-mutating call descends one path from root to leaf, cloning
//! each visited node (the persistent path) or reusing it in place when a
//! [`imm_bitops::OwnerId`] proves the caller is the node's sole owner (the
//! transient path, [`TransientTrie`]). See [`node::Node::for_mutate`].

mod error;
mod iter;
mod node;
mod trie;

pub use error::Error;
pub use iter::Iter;
pub use trie::{Trie, TransientTrie};
