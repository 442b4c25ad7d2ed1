// Copyright 2024 Persistent Collections Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// Failure modes surfaced by [`crate::Vector`] and [`crate::Map`].
///
/// Mirrors the error kinds of the two engine crates (`imm_vector_trie`,
/// `imm_hamt_trie`) in one place, since a caller working with the public
/// facades shouldn't need to match on two different crates' error types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("index {index} out of range for a collection of size {size}")]
    OutOfRange { index: usize, size: usize },

    #[error("key not found")]
    KeyNotFound,

    #[error("bad argument: {0}")]
    BadArgument(String),

    #[error("operation attempted on a transient that has already been persisted")]
    InvalidTransient,
}

impl From<imm_vector_trie::Error> for Error {
    fn from(err: imm_vector_trie::Error) -> Self {
        match err {
            imm_vector_trie::Error::OutOfRange { index, size } => {
                Error::OutOfRange { index, size }
            }
            imm_vector_trie::Error::BadArgument(msg) => Error::BadArgument(msg),
            imm_vector_trie::Error::InvalidTransient => Error::InvalidTransient,
        }
    }
}

impl From<imm_hamt_trie::Error> for Error {
    fn from(err: imm_hamt_trie::Error) -> Self {
        match err {
            imm_hamt_trie::Error::KeyNotFound => Error::KeyNotFound,
            imm_hamt_trie::Error::InvalidTransient => Error::InvalidTransient,
        }
    }
}
