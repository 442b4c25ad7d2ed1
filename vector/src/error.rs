// Copyright 2024 Persistent Collections Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// Failure modes of the vector trie engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("index {index} out of range for trie of size {size}")]
    OutOfRange { index: usize, size: usize },

    #[error("bad argument: {0}")]
    BadArgument(String),

    #[error("operation attempted on a transient that has already been persisted")]
    InvalidTransient,
}
