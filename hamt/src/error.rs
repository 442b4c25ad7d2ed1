// Copyright 2024 Persistent Collections Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// Failure modes of the HAMT engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("key not found")]
    KeyNotFound,

    #[error("operation attempted on a transient that has already been persisted")]
    InvalidTransient,
}
