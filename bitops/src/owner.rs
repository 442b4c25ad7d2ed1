// Copyright 2024 Persistent Collections Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque identity stamped on nodes owned in-place by a single [transient](crate).
///
/// Two [`OwnerId`]s are equal only if they were handed out by the same
/// [`OwnerIdGenerator`] call. The generator hands out strictly increasing
/// values, so a forged or reused id from a different process of the same
/// type can never collide with a live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(u64);

static NEXT_OWNER_ID: AtomicU64 = AtomicU64::new(1);

/// Mints a fresh, process-unique [`OwnerId`] for a newly spawned transient.
pub fn next_owner_id() -> OwnerId {
    OwnerId(NEXT_OWNER_ID.fetch_add(1, Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct() {
        let a = next_owner_id();
        let b = next_owner_id();
        assert_ne!(a, b);
    }
}
