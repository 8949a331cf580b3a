//! Reentrancy guard for in-progress removals.
//!
//! Removing a unit discovers structurally related units and removes them
//! first; a structural cycle would otherwise re-enter the original removal
//! forever. The guard tracks the names mid-removal and declines re-entry.

use parking_lot::Mutex;
use rustc_hash::FxHashSet;

use crate::unit::UnitName;

/// Set of unit names currently being removed.
#[derive(Debug, Default)]
pub struct RemovalGuard {
    in_progress: Mutex<FxHashSet<UnitName>>,
}

impl RemovalGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `name` for removal. `None` when the name is already mid-removal
    /// (the caller skips the whole removal). The token releases the claim on
    /// drop, whether the removal succeeds or fails.
    pub fn enter(&self, name: &UnitName) -> Option<RemovalToken<'_>> {
        if !self.in_progress.lock().insert(name.clone()) {
            return None;
        }
        Some(RemovalToken {
            guard: self,
            name: name.clone(),
        })
    }

    /// Whether `name` is currently being removed.
    pub fn is_removing(&self, name: &UnitName) -> bool {
        self.in_progress.lock().contains(name)
    }
}

/// Claim on one in-progress removal; see [`RemovalGuard::enter`].
#[must_use]
pub struct RemovalToken<'a> {
    guard: &'a RemovalGuard,
    name: UnitName,
}

impl Drop for RemovalToken<'_> {
    fn drop(&mut self) {
        self.guard.in_progress.lock().remove(&self.name);
    }
}

// =============================================================================
// Tests
// =============================================================================
