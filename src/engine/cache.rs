//! Transient whole-process unit snapshot.
//!
//! Dependent discovery needs the full set of live units, and a removal
//! cascade triggers nested removals that need the *same* view. The cache is
//! populated by the outermost removal, reused by every nested one, and
//! guaranteed cleared when the outermost call exits on any path.

use parking_lot::Mutex;

/// Short-lived snapshot of every loaded unit in the process.
///
/// `None` means inactive (no removal in progress). Active-but-empty is a
/// valid state for a host that enumerates zero units, which is why activity
/// is not inferred from emptiness.
#[derive(Debug)]
pub struct EnumerationCache<U> {
    inner: Mutex<Option<Vec<U>>>,
}

impl<U: Clone> EnumerationCache<U> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// Populate the cache if inactive, running `populate` exactly when this
    /// call becomes the owner. The returned guard clears the cache on drop
    /// only if it populated it, so nested calls reuse the outer snapshot
    /// and cleanup happens once, at the true outermost exit.
    pub fn enumerated(&self, populate: impl FnOnce() -> Vec<U>) -> Snapshot<'_, U> {
        let owner = {
            let mut inner = self.inner.lock();
            if inner.is_none() {
                *inner = Some(populate());
                true
            } else {
                false
            }
        };
        Snapshot { cache: self, owner }
    }

    /// Clone of the current snapshot (empty when inactive). Iteration
    /// happens over the clone while recursive removals mutate the cache.
    pub fn units(&self) -> Vec<U> {
        self.inner.lock().clone().unwrap_or_default()
    }

    /// Evict snapshot entries failing `keep`. No-op while inactive.
    pub fn retain(&self, keep: impl FnMut(&U) -> bool) {
        if let Some(units) = self.inner.lock().as_mut() {
            units.retain(keep);
        }
    }

    /// Whether a snapshot is currently held.
    pub fn is_active(&self) -> bool {
        self.inner.lock().is_some()
    }
}

impl<U: Clone> Default for EnumerationCache<U> {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped handle to an active snapshot; see [`EnumerationCache::enumerated`].
#[must_use]
pub struct Snapshot<'a, U> {
    cache: &'a EnumerationCache<U>,
    owner: bool,
}

impl<U> Drop for Snapshot<'_, U> {
    fn drop(&mut self) {
        if self.owner {
            *self.cache.inner.lock() = None;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_by_default() {
        let cache: EnumerationCache<u32> = EnumerationCache::new();
        assert!(!cache.is_active());
        assert!(cache.units().is_empty());
    }

    #[test]
    fn test_outermost_populates_and_clears() {
        let cache = EnumerationCache::new();
        {
            let _snap = cache.enumerated(|| vec![1, 2, 3]);
            assert!(cache.is_active());
            assert_eq!(cache.units(), vec![1, 2, 3]);
        }
        assert!(!cache.is_active());
    }

    #[test]
    fn test_nested_call_reuses_outer_snapshot() {
        let cache = EnumerationCache::new();
        let _outer = cache.enumerated(|| vec![1, 2]);
        {
            // Inner populate must not run; the drop must not clear.
            let _inner = cache.enumerated(|| unreachable!("nested populate"));
            assert_eq!(cache.units(), vec![1, 2]);
        }
        assert!(cache.is_active());
        assert_eq!(cache.units(), vec![1, 2]);
    }

    #[test]
    fn test_cleared_on_failure_path() {
        let cache = EnumerationCache::new();
        let failing = || -> Result<(), ()> {
            let _snap = cache.enumerated(|| vec![7]);
            Err(())
        };
        assert!(failing().is_err());
        assert!(!cache.is_active());
    }

    #[test]
    fn test_retain_evicts_from_snapshot() {
        let cache = EnumerationCache::new();
        let _snap = cache.enumerated(|| vec![1, 2, 3]);
        cache.retain(|n| *n != 2);
        assert_eq!(cache.units(), vec![1, 3]);
    }

    #[test]
    fn test_retain_inactive_is_noop() {
        let cache: EnumerationCache<u32> = EnumerationCache::new();
        cache.retain(|_| false);
        assert!(!cache.is_active());
    }

    #[test]
    fn test_empty_snapshot_is_still_active() {
        let cache: EnumerationCache<u32> = EnumerationCache::new();
        let _snap = cache.enumerated(Vec::new);
        assert!(cache.is_active());
        {
            let _inner = cache.enumerated(|| unreachable!("nested populate"));
        }
        assert!(cache.is_active());
    }
}
