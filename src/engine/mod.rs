//! Cascading removal engine.
//!
//! # Architecture
//!
//! ```text
//! Reloader
//! ├── host:       the live runtime (resolve / enumerate / deregister)
//! ├── registry:   file → units bookkeeping (pruned as units go)
//! ├── units:      enumeration cache, one snapshot per outermost removal
//! ├── in_removal: reentrancy guard breaking structural cycles
//! └── hooks:      external back-reference repair callbacks
//!
//! remove_unit(name):
//! 1. snapshot units, claim name in the guard (skip if already claimed)
//! 2. resolve name; a miss is fine (already gone), skip to 4
//! 3. for namespace-like units:
//!    a. remove structural dependents first (post-order)
//!    b. run repair hooks (before the unit disappears)
//!    c. remove lexically nested names the scan missed
//! 4. host deregister (failure is fatal and propagates)
//! 5. forget the name everywhere (master set, snapshot, file registry)
//! ```

pub mod cache;
pub mod guard;
mod load;

use parking_lot::{Mutex, MutexGuard};
use smallvec::SmallVec;

use crate::error::UnloadError;
use crate::host::{HostRuntime, RepairHook};
use crate::registry::FileRegistry;
use crate::unit::UnitName;
use cache::EnumerationCache;
use guard::RemovalGuard;

// =============================================================================
// Removal
// =============================================================================

/// Outcome of one [`Reloader::remove_unit`] call.
#[derive(Debug)]
pub enum Removal<U> {
    /// The host's deregister primitive ran; its result is passed through
    /// (`None` when the name was no longer registered).
    Removed(Option<U>),
    /// The name was already mid-removal; nothing was done.
    Skipped,
}

impl<U> Removal<U> {
    /// Whether the reentrancy guard declined this removal.
    pub fn was_skipped(&self) -> bool {
        matches!(self, Removal::Skipped)
    }
}

// =============================================================================
// Reloader
// =============================================================================

/// Live-reload state: file bookkeeping plus the removal machinery.
///
/// One instance per process, constructed at startup and passed by reference
/// into every operation. All methods take `&self`; the process-wide mutable
/// structures sit behind their own locks so recursive removals compose.
pub struct Reloader<H: HostRuntime> {
    host: H,
    registry: Mutex<FileRegistry>,
    units: EnumerationCache<H::Unit>,
    in_removal: RemovalGuard,
    hooks: Vec<Box<dyn RepairHook<H>>>,
}

impl<H: HostRuntime> Reloader<H> {
    /// Create a reloader over `host`. `source_suffix` is the trailing source
    /// extension stripped off registry keys (e.g. `.src`).
    pub fn new(host: H, source_suffix: impl Into<String>) -> Self {
        Self {
            host,
            registry: Mutex::new(FileRegistry::new(source_suffix)),
            units: EnumerationCache::new(),
            in_removal: RemovalGuard::new(),
            hooks: Vec::new(),
        }
    }

    /// Register an external back-reference repair hook. Hooks run for every
    /// removed namespace-like unit, strictly before its deregistration.
    pub fn add_repair_hook(&mut self, hook: impl RepairHook<H> + 'static) {
        self.hooks.push(Box::new(hook));
    }

    /// The wrapped host runtime.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The file registry (locked).
    pub fn registry(&self) -> MutexGuard<'_, FileRegistry> {
        self.registry.lock()
    }

    // -------------------------------------------------------------------------
    // Removal
    // -------------------------------------------------------------------------

    /// Remove `name` and everything structurally dependent on it.
    ///
    /// Dependents go first (post-order), external caches are repaired before
    /// the unit disappears, and all bookkeeping is scrubbed afterwards.
    /// Idempotent: a second call for an already-gone name is a cheap no-op.
    pub fn remove_unit(&self, name: &UnitName) -> Result<Removal<H::Unit>, UnloadError> {
        let _snapshot = self.units.enumerated(|| self.host.enumerate_units());
        let Some(_claim) = self.in_removal.enter(name) else {
            crate::debug!("unload"; "`{name}` already being removed, skipping");
            return Ok(Removal::Skipped);
        };
        self.remove_claimed(name)
    }

    /// Remove every unit on the host's explicit-unload allowlist.
    pub fn unload_explicitly_unloadable(&self) -> Result<(), UnloadError> {
        for name in self.host.explicitly_unloadable() {
            self.remove_unit(&name)?;
        }
        Ok(())
    }

    /// Remove every unit defined by a tracked file whose path satisfies
    /// `is_changed`. The first fatal failure aborts the batch.
    pub fn unload_changed_files(
        &self,
        is_changed: impl Fn(&str) -> bool,
    ) -> Result<(), UnloadError> {
        let changed = self.registry.lock().changed_files(is_changed);
        for (path, units) in changed {
            crate::debug!("unload"; "`{path}` changed, removing {} unit(s)", units.len());
            for name in units {
                self.remove_unit(&name)?;
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Private
    // -------------------------------------------------------------------------

    /// Body of a removal, after the cache and guard claims.
    fn remove_claimed(&self, name: &UnitName) -> Result<Removal<H::Unit>, UnloadError> {
        // A resolution miss means the unit is already gone; bookkeeping
        // below still runs against the literal name.
        if let Some(object) = self.host.resolve(name)
            && self.host.is_namespace(&object)
        {
            self.remove_dependents(&object)?;
            for hook in &self.hooks {
                hook.on_unit_removed(&self.host, &object);
            }
            self.remove_nested(name)?;
        }

        let removed = self
            .host
            .deregister(name)
            .map_err(|source| UnloadError::Deregister {
                name: name.clone(),
                source,
            })?;
        crate::debug!("unload"; "removed `{name}`");

        self.clear_tracks(name);
        Ok(Removal::Removed(removed))
    }

    /// Remove every enumerable unit that structurally descends from
    /// `parent`, before `parent` itself goes.
    ///
    /// Namespace units cascade to any strict subtype. Class units cascade
    /// only to direct subclasses (each subclass then cascades to its own);
    /// relaxing this would widen cascade scope over deep hierarchies.
    fn remove_dependents(&self, parent: &H::Unit) -> Result<(), UnloadError> {
        let snapshot = self.units.units();
        let class_parent = self.host.is_class(parent);

        let mut dependents: SmallVec<[(UnitName, H::Unit); 8]> = SmallVec::new();
        for candidate in snapshot {
            if candidate == *parent || !self.host.is_strict_subtype(&candidate, parent) {
                continue;
            }
            if class_parent && self.host.direct_parent(&candidate).as_ref() != Some(parent) {
                continue;
            }
            let Some(name) = self.host.unit_name(&candidate) else {
                continue;
            };
            dependents.push((name, candidate));
        }

        if !dependents.is_empty() {
            crate::debug!("unload"; "{} dependent(s) discovered", dependents.len());
        }
        for (name, unit) in dependents {
            // Re-verified at removal time: a dependent already torn down by
            // an earlier cascade, or a stale handle whose name resolves to a
            // newer unit, is skipped.
            if self.host.resolve(&name) != Some(unit) {
                continue;
            }
            self.remove_unit(&name)?;
        }
        Ok(())
    }

    /// Remove tracked units lexically nested one level under `parent`
    /// (catches nested units invisible to subtype discovery).
    fn remove_nested(&self, parent: &UnitName) -> Result<(), UnloadError> {
        let nested: Vec<UnitName> = self
            .host
            .tracked_units()
            .into_iter()
            .filter(|n| n.is_direct_child_of(parent))
            .collect();
        for name in nested {
            self.remove_unit(&name)?;
        }
        Ok(())
    }

    /// Scrub `name` from every piece of bookkeeping: master tracked set,
    /// enumeration snapshot, file registry (relaying evicted files to the
    /// host as not-yet-loaded).
    fn clear_tracks(&self, name: &UnitName) {
        self.host.forget_tracked(name);
        self.units
            .retain(|u| self.host.unit_name(u).as_ref() != Some(name));

        let evicted = self.registry.lock().forget_unit(name);
        for path in evicted {
            crate::debug!("unload"; "`{path}` has no units left, marking not loaded");
            self.host.mark_not_loaded(&path);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
