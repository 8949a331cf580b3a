//! Host-runtime callback contracts.
//!
//! The engine never owns a unit — the host does. Everything the engine needs
//! from the live runtime (name resolution, namespace scans, the actual
//! load/deregister primitives, structural queries) comes through
//! [`HostRuntime`], and everything external caches need to hear about a
//! removal goes out through [`RepairHook`].
//!
//! All methods take `&self`: the engine runs on the host's code-loading
//! thread and recursion is the only form of reentry, so hosts keep whatever
//! interior mutability they need behind their own locks.

use crate::unit::UnitName;

// =============================================================================
// HostRuntime
// =============================================================================

/// The primitives a host runtime must supply.
pub trait HostRuntime {
    /// Handle to a live unit object. Equality must mean object identity:
    /// two handles compare equal iff they denote the same live unit, so a
    /// re-created unit under an old name compares unequal to a stale handle.
    type Unit: Clone + PartialEq;

    /// Whatever the host's loader returns on success. Passed through
    /// [`interception`](crate::Reloader::intercepted_load) unchanged.
    type LoadResult;

    /// Parse and execute the file at `path`, registering whatever units it
    /// defines. May fail; the failure is propagated to the caller unchanged.
    fn load_file(&self, path: &str) -> anyhow::Result<Self::LoadResult>;

    /// Full scan of every currently loaded, named unit in the process.
    fn enumerate_units(&self) -> Vec<Self::Unit>;

    /// Name lookup. Never fails: a host whose lookup can error maps any
    /// error on a malformed or stale name to `None`.
    fn resolve(&self, name: &UnitName) -> Option<Self::Unit>;

    /// Remove `name` from the live namespace. `Ok(None)` when the name was
    /// not registered. An `Err` here is fatal and aborts the removal batch.
    fn deregister(&self, name: &UnitName) -> anyhow::Result<Option<Self::Unit>>;

    /// Externally maintained allowlist of units eligible for forced removal
    /// even without a file-change signal.
    fn explicitly_unloadable(&self) -> Vec<UnitName>;

    /// The master set of unit names this system tracks for unloading
    /// (typically "everything the host auto-loaded").
    fn tracked_units(&self) -> Vec<UnitName>;

    /// Drop `name` from the master tracked set.
    fn forget_tracked(&self, name: &UnitName);

    /// Mark `path` as not-yet-loaded again, so the host's next reference to
    /// one of its units re-triggers a load.
    fn mark_not_loaded(&self, path: &str);

    // -------------------------------------------------------------------------
    // Structural queries
    // -------------------------------------------------------------------------

    /// Current qualified name of a unit, `None` for anonymous units.
    fn unit_name(&self, unit: &Self::Unit) -> Option<UnitName>;

    /// Whether the unit is namespace-like (a module/class rather than a
    /// plain value). Only namespace-like units cascade to dependents.
    fn is_namespace(&self, unit: &Self::Unit) -> bool;

    /// Whether the unit is a class (narrows cascade to direct subclasses).
    fn is_class(&self, unit: &Self::Unit) -> bool;

    /// Whether `unit` is a proper structural descendant of `of`
    /// (subtype/inclusion, excluding `unit == of`).
    fn is_strict_subtype(&self, unit: &Self::Unit, of: &Self::Unit) -> bool;

    /// Direct supertype of a unit (the superclass for classes), if any.
    fn direct_parent(&self, unit: &Self::Unit) -> Option<Self::Unit>;
}

// =============================================================================
// RepairHook
// =============================================================================

/// Back-reference repair callback for external registries.
///
/// Caches outside this system (reflection metadata, subtype registries, an
/// ORM's subclass list) may hold references to a unit about to be removed.
/// Each registered hook is invoked with the doomed unit strictly before the
/// host deregisters it, and scrubs its own cache:
///
/// ```ignore
/// struct SubtypeRegistryRepair(Arc<SubtypeRegistry>);
///
/// impl<H: HostRuntime<Unit = Handle>> RepairHook<H> for SubtypeRegistryRepair {
///     fn on_unit_removed(&self, _host: &H, unit: &Handle) {
///         self.0.drop_entries_for(unit);
///     }
/// }
/// ```
///
/// A hook must be safe to call for units it holds no reference to (the
/// common case): scrubbing nothing is a valid repair.
pub trait RepairHook<H: HostRuntime> {
    /// Called once per removed namespace-like unit, before deregistration.
    fn on_unit_removed(&self, host: &H, unit: &H::Unit);
}

// =============================================================================
// MockHost (test support)
// =============================================================================
