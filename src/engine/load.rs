//! Load interception: associate newly defined units with the loaded file.
//!
//! A pure observational wrapper around the host's loader. The tracked-unit
//! set is captured before the load, the loader runs (its result or failure
//! passes through unchanged), and the after-minus-before difference is what
//! the file registry learns about.

use rustc_hash::FxHashSet;

use crate::host::HostRuntime;
use crate::unit::UnitName;

use super::Reloader;

impl<H: HostRuntime> Reloader<H> {
    /// Load `path` through the host, recording which units it defined.
    ///
    /// Propagates the host loader's result/failure unchanged; on failure no
    /// units are recorded.
    pub fn intercepted_load(&self, path: &str) -> anyhow::Result<H::LoadResult> {
        let before: FxHashSet<UnitName> = self.host.tracked_units().into_iter().collect();

        let result = self.host.load_file(path)?;

        let new_units: FxHashSet<UnitName> = self
            .host
            .tracked_units()
            .into_iter()
            .filter(|n| !before.contains(n))
            .collect();
        if !new_units.is_empty() {
            crate::debug!("load"; "`{path}` defined {} new unit(s)", new_units.len());
            self.registry.lock().record_load(path, &new_units);
        }
        Ok(result)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock::{MockHost, UnitKind};
    use rustc_hash::FxHashSet;

    fn units(names: &[&str]) -> FxHashSet<UnitName> {
        names.iter().map(|n| UnitName::new(n)).collect()
    }

    fn reloader(host: MockHost) -> Reloader<MockHost> {
        Reloader::new(host, ".src")
    }

    #[test]
    fn test_load_records_new_units() {
        let host = MockHost::new();
        host.script_load(
            "a.src",
            &[("A", UnitKind::Namespace, None), ("A::B", UnitKind::Value, None)],
        );
        let engine = reloader(host);

        let defined = engine.intercepted_load("a.src").unwrap();
        assert_eq!(defined, 2);
        assert_eq!(engine.registry().units_defined_by("a.src"), units(&["A", "A::B"]));
    }

    #[test]
    fn test_reload_without_new_units_changes_nothing() {
        let host = MockHost::new();
        host.script_load("b.src", &[("C", UnitKind::Namespace, None)]);
        let engine = reloader(host);

        engine.intercepted_load("b.src").unwrap();
        // Host dedupes: the reload defines nothing new.
        let defined = engine.intercepted_load("b.src").unwrap();

        assert_eq!(defined, 0);
        assert_eq!(engine.registry().len(), 1);
        assert_eq!(engine.registry().units_defined_by("b.src"), units(&["C"]));
    }

    #[test]
    fn test_load_of_empty_file_records_nothing() {
        let host = MockHost::new();
        host.script_load("empty.src", &[]);
        let engine = reloader(host);

        engine.intercepted_load("empty.src").unwrap();
        assert!(engine.registry().is_empty());
    }

    #[test]
    fn test_load_failure_propagates_and_records_nothing() {
        let host = MockHost::new();
        let engine = reloader(host);

        let err = engine.intercepted_load("missing.src").unwrap_err();
        assert!(err.to_string().contains("missing.src"));
        assert!(engine.registry().is_empty());
    }

    #[test]
    fn test_units_already_tracked_are_not_reassociated() {
        let host = MockHost::new();
        // `Shared` exists before the load; only `Fresh` is new.
        host.define("Shared", UnitKind::Namespace, None);
        host.script_load(
            "f.src",
            &[("Shared", UnitKind::Namespace, None), ("Fresh", UnitKind::Value, None)],
        );
        let engine = reloader(host);

        engine.intercepted_load("f.src").unwrap();
        assert_eq!(engine.registry().units_defined_by("f.src"), units(&["Fresh"]));
    }
}
