//! Engine error types.

use crate::unit::UnitName;
use thiserror::Error;

/// Fatal failures surfaced by the removal engine.
///
/// Resolution misses and reentrant re-removals are not errors; the engine
/// treats both as "nothing left to do". Only conditions after which the
/// namespace may be inconsistent end up here.
#[derive(Debug, Error)]
pub enum UnloadError {
    /// The host refused to deregister a name.
    ///
    /// Propagated uncaught: the engine cannot guarantee a consistent
    /// namespace once the host declines a removal, so the batch the failure
    /// occurred in aborts at this unit.
    #[error("host failed to deregister `{name}`")]
    Deregister {
        name: UnitName,
        #[source]
        source: anyhow::Error,
    },
}
