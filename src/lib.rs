//! Hotswap - live-reload unit invalidation for long-running hosts.
//!
//! Tracks which named units (classes, functions, registered symbols) each
//! loaded source file defined, and when a file changes, forgets exactly
//! those units plus everything structurally dependent on them, so the
//! host's normal lazy-load path recreates them fresh on next reference.
//!
//! # Architecture
//!
//! ```text
//! intercepted_load ──▶ FileRegistry (path → units)
//!                           │
//! unload_changed_files ─────┘──▶ Reloader::remove_unit
//!                                   ├── EnumerationCache (one snapshot per cascade)
//!                                   ├── RemovalGuard     (cycle breaker)
//!                                   ├── RepairHook       (external cache scrub)
//!                                   └── HostRuntime      (resolve / deregister)
//! ```
//!
//! The host runtime is supplied through the [`HostRuntime`] trait; this
//! crate owns only the tracking, never the units themselves. Change
//! detection and scheduling are the embedding application's job: it decides
//! *when* to call [`Reloader::unload_changed_files`] and with what
//! change predicate.

pub mod engine;
pub mod error;
pub mod host;
pub mod logger;
pub mod registry;
pub mod unit;

pub use engine::{Reloader, Removal};
pub use error::UnloadError;
pub use host::{HostRuntime, RepairHook};
pub use registry::{FileRegistry, LoadedFile, normalize_load_path};
pub use unit::UnitName;
