//! Deterministic simulation harness for vault lock coordination.
//!
//! [`SimHost`] implements the [`vaultlock_app::Host`] trait by recording
//! every call, so the same [`vaultlock_app::Runtime`] orchestration that runs
//! on a device runs unchanged in tests. [`SimWorld`] bundles a runtime with
//! the lock controller and can simulate process death.
//!
//! # Invariant Testing
//!
//! The `invariants` module checks behavioral properties against a
//! [`SystemSnapshot`] of the runtime. Use [`InvariantRegistry::standard()`]
//! for the lock coordination invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod sim_host;
pub mod world;

pub use invariants::{
    Invariant, InvariantKind, InvariantRegistry, InvariantResult, LockResponseHonoured,
    RegistryMatchesLiveScreens, ScreenSnapshot, SessionMonotonicity, SuppressionClearedOnResume,
    SystemSnapshot, Violation,
};
pub use sim_host::{HostCall, SimHost};
pub use world::SimWorld;
