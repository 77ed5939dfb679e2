//! Screen lifecycle state and per-screen configuration.

use std::fmt;

use vaultlock_core::ScreenKind;

/// Lifecycle phase of a screen coordinator.
///
/// ```text
/// Created ─▶ Registered ─▶ Active ⇄ Suppressing
///    │            │           │          │
///    │            └───────────┴──────────┴─▶ Unregistering ─▶ Destroyed
///    └─(orphan)──────────────────────────────────────────────▶ Destroyed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenPhase {
    /// Constructed, not yet checked or registered.
    Created,
    /// Registered for lock events, not yet resumed.
    Registered,
    /// In the foreground.
    Active,
    /// Control handed to an external process; auto-lock suppressed.
    Suppressing,
    /// Teardown in progress.
    Unregistering,
    /// Terminal.
    Destroyed,
}

impl ScreenPhase {
    /// Registered with the lock registry and able to react to events.
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Registered | Self::Active | Self::Suppressing)
    }
}

impl fmt::Display for ScreenPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What a screen does when the vault locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockResponse {
    /// Cancel the screen's result and terminate it with its descendants.
    #[default]
    Terminate,
    /// Keep running. Only meaningful for safe screens such as the root.
    Ignore,
}

/// Per-screen coordinator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenConfig {
    /// Reaction to a lock broadcast.
    pub lock_response: LockResponse,
}

impl ScreenConfig {
    /// Default configuration for a screen kind.
    ///
    /// The root screen handles locking itself (it swaps to the
    /// authentication flow), every other kind terminates.
    pub fn for_kind(kind: ScreenKind) -> Self {
        let lock_response = match kind {
            ScreenKind::Root => LockResponse::Ignore,
            _ => LockResponse::Terminate,
        };
        Self { lock_response }
    }
}
