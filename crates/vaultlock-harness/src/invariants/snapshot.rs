//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of a runtime at a point in time.
//! Invariants operate on snapshots rather than live state so every check
//! sees one consistent view.

use vaultlock_app::{Host, LockResponse, Runtime, ScreenPhase};
use vaultlock_core::{ScreenId, ScreenKind, SessionId};

/// Snapshot of the whole lock coordination state.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    /// Whether the vault is locked.
    pub locked: bool,
    /// Current session generation.
    pub session: SessionId,
    /// Whether auto-lock is suppressed.
    pub suppressed: bool,
    /// Screens with a registered lock listener, ascending.
    pub registered: Vec<ScreenId>,
    /// Open screens, ascending by identifier.
    pub screens: Vec<ScreenSnapshot>,
    /// Every session generation observed so far, in observation order.
    pub session_history: Vec<SessionId>,
    /// Taken right after a screen resumed.
    pub after_resume: bool,
}

impl SystemSnapshot {
    /// Create an empty snapshot (no screens, vault locked).
    pub fn empty() -> Self {
        Self { locked: true, ..Self::default() }
    }

    /// Capture the observable state of a runtime.
    pub fn capture<H: Host>(runtime: &Runtime<H>) -> Self {
        let context = runtime.context();
        let lock = context.lock_state();

        Self {
            locked: lock.is_locked(),
            session: lock.current_session(),
            suppressed: context.suppressor().is_suppressed(),
            registered: context.registry().registered_ids(),
            screens: runtime.screens().map(ScreenSnapshot::from_coordinator).collect(),
            session_history: vec![lock.current_session()],
            after_resume: false,
        }
    }

    /// Mark the snapshot as taken right after a resume.
    #[must_use]
    pub fn after_resume(mut self) -> Self {
        self.after_resume = true;
        self
    }

    /// Replace the observed session history.
    #[must_use]
    pub fn with_session_history(mut self, history: Vec<SessionId>) -> Self {
        self.session_history = history;
        self
    }

    /// Add a screen snapshot.
    pub fn add_screen(&mut self, screen: ScreenSnapshot) {
        self.screens.push(screen);
    }
}

/// Snapshot of one open screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSnapshot {
    /// Screen identifier.
    pub id: ScreenId,
    /// Screen kind.
    pub kind: ScreenKind,
    /// Lifecycle phase.
    pub phase: ScreenPhase,
    /// Configured reaction to locks.
    pub lock_response: LockResponse,
    /// Lock broadcasts received while live.
    pub locks_observed: u32,
    /// Session generation at creation.
    pub created_in: SessionId,
}

impl ScreenSnapshot {
    /// A freshly registered screen of the given kind, with its kind's
    /// default lock response.
    pub fn registered(id: ScreenId, kind: ScreenKind) -> Self {
        Self {
            id,
            kind,
            phase: ScreenPhase::Registered,
            lock_response: vaultlock_app::ScreenConfig::for_kind(kind).lock_response,
            locks_observed: 0,
            created_in: SessionId::INITIAL,
        }
    }

    /// Set the lifecycle phase.
    #[must_use]
    pub fn with_phase(mut self, phase: ScreenPhase) -> Self {
        self.phase = phase;
        self
    }

    /// Set the number of observed locks.
    #[must_use]
    pub fn with_locks_observed(mut self, locks: u32) -> Self {
        self.locks_observed = locks;
        self
    }

    fn from_coordinator(coordinator: &vaultlock_app::Coordinator) -> Self {
        Self {
            id: coordinator.id(),
            kind: coordinator.kind(),
            phase: coordinator.phase(),
            lock_response: coordinator.config().lock_response,
            locks_observed: coordinator.locks_observed(),
            created_in: coordinator.created_in(),
        }
    }
}
