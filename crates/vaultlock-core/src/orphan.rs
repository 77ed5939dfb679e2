//! Orphan detection for restored screens.
//!
//! When the host kills the process while a screen is open and later restores
//! that screen from saved state, the in-memory session the screen remembers
//! is gone. If the vault is locked at that point the screen has nothing valid
//! to show: it must reset navigation to the root screen and terminate.
//!
//! Screens opened normally (not restored) are never orphans, and neither are
//! the safe kinds that work without an unlocked session.

use crate::{LockState, ScreenKind, SessionId};

/// Inputs of the orphan decision for one screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrphanCheck {
    /// Kind of the screen being created.
    pub kind: ScreenKind,
    /// Session generation captured when the screen was constructed.
    pub created_in: SessionId,
    /// Screen is being recreated from saved state after process death.
    pub restored: bool,
}

impl OrphanCheck {
    /// Evaluate against the current lock state.
    pub fn evaluate(&self, lock: &LockState) -> bool {
        let orphan = is_orphan(self.kind, self.created_in, self.restored, lock.is_locked());
        if orphan {
            tracing::debug!(
                kind = %self.kind,
                created_in = %self.created_in,
                current = %lock.current_session(),
                "restored screen outlived its session"
            );
        }
        orphan
    }
}

/// Whether a screen being created must redirect to the root and terminate.
///
/// True iff the screen is restored from saved state, is not one of the safe
/// kinds, and the vault is locked. The creation session does not change the
/// outcome: after process death any remembered session is gone.
pub fn is_orphan(kind: ScreenKind, _created_in: SessionId, restored: bool, locked: bool) -> bool {
    restored && !kind.is_safe() && locked
}
