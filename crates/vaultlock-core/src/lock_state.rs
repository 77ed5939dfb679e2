//! Observable vault lock state.

use crate::SessionId;

/// Point-in-time view of the vault lock.
///
/// Readers receive copies; only [`crate::LockController`] produces new
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockState {
    locked: bool,
    session: SessionId,
}

impl Default for LockState {
    fn default() -> Self {
        Self::new()
    }
}

impl LockState {
    /// A locked vault that has never been unlocked.
    pub const fn new() -> Self {
        Self { locked: true, session: SessionId::INITIAL }
    }

    /// Whether the vault is currently locked.
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Generation of the most recent unlock.
    pub const fn current_session(&self) -> SessionId {
        self.session
    }

    /// Transition to locked. Returns `false` if already locked.
    pub(crate) fn lock(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.locked = true;
        true
    }

    /// Transition to unlocked, starting a new session. `None` if already
    /// unlocked.
    pub(crate) fn unlock(&mut self) -> Option<SessionId> {
        if !self.locked {
            return None;
        }
        self.locked = false;
        self.session = self.session.next();
        Some(self.session)
    }
}

/// Notification delivered to lock listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LockEvent {
    /// Vault is now locked (`false` on unlock).
    pub locked: bool,
    /// The lock was requested by the user rather than a timer or external
    /// trigger.
    pub user_initiated: bool,
}

impl LockEvent {
    /// Event for a lock transition.
    pub const fn locked(user_initiated: bool) -> Self {
        Self { locked: true, user_initiated }
    }

    /// Event for an unlock transition.
    pub const fn unlocked() -> Self {
        Self { locked: false, user_initiated: false }
    }
}
