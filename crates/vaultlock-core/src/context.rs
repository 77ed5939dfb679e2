//! Process-wide vault context.
//!
//! [`VaultContext`] owns the lock state, the auto-lock suppressor and the
//! listener registry. It is shared with every screen through an [`Arc`];
//! screens read the lock state, toggle suppression and manage their own
//! registration.
//!
//! Lock state has exactly one writer: the [`LockController`] returned
//! alongside the context. It is not `Clone`, so whichever subsystem holds it
//! (unlock flow, inactivity timer, screen-off receiver) is the only code able
//! to lock or unlock the vault.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::sync::{
    Arc, PoisonError, RwLock,
    atomic::{AtomicU64, Ordering},
};

use crate::{AutoLockSuppressor, ListenerRegistry, LockState, ScreenId, SessionId};

/// Shared lock/session context injected into every screen.
#[derive(Debug)]
pub struct VaultContext {
    lock: RwLock<LockState>,
    suppressor: AutoLockSuppressor,
    registry: ListenerRegistry,
    next_screen_id: AtomicU64,
}

impl VaultContext {
    /// Create a context for a fresh process (vault locked) and the single
    /// controller allowed to change its lock state.
    pub fn new() -> (Arc<Self>, LockController) {
        let context = Arc::new(Self {
            lock: RwLock::new(LockState::new()),
            suppressor: AutoLockSuppressor::new(),
            registry: ListenerRegistry::new(),
            next_screen_id: AtomicU64::new(1),
        });
        let controller = LockController { context: Arc::clone(&context) };
        (context, controller)
    }

    /// Current lock state.
    pub fn lock_state(&self) -> LockState {
        *self.lock.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the vault is currently locked.
    pub fn is_locked(&self) -> bool {
        self.lock_state().is_locked()
    }

    /// Generation of the most recent unlock.
    pub fn current_session(&self) -> SessionId {
        self.lock_state().current_session()
    }

    /// Auto-lock suppression flag.
    pub fn suppressor(&self) -> &AutoLockSuppressor {
        &self.suppressor
    }

    /// Lock listener registry.
    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    /// Allocate a fresh screen identifier.
    pub fn allocate_screen_id(&self) -> ScreenId {
        ScreenId::new(self.next_screen_id.fetch_add(1, Ordering::Relaxed))
    }
}

/// Sole writer of the vault lock state.
///
/// Every transition is broadcast through the context's registry after the
/// new state is visible, so listeners observe the post-transition state.
#[derive(Debug)]
pub struct LockController {
    context: Arc<VaultContext>,
}

impl LockController {
    /// Lock the vault and notify listeners.
    ///
    /// Returns `false` (and broadcasts nothing) if the vault was already
    /// locked.
    pub fn lock(&self, user_initiated: bool) -> bool {
        let changed = self.write().lock();
        if !changed {
            tracing::debug!("lock requested but vault already locked");
            return false;
        }

        tracing::info!(user_initiated, "vault locked");
        self.context.registry.broadcast(true, user_initiated);
        true
    }

    /// Lock the vault on behalf of an inactivity timer or external trigger.
    ///
    /// Refused while auto-lock is suppressed; returns whether the vault
    /// locked.
    pub fn auto_lock(&self) -> bool {
        if self.context.suppressor.is_suppressed() {
            tracing::info!("auto-lock skipped, suppressed during external hand-off");
            return false;
        }
        self.lock(false)
    }

    /// Unlock the vault, start a new session, and notify listeners.
    ///
    /// Returns the new session, or `None` if the vault was already unlocked.
    pub fn unlock(&self) -> Option<SessionId> {
        let session = self.write().unlock()?;

        tracing::info!(%session, "vault unlocked");
        self.context.registry.broadcast(false, false);
        Some(session)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, LockState> {
        self.context.lock.write().unwrap_or_else(PoisonError::into_inner)
    }
}
