//! Simulated process hosting a runtime and its lock controller.
//!
//! [`SimWorld`] plays the parts of the system that sit outside the runtime:
//! the unlock flow and the inactivity timer (through the [`LockController`]),
//! and the operating system killing and restoring the process.

use std::sync::Arc;

use vaultlock_app::{CoordinatorError, Preferences, Runtime};
use vaultlock_core::{LockController, ScreenId, ScreenKind, SessionId, VaultContext};

use crate::{SimHost, SystemSnapshot};

/// A runtime, its controller and the session generations it went through.
pub struct SimWorld {
    runtime: Runtime<SimHost>,
    controller: LockController,
    session_history: Vec<SessionId>,
    restarts: u32,
}

impl SimWorld {
    /// Start a fresh process (vault locked) on the given host.
    pub fn new(host: SimHost) -> Self {
        Self::with_preferences(host, Preferences::default())
    }

    /// Start a fresh process with explicit preferences.
    pub fn with_preferences(host: SimHost, preferences: Preferences) -> Self {
        let (context, controller) = VaultContext::new();
        let session_history = vec![context.current_session()];
        Self {
            runtime: Runtime::new(host, context, preferences),
            controller,
            session_history,
            restarts: 0,
        }
    }

    /// User lock. Returns whether the vault locked.
    pub fn lock(&mut self) -> bool {
        let locked = self.controller.lock(true);
        self.runtime.pump();
        locked
    }

    /// Inactivity or screen-off lock. Returns whether the vault locked.
    pub fn auto_lock(&mut self) -> bool {
        let locked = self.controller.auto_lock();
        self.runtime.pump();
        locked
    }

    /// Unlock the vault, starting a new session.
    pub fn unlock(&mut self) -> Option<SessionId> {
        let session = self.controller.unlock()?;
        self.runtime.pump();
        self.session_history.push(session);
        Some(session)
    }

    /// Open a screen in the running process.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::UnknownScreen`] if `parent` is not open.
    pub fn open(
        &mut self,
        kind: ScreenKind,
        parent: Option<ScreenId>,
    ) -> Result<ScreenId, CoordinatorError> {
        self.runtime.open_screen(kind, parent, false)
    }

    /// Kill the process and let the system restore the given screens.
    ///
    /// Lock state, suppression and registrations are lost; the new process
    /// starts locked. Each kind is recreated as a restored screen, in order.
    /// Returns the identifiers of the restored screens still open afterwards.
    ///
    /// # Errors
    ///
    /// Propagates failures from reopening a screen.
    pub fn restart(&mut self, restore: &[ScreenKind]) -> Result<Vec<ScreenId>, CoordinatorError> {
        let host = self.runtime.host().clone();
        let preferences = self.runtime.preferences().clone();
        let (context, controller) = VaultContext::new();

        tracing::info!(restore = restore.len(), "process restarted");
        self.runtime = Runtime::new(host, Arc::clone(&context), preferences);
        self.controller = controller;
        self.session_history = vec![context.current_session()];
        self.restarts += 1;

        let mut restored = Vec::with_capacity(restore.len());
        for kind in restore {
            restored.push(self.runtime.open_screen(*kind, None, true)?);
        }

        // An orphan clears the whole task, including screens restored before it.
        restored.retain(|id| self.runtime.screen(*id).is_some());
        Ok(restored)
    }

    /// Snapshot of the current state with the session history of the
    /// current process.
    pub fn snapshot(&self) -> SystemSnapshot {
        SystemSnapshot::capture(&self.runtime).with_session_history(self.session_history.clone())
    }

    /// The runtime under test.
    pub fn runtime(&self) -> &Runtime<SimHost> {
        &self.runtime
    }

    /// Mutable access to the runtime under test.
    pub fn runtime_mut(&mut self) -> &mut Runtime<SimHost> {
        &mut self.runtime
    }

    /// The simulated host.
    pub fn host(&self) -> &SimHost {
        self.runtime.host()
    }

    /// Shared context of the current process.
    pub fn context(&self) -> &Arc<VaultContext> {
        self.runtime.context()
    }

    /// Number of simulated process deaths.
    pub fn restarts(&self) -> u32 {
        self.restarts
    }
}
