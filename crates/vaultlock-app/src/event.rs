//! Screen lifecycle events.
//!
//! This module defines [`ScreenEvent`], the lifecycle inputs that drive a
//! [`crate::Coordinator`]. They come from the host toolkit (create, resume,
//! destroy) and from the lock listener registry (lock).

use vaultlock_core::LockEvent;

/// Events processed by the screen coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    /// Screen is being created.
    Create {
        /// Recreated from saved state after the process was killed.
        restored: bool,
    },

    /// Screen regained foreground focus.
    Resume,

    /// Lock broadcast delivered through the registry.
    Lock(LockEvent),

    /// Screen is being destroyed, whatever the cause.
    Destroy,
}
