//! Core error types.

use thiserror::Error;

use crate::ScreenId;

/// Errors reported by the [`crate::ListenerRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Screen registered a second time without unregistering first.
    ///
    /// Programming error in the caller. Debug builds abort on the spot;
    /// release builds keep the newer listener and report this as a signal.
    #[error("{0} is already registered for lock events")]
    AlreadyRegistered(ScreenId),
}
