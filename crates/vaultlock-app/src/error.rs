//! Coordinator error types.

use thiserror::Error;
use vaultlock_core::ScreenId;

use crate::{LaunchError, ScreenPhase};

/// Errors surfaced by screen coordinators and the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    /// External hand-off failed for a capability that is expected to exist.
    ///
    /// Auto-lock suppression stays in place until the screen resumes.
    #[error("{screen} could not delegate: {source}")]
    Delegation {
        /// Screen that requested the hand-off.
        screen: ScreenId,
        /// Underlying launch failure.
        #[source]
        source: LaunchError,
    },

    /// Operation requires a registered screen.
    #[error("{screen} is {phase}, expected a live screen")]
    NotLive {
        /// Screen the operation targeted.
        screen: ScreenId,
        /// Its current phase.
        phase: ScreenPhase,
    },

    /// A launch failure was reported for a screen that is not waiting on a
    /// delegation.
    #[error("{screen} is {phase}, expected a pending delegation")]
    NotDelegating {
        /// Screen the failure was reported for.
        screen: ScreenId,
        /// Its current phase.
        phase: ScreenPhase,
    },

    /// No open screen with this identifier.
    #[error("unknown screen: {0}")]
    UnknownScreen(ScreenId),
}
