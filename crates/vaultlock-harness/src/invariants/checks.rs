//! Standard invariant checks.
//!
//! These invariants capture behavioral properties of lock coordination that
//! must hold between any two runtime operations.

use std::collections::BTreeSet;

use vaultlock_app::{LockResponse, ScreenPhase};

use super::{Invariant, InvariantKind, InvariantResult, SystemSnapshot, Violation};

/// Registered listeners are exactly the live screens.
///
/// A registered screen that is not live would receive broadcasts after its
/// teardown; a live screen that is not registered would miss locks.
pub struct RegistryMatchesLiveScreens;

impl Invariant for RegistryMatchesLiveScreens {
    fn kind(&self) -> InvariantKind {
        InvariantKind::RegistryMatchesLiveScreens
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let registered: BTreeSet<_> = state.registered.iter().copied().collect();
        let live: BTreeSet<_> =
            state.screens.iter().filter(|s| s.phase.is_live()).map(|s| s.id).collect();

        if registered == live {
            return Ok(());
        }

        Err(Violation {
            invariant: self.kind(),
            message: format!("registered {registered:?}, live {live:?}"),
        })
    }
}

/// A screen still open after observing a lock must ignore locks.
pub struct LockResponseHonoured;

impl Invariant for LockResponseHonoured {
    fn kind(&self) -> InvariantKind {
        InvariantKind::LockResponseHonoured
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for screen in &state.screens {
            if screen.locks_observed > 0 && screen.lock_response != LockResponse::Ignore {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!(
                        "{} ({}) observed {} lock(s) but is still {}",
                        screen.id, screen.kind, screen.locks_observed, screen.phase
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Auto-lock suppression never outlives the hand-off that set it.
///
/// Right after a resume the flag must be off. At any time, a set flag must
/// belong to a screen that is still waiting on an external process.
pub struct SuppressionClearedOnResume;

impl Invariant for SuppressionClearedOnResume {
    fn kind(&self) -> InvariantKind {
        InvariantKind::SuppressionClearedOnResume
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        if !state.suppressed {
            return Ok(());
        }

        if state.after_resume {
            return Err(Violation {
                invariant: self.kind(),
                message: "auto-lock still suppressed after resume".to_string(),
            });
        }

        if !state.screens.iter().any(|s| s.phase == ScreenPhase::Suppressing) {
            return Err(Violation {
                invariant: self.kind(),
                message: "auto-lock suppressed with no screen awaiting an external process"
                    .to_string(),
            });
        }
        Ok(())
    }
}

/// Session generations never decrease, and no screen comes from the future.
pub struct SessionMonotonicity;

impl Invariant for SessionMonotonicity {
    fn kind(&self) -> InvariantKind {
        InvariantKind::SessionMonotonicity
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for window in state.session_history.windows(2) {
            if window[1] < window[0] {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!("session decreased {} -> {}", window[0], window[1]),
                });
            }
        }

        for screen in &state.screens {
            if screen.created_in > state.session {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!(
                        "{} created in {} but current session is {}",
                        screen.id, screen.created_in, state.session
                    ),
                });
            }
        }
        Ok(())
    }
}
