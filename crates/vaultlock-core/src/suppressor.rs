//! Temporary auto-lock suppression.
//!
//! While control is handed to an external process (file picker, camera,
//! share sheet) the vault must not lock behind the user's back, otherwise the
//! result returned by that process lands on a torn-down screen. The
//! requesting screen sets the flag before the hand-off and clears it on its
//! next resume, whatever the outcome of the hand-off was.
//!
//! This is a single flag, last writer wins. Nested delegations from two
//! screens share it: the first resume clears suppression for both.

use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide auto-lock suppression flag.
#[derive(Debug, Default)]
pub struct AutoLockSuppressor {
    suppressed: AtomicBool,
}

impl AutoLockSuppressor {
    /// Create an unsuppressed flag.
    pub const fn new() -> Self {
        Self { suppressed: AtomicBool::new(false) }
    }

    /// Block automatic locking until [`Self::unsuppress`] is called.
    pub fn suppress(&self) {
        if self.suppressed.swap(true, Ordering::AcqRel) {
            tracing::warn!("auto-lock already suppressed, stacked delegation shares one flag");
        } else {
            tracing::debug!("auto-lock suppressed");
        }
    }

    /// Allow automatic locking again.
    pub fn unsuppress(&self) {
        if self.suppressed.swap(false, Ordering::AcqRel) {
            tracing::debug!("auto-lock suppression cleared");
        }
    }

    /// Whether automatic locking is currently blocked.
    pub fn is_suppressed(&self) -> bool {
        self.suppressed.load(Ordering::Acquire)
    }
}
