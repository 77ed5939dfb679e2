//! Invariant checking for deterministic simulation testing.
//!
//! Invariants are properties that must always hold between runtime
//! operations. Unlike example-based tests that check specific scenarios,
//! invariants verify behavioral properties across arbitrary operation
//! sequences.
//!
//! # Architecture
//!
//! The invariant system extracts observable state from a
//! [`vaultlock_app::Runtime`] into a [`SystemSnapshot`], then runs registered
//! [`Invariant`] checks against it.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let snapshot = SystemSnapshot::capture(&runtime);
//! registry.check_all(&snapshot)?;
//! ```

mod checks;
mod snapshot;

use std::fmt;

pub use checks::{
    LockResponseHonoured, RegistryMatchesLiveScreens, SessionMonotonicity,
    SuppressionClearedOnResume,
};
pub use snapshot::{ScreenSnapshot, SystemSnapshot};

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Identifies an invariant in violation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvariantKind {
    /// Registered listeners are exactly the live screens.
    RegistryMatchesLiveScreens,
    /// Screens that observed a lock are gone unless they ignore locks.
    LockResponseHonoured,
    /// Suppression is off after a resume and owned by a delegating screen.
    SuppressionClearedOnResume,
    /// Session generations never go backwards.
    SessionMonotonicity,
}

impl fmt::Display for InvariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RegistryMatchesLiveScreens => "registry-matches-live-screens",
            Self::LockResponseHonoured => "lock-response-honoured",
            Self::SuppressionClearedOnResume => "suppression-cleared-on-resume",
            Self::SessionMonotonicity => "session-monotonicity",
        };
        f.write_str(name)
    }
}

/// Invariant violation with context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// The violated invariant.
    pub invariant: InvariantKind,
    /// Description of what went wrong.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// An invariant that can be checked against system state.
pub trait Invariant: Send + Sync {
    /// Which invariant this is, for error reporting.
    fn kind(&self) -> InvariantKind;

    /// Check the invariant against a snapshot.
    ///
    /// Returns `Ok(())` if the invariant holds, or a [`Violation`]
    /// describing what went wrong.
    fn check(&self, state: &SystemSnapshot) -> InvariantResult;
}

/// Registry of invariants to check.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Create a registry with every lock coordination invariant.
    ///
    /// Includes:
    /// - [`RegistryMatchesLiveScreens`]
    /// - [`LockResponseHonoured`]
    /// - [`SuppressionClearedOnResume`]
    /// - [`SessionMonotonicity`]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(RegistryMatchesLiveScreens);
        registry.add(LockResponseHonoured);
        registry.add(SuppressionClearedOnResume);
        registry.add(SessionMonotonicity);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants against the given state.
    ///
    /// # Errors
    ///
    /// Returns every violation found.
    pub fn check_all(&self, state: &SystemSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Check all invariants, panicking with every violation.
    ///
    /// # Panics
    ///
    /// Panics if any invariant is violated.
    #[allow(clippy::panic, reason = "Test assertion helper")]
    pub fn assert_all(&self, state: &SystemSnapshot, context: &str) {
        if let Err(violations) = self.check_all(state) {
            let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
            panic!("Invariant violation {context}:\n  {}", messages.join("\n  "));
        }
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}
