//! Session generations.

use std::fmt;

/// Generation identifier of an unlocked interval of the vault.
///
/// A new generation starts on every unlock. Values only grow within a
/// process, so a screen can compare the generation it was created in against
/// the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SessionId(u64);

impl SessionId {
    /// Generation before the first unlock of the process.
    pub const INITIAL: Self = Self(0);

    /// Wrap a raw generation value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw generation value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The generation that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_is_strictly_greater() {
        let first = SessionId::INITIAL;
        let second = first.next();

        assert!(second > first);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn display_includes_generation() {
        assert_eq!(SessionId::new(7).to_string(), "session#7");
    }
}
