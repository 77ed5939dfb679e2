//! Screen identity and kinds.

use std::fmt;

/// Process-unique identifier of one open screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScreenId(u64);

impl ScreenId {
    /// Wrap a raw identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw identifier.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "screen#{}", self.0)
    }
}

/// Closed set of screen kinds the application can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    /// Entry list; the target of every navigation reset.
    Root,
    /// Password / biometric unlock prompt.
    Authentication,
    /// First-run setup flow.
    Introduction,
    /// Application preferences.
    Settings,
    /// Create or edit a single vault entry.
    EntryEditor,
    /// QR code scanner.
    Scanner,
    /// Import entries from another application.
    Import,
    /// Export / transfer entries to another device.
    Transfer,
    /// About and licenses.
    About,
}

impl ScreenKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Root,
        Self::Authentication,
        Self::Introduction,
        Self::Settings,
        Self::EntryEditor,
        Self::Scanner,
        Self::Import,
        Self::Transfer,
        Self::About,
    ];

    /// Kinds that never depend on an unlocked session and therefore can
    /// never be orphaned.
    pub const fn is_safe(self) -> bool {
        matches!(self, Self::Root | Self::Authentication | Self::Introduction)
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Root => "root",
            Self::Authentication => "authentication",
            Self::Introduction => "introduction",
            Self::Settings => "settings",
            Self::EntryEditor => "entry-editor",
            Self::Scanner => "scanner",
            Self::Import => "import",
            Self::Transfer => "transfer",
            Self::About => "about",
        };
        f.write_str(name)
    }
}
