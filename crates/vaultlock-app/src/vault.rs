//! Vault persistence seam.

use thiserror::Error;

/// Failure to persist the vault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    /// Storage could not be written.
    ///
    /// Usually transient (full disk, revoked document permission). The
    /// in-memory vault is intact and the save can be retried.
    #[error("failed to write vault: {0}")]
    Io(String),

    /// Vault could not be encrypted or serialized.
    #[error("failed to encode vault: {0}")]
    Encode(String),
}

/// Persistent vault storage, implemented outside this crate.
pub trait Vault {
    /// Write the vault to storage, optionally also producing a backup.
    fn save(&mut self, backup: bool) -> Result<(), SaveError>;
}
