//! Lock and session coordination core for the vault.
//!
//! Everything an open screen needs to stay consistent with the vault's lock
//! state, without any knowledge of how screens are rendered or how the vault
//! is unlocked.
//!
//! # Components
//!
//! - [`LockState`]: locked flag plus the current [`SessionId`] generation
//! - [`AutoLockSuppressor`]: blocks automatic locking during external hand-off
//! - [`ListenerRegistry`]: snapshot-then-iterate lock broadcast hub
//! - [`is_orphan`]: decides whether a restored screen outlived its session
//! - [`VaultContext`]: process-wide owner of the above, injected into screens
//! - [`LockController`]: the single writer of [`LockState`]

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod context;
mod error;
mod lock_state;
mod orphan;
mod registry;
mod screen;
mod session;
mod suppressor;

pub use context::{LockController, VaultContext};
pub use error::RegistryError;
pub use lock_state::{LockEvent, LockState};
pub use orphan::{OrphanCheck, is_orphan};
pub use registry::{ListenerRegistry, LockListener};
pub use screen::{ScreenId, ScreenKind};
pub use session::SessionId;
pub use suppressor::AutoLockSuppressor;
