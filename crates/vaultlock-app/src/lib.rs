//! Screen lifecycle coordination for the vault application.
//!
//! Pure per-screen state machines and a generic runtime that keep every open
//! screen consistent with the vault lock state, independent of the UI toolkit
//! hosting them.
//!
//! # Components
//!
//! - [`Coordinator`]: per-screen state machine (orphan check, registration,
//!   suppression around external hand-off, lock response)
//! - [`Host`]: trait for platform-specific screen operations
//! - [`Runtime`]: executes coordinator actions against a [`Host`] and owns the
//!   screen stack
//! - [`Preferences`], [`ThemeResolver`], [`LocaleStore`], [`Vault`]: external
//!   collaborators consumed at screen creation and on save

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod coordinator;
mod error;
mod event;
mod external;
mod host;
mod preferences;
mod runtime;
mod state;
mod vault;

pub use action::{Notice, ScreenAction, ScreenResult};
pub use coordinator::Coordinator;
pub use error::CoordinatorError;
pub use event::ScreenEvent;
pub use external::{ExternalRequest, IntentAction, LaunchError};
pub use host::Host;
pub use preferences::{
    ConcreteTheme, Locale, LocaleStore, Preferences, ScreenSetup, SystemThemeResolver, Theme,
    ThemeResolver,
};
pub use runtime::Runtime;
pub use state::{LockResponse, ScreenConfig, ScreenPhase};
pub use vault::{SaveError, Vault};
