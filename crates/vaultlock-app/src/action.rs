//! Screen side-effects and intents.
//!
//! This module defines the [`ScreenAction`] enum, which represents
//! instructions produced by a [`crate::Coordinator`] for the runtime to
//! execute against the host.

use crate::{ConcreteTheme, ExternalRequest, Locale};

/// Actions produced by the screen coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenAction {
    /// Apply the resolved theme before any content is shown.
    ApplyTheme(ConcreteTheme),

    /// Apply the configured locale.
    ApplyLocale(Locale),

    /// Exclude the screen from screenshots and the recents preview.
    SetSecureWindow,

    /// Navigate to the root screen.
    RedirectToRoot {
        /// Drop every other screen from the navigation stack.
        clear_task: bool,
    },

    /// Close the screen normally.
    Finish,

    /// Report a result to whichever screen started this one.
    SetResult(ScreenResult),

    /// Remove the screen and every screen it spawned from the visible stack.
    ForceTerminate,

    /// Hand control to an external process.
    LaunchExternal(ExternalRequest),

    /// Show a transient message to the user.
    Notify(Notice),
}

/// Result reported to the parent screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenResult {
    /// Screen completed its task.
    Ok,
    /// Screen was aborted (user back, vault lock).
    Cancelled,
}

/// User-visible transient notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Writing the vault to storage failed; the screen stays usable.
    SaveFailed,
    /// No document provider is installed to handle a file request.
    DocumentsUnavailable,
}
