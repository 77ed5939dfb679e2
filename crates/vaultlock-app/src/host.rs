//! Host trait for abstracting platform screen operations.
//!
//! The [`Host`] trait decouples screen coordination from the UI toolkit. Each
//! platform implements it to perform the actual window and navigation work,
//! while the generic [`crate::Runtime`] decides what to do and when.

use vaultlock_core::ScreenId;

use crate::{ConcreteTheme, ExternalRequest, LaunchError, Locale, Notice, ScreenResult};

/// Platform operations on open screens.
///
/// Every method is synchronous and must not block: they run on the UI thread,
/// some of them from inside a lock broadcast.
///
/// # Implementations
///
/// - **Platform**: window flags, activity stack, intents, toasts
/// - **Simulation**: records every call for deterministic assertions
pub trait Host {
    /// Whether the system is currently in night mode.
    fn system_is_dark(&self) -> bool;

    /// Apply a theme to a screen being created.
    fn apply_theme(&mut self, screen: ScreenId, theme: ConcreteTheme);

    /// Apply a locale to a screen being created.
    fn apply_locale(&mut self, screen: ScreenId, locale: &Locale);

    /// Exclude the screen's window from screenshots.
    fn set_secure_window(&mut self, screen: ScreenId);

    /// Record the result delivered to the screen's parent.
    fn set_result(&mut self, screen: ScreenId, result: ScreenResult);

    /// Navigate to the root screen.
    ///
    /// The runtime opens the root screen's coordinator itself; the host only
    /// performs the navigation.
    fn redirect_to_root(&mut self, clear_task: bool);

    /// Close a screen normally.
    fn finish(&mut self, screen: ScreenId);

    /// Strong termination: remove the screen together with every screen it
    /// spawned in one step.
    ///
    /// Returns `false` if the platform does not offer this. The runtime then
    /// falls back to [`Host::finish_and_remove`] for each screen.
    fn try_force_terminate(&mut self, screen: ScreenId) -> bool;

    /// Close a screen and remove it from the task history. Must always
    /// succeed.
    fn finish_and_remove(&mut self, screen: ScreenId);

    /// Hand control to an external process.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::NotFound`] if nothing handles the request.
    fn launch_external(
        &mut self,
        screen: ScreenId,
        request: &ExternalRequest,
    ) -> Result<(), LaunchError>;

    /// Show a transient notification on behalf of a screen.
    fn notify(&mut self, screen: ScreenId, notice: Notice);
}
