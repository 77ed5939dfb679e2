//! Simulation host implementing the Host trait.
//!
//! `SimHost` stands in for the platform's window and navigation layer. It
//! records every call in order and lets tests decide which platform
//! capabilities exist: strong termination, night mode, and which external
//! handlers are installed.

use std::{collections::HashSet, fmt};

use vaultlock_app::{
    ConcreteTheme, ExternalRequest, Host, IntentAction, LaunchError, Locale, Notice, ScreenResult,
};
use vaultlock_core::ScreenId;

/// A recorded host operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// Theme applied to a screen.
    ApplyTheme(ScreenId, ConcreteTheme),
    /// Locale applied to a screen.
    ApplyLocale(ScreenId, Locale),
    /// Secure-window flag set.
    SetSecureWindow(ScreenId),
    /// Result recorded for a screen's parent.
    SetResult(ScreenId, ScreenResult),
    /// Navigation reset to the root screen.
    RedirectToRoot {
        /// Every other screen dropped from the stack.
        clear_task: bool,
    },
    /// Screen finished normally.
    Finish(ScreenId),
    /// Strong termination succeeded.
    ForceTerminate(ScreenId),
    /// Fallback termination.
    FinishAndRemove(ScreenId),
    /// External process started.
    Launch(ScreenId, IntentAction),
    /// External handler missing.
    LaunchNotFound(ScreenId, IntentAction),
    /// Transient notification shown.
    Notify(ScreenId, Notice),
}

impl fmt::Display for HostCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApplyTheme(screen, theme) => write!(f, "{screen} theme {theme:?}"),
            Self::ApplyLocale(screen, locale) => write!(f, "{screen} locale {locale}"),
            Self::SetSecureWindow(screen) => write!(f, "{screen} secure"),
            Self::SetResult(screen, result) => write!(f, "{screen} result {result:?}"),
            Self::RedirectToRoot { clear_task } => write!(f, "redirect root clear_task={clear_task}"),
            Self::Finish(screen) => write!(f, "{screen} finish"),
            Self::ForceTerminate(screen) => write!(f, "{screen} force-terminate"),
            Self::FinishAndRemove(screen) => write!(f, "{screen} finish-and-remove"),
            Self::Launch(screen, action) => write!(f, "{screen} launch {action}"),
            Self::LaunchNotFound(screen, action) => write!(f, "{screen} launch {action} not-found"),
            Self::Notify(screen, notice) => write!(f, "{screen} notify {notice:?}"),
        }
    }
}

/// Simulation host for deterministic testing.
///
/// Implements [`Host`] so the same [`vaultlock_app::Runtime`] orchestration
/// runs in production and in simulation.
#[derive(Debug, Clone)]
pub struct SimHost {
    calls: Vec<HostCall>,
    system_is_dark: bool,
    force_terminate_available: bool,
    missing_handlers: HashSet<IntentAction>,
    all_handlers_missing: bool,
}

impl Default for SimHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimHost {
    /// Create a host with strong termination available and every external
    /// handler installed.
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            system_is_dark: false,
            force_terminate_available: true,
            missing_handlers: HashSet::new(),
            all_handlers_missing: false,
        }
    }

    /// Report the system as being in night mode.
    #[must_use]
    pub fn with_dark_mode(mut self, dark: bool) -> Self {
        self.system_is_dark = dark;
        self
    }

    /// Make strong termination unavailable, forcing the fallback path.
    #[must_use]
    pub fn without_force_terminate(mut self) -> Self {
        self.force_terminate_available = false;
        self
    }

    /// Uninstall the handler for an action.
    #[must_use]
    pub fn without_handler(mut self, action: IntentAction) -> Self {
        self.missing_handlers.insert(action);
        self
    }

    /// Uninstall every external handler.
    #[must_use]
    pub fn without_any_handler(mut self) -> Self {
        self.all_handlers_missing = true;
        self
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Take all recorded calls.
    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    /// Recorded calls rendered one per line.
    pub fn log(&self) -> String {
        self.calls.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
    }

    /// Check if a call was recorded.
    pub fn recorded(&self, call: &HostCall) -> bool {
        self.calls.contains(call)
    }

    /// Notifications shown for a screen.
    pub fn notices(&self, screen: ScreenId) -> Vec<Notice> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Notify(id, notice) if *id == screen => Some(*notice),
                _ => None,
            })
            .collect()
    }

    fn handles(&self, action: &IntentAction) -> bool {
        !self.all_handlers_missing && !self.missing_handlers.contains(action)
    }
}

impl Host for SimHost {
    fn system_is_dark(&self) -> bool {
        self.system_is_dark
    }

    fn apply_theme(&mut self, screen: ScreenId, theme: ConcreteTheme) {
        self.calls.push(HostCall::ApplyTheme(screen, theme));
    }

    fn apply_locale(&mut self, screen: ScreenId, locale: &Locale) {
        self.calls.push(HostCall::ApplyLocale(screen, locale.clone()));
    }

    fn set_secure_window(&mut self, screen: ScreenId) {
        self.calls.push(HostCall::SetSecureWindow(screen));
    }

    fn set_result(&mut self, screen: ScreenId, result: ScreenResult) {
        self.calls.push(HostCall::SetResult(screen, result));
    }

    fn redirect_to_root(&mut self, clear_task: bool) {
        self.calls.push(HostCall::RedirectToRoot { clear_task });
    }

    fn finish(&mut self, screen: ScreenId) {
        self.calls.push(HostCall::Finish(screen));
    }

    fn try_force_terminate(&mut self, screen: ScreenId) -> bool {
        if self.force_terminate_available {
            self.calls.push(HostCall::ForceTerminate(screen));
        }
        self.force_terminate_available
    }

    fn finish_and_remove(&mut self, screen: ScreenId) {
        self.calls.push(HostCall::FinishAndRemove(screen));
    }

    fn launch_external(
        &mut self,
        screen: ScreenId,
        request: &ExternalRequest,
    ) -> Result<(), LaunchError> {
        let action = request.action.clone();
        if self.handles(&action) {
            self.calls.push(HostCall::Launch(screen, action));
            Ok(())
        } else {
            self.calls.push(HostCall::LaunchNotFound(screen, action.clone()));
            Err(LaunchError::NotFound { action })
        }
    }

    fn notify(&mut self, screen: ScreenId, notice: Notice) {
        self.calls.push(HostCall::Notify(screen, notice));
    }
}
