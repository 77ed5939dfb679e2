//! Integration tests for Runtime orchestration against a simulated host.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks that verify:
//! - Host received the expected screen operations
//! - Registry holds exactly the screens still open
//! - Suppression is back off once screens resume

use proptest::prelude::*;
use vaultlock_app::{
    ConcreteTheme, CoordinatorError, ExternalRequest, IntentAction, LaunchError, LocaleStore,
    LockResponse, Locale, Notice, Preferences, Runtime, SaveError, ScreenConfig, ScreenPhase,
    ScreenResult, Theme, ThemeResolver, Vault,
};
use vaultlock_core::{LockController, ScreenId, ScreenKind, VaultContext};
use vaultlock_harness::{HostCall, SimHost};

/// Runtime over an unlocked vault.
fn unlocked_runtime(host: SimHost) -> (Runtime<SimHost>, LockController) {
    let (context, controller) = VaultContext::new();
    controller.unlock().unwrap();
    (Runtime::new(host, context, Preferences::default()), controller)
}

fn registered(runtime: &Runtime<SimHost>) -> Vec<ScreenId> {
    runtime.context().registry().registered_ids()
}

struct FailingVault;

impl Vault for FailingVault {
    fn save(&mut self, _backup: bool) -> Result<(), SaveError> {
        Err(SaveError::Io("disk full".to_string()))
    }
}

/// Forces one theme regardless of preference and night mode.
struct FixedTheme(ConcreteTheme);

impl ThemeResolver for FixedTheme {
    fn resolve(&self, _preference: Theme, _system_is_dark: bool) -> ConcreteTheme {
        self.0
    }
}

/// Locale read from the device instead of the preferences.
struct DeviceLocale;

impl LocaleStore for DeviceLocale {
    fn get(&self) -> Locale {
        Locale::new("nl")
    }
}

#[derive(Default)]
struct CountingVault {
    saves: u32,
    backups: u32,
}

impl Vault for CountingVault {
    fn save(&mut self, backup: bool) -> Result<(), SaveError> {
        self.saves += 1;
        if backup {
            self.backups += 1;
        }
        Ok(())
    }
}

#[test]
fn restored_settings_in_locked_vault_redirects_to_root() {
    let (context, _controller) = VaultContext::new();
    let mut runtime = Runtime::new(SimHost::new(), context, Preferences::default());

    let settings = runtime.open_screen(ScreenKind::Settings, None, true).unwrap();

    assert!(runtime.screen(settings).is_none());
    assert!(runtime.host().recorded(&HostCall::RedirectToRoot { clear_task: true }));
    assert!(runtime.host().recorded(&HostCall::Finish(settings)));
    assert!(!runtime.host().recorded(&HostCall::SetSecureWindow(settings)));

    let roots: Vec<_> = runtime.screens().map(|c| (c.id(), c.kind())).collect();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].1, ScreenKind::Root);
    assert_eq!(registered(&runtime), [roots[0].0]);
}

#[test]
fn restored_root_in_locked_vault_registers() {
    let (context, _controller) = VaultContext::new();
    let mut runtime = Runtime::new(SimHost::new(), context, Preferences::default());

    let root = runtime.open_screen(ScreenKind::Root, None, true).unwrap();

    assert_eq!(runtime.screen(root).unwrap().phase(), ScreenPhase::Registered);
    assert_eq!(registered(&runtime), [root]);
    assert!(!runtime.host().recorded(&HostCall::RedirectToRoot { clear_task: true }));
}

#[test]
fn fresh_screen_in_locked_vault_is_not_orphaned() {
    let (context, _controller) = VaultContext::new();
    let mut runtime = Runtime::new(SimHost::new(), context, Preferences::default());

    let settings = runtime.open_screen(ScreenKind::Settings, None, false).unwrap();

    assert!(runtime.screen(settings).is_some());
    assert_eq!(registered(&runtime), [settings]);
}

#[test]
fn user_lock_terminates_settings_and_keeps_root() {
    let (mut runtime, controller) = unlocked_runtime(SimHost::new());
    let settings = runtime.open_screen(ScreenKind::Settings, None, false).unwrap();
    let root = runtime.open_screen(ScreenKind::Root, None, false).unwrap();

    assert!(controller.lock(true));
    assert_eq!(runtime.pump(), 2);

    assert!(runtime.host().recorded(&HostCall::SetResult(settings, ScreenResult::Cancelled)));
    assert!(runtime.host().recorded(&HostCall::ForceTerminate(settings)));
    assert!(runtime.screen(settings).is_none());

    assert_eq!(runtime.screen(root).unwrap().locks_observed(), 1);
    assert_eq!(registered(&runtime), [root]);
}

#[test]
fn user_lock_with_no_ignoring_screen_empties_registry() {
    let (mut runtime, controller) = unlocked_runtime(SimHost::new());
    runtime.open_screen(ScreenKind::Settings, None, false).unwrap();
    runtime
        .open_screen_with(ScreenKind::Root, None, false, ScreenConfig {
            lock_response: LockResponse::Terminate,
        })
        .unwrap();

    controller.lock(true);
    runtime.pump();

    assert!(registered(&runtime).is_empty());
    assert_eq!(runtime.screens().count(), 0);
}

#[test]
fn fallback_termination_removes_descendants_first() {
    let (mut runtime, controller) = unlocked_runtime(SimHost::new().without_force_terminate());
    let settings = runtime.open_screen(ScreenKind::Settings, None, false).unwrap();
    let editor = runtime.open_screen(ScreenKind::EntryEditor, Some(settings), false).unwrap();
    let scanner = runtime.open_screen(ScreenKind::Scanner, Some(editor), false).unwrap();
    runtime.host_mut().take_calls();

    controller.lock(false);
    assert_eq!(runtime.pump(), 1);

    assert_eq!(runtime.host().calls(), [
        HostCall::SetResult(settings, ScreenResult::Cancelled),
        HostCall::FinishAndRemove(scanner),
        HostCall::FinishAndRemove(editor),
        HostCall::FinishAndRemove(settings),
    ]);
    assert!(registered(&runtime).is_empty());
}

#[test]
fn force_termination_takes_descendants_along() {
    let (mut runtime, controller) = unlocked_runtime(SimHost::new());
    let settings = runtime.open_screen(ScreenKind::Settings, None, false).unwrap();
    runtime.open_screen(ScreenKind::EntryEditor, Some(settings), false).unwrap();
    runtime.host_mut().take_calls();

    controller.lock(true);
    runtime.pump();

    assert_eq!(runtime.host().calls(), [
        HostCall::SetResult(settings, ScreenResult::Cancelled),
        HostCall::ForceTerminate(settings),
    ]);
    assert_eq!(runtime.screens().count(), 0);
    assert!(registered(&runtime).is_empty());
}

#[test]
fn unlock_broadcast_changes_nothing() {
    let (context, controller) = VaultContext::new();
    let mut runtime = Runtime::new(SimHost::new(), context, Preferences::default());
    let settings = runtime.open_screen(ScreenKind::Settings, None, false).unwrap();
    runtime.host_mut().take_calls();

    controller.unlock().unwrap();
    assert_eq!(runtime.pump(), 1);

    assert!(runtime.host().calls().is_empty());
    assert_eq!(runtime.screen(settings).unwrap().locks_observed(), 0);
}

#[test]
fn missing_document_provider_notifies_and_recovers() {
    let host = SimHost::new().without_handler(IntentAction::OpenDocument);
    let (mut runtime, controller) = unlocked_runtime(host);
    let import = runtime.open_screen(ScreenKind::Import, None, false).unwrap();

    runtime
        .delegate(import, ExternalRequest::for_result(IntentAction::OpenDocument, 3))
        .unwrap();

    assert_eq!(runtime.host().notices(import), [Notice::DocumentsUnavailable]);
    assert!(runtime.context().suppressor().is_suppressed());
    assert!(!controller.auto_lock());

    runtime.resume(import).unwrap();
    assert!(!runtime.context().suppressor().is_suppressed());
    assert_eq!(runtime.screen(import).unwrap().phase(), ScreenPhase::Active);

    assert!(controller.auto_lock());
    runtime.pump();
    assert!(runtime.screen(import).is_none());
}

#[test]
fn missing_non_document_handler_is_an_error() {
    let host = SimHost::new().without_handler(IntentAction::ImageCapture);
    let (mut runtime, _controller) = unlocked_runtime(host);
    let scanner = runtime.open_screen(ScreenKind::Scanner, None, false).unwrap();

    let result = runtime.delegate(scanner, ExternalRequest::for_result(IntentAction::ImageCapture, 1));

    assert_eq!(
        result,
        Err(CoordinatorError::Delegation {
            screen: scanner,
            source: LaunchError::NotFound { action: IntentAction::ImageCapture },
        })
    );
    assert!(runtime.host().notices(scanner).is_empty());

    runtime.resume(scanner).unwrap();
    assert!(!runtime.context().suppressor().is_suppressed());
}

#[test]
fn successful_delegation_suppresses_until_resume() {
    let (mut runtime, controller) = unlocked_runtime(SimHost::new());
    let transfer = runtime.open_screen(ScreenKind::Transfer, None, false).unwrap();

    runtime.delegate(transfer, ExternalRequest::launch(IntentAction::Send)).unwrap();

    assert!(runtime.host().recorded(&HostCall::Launch(transfer, IntentAction::Send)));
    assert_eq!(runtime.screen(transfer).unwrap().phase(), ScreenPhase::Suppressing);
    assert!(!controller.auto_lock());
    assert!(!runtime.context().is_locked());

    runtime.resume(transfer).unwrap();
    assert!(controller.auto_lock());
}

#[test]
fn user_lock_during_hand_off_clears_suppression() {
    let (mut runtime, controller) = unlocked_runtime(SimHost::new());
    let import = runtime.open_screen(ScreenKind::Import, None, false).unwrap();
    runtime.delegate(import, ExternalRequest::for_result(IntentAction::GetContent, 2)).unwrap();

    assert!(controller.lock(true));
    runtime.pump();

    assert!(runtime.screen(import).is_none());
    assert!(!runtime.context().suppressor().is_suppressed());
}

#[test]
fn delegation_from_closed_screen_is_rejected() {
    let (mut runtime, _controller) = unlocked_runtime(SimHost::new());
    let about = runtime.open_screen(ScreenKind::About, None, false).unwrap();
    runtime.close(about).unwrap();

    assert_eq!(
        runtime.delegate(about, ExternalRequest::launch(IntentAction::View)),
        Err(CoordinatorError::UnknownScreen(about))
    );
    assert!(!runtime.context().suppressor().is_suppressed());
}

#[test]
fn close_unregisters_screen_and_children() {
    let (mut runtime, _controller) = unlocked_runtime(SimHost::new());
    let root = runtime.open_screen(ScreenKind::Root, None, false).unwrap();
    let settings = runtime.open_screen(ScreenKind::Settings, Some(root), false).unwrap();
    let editor = runtime.open_screen(ScreenKind::EntryEditor, Some(settings), false).unwrap();

    runtime.close(settings).unwrap();

    assert_eq!(registered(&runtime), [root]);
    assert!(runtime.host().recorded(&HostCall::Finish(editor)));
    assert!(runtime.host().recorded(&HostCall::Finish(settings)));
    assert_eq!(runtime.close(settings), Err(CoordinatorError::UnknownScreen(settings)));
}

#[test]
fn unknown_parent_is_rejected() {
    let (mut runtime, _controller) = unlocked_runtime(SimHost::new());
    let ghost = ScreenId::new(99);

    assert_eq!(
        runtime.open_screen(ScreenKind::Settings, Some(ghost), false),
        Err(CoordinatorError::UnknownScreen(ghost))
    );
    assert!(registered(&runtime).is_empty());
}

#[test]
fn preferences_applied_before_registration() {
    let (context, controller) = VaultContext::new();
    controller.unlock().unwrap();
    let preferences = Preferences {
        theme: Theme::SystemAmoled,
        locale: Locale::new("pt-BR"),
        secure_screen: false,
    };
    let mut runtime = Runtime::new(SimHost::new().with_dark_mode(true), context, preferences);

    let editor = runtime.open_screen(ScreenKind::EntryEditor, None, false).unwrap();

    assert_eq!(runtime.host().calls(), [
        HostCall::ApplyTheme(editor, ConcreteTheme::Amoled),
        HostCall::ApplyLocale(editor, Locale::new("pt-BR")),
    ]);
}

#[test]
fn save_failure_notifies_and_keeps_screen() {
    let (mut runtime, _controller) = unlocked_runtime(SimHost::new());
    let editor = runtime.open_screen(ScreenKind::EntryEditor, None, false).unwrap();

    assert_eq!(runtime.save_vault(editor, &mut FailingVault, true), Ok(false));

    assert_eq!(runtime.host().notices(editor), [Notice::SaveFailed]);
    assert!(runtime.screen(editor).unwrap().is_live());
}

#[test]
fn pending_lock_closes_screen_before_any_other_call() {
    let (mut runtime, controller) = unlocked_runtime(SimHost::new());
    let settings = runtime.open_screen(ScreenKind::Settings, None, false).unwrap();
    let mut vault = CountingVault::default();

    assert!(controller.lock(true));

    assert_eq!(
        runtime.delegate(settings, ExternalRequest::launch(IntentAction::View)),
        Err(CoordinatorError::UnknownScreen(settings))
    );
    assert_eq!(
        runtime.save_vault(settings, &mut vault, false),
        Err(CoordinatorError::UnknownScreen(settings))
    );
    assert_eq!(runtime.resume(settings), Err(CoordinatorError::UnknownScreen(settings)));

    assert_eq!(vault.saves, 0);
    assert!(!runtime.host().recorded(&HostCall::Launch(settings, IntentAction::View)));
    assert!(runtime.host().recorded(&HostCall::ForceTerminate(settings)));
    assert!(!runtime.context().suppressor().is_suppressed());
    assert!(registered(&runtime).is_empty());
}

#[test]
fn pending_lock_delivered_before_opening_screen() {
    let (mut runtime, controller) = unlocked_runtime(SimHost::new());
    let settings = runtime.open_screen(ScreenKind::Settings, None, false).unwrap();

    controller.lock(false);
    let about = runtime.open_screen(ScreenKind::About, None, false).unwrap();

    assert!(runtime.screen(settings).is_none());
    assert_eq!(registered(&runtime), [about]);
    assert_eq!(runtime.screen(about).unwrap().locks_observed(), 0);
}

#[test]
fn custom_collaborators_shape_screen_setup() {
    let (context, controller) = VaultContext::new();
    controller.unlock().unwrap();
    let mut runtime = Runtime::new(SimHost::new(), context, Preferences::default())
        .with_theme_resolver(FixedTheme(ConcreteTheme::Dark))
        .with_locale_store(DeviceLocale);

    let editor = runtime.open_screen(ScreenKind::EntryEditor, None, false).unwrap();

    assert_eq!(runtime.host().calls()[..2], [
        HostCall::ApplyTheme(editor, ConcreteTheme::Dark),
        HostCall::ApplyLocale(editor, Locale::new("nl")),
    ]);
}

#[test]
fn updated_preferences_apply_to_later_screens() {
    let (mut runtime, _controller) = unlocked_runtime(SimHost::new());
    let first = runtime.open_screen(ScreenKind::Settings, None, false).unwrap();

    let preferences =
        Preferences { theme: Theme::Dark, locale: Locale::new("de"), ..runtime.preferences().clone() };
    runtime.set_preferences(preferences);
    let second = runtime.open_screen(ScreenKind::About, None, false).unwrap();

    assert!(runtime.host().recorded(&HostCall::ApplyTheme(first, ConcreteTheme::Light)));
    assert!(runtime.host().recorded(&HostCall::ApplyTheme(second, ConcreteTheme::Dark)));
    assert!(runtime.host().recorded(&HostCall::ApplyLocale(second, Locale::new("de"))));
    assert_eq!(runtime.preferences().locale, Locale::new("de"));
}

#[test]
fn save_success_is_silent() {
    let (mut runtime, _controller) = unlocked_runtime(SimHost::new());
    let editor = runtime.open_screen(ScreenKind::EntryEditor, None, false).unwrap();
    let mut vault = CountingVault::default();

    assert_eq!(runtime.save_vault(editor, &mut vault, false), Ok(true));
    assert_eq!(runtime.save_vault(editor, &mut vault, true), Ok(true));

    assert_eq!((vault.saves, vault.backups), (2, 1));
    assert!(runtime.host().notices(editor).is_empty());
}

proptest! {
    #[test]
    fn root_survives_any_lock_sequence(transitions in prop::collection::vec(any::<bool>(), 0..20)) {
        let (mut runtime, controller) = unlocked_runtime(SimHost::new());
        let root = runtime.open_screen(ScreenKind::Root, None, false).unwrap();

        for lock in transitions {
            if lock {
                controller.lock(true);
            } else {
                controller.unlock();
            }
            runtime.pump();
        }

        prop_assert!(runtime.screen(root).is_some());
        prop_assert_eq!(registered(&runtime), vec![root]);
    }
}
