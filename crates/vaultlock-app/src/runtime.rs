//! Generic runtime for screen orchestration.
//!
//! The Runtime owns every open screen's [`Coordinator`] and coordinates
//! between:
//! - [`Coordinator`]: per-screen state machines
//! - [`VaultContext`]: shared lock state, suppression and registry
//! - [`Host`]: platform-specific screen operations
//!
//! Lock broadcasts reach the runtime through a non-blocking channel: each
//! coordinator registers a listener that only enqueues the event, and
//! [`Runtime::pump`] later feeds queued events to the coordinators. The
//! broadcast itself therefore never runs screen teardown.
//!
//! Every public entry point drains the queue before acting, so a screen torn
//! down by a lock is gone before anything else can reach it.

use std::{collections::BTreeMap, sync::Arc};

use tokio::sync::mpsc;
use vaultlock_core::{LockEvent, LockListener, ScreenId, ScreenKind, VaultContext};

use crate::{
    Coordinator, CoordinatorError, ExternalRequest, Host, LocaleStore, Notice, Preferences,
    ScreenAction, ScreenConfig, ScreenEvent, ScreenSetup, SystemThemeResolver, ThemeResolver,
    Vault,
};

/// Lock listener that forwards events into the runtime's queue.
struct QueueListener {
    screen: ScreenId,
    queue: mpsc::UnboundedSender<(ScreenId, LockEvent)>,
}

impl LockListener for QueueListener {
    fn on_lock_event(&self, event: LockEvent) {
        if self.queue.send((self.screen, event)).is_err() {
            tracing::trace!(screen = %self.screen, "runtime gone, lock event dropped");
        }
    }
}

/// Generic runtime that orchestrates coordinators and the host.
///
/// # Type Parameters
///
/// - `H`: Platform-specific screen host
pub struct Runtime<H: Host> {
    host: H,
    context: Arc<VaultContext>,
    preferences: Preferences,
    resolver: Box<dyn ThemeResolver + Send>,
    /// Locale source. `None` reads the locale from `preferences`.
    locales: Option<Box<dyn LocaleStore + Send>>,
    /// Open screens. Destroyed coordinators are removed.
    screens: BTreeMap<ScreenId, Coordinator>,
    lock_tx: mpsc::UnboundedSender<(ScreenId, LockEvent)>,
    lock_rx: mpsc::UnboundedReceiver<(ScreenId, LockEvent)>,
}

impl<H: Host> Runtime<H> {
    /// Create a new runtime with the given host, context and preferences.
    pub fn new(host: H, context: Arc<VaultContext>, preferences: Preferences) -> Self {
        let (lock_tx, lock_rx) = mpsc::unbounded_channel();
        Self {
            host,
            context,
            preferences,
            resolver: Box::new(SystemThemeResolver),
            locales: None,
            screens: BTreeMap::new(),
            lock_tx,
            lock_rx,
        }
    }

    /// Replace the default theme resolver.
    #[must_use]
    pub fn with_theme_resolver(mut self, resolver: impl ThemeResolver + Send + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Read the locale of new screens from `store` instead of the
    /// preferences.
    #[must_use]
    pub fn with_locale_store(mut self, store: impl LocaleStore + Send + 'static) -> Self {
        self.locales = Some(Box::new(store));
        self
    }

    /// Open a screen with its kind's default configuration.
    ///
    /// Returns the new screen's identifier. An orphaned screen is already
    /// gone when this returns, replaced by a fresh root screen.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::UnknownScreen`] if `parent` is not open.
    pub fn open_screen(
        &mut self,
        kind: ScreenKind,
        parent: Option<ScreenId>,
        restored: bool,
    ) -> Result<ScreenId, CoordinatorError> {
        self.open_screen_with(kind, parent, restored, ScreenConfig::for_kind(kind))
    }

    /// Open a screen with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::UnknownScreen`] if `parent` is not open.
    pub fn open_screen_with(
        &mut self,
        kind: ScreenKind,
        parent: Option<ScreenId>,
        restored: bool,
        config: ScreenConfig,
    ) -> Result<ScreenId, CoordinatorError> {
        self.drain_locks();
        self.spawn(kind, parent, restored, config)
    }

    fn spawn(
        &mut self,
        kind: ScreenKind,
        parent: Option<ScreenId>,
        restored: bool,
        config: ScreenConfig,
    ) -> Result<ScreenId, CoordinatorError> {
        if let Some(parent) = parent
            && !self.screens.contains_key(&parent)
        {
            return Err(CoordinatorError::UnknownScreen(parent));
        }

        let id = self.context.allocate_screen_id();
        let locales: &dyn LocaleStore = match &self.locales {
            Some(store) => store.as_ref(),
            None => &self.preferences,
        };
        let setup = ScreenSetup::resolve(
            &self.preferences,
            self.resolver.as_ref(),
            locales,
            self.host.system_is_dark(),
        );
        let listener = Arc::new(QueueListener { screen: id, queue: self.lock_tx.clone() });

        let mut coordinator = Coordinator::new(id, kind, Arc::clone(&self.context), listener)
            .with_parent(parent)
            .with_config(config)
            .with_setup(setup);

        tracing::debug!(screen = %id, %kind, restored, "opening screen");
        let actions = coordinator.handle(ScreenEvent::Create { restored });
        self.screens.insert(id, coordinator);
        self.execute(id, actions)?;

        Ok(id)
    }

    /// A screen regained foreground focus.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::UnknownScreen`] if the screen is not open.
    pub fn resume(&mut self, screen: ScreenId) -> Result<(), CoordinatorError> {
        self.drain_locks();
        let actions = self.coordinator_mut(screen)?.handle(ScreenEvent::Resume);
        self.execute(screen, actions)
    }

    /// Hand control from a screen to an external process.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::Delegation`] if the external handler is
    /// missing and the request is not a document request. Auto-lock stays
    /// suppressed until the screen resumes, in every case.
    pub fn delegate(
        &mut self,
        screen: ScreenId,
        request: ExternalRequest,
    ) -> Result<(), CoordinatorError> {
        self.drain_locks();
        let actions = self.coordinator_mut(screen)?.delegate(request)?;
        self.execute(screen, actions)
    }

    /// The user closed a screen. Screens it spawned close with it.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::UnknownScreen`] if the screen is not open.
    pub fn close(&mut self, screen: ScreenId) -> Result<(), CoordinatorError> {
        self.drain_locks();
        if !self.screens.contains_key(&screen) {
            return Err(CoordinatorError::UnknownScreen(screen));
        }

        for descendant in self.descendants(screen) {
            self.host.finish(descendant);
            self.dispose(descendant);
        }
        self.host.finish(screen);
        self.dispose(screen);
        Ok(())
    }

    /// Deliver queued lock events to their screens.
    ///
    /// Returns the number of events delivered to a still-open screen.
    pub fn pump(&mut self) -> usize {
        let mut delivered = 0;

        while let Ok((screen, event)) = self.lock_rx.try_recv() {
            let Some(coordinator) = self.screens.get_mut(&screen) else {
                tracing::trace!(%screen, "lock event for closed screen");
                continue;
            };

            delivered += 1;
            let actions = coordinator.handle(ScreenEvent::Lock(event));
            if let Err(error) = self.execute(screen, actions) {
                tracing::warn!(%screen, %error, "lock response failed");
            }
        }

        delivered
    }

    /// Save the vault on behalf of a screen.
    ///
    /// On failure the user is notified and the screen stays open. Returns
    /// whether the save succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::UnknownScreen`] without touching the vault
    /// if the screen is not open, including when a pending lock just closed
    /// it.
    pub fn save_vault<V: Vault>(
        &mut self,
        screen: ScreenId,
        vault: &mut V,
        backup: bool,
    ) -> Result<bool, CoordinatorError> {
        self.drain_locks();
        if !self.screens.contains_key(&screen) {
            return Err(CoordinatorError::UnknownScreen(screen));
        }

        match vault.save(backup) {
            Ok(()) => Ok(true),
            Err(error) => {
                tracing::warn!(%screen, backup, %error, "vault save failed");
                self.host.notify(screen, Notice::SaveFailed);
                Ok(false)
            },
        }
    }

    /// Deliver lock events queued since the last call.
    fn drain_locks(&mut self) {
        let delivered = self.pump();
        if delivered > 0 {
            tracing::debug!(delivered, "pending lock events delivered");
        }
    }

    fn execute(
        &mut self,
        screen: ScreenId,
        actions: Vec<ScreenAction>,
    ) -> Result<(), CoordinatorError> {
        for action in actions {
            match action {
                ScreenAction::ApplyTheme(theme) => self.host.apply_theme(screen, theme),
                ScreenAction::ApplyLocale(locale) => self.host.apply_locale(screen, &locale),
                ScreenAction::SetSecureWindow => self.host.set_secure_window(screen),
                ScreenAction::SetResult(result) => self.host.set_result(screen, result),
                ScreenAction::Notify(notice) => self.host.notify(screen, notice),
                ScreenAction::RedirectToRoot { clear_task } => {
                    self.redirect_to_root(screen, clear_task)?;
                },
                ScreenAction::Finish => {
                    self.host.finish(screen);
                    self.dispose(screen);
                },
                ScreenAction::ForceTerminate => self.terminate(screen),
                ScreenAction::LaunchExternal(request) => {
                    let Err(error) = self.host.launch_external(screen, &request) else {
                        continue;
                    };
                    let follow_up = self.coordinator_mut(screen)?.launch_failed(&request, error)?;
                    self.execute(screen, follow_up)?;
                },
            }
        }
        Ok(())
    }

    /// Remove a screen and its descendants from the visible stack.
    ///
    /// Tries the host's strong termination first; if unavailable, finishes
    /// every descendant (deepest first) and then the screen itself.
    fn terminate(&mut self, screen: ScreenId) {
        let descendants = self.descendants(screen);

        if self.host.try_force_terminate(screen) {
            tracing::debug!(%screen, descendants = descendants.len(), "force terminated");
        } else {
            tracing::warn!(%screen, "forced termination unavailable, finishing task manually");
            for descendant in &descendants {
                self.host.finish_and_remove(*descendant);
            }
            self.host.finish_and_remove(screen);
        }

        for descendant in descendants {
            self.dispose(descendant);
        }
        self.dispose(screen);
    }

    fn redirect_to_root(
        &mut self,
        origin: ScreenId,
        clear_task: bool,
    ) -> Result<(), CoordinatorError> {
        self.host.redirect_to_root(clear_task);

        if clear_task {
            let others: Vec<ScreenId> =
                self.screens.keys().copied().filter(|id| *id != origin).collect();
            for other in others {
                self.host.finish(other);
                self.dispose(other);
            }
        }

        let root =
            self.spawn(ScreenKind::Root, None, false, ScreenConfig::for_kind(ScreenKind::Root))?;
        tracing::info!(%origin, %root, "navigation reset to root");
        Ok(())
    }

    /// All screens spawned (transitively) by `screen`, every descendant
    /// ordered before its ancestors.
    fn descendants(&self, screen: ScreenId) -> Vec<ScreenId> {
        let mut found = Vec::new();
        let mut frontier = vec![screen];

        while let Some(parent) = frontier.pop() {
            for child in self.screens.values().filter(|c| c.parent() == Some(parent)) {
                found.push(child.id());
                frontier.push(child.id());
            }
        }

        found.reverse();
        found
    }

    /// Drop a screen's coordinator, unregistering it if still live.
    fn dispose(&mut self, screen: ScreenId) {
        if let Some(mut coordinator) = self.screens.remove(&screen) {
            let _ = coordinator.handle(ScreenEvent::Destroy);
        }
    }

    fn coordinator_mut(&mut self, screen: ScreenId) -> Result<&mut Coordinator, CoordinatorError> {
        self.screens.get_mut(&screen).ok_or(CoordinatorError::UnknownScreen(screen))
    }

    /// Coordinator of an open screen.
    pub fn screen(&self, screen: ScreenId) -> Option<&Coordinator> {
        self.screens.get(&screen)
    }

    /// All open screens, ascending by identifier.
    pub fn screens(&self) -> impl Iterator<Item = &Coordinator> + '_ {
        self.screens.values()
    }

    /// Shared vault context.
    pub fn context(&self) -> &Arc<VaultContext> {
        &self.context
    }

    /// Preferences applied to new screens.
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Replace the preferences applied to screens opened from now on.
    pub fn set_preferences(&mut self, preferences: Preferences) {
        self.preferences = preferences;
    }

    /// Get a reference to the host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Get a mutable reference to the host
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
