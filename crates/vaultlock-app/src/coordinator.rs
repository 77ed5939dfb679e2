//! Screen lifecycle coordinator.
//!
//! This module defines the [`Coordinator`] state machine, embedded in every
//! screen. It ties the screen's lifecycle to the shared
//! [`VaultContext`]:
//!
//! - On creation it decides whether the screen is an orphan. Orphans redirect
//!   to the root screen and terminate without ever registering; everything
//!   else registers for lock events.
//! - Around an external hand-off it suppresses auto-lock, and clears the
//!   suppression on every resume.
//! - On a lock broadcast it runs the configured [`LockResponse`].
//! - On destruction it unregisters, exactly once.
//!
//! The coordinator mutates only the context (registration, suppression); all
//! effects on the screen itself are returned as [`ScreenAction`]s for the
//! runtime to execute.

use std::sync::Arc;

use vaultlock_core::{
    LockEvent, LockListener, OrphanCheck, ScreenId, ScreenKind, SessionId, VaultContext,
};

use crate::{
    CoordinatorError, ExternalRequest, LaunchError, LockResponse, Notice, ScreenAction,
    ScreenConfig, ScreenEvent, ScreenPhase, ScreenResult, ScreenSetup,
};

/// Per-screen lifecycle state machine.
pub struct Coordinator {
    id: ScreenId,
    kind: ScreenKind,
    /// Screen that spawned this one. `None` for task roots.
    parent: Option<ScreenId>,
    /// Session generation at construction. Never changes.
    created_in: SessionId,
    phase: ScreenPhase,
    config: ScreenConfig,
    setup: ScreenSetup,
    context: Arc<VaultContext>,
    /// Registered with the context's registry while live.
    listener: Arc<dyn LockListener>,
    /// Lock broadcasts received while live.
    locks_observed: u32,
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("parent", &self.parent)
            .field("created_in", &self.created_in)
            .field("phase", &self.phase)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    /// Create a coordinator for a new screen in the context's current
    /// session.
    pub fn new(
        id: ScreenId,
        kind: ScreenKind,
        context: Arc<VaultContext>,
        listener: Arc<dyn LockListener>,
    ) -> Self {
        Self {
            id,
            kind,
            parent: None,
            created_in: context.current_session(),
            phase: ScreenPhase::Created,
            config: ScreenConfig::for_kind(kind),
            setup: ScreenSetup::default(),
            context,
            listener,
            locks_observed: 0,
        }
    }

    /// Set the screen that spawned this one.
    #[must_use]
    pub fn with_parent(mut self, parent: Option<ScreenId>) -> Self {
        self.parent = parent;
        self
    }

    /// Override the kind's default configuration.
    #[must_use]
    pub fn with_config(mut self, config: ScreenConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the theme, locale and window setup applied on creation.
    #[must_use]
    pub fn with_setup(mut self, setup: ScreenSetup) -> Self {
        self.setup = setup;
        self
    }

    /// Process a lifecycle event and return actions.
    pub fn handle(&mut self, event: ScreenEvent) -> Vec<ScreenAction> {
        match event {
            ScreenEvent::Create { restored } => self.create(restored),
            ScreenEvent::Resume => self.resume(),
            ScreenEvent::Lock(event) => self.on_lock_event(event),
            ScreenEvent::Destroy => {
                self.teardown();
                vec![]
            },
        }
    }

    /// React to a lock broadcast.
    pub fn on_lock_event(&mut self, event: LockEvent) -> Vec<ScreenAction> {
        if !event.locked || !self.phase.is_live() {
            return vec![];
        }
        self.locks_observed = self.locks_observed.saturating_add(1);

        match self.config.lock_response {
            LockResponse::Ignore => {
                tracing::debug!(screen = %self.id, kind = %self.kind, "lock ignored");
                vec![]
            },
            LockResponse::Terminate => {
                tracing::debug!(
                    screen = %self.id,
                    kind = %self.kind,
                    user_initiated = event.user_initiated,
                    "terminating on lock"
                );
                self.teardown();
                vec![ScreenAction::SetResult(ScreenResult::Cancelled), ScreenAction::ForceTerminate]
            },
        }
    }

    /// Hand control to an external process.
    ///
    /// Suppresses auto-lock before returning the launch action. The
    /// suppression is cleared on the next resume, whatever happens to the
    /// launch.
    pub fn delegate(
        &mut self,
        request: ExternalRequest,
    ) -> Result<Vec<ScreenAction>, CoordinatorError> {
        if !self.phase.is_live() {
            return Err(CoordinatorError::NotLive { screen: self.id, phase: self.phase });
        }

        self.context.suppressor().suppress();
        self.transition(ScreenPhase::Suppressing);
        Ok(vec![ScreenAction::LaunchExternal(request)])
    }

    /// The host could not start the external process of a delegation.
    ///
    /// Missing document providers are reported to the user and recovered;
    /// any other missing handler is returned to the caller. Only valid while
    /// the screen is waiting on a delegation.
    pub fn launch_failed(
        &mut self,
        request: &ExternalRequest,
        error: LaunchError,
    ) -> Result<Vec<ScreenAction>, CoordinatorError> {
        if self.phase != ScreenPhase::Suppressing {
            return Err(CoordinatorError::NotDelegating { screen: self.id, phase: self.phase });
        }

        tracing::warn!(screen = %self.id, action = %request.action, %error, "external launch failed");

        if request.action.is_document_action() {
            Ok(vec![ScreenAction::Notify(Notice::DocumentsUnavailable)])
        } else {
            Err(CoordinatorError::Delegation { screen: self.id, source: error })
        }
    }

    fn create(&mut self, restored: bool) -> Vec<ScreenAction> {
        if self.phase != ScreenPhase::Created {
            tracing::warn!(screen = %self.id, phase = %self.phase, "duplicate create ignored");
            return vec![];
        }

        let mut actions = vec![
            ScreenAction::ApplyTheme(self.setup.theme),
            ScreenAction::ApplyLocale(self.setup.locale.clone()),
        ];

        let check = OrphanCheck { kind: self.kind, created_in: self.created_in, restored };
        if check.evaluate(&self.context.lock_state()) {
            tracing::info!(screen = %self.id, kind = %self.kind, "orphaned screen, resetting to root");
            self.transition(ScreenPhase::Destroyed);
            actions.push(ScreenAction::RedirectToRoot { clear_task: true });
            actions.push(ScreenAction::Finish);
            return actions;
        }

        if self.setup.secure_screen {
            actions.push(ScreenAction::SetSecureWindow);
        }

        if let Err(error) = self.context.registry().register(self.id, Arc::clone(&self.listener)) {
            tracing::warn!(screen = %self.id, %error, "registration conflict");
        }
        self.transition(ScreenPhase::Registered);
        actions
    }

    fn resume(&mut self) -> Vec<ScreenAction> {
        if !self.phase.is_live() {
            tracing::debug!(screen = %self.id, phase = %self.phase, "resume ignored");
            return vec![];
        }

        self.context.suppressor().unsuppress();
        self.transition(ScreenPhase::Active);
        vec![]
    }

    /// Unregister and move to `Destroyed`. No-op unless live.
    fn teardown(&mut self) {
        if !self.phase.is_live() {
            return;
        }

        // A screen torn down mid hand-off never resumes to clear its own
        // suppression.
        if self.phase == ScreenPhase::Suppressing {
            self.context.suppressor().unsuppress();
        }

        self.transition(ScreenPhase::Unregistering);
        if !self.context.registry().unregister(self.id) {
            tracing::warn!(screen = %self.id, "live screen was not registered");
        }
        self.transition(ScreenPhase::Destroyed);
    }

    fn transition(&mut self, next: ScreenPhase) {
        tracing::trace!(screen = %self.id, from = %self.phase, to = %next, "phase transition");
        self.phase = next;
    }

    /// Screen identifier.
    pub fn id(&self) -> ScreenId {
        self.id
    }

    /// Screen kind.
    pub fn kind(&self) -> ScreenKind {
        self.kind
    }

    /// Screen that spawned this one. `None` for task roots.
    pub fn parent(&self) -> Option<ScreenId> {
        self.parent
    }

    /// Session generation the screen was created in.
    pub fn created_in(&self) -> SessionId {
        self.created_in
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> ScreenPhase {
        self.phase
    }

    /// Whether the screen is registered and reacting to events.
    pub fn is_live(&self) -> bool {
        self.phase.is_live()
    }

    /// Coordinator configuration.
    pub fn config(&self) -> ScreenConfig {
        self.config
    }

    /// Lock broadcasts received while live.
    pub fn locks_observed(&self) -> u32 {
        self.locks_observed
    }
}
