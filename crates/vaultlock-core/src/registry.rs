//! Lock listener registry.
//!
//! Screens register on creation and unregister on destruction. A lock
//! broadcast reaches every screen registered when the broadcast starts,
//! exactly once, even when listeners tear down themselves or other screens
//! from inside their callback.
//!
//! The registry copies the listener set before delivering anything and
//! releases its lock for the duration of the callbacks, so callbacks are free
//! to call [`ListenerRegistry::unregister`] (or `register`) re-entrantly.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{LockEvent, RegistryError, ScreenId};

/// Receiver of lock broadcasts.
///
/// Callbacks run synchronously on the broadcasting thread and must not block
/// or perform I/O.
pub trait LockListener: Send + Sync {
    /// Vault lock state changed.
    fn on_lock_event(&self, event: LockEvent);
}

impl<F> LockListener for F
where
    F: Fn(LockEvent) + Send + Sync,
{
    fn on_lock_event(&self, event: LockEvent) {
        self(event);
    }
}

/// Registry of screens listening for lock events.
///
/// Delivery order is ascending [`ScreenId`], which is stable across
/// broadcasts.
#[derive(Default)]
pub struct ListenerRegistry {
    /// Screen ID → listener
    listeners: Mutex<BTreeMap<ScreenId, Arc<dyn LockListener>>>,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry").field("registered", &self.registered_ids()).finish()
    }
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for lock events on behalf of `screen`.
    ///
    /// Registering the same screen twice is a programming error: debug
    /// builds abort, release builds replace the previous listener and
    /// return [`RegistryError::AlreadyRegistered`].
    pub fn register(
        &self,
        screen: ScreenId,
        listener: Arc<dyn LockListener>,
    ) -> Result<(), RegistryError> {
        let previous = self.guard().insert(screen, listener);

        debug_assert!(previous.is_none(), "{screen} registered twice without unregistering");
        if previous.is_some() {
            tracing::warn!(%screen, "lock listener registered twice, replacing");
            return Err(RegistryError::AlreadyRegistered(screen));
        }

        tracing::debug!(%screen, "lock listener registered");
        Ok(())
    }

    /// Remove the listener of `screen`.
    ///
    /// Returns `true` if the screen was registered.
    pub fn unregister(&self, screen: ScreenId) -> bool {
        let removed = self.guard().remove(&screen).is_some();
        if removed {
            tracing::debug!(%screen, "lock listener unregistered");
        }
        removed
    }

    /// Deliver a lock event to every currently registered listener.
    ///
    /// Returns the number of listeners notified. Listeners registered while
    /// the broadcast is running are not notified by it; listeners removed
    /// while it is running still receive it if they were registered at the
    /// start.
    pub fn broadcast(&self, locked: bool, user_initiated: bool) -> usize {
        let event = LockEvent { locked, user_initiated };
        let snapshot: Vec<(ScreenId, Arc<dyn LockListener>)> =
            self.guard().iter().map(|(id, listener)| (*id, Arc::clone(listener))).collect();

        tracing::debug!(locked, user_initiated, listeners = snapshot.len(), "broadcasting lock event");

        for (screen, listener) in &snapshot {
            tracing::trace!(%screen, "delivering lock event");
            listener.on_lock_event(event);
        }

        snapshot.len()
    }

    /// Check if a screen is registered.
    pub fn is_registered(&self, screen: ScreenId) -> bool {
        self.guard().contains_key(&screen)
    }

    /// All registered screens, ascending.
    pub fn registered_ids(&self) -> Vec<ScreenId> {
        self.guard().keys().copied().collect()
    }

    /// Number of registered screens.
    pub fn len(&self) -> usize {
        self.guard().len()
    }

    /// Check if no screen is registered.
    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    fn guard(&self) -> MutexGuard<'_, BTreeMap<ScreenId, Arc<dyn LockListener>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting_listener(counter: &Arc<AtomicUsize>) -> Arc<dyn LockListener> {
        let counter = Arc::clone(counter);
        Arc::new(move |_event: LockEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn register_and_unregister() {
        let registry = ListenerRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));

        assert!(registry.register(ScreenId::new(1), counting_listener(&counter)).is_ok());
        assert!(registry.is_registered(ScreenId::new(1)));
        assert!(!registry.is_registered(ScreenId::new(2)));

        assert!(registry.unregister(ScreenId::new(1)));
        assert!(!registry.unregister(ScreenId::new(1)));
        assert!(registry.is_empty());
    }

    #[test]
    fn broadcast_on_empty_registry_is_noop() {
        let registry = ListenerRegistry::new();
        assert_eq!(registry.broadcast(true, false), 0);
    }

    #[test]
    fn broadcast_passes_event_fields() {
        let registry = ListenerRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let listener: Arc<dyn LockListener> = Arc::new(move |event: LockEvent| {
            sink.lock().unwrap().push(event);
        });
        registry.register(ScreenId::new(1), listener).unwrap();

        registry.broadcast(true, true);
        registry.broadcast(false, false);

        assert_eq!(*seen.lock().unwrap(), [LockEvent::locked(true), LockEvent::unlocked()]);
    }

    #[test]
    fn delivery_order_is_ascending_screen_id() {
        let registry = ListenerRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for raw in [5, 1, 3] {
            let sink = Arc::clone(&order);
            let listener: Arc<dyn LockListener> =
                Arc::new(move |_event: LockEvent| sink.lock().unwrap().push(raw));
            registry.register(ScreenId::new(raw), listener).unwrap();
        }

        registry.broadcast(true, false);
        assert_eq!(*order.lock().unwrap(), [1, 3, 5]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "registered twice")]
    fn double_register_aborts_in_debug() {
        let registry = ListenerRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let _ = registry.register(ScreenId::new(1), counting_listener(&counter));
        let _ = registry.register(ScreenId::new(1), counting_listener(&counter));
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn double_register_replaces_in_release() {
        let registry = ListenerRegistry::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        assert!(registry.register(ScreenId::new(1), counting_listener(&first)).is_ok());
        assert_eq!(
            registry.register(ScreenId::new(1), counting_listener(&second)),
            Err(RegistryError::AlreadyRegistered(ScreenId::new(1)))
        );

        registry.broadcast(true, false);
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(), 1);
    }
}
