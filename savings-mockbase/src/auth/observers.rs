//! Ordered registry of auth-state observers
//!
//! Observers run synchronously in registration order. A panicking observer
//! is caught and logged; the remaining observers still run and the
//! triggering operation is unaffected.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::error;

use super::types::{AuthChangeEvent, Session};

/// Observer callback: `(event, session)`; session is `None` on sign-out
pub type AuthCallback = Box<dyn Fn(AuthChangeEvent, Option<&Session>) + Send + Sync>;

type SharedCallback = Arc<dyn Fn(AuthChangeEvent, Option<&Session>) + Send + Sync>;

#[derive(Default)]
pub struct ObserverRegistry {
    next_id: AtomicU64,
    observers: Mutex<Vec<(u64, SharedCallback)>>,
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.len())
            .finish()
    }
}

impl ObserverRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Append `callback` to the end of the notification order
    pub fn register(self: &Arc<Self>, callback: AuthCallback) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.observers.lock().push((id, Arc::from(callback)));
        Subscription {
            id,
            registry: Arc::downgrade(self),
        }
    }

    /// Remove observer `id`; false if it was already gone
    pub fn unregister(&self, id: u64) -> bool {
        let mut observers = self.observers.lock();
        let before = observers.len();
        observers.retain(|(oid, _)| *oid != id);
        observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call every observer registered at the time of the call.
    ///
    /// The list is snapshotted first, so a callback may (un)register without
    /// deadlocking. Returns how many observers panicked.
    pub fn notify(&self, event: AuthChangeEvent, session: Option<&Session>) -> usize {
        let snapshot: Vec<(u64, SharedCallback)> = self.observers.lock().clone();
        let mut failed = 0;
        for (id, callback) in snapshot {
            if catch_unwind(AssertUnwindSafe(|| callback(event, session))).is_err() {
                failed += 1;
                error!(observer = id, event = %event, "Auth observer panicked");
            }
        }
        failed
    }
}

/// Handle returned by `on_auth_state_change`.
///
/// Dropping it keeps the observer registered; call [`unsubscribe`](Self::unsubscribe).
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    registry: Weak<ObserverRegistry>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove exactly this observer. Safe to call more than once.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unregister(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, name: &'static str) -> AuthCallback {
        let log = log.clone();
        Box::new(move |event, _| log.lock().push(format!("{name}:{event}")))
    }

    #[test]
    fn test_notify_in_registration_order() {
        let registry = ObserverRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        registry.register(recorder(&log, "a"));
        registry.register(recorder(&log, "b"));

        registry.notify(AuthChangeEvent::SignedIn, None);
        assert_eq!(*log.lock(), vec!["a:SIGNED_IN", "b:SIGNED_IN"]);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let registry = ObserverRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = registry.register(recorder(&log, "a"));
        registry.register(recorder(&log, "b"));

        a.unsubscribe();
        a.unsubscribe();
        assert_eq!(registry.len(), 1);

        registry.notify(AuthChangeEvent::SignedOut, None);
        assert_eq!(*log.lock(), vec!["b:SIGNED_OUT"]);
    }

    #[test]
    fn test_panicking_observer_is_isolated() {
        let registry = ObserverRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        registry.register(Box::new(|_, _| panic!("observer failure")));
        registry.register(recorder(&log, "b"));

        let failed = registry.notify(AuthChangeEvent::SignedIn, None);
        assert_eq!(failed, 1);
        assert_eq!(*log.lock(), vec!["b:SIGNED_IN"]);
    }

    #[test]
    fn test_observer_may_unsubscribe_itself() {
        let registry = ObserverRegistry::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let inner = slot.clone();
        let sub = registry.register(Box::new(move |_, _| {
            if let Some(sub) = inner.lock().as_ref() {
                sub.unsubscribe();
            }
        }));
        *slot.lock() = Some(sub);

        registry.notify(AuthChangeEvent::SignedIn, None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_subscription_outliving_registry() {
        let registry = ObserverRegistry::new();
        let sub = registry.register(Box::new(|_, _| {}));
        drop(registry);
        sub.unsubscribe();
    }
}
