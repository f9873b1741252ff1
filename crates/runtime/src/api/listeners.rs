//! Zero-argument change listeners.
//!
//! Listeners are notified after every log entry and every tick. They carry no
//! payload; hosts read what changed through [`crate::BattleHandle::snapshot`]
//! or the event stream.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, PoisonError, Weak};

pub type Listener = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Returned by [`ListenerRegistry::subscribe`]; call [`Subscription::unsubscribe`]
/// to stop notifications.
///
/// Dropping it keeps the listener registered.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: ListenerId,
    registry: Weak<Mutex<Inner>>,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Returns `false` if the listener was already removed or the registry
    /// is gone.
    pub fn unsubscribe(self) -> bool {
        self.registry.upgrade().is_some_and(|inner| {
            inner
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .listeners
                .remove(&self.id)
                .is_some()
        })
    }
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    listeners: BTreeMap<ListenerId, Listener>,
}

/// Shared listener set. Clones share membership.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.insert(id, Arc::new(listener));
        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .remove(&id)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call every listener in subscription order.
    ///
    /// A panicking listener is logged and skipped; the rest still run.
    pub fn notify(&self) {
        // Snapshot so listeners may (un)subscribe while being notified.
        let listeners: Vec<(ListenerId, Listener)> = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .iter()
            .map(|(id, listener)| (*id, Arc::clone(listener)))
            .collect();

        for (id, listener) in listeners {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| listener())) {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!(
                    target: "arena::runtime",
                    listener = ?id,
                    %reason,
                    "battle listener panicked"
                );
            }
        }
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter(registry: &ListenerRegistry) -> (ListenerId, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let id = registry
            .subscribe(move || {
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .id();
        (id, count)
    }

    #[test]
    fn notifies_until_unsubscribed() {
        let registry = ListenerRegistry::new();
        let (id, count) = counter(&registry);

        registry.notify();
        registry.notify();
        assert_eq!(count.load(Ordering::SeqCst), 2);

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.notify();
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(registry.is_empty());
    }

    #[test]
    fn panicking_listener_does_not_stop_the_rest() {
        let registry = ListenerRegistry::new();
        registry.subscribe(|| panic!("boom"));
        let (_, count) = counter(&registry);

        registry.notify();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn listener_can_unsubscribe_itself() {
        let registry = ListenerRegistry::new();
        let slot: Arc<Mutex<Option<ListenerId>>> = Arc::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let id = {
            let registry = registry.clone();
            let slot = Arc::clone(&slot);
            let calls = Arc::clone(&calls);
            registry
                .clone()
                .subscribe(move || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    if let Some(id) = *slot.lock().unwrap() {
                        registry.unsubscribe(id);
                    }
                })
                .id()
        };
        *slot.lock().unwrap() = Some(id);

        registry.notify();
        registry.notify();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscription_removes_its_listener() {
        let registry = ListenerRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let subscription = registry.subscribe(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let (_, other) = counter(&registry);

        registry.notify();
        assert!(subscription.clone().unsubscribe());
        assert!(!subscription.unsubscribe());
        registry.notify();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(other.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn subscription_outliving_the_registry_is_inert() {
        let registry = ListenerRegistry::new();
        let subscription = registry.subscribe(|| {});
        drop(registry);
        assert!(!subscription.unsubscribe());
    }
}
