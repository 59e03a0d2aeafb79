use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// A callback registered with a [`ListenerRegistry`].
pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

type Slots<T> = Mutex<BTreeMap<u64, Listener<T>>>;

/// A set of callbacks that all receive every broadcast event.
///
/// Listeners are called synchronously by [`ListenerRegistry::notify`], outside
/// of the registry lock, so a listener may subscribe or unsubscribe while
/// being notified. Callers must not rely on notification order.
pub struct ListenerRegistry<T> {
    slots: Arc<Slots<T>>,
    next_id: AtomicU64,
}

impl<T> ListenerRegistry<T> {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
        T: 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.slots
            .lock()
            .expect("listener registry mutex poisoned")
            .insert(id, Arc::new(listener));

        let slots: Weak<Slots<T>> = Arc::downgrade(&self.slots);
        Subscription {
            remove: Box::new(move || {
                if let Some(slots) = slots.upgrade() {
                    slots
                        .lock()
                        .expect("listener registry mutex poisoned")
                        .remove(&id);
                }
            }),
        }
    }

    /// Call every currently registered listener with `event`.
    pub fn notify(&self, event: &T) {
        let snapshot: Vec<Listener<T>> = self
            .slots
            .lock()
            .expect("listener registry mutex poisoned")
            .values()
            .cloned()
            .collect();

        for listener in snapshot {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .expect("listener registry mutex poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for ListenerRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned by `subscribe`. Dropping it keeps the listener registered;
/// call [`Subscription::unsubscribe`] to remove it.
#[must_use = "keep the subscription to be able to unsubscribe later"]
pub struct Subscription {
    remove: Box<dyn FnOnce() + Send + Sync>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        (self.remove)();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
