//! Single-threaded signals used to wire drag sources to their listeners.
//!
//! A [`Signal`] owns a list of callbacks. [`Signal::emit`] calls every
//! listener that is still subscribed at the moment it is reached, so a
//! listener may unsubscribe itself or others while an emission is running.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Callback type for signal listeners.
pub type SignalCallback<T> = Rc<dyn Fn(&T)>;

/// Identifies one listener on one [`Signal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Get the raw id value.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

/// An event emitter with subscribe/unsubscribe by id.
pub struct Signal<T> {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(SubscriptionId, SignalCallback<T>)>>,
}

impl<T> Signal<T> {
    /// Create a signal with no listeners.
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Register a listener. Listeners are called in subscription order.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    /// Remove a listener. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Check whether a listener is currently subscribed.
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow().iter().any(|(existing, _)| *existing == id)
    }

    /// Number of subscribed listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver `value` to every subscribed listener.
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<(SubscriptionId, SignalCallback<T>)> = self
            .listeners
            .borrow()
            .iter()
            .map(|(id, callback)| (*id, Rc::clone(callback)))
            .collect();

        for (id, callback) in snapshot {
            // Skip listeners removed by an earlier callback of this emission.
            if self.is_subscribed(id) {
                callback(value);
            }
        }
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
