//! Subscription synchronizer: keeps one set of drag subscriptions per live
//! column handle.
//!
//! Each time the handle collection changes, the current handles are diffed
//! against the registry by [`ColumnKey`]. A handle swapped for a different
//! handle under the same key counts as removed and added again.

use std::rc::{Rc, Weak};

use tabula_core::alloc::{IndexMap, index_map};

use crate::column::{ColumnHandle, ColumnKey, DragEvent};
use crate::signal::SubscriptionId;

/// Receiver of a handle's drag events.
///
/// Subscriptions hold the listener weakly; events delivered after it is
/// dropped are ignored.
pub trait DragListener: 'static {
    fn on_drag_start(&self, event: &DragEvent);
    fn on_drag_move(&self, event: &DragEvent);
    fn on_drag_end(&self, event: &DragEvent);
}

/// The three subscriptions held on one handle.
#[derive(Debug)]
pub struct HandleSubscriptions {
    handle: Weak<ColumnHandle>,
    drag_start: SubscriptionId,
    dragging: SubscriptionId,
    drag_end: SubscriptionId,
}

impl HandleSubscriptions {
    /// Subscribe `listener` to all three drag signals of `handle`.
    pub fn subscribe<L: DragListener>(handle: &Rc<ColumnHandle>, listener: &Weak<L>) -> Self {
        let on_start = listener.clone();
        let drag_start = handle.drag_start.subscribe(move |event| {
            if let Some(listener) = on_start.upgrade() {
                listener.on_drag_start(event);
            }
        });

        let on_move = listener.clone();
        let dragging = handle.dragging.subscribe(move |event| {
            if let Some(listener) = on_move.upgrade() {
                listener.on_drag_move(event);
            }
        });

        let on_end = listener.clone();
        let drag_end = handle.drag_end.subscribe(move |event| {
            if let Some(listener) = on_end.upgrade() {
                listener.on_drag_end(event);
            }
        });

        Self {
            handle: Rc::downgrade(handle),
            drag_start,
            dragging,
            drag_end,
        }
    }

    /// Unsubscribe from the handle. Returns `false` if the handle is gone.
    pub fn release(&self) -> bool {
        let Some(handle) = self.handle.upgrade() else {
            return false;
        };
        handle.drag_start.unsubscribe(self.drag_start);
        handle.dragging.unsubscribe(self.dragging);
        handle.drag_end.unsubscribe(self.drag_end);
        true
    }

    /// Whether these subscriptions belong to exactly this handle instance.
    pub fn is_for(&self, handle: &Rc<ColumnHandle>) -> bool {
        std::ptr::eq(self.handle.as_ptr(), Rc::as_ptr(handle))
    }
}

/// Result of one key-based diff.
#[derive(Debug, Default)]
pub struct HandleDiff {
    /// Handles that gained subscriptions, in render order.
    pub added: Vec<Rc<ColumnHandle>>,
    /// Keys whose previous handle lost its subscriptions.
    pub removed: Vec<ColumnKey>,
}

impl HandleDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Keys present in both lists: handles replaced under the same key.
    pub fn replaced(&self) -> impl Iterator<Item = ColumnKey> + '_ {
        self.added
            .iter()
            .map(|handle| handle.key())
            .filter(|key| self.removed.contains(key))
    }
}

/// Registry of subscriptions keyed by [`ColumnKey`].
#[derive(Debug)]
pub struct SubscriptionRegistry {
    entries: IndexMap<ColumnKey, HandleSubscriptions>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self {
            entries: index_map(),
        }
    }

    /// Compute added and removed handles relative to the registry.
    ///
    /// When `current` holds the same key twice, the later handle wins.
    pub fn diff(&self, current: &[Rc<ColumnHandle>]) -> HandleDiff {
        let mut by_key: IndexMap<ColumnKey, &Rc<ColumnHandle>> = index_map();
        for handle in current {
            by_key.insert(handle.key(), handle);
        }

        let removed = self
            .entries
            .iter()
            .filter(|(key, subs)| by_key.get(*key).is_none_or(|handle| !subs.is_for(handle)))
            .map(|(key, _)| *key)
            .collect();

        let added = by_key
            .iter()
            .filter(|(key, handle)| {
                self.entries
                    .get(*key)
                    .is_none_or(|subs| !subs.is_for(handle))
            })
            .map(|(_, handle)| Rc::clone(*handle))
            .collect();

        HandleDiff { added, removed }
    }

    /// Diff against `current`, release removed handles and subscribe `listener`
    /// to added ones.
    pub fn sync<L: DragListener>(
        &mut self,
        current: &[Rc<ColumnHandle>],
        listener: &Weak<L>,
    ) -> HandleDiff {
        let diff = self.diff(current);

        for key in &diff.removed {
            if let Some(subs) = self.entries.shift_remove(key) {
                subs.release();
            }
        }
        for handle in &diff.added {
            self.entries
                .insert(handle.key(), HandleSubscriptions::subscribe(handle, listener));
        }

        diff
    }

    /// Release every held subscription. Returns how many handles were still alive.
    pub fn release_all(&mut self) -> usize {
        self.entries
            .drain(..)
            .filter(|(_, subs)| subs.release())
            .count()
    }

    pub fn contains(&self, key: ColumnKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Keys in subscription order.
    pub fn keys(&self) -> Vec<ColumnKey> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
