//! Column handles: the drag-enabled side of grid columns.
//!
//! The grid's column-rendering layer owns a [`HandleList`] of
//! [`ColumnHandle`]s in render order. Each handle exposes three drag signals
//! which the external drag-gesture primitive emits on.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tabula_core::math::Vec2;

use crate::layout::ElementId;
use crate::signal::Signal;

/// Stable identity of a column handle, independent of its position or `prop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnKey(u64);

impl ColumnKey {
    /// Create a key from a string id. Uses FNV-1a so keys are stable across runs.
    pub fn new(key: &str) -> Self {
        const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
        const FNV_PRIME: u64 = 0x100000001b3;

        let mut hash = FNV_OFFSET_BASIS;
        for byte in key.as_bytes() {
            hash ^= *byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        Self(hash)
    }

    /// Create a key from a raw value (for generated ids).
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColumnKey(0x{:016x})", self.0)
    }
}

impl From<&str> for ColumnKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The column model carried by drag events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnModel {
    /// Semantic column identifier (the bound row property).
    pub prop: String,
    /// Header label, if the grid has one.
    pub name: Option<String>,
}

impl ColumnModel {
    pub fn new(prop: impl Into<String>) -> Self {
        Self {
            prop: prop.into(),
            name: None,
        }
    }
}

/// Pointer coordinates as delivered by a drag source.
///
/// Synthetic drag events may carry relative `x`/`y` alongside the raw
/// `client_x`/`client_y`. Per axis, `x`/`y` win when present.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub client_x: Option<f32>,
    pub client_y: Option<f32>,
}

impl PointerEvent {
    /// Pointer event carrying `x`/`y` only.
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Pointer event carrying `client_x`/`client_y` only.
    pub fn client(client_x: f32, client_y: f32) -> Self {
        Self {
            client_x: Some(client_x),
            client_y: Some(client_y),
            ..Self::default()
        }
    }

    /// Add client coordinates to an existing event.
    pub fn with_client(mut self, client_x: f32, client_y: f32) -> Self {
        self.client_x = Some(client_x);
        self.client_y = Some(client_y);
        self
    }

    /// The point to hit-test, or `None` if an axis has no coordinate.
    pub fn point(&self) -> Option<Vec2> {
        let x = self.x.or(self.client_x)?;
        let y = self.y.or(self.client_y)?;
        Some(Vec2::new(x, y))
    }
}

/// Payload of every drag signal.
#[derive(Debug, Clone, PartialEq)]
pub struct DragEvent {
    /// The element being dragged.
    pub element: ElementId,
    /// Model of the dragged column.
    pub model: ColumnModel,
    /// Pointer position of this event.
    pub event: PointerEvent,
}

/// A drag-enabled column header.
pub struct ColumnHandle {
    key: ColumnKey,
    model: ColumnModel,
    element: ElementId,
    /// Emitted when the user starts dragging this column.
    pub drag_start: Signal<DragEvent>,
    /// Emitted on every pointer move while dragging.
    pub dragging: Signal<DragEvent>,
    /// Emitted when the pointer is released.
    pub drag_end: Signal<DragEvent>,
}

impl ColumnHandle {
    pub fn new(key: impl Into<ColumnKey>, model: ColumnModel, element: ElementId) -> Self {
        Self {
            key: key.into(),
            model,
            element,
            drag_start: Signal::new(),
            dragging: Signal::new(),
            drag_end: Signal::new(),
        }
    }

    pub fn key(&self) -> ColumnKey {
        self.key
    }

    pub fn model(&self) -> &ColumnModel {
        &self.model
    }

    pub fn prop(&self) -> &str {
        &self.model.prop
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Build a drag event for this handle at `event`.
    pub fn drag_event(&self, event: PointerEvent) -> DragEvent {
        DragEvent {
            element: self.element,
            model: self.model.clone(),
            event,
        }
    }

    /// Total listeners across the three drag signals.
    pub fn listener_count(&self) -> usize {
        self.drag_start.listener_count()
            + self.dragging.listener_count()
            + self.drag_end.listener_count()
    }
}

impl fmt::Debug for ColumnHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnHandle")
            .field("key", &self.key)
            .field("prop", &self.model.prop)
            .field("element", &self.element)
            .finish()
    }
}

struct HandleListInner {
    handles: RefCell<Vec<Rc<ColumnHandle>>>,
    changes: Signal<()>,
}

/// Ordered, shared collection of column handles in render order.
///
/// Cloning shares the same collection. Every mutation is followed by one
/// emission on [`HandleList::changes`].
#[derive(Clone)]
pub struct HandleList {
    inner: Rc<HandleListInner>,
}

impl HandleList {
    pub fn new() -> Self {
        Self::from_handles(Vec::new())
    }

    pub fn from_handles(handles: Vec<Rc<ColumnHandle>>) -> Self {
        Self {
            inner: Rc::new(HandleListInner {
                handles: RefCell::new(handles),
                changes: Signal::new(),
            }),
        }
    }

    /// Membership/order change notifications.
    pub fn changes(&self) -> &Signal<()> {
        &self.inner.changes
    }

    /// Snapshot of the handles in render order.
    pub fn to_vec(&self) -> Vec<Rc<ColumnHandle>> {
        self.inner.handles.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.handles.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.handles.borrow().is_empty()
    }

    pub fn get(&self, key: ColumnKey) -> Option<Rc<ColumnHandle>> {
        self.inner
            .handles
            .borrow()
            .iter()
            .find(|handle| handle.key() == key)
            .cloned()
    }

    pub fn position(&self, key: ColumnKey) -> Option<usize> {
        self.inner
            .handles
            .borrow()
            .iter()
            .position(|handle| handle.key() == key)
    }

    /// Apply several mutations and notify once.
    pub fn update<R>(&self, f: impl FnOnce(&mut Vec<Rc<ColumnHandle>>) -> R) -> R {
        let result = f(&mut self.inner.handles.borrow_mut());
        self.inner.changes.emit(&());
        result
    }

    pub fn push(&self, handle: Rc<ColumnHandle>) {
        self.update(|handles| handles.push(handle));
    }

    /// Insert at `index`, clamped to the end of the list.
    pub fn insert(&self, index: usize, handle: Rc<ColumnHandle>) {
        self.update(|handles| {
            let index = index.min(handles.len());
            handles.insert(index, handle);
        });
    }

    /// Remove the handle with `key`. Notifies only if something was removed.
    pub fn remove(&self, key: ColumnKey) -> Option<Rc<ColumnHandle>> {
        let removed = {
            let mut handles = self.inner.handles.borrow_mut();
            let index = handles.iter().position(|handle| handle.key() == key)?;
            handles.remove(index)
        };
        self.inner.changes.emit(&());
        Some(removed)
    }

    /// Swap in `handle` where a handle with the same key sits, or append it.
    ///
    /// Returns the handle it replaced.
    pub fn replace(&self, handle: Rc<ColumnHandle>) -> Option<Rc<ColumnHandle>> {
        self.update(|handles| {
            match handles.iter().position(|existing| existing.key() == handle.key()) {
                Some(index) => Some(std::mem::replace(&mut handles[index], handle)),
                None => {
                    handles.push(handle);
                    None
                }
            }
        })
    }

    /// Move the handle at `from` to `to` (both clamped), as a grid does after a reorder.
    pub fn move_handle(&self, from: usize, to: usize) {
        self.update(|handles| {
            if from < handles.len() {
                let handle = handles.remove(from);
                let to = to.min(handles.len());
                handles.insert(to, handle);
            }
        });
    }

    pub fn set(&self, handles: Vec<Rc<ColumnHandle>>) {
        self.update(|current| *current = handles);
    }

    pub fn clear(&self) {
        self.update(Vec::clear);
    }
}

impl Default for HandleList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HandleList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleList")
            .field("handles", &*self.inner.handles.borrow())
            .field("changes", &self.inner.changes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn handle(key: &str, element: u64) -> Rc<ColumnHandle> {
        Rc::new(ColumnHandle::new(key, ColumnModel::new(key), ElementId(element)))
    }

    #[test]
    fn test_column_key_is_stable() {
        assert_eq!(ColumnKey::new("name"), ColumnKey::new("name"));
        assert_ne!(ColumnKey::new("name"), ColumnKey::new("age"));
        assert_eq!(ColumnKey::from_raw(5).as_u64(), 5);
    }

    #[test]
    fn test_pointer_xy_takes_precedence() {
        let event = PointerEvent::at(10.0, 20.0).with_client(300.0, 400.0);
        assert_eq!(event.point(), Some(Vec2::new(10.0, 20.0)));

        let client_only = PointerEvent::client(300.0, 400.0);
        assert_eq!(client_only.point(), Some(Vec2::new(300.0, 400.0)));
    }

    #[test]
    fn test_pointer_precedence_is_per_axis() {
        let event = PointerEvent {
            x: Some(5.0),
            client_y: Some(9.0),
            ..PointerEvent::default()
        };
        assert_eq!(event.point(), Some(Vec2::new(5.0, 9.0)));
        assert_eq!(PointerEvent::default().point(), None);
    }

    #[test]
    fn test_mutations_notify_once() {
        let list = HandleList::new();
        let notifications = Rc::new(Cell::new(0));
        let counter = Rc::clone(&notifications);
        list.changes().subscribe(move |_| counter.set(counter.get() + 1));

        list.push(handle("a", 1));
        list.push(handle("b", 2));
        list.update(|handles| {
            handles.push(handle("c", 3));
            handles.push(handle("d", 4));
        });
        assert_eq!(notifications.get(), 3);
        assert_eq!(list.len(), 4);

        assert!(list.remove(ColumnKey::new("missing")).is_none());
        assert_eq!(notifications.get(), 3);

        assert!(list.remove(ColumnKey::new("a")).is_some());
        assert_eq!(notifications.get(), 4);
    }

    #[test]
    fn test_replace_keeps_position() {
        let list = HandleList::from_handles(vec![handle("a", 1), handle("b", 2)]);
        let replaced = list.replace(handle("a", 10)).unwrap();

        assert_eq!(replaced.element(), ElementId(1));
        assert_eq!(list.position(ColumnKey::new("a")), Some(0));
        assert_eq!(list.get(ColumnKey::new("a")).unwrap().element(), ElementId(10));
    }

    #[test]
    fn test_move_handle() {
        let list = HandleList::from_handles(vec![handle("a", 1), handle("b", 2), handle("c", 3)]);
        list.move_handle(0, 2);

        let props: Vec<_> = list.to_vec().iter().map(|h| h.prop().to_string()).collect();
        assert_eq!(props, vec!["b", "c", "a"]);
    }
}
