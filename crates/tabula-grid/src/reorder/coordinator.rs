//! The reorder coordinator: lifecycle, drag handlers and output signals.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tabula_core::profiling::profile_function;

use super::config::{HandleRemovalPolicy, ReorderConfig};
use super::error::{ReorderError, ReorderResult};
use super::events::{ReorderEvent, TargetChangedEvent};
use super::snapshot::PositionSnapshot;
use super::sync::{DragListener, HandleDiff, SubscriptionRegistry};
use super::target::{ResolvedTarget, resolve_target};
use crate::column::{ColumnKey, ColumnModel, DragEvent, HandleList, PointerEvent};
use crate::layout::{ElementId, LayoutEngine};
use crate::signal::{Signal, SubscriptionId};

/// State of the gesture between drag-start and drag-end.
#[derive(Debug)]
struct DragSession {
    /// Prop of the column that started the gesture.
    prop: String,
    /// Handle key of that column, when it could be matched in the list.
    key: Option<ColumnKey>,
    element: ElementId,
    snapshot: PositionSnapshot,
    /// Last target reported through `target_changed`.
    last_target: Option<usize>,
}

#[derive(Debug, Default)]
struct ReorderState {
    session: Option<DragSession>,
    registry: SubscriptionRegistry,
    /// Listener on the handle list's change notifications, while started.
    changes: Option<SubscriptionId>,
}

struct Inner {
    handles: HandleList,
    layout: Rc<dyn LayoutEngine>,
    config: ReorderConfig,
    state: RefCell<ReorderState>,
    reorder: Signal<ReorderEvent>,
    target_changed: Signal<TargetChangedEvent>,
}

/// Coordinates drag-to-reorder for the columns of one grid.
///
/// Call [`ColumnReorder::start`] once the handle list is populated and
/// [`ColumnReorder::stop`] on teardown (dropping the coordinator also stops
/// it). While started, every handle in the list delivers its drag events
/// here, and intent events come out of [`ColumnReorder::reorder`] and
/// [`ColumnReorder::target_changed`].
pub struct ColumnReorder {
    inner: Rc<Inner>,
}

impl ColumnReorder {
    pub fn new(handles: HandleList, layout: Rc<dyn LayoutEngine>) -> Self {
        Self::with_config(handles, layout, ReorderConfig::default())
    }

    pub fn with_config(
        handles: HandleList,
        layout: Rc<dyn LayoutEngine>,
        config: ReorderConfig,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                handles,
                layout,
                config,
                state: RefCell::new(ReorderState::default()),
                reorder: Signal::new(),
                target_changed: Signal::new(),
            }),
        }
    }

    /// Subscribe to every current handle and to future list changes.
    pub fn start(&self) -> ReorderResult<HandleDiff> {
        if self.is_started() {
            return Err(ReorderError::AlreadyStarted);
        }

        let weak = Rc::downgrade(&self.inner);
        let changes = self.inner.handles.changes().subscribe(move |_| {
            if let Some(inner) = weak.upgrade()
                && let Err(err) = inner.sync()
            {
                tracing::error!("Column handle sync failed: {}", err);
            }
        });
        self.inner.state.borrow_mut().changes = Some(changes);

        let diff = self.inner.sync()?;
        tracing::debug!(columns = diff.added.len(), "Column reorder started");
        Ok(diff)
    }

    /// Release every subscription and forget any gesture in flight.
    ///
    /// Does not synthesize a drag-end, so no reorder is emitted and no offset
    /// is reset.
    pub fn stop(&self) {
        let mut state = self.inner.state.borrow_mut();
        let Some(changes) = state.changes.take() else {
            return;
        };
        self.inner.handles.changes().unsubscribe(changes);
        state.session = None;
        let released = state.registry.release_all();
        tracing::debug!(released, "Column reorder stopped");
    }

    pub fn is_started(&self) -> bool {
        self.inner.state.borrow().changes.is_some()
    }

    /// Re-run the subscription diff against the current handle list.
    ///
    /// Runs automatically on every list change while started.
    pub fn sync(&self) -> ReorderResult<HandleDiff> {
        self.inner.sync()
    }

    /// Reorder intents, one per successful drop.
    pub fn reorder(&self) -> &Signal<ReorderEvent> {
        &self.inner.reorder
    }

    /// Hovered-target changes during a drag.
    pub fn target_changed(&self) -> &Signal<TargetChangedEvent> {
        &self.inner.target_changed
    }

    pub fn config(&self) -> &ReorderConfig {
        &self.inner.config
    }

    pub fn handles(&self) -> &HandleList {
        &self.inner.handles
    }

    /// Snapshot geometry and begin a gesture for `event.model`.
    pub fn on_drag_start(&self, event: &DragEvent) {
        self.inner.drag_start(event);
    }

    /// Track the hovered target. Returns the emitted event, if any.
    pub fn on_drag_move(&self, event: &DragEvent) -> ReorderResult<Option<TargetChangedEvent>> {
        self.inner.drag_move(event)
    }

    /// Finish the gesture. Returns the emitted reorder intent, if any.
    pub fn on_drag_end(&self, event: &DragEvent) -> ReorderResult<Option<ReorderEvent>> {
        self.inner.drag_end(event)
    }

    /// Resolve the column under `pointer` against the current gesture's snapshot.
    pub fn resolve_target(
        &self,
        model: &ColumnModel,
        pointer: &PointerEvent,
    ) -> Option<ResolvedTarget> {
        let state = self.inner.state.borrow();
        let session = state.session.as_ref()?;
        resolve_target(&session.snapshot, self.inner.layout.as_ref(), model, pointer)
    }

    pub fn is_dragging(&self) -> bool {
        self.inner.state.borrow().session.is_some()
    }

    /// Prop of the column being dragged.
    pub fn dragged_prop(&self) -> Option<String> {
        self.inner
            .state
            .borrow()
            .session
            .as_ref()
            .map(|session| session.prop.clone())
    }

    /// Last target reported during the current gesture.
    pub fn last_target(&self) -> Option<usize> {
        self.inner
            .state
            .borrow()
            .session
            .as_ref()
            .and_then(|session| session.last_target)
    }

    /// Copy of the current gesture's snapshot.
    pub fn snapshot(&self) -> Option<PositionSnapshot> {
        self.inner
            .state
            .borrow()
            .session
            .as_ref()
            .map(|session| session.snapshot.clone())
    }

    /// Keys of the handles currently subscribed to.
    pub fn subscribed_keys(&self) -> Vec<ColumnKey> {
        self.inner.state.borrow().registry.keys()
    }
}

impl Drop for ColumnReorder {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for ColumnReorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("ColumnReorder")
            .field("started", &state.changes.is_some())
            .field("subscribed", &state.registry.len())
            .field("session", &state.session)
            .field("config", &self.inner.config)
            .finish()
    }
}

impl Inner {
    fn sync(self: &Rc<Self>) -> ReorderResult<HandleDiff> {
        profile_function!();

        let handles = self.handles.to_vec();
        let weak: Weak<Inner> = Rc::downgrade(self);

        let (diff, aborted) = {
            let mut state = self.state.borrow_mut();
            if state.changes.is_none() {
                return Err(ReorderError::NotStarted);
            }
            let diff = state.registry.sync(&handles, &weak);

            let dragged_removed = state
                .session
                .as_ref()
                .and_then(|session| session.key)
                .is_some_and(|key| diff.removed.contains(&key));

            let aborted = if dragged_removed
                && self.config.handle_removal == HandleRemovalPolicy::AbortGesture
            {
                state.session.take()
            } else {
                None
            };
            (diff, aborted)
        };

        if !diff.is_empty() {
            tracing::debug!(
                added = diff.added.len(),
                removed = diff.removed.len(),
                "Column handles synced"
            );
        }
        if let Some(session) = aborted {
            tracing::debug!(prop = %session.prop, "Dragged column removed, gesture aborted");
            self.layout.reset_horizontal_offset(session.element);
        }

        Ok(diff)
    }

    fn drag_start(&self, event: &DragEvent) {
        profile_function!();

        let handles = self.handles.to_vec();
        let snapshot = PositionSnapshot::capture(&handles, self.layout.as_ref());
        let key = handles
            .iter()
            .find(|handle| handle.element() == event.element)
            .or_else(|| handles.iter().find(|handle| handle.prop() == event.model.prop))
            .map(|handle| handle.key());

        tracing::debug!(
            prop = %event.model.prop,
            columns = snapshot.len(),
            "Column drag started"
        );

        self.state.borrow_mut().session = Some(DragSession {
            prop: event.model.prop.clone(),
            key,
            element: event.element,
            snapshot,
            last_target: None,
        });
    }

    fn drag_move(&self, event: &DragEvent) -> ReorderResult<Option<TargetChangedEvent>> {
        profile_function!();

        let changed = {
            let mut state = self.state.borrow_mut();
            let Some(session) = state.session.as_mut() else {
                return Err(ReorderError::UnknownColumn(event.model.prop.clone()));
            };
            let Some(prev_pos) = session.snapshot.get(&event.model.prop).copied() else {
                let aborted = state.session.take();
                drop(state);
                if let Some(session) = aborted {
                    tracing::debug!(prop = %session.prop, "Unknown column moved, gesture aborted");
                    self.layout.reset_horizontal_offset(session.element);
                }
                return Err(ReorderError::UnknownColumn(event.model.prop.clone()));
            };

            let target = resolve_target(
                &session.snapshot,
                self.layout.as_ref(),
                &event.model,
                &event.event,
            );
            tracing::trace!(
                prop = %event.model.prop,
                hit = ?target.map(|t| t.target_index),
                "Column drag moved"
            );

            match target {
                Some(target) if session.last_target != Some(target.target_index) => {
                    let changed = TargetChangedEvent {
                        prev_index: session.last_target,
                        new_index: Some(target.target_index),
                        initial_index: prev_pos.index,
                    };
                    session.last_target = Some(target.target_index);
                    Some(changed)
                }
                None if session.last_target != Some(prev_pos.index) => {
                    let changed = TargetChangedEvent {
                        prev_index: session.last_target,
                        new_index: None,
                        initial_index: prev_pos.index,
                    };
                    session.last_target = Some(prev_pos.index);
                    Some(changed)
                }
                _ => None,
            }
        };

        if let Some(changed) = changed {
            tracing::debug!(
                prev = ?changed.prev_index,
                new = ?changed.new_index,
                initial = changed.initial_index,
                "Column drop target changed"
            );
            self.target_changed.emit(&changed);
        }
        Ok(changed)
    }

    fn drag_end(&self, event: &DragEvent) -> ReorderResult<Option<ReorderEvent>> {
        profile_function!();

        let result = {
            let session = self.state.borrow_mut().session.take();
            match session {
                Some(session) => match session.snapshot.get(&event.model.prop) {
                    Some(prev_pos) => {
                        let target = resolve_target(
                            &session.snapshot,
                            self.layout.as_ref(),
                            &event.model,
                            &event.event,
                        );
                        Ok(target.map(|target| ReorderEvent {
                            prev_index: prev_pos.index,
                            new_index: target.target_index,
                            model: event.model.clone(),
                        }))
                    }
                    None => Err(ReorderError::UnknownColumn(event.model.prop.clone())),
                },
                None => Err(ReorderError::UnknownColumn(event.model.prop.clone())),
            }
        };

        if let Ok(Some(reorder)) = &result {
            tracing::debug!(
                prop = %reorder.model.prop,
                from = reorder.prev_index,
                to = reorder.new_index,
                "Column reorder requested"
            );
            self.reorder.emit(reorder);
        }
        self.layout.reset_horizontal_offset(event.element);

        result
    }
}

impl DragListener for Inner {
    fn on_drag_start(&self, event: &DragEvent) {
        self.drag_start(event);
    }

    fn on_drag_move(&self, event: &DragEvent) {
        if let Err(err) = self.drag_move(event) {
            tracing::error!("Column drag move ignored: {}", err);
        }
    }

    fn on_drag_end(&self, event: &DragEvent) {
        if let Err(err) = self.drag_end(event) {
            tracing::error!("Column drag end ignored: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::column::ColumnHandle;
    use crate::layout::{LayoutRect, RectLayout};

    struct Fixture {
        layout: Rc<RectLayout>,
        handles: HandleList,
        reorder: ColumnReorder,
        changed: Rc<RefCell<Vec<TargetChangedEvent>>>,
        reordered: Rc<RefCell<Vec<ReorderEvent>>>,
    }

    impl Fixture {
        fn new(props: &[&str]) -> Self {
            Self::with_config(props, ReorderConfig::default())
        }

        fn with_config(props: &[&str], config: ReorderConfig) -> Self {
            let layout = Rc::new(RectLayout::new());
            let mut list = Vec::new();
            for (i, prop) in props.iter().enumerate() {
                let element = ElementId(i as u64 + 1);
                layout.set_rect(element, LayoutRect::new(i as f32 * 100.0, 0.0, 100.0, 30.0));
                list.push(Rc::new(ColumnHandle::new(
                    *prop,
                    ColumnModel::new(*prop),
                    element,
                )));
            }
            let handles = HandleList::from_handles(list);
            let reorder = ColumnReorder::with_config(handles.clone(), layout.clone(), config);

            let changed = Rc::new(RefCell::new(Vec::new()));
            let sink = Rc::clone(&changed);
            reorder
                .target_changed()
                .subscribe(move |e| sink.borrow_mut().push(*e));

            let reordered = Rc::new(RefCell::new(Vec::new()));
            let sink = Rc::clone(&reordered);
            reorder
                .reorder()
                .subscribe(move |e: &ReorderEvent| sink.borrow_mut().push(e.clone()));

            Self {
                layout,
                handles,
                reorder,
                changed,
                reordered,
            }
        }

        fn handle(&self, prop: &str) -> Rc<ColumnHandle> {
            self.handles.get(ColumnKey::new(prop)).unwrap()
        }
    }

    #[test]
    fn test_start_subscribes_all_handles() {
        let fx = Fixture::new(&["a", "b", "c"]);
        let diff = fx.reorder.start().unwrap();

        assert_eq!(diff.added.len(), 3);
        assert!(fx.reorder.is_started());
        assert_eq!(fx.handle("b").listener_count(), 3);
        assert_eq!(fx.reorder.start().unwrap_err(), ReorderError::AlreadyStarted);
    }

    #[test]
    fn test_sync_requires_start() {
        let fx = Fixture::new(&["a"]);
        assert_eq!(fx.reorder.sync().unwrap_err(), ReorderError::NotStarted);
    }

    #[test]
    fn test_stop_releases_everything() {
        let fx = Fixture::new(&["a", "b"]);
        fx.reorder.start().unwrap();
        fx.reorder.stop();

        assert!(!fx.reorder.is_started());
        assert_eq!(fx.handle("a").listener_count(), 0);
        assert_eq!(fx.handles.changes().listener_count(), 0);

        // Stopping twice is harmless.
        fx.reorder.stop();
    }

    #[test]
    fn test_drop_stops() {
        let fx = Fixture::new(&["a"]);
        fx.reorder.start().unwrap();
        let a = fx.handle("a");
        let handles = fx.handles.clone();
        drop(fx);

        assert_eq!(a.listener_count(), 0);
        assert_eq!(handles.changes().listener_count(), 0);
    }

    #[test]
    fn test_drag_start_snapshots_geometry() {
        let fx = Fixture::new(&["a", "b", "c"]);
        let a = fx.handle("a");
        fx.reorder.on_drag_start(&a.drag_event(PointerEvent::at(50.0, 10.0)));

        let snapshot = fx.reorder.snapshot().unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.get("c").unwrap().left, 200);
        assert_eq!(fx.reorder.dragged_prop().as_deref(), Some("a"));
        assert_eq!(fx.reorder.last_target(), None);
    }

    #[test]
    fn test_move_emits_only_on_change() {
        let fx = Fixture::new(&["a", "b", "c"]);
        let a = fx.handle("a");
        fx.reorder.on_drag_start(&a.drag_event(PointerEvent::at(50.0, 10.0)));

        let first = fx
            .reorder
            .on_drag_move(&a.drag_event(PointerEvent::at(150.0, 10.0)))
            .unwrap();
        assert_eq!(
            first,
            Some(TargetChangedEvent {
                prev_index: None,
                new_index: Some(1),
                initial_index: 0,
            })
        );

        let repeat = fx
            .reorder
            .on_drag_move(&a.drag_event(PointerEvent::at(160.0, 10.0)))
            .unwrap();
        assert_eq!(repeat, None);

        let back = fx
            .reorder
            .on_drag_move(&a.drag_event(PointerEvent::at(50.0, 10.0)))
            .unwrap();
        assert_eq!(
            back,
            Some(TargetChangedEvent {
                prev_index: Some(1),
                new_index: None,
                initial_index: 0,
            })
        );
        assert_eq!(fx.changed.borrow().len(), 2);
        assert_eq!(fx.reorder.last_target(), Some(0));
    }

    #[test]
    fn test_first_move_over_origin_reports_return() {
        let fx = Fixture::new(&["a", "b"]);
        let b = fx.handle("b");
        fx.reorder.on_drag_start(&b.drag_event(PointerEvent::at(150.0, 10.0)));

        let event = fx
            .reorder
            .on_drag_move(&b.drag_event(PointerEvent::at(150.0, 10.0)))
            .unwrap();
        assert_eq!(
            event,
            Some(TargetChangedEvent {
                prev_index: None,
                new_index: None,
                initial_index: 1,
            })
        );
    }

    #[test]
    fn test_end_over_target_reorders_and_resets_offset() {
        let fx = Fixture::new(&["a", "b", "c"]);
        let a = fx.handle("a");
        fx.reorder.on_drag_start(&a.drag_event(PointerEvent::at(50.0, 10.0)));
        fx.layout.set_horizontal_offset(a.element(), 120.0);

        let reorder = fx
            .reorder
            .on_drag_end(&a.drag_event(PointerEvent::at(250.0, 10.0)))
            .unwrap()
            .unwrap();

        assert_eq!(reorder.prev_index, 0);
        assert_eq!(reorder.new_index, 2);
        assert_eq!(reorder.model.prop, "a");
        assert_eq!(fx.reordered.borrow().len(), 1);
        assert_eq!(fx.layout.horizontal_offset(a.element()), Some(0.0));
        assert!(!fx.reorder.is_dragging());
    }

    #[test]
    fn test_end_without_target_still_resets() {
        let fx = Fixture::new(&["a", "b"]);
        let a = fx.handle("a");
        fx.reorder.on_drag_start(&a.drag_event(PointerEvent::at(50.0, 10.0)));
        fx.layout.set_horizontal_offset(a.element(), 40.0);

        let result = fx
            .reorder
            .on_drag_end(&a.drag_event(PointerEvent::at(900.0, 10.0)))
            .unwrap();

        assert_eq!(result, None);
        assert!(fx.reordered.borrow().is_empty());
        assert_eq!(fx.layout.horizontal_offset(a.element()), Some(0.0));
        assert_eq!(fx.reorder.last_target(), None);
    }

    #[test]
    fn test_move_without_start_is_unknown_column() {
        let fx = Fixture::new(&["a"]);
        let a = fx.handle("a");
        let err = fx
            .reorder
            .on_drag_move(&a.drag_event(PointerEvent::at(0.0, 0.0)))
            .unwrap_err();
        assert_eq!(err, ReorderError::UnknownColumn("a".into()));
    }

    #[test]
    fn test_unknown_prop_aborts_gesture() {
        let fx = Fixture::new(&["a", "b"]);
        let a = fx.handle("a");
        fx.reorder.on_drag_start(&a.drag_event(PointerEvent::at(50.0, 10.0)));
        fx.layout.set_horizontal_offset(a.element(), 70.0);

        let stranger = DragEvent {
            element: ElementId(99),
            model: ColumnModel::new("zzz"),
            event: PointerEvent::at(150.0, 10.0),
        };
        assert!(fx.reorder.on_drag_move(&stranger).is_err());
        assert!(!fx.reorder.is_dragging());
        assert!(fx.changed.borrow().is_empty());
        // The dragged column snaps back, same as when its handle is removed.
        assert_eq!(fx.layout.horizontal_offset(a.element()), Some(0.0));
        assert_eq!(fx.layout.horizontal_offset(ElementId(99)), None);
    }

    #[test]
    fn test_signal_driven_gesture() {
        let fx = Fixture::new(&["a", "b", "c"]);
        fx.reorder.start().unwrap();
        let a = fx.handle("a");

        a.drag_start.emit(&a.drag_event(PointerEvent::at(50.0, 10.0)));
        a.dragging.emit(&a.drag_event(PointerEvent::at(150.0, 10.0)));
        a.drag_end.emit(&a.drag_event(PointerEvent::at(150.0, 10.0)));

        assert_eq!(fx.changed.borrow().len(), 1);
        assert_eq!(
            *fx.reordered.borrow(),
            vec![ReorderEvent {
                prev_index: 0,
                new_index: 1,
                model: ColumnModel::new("a"),
            }]
        );
    }

    #[test]
    fn test_removing_dragged_handle_aborts_by_default() {
        let fx = Fixture::new(&["a", "b"]);
        fx.reorder.start().unwrap();
        let a = fx.handle("a");
        a.drag_start.emit(&a.drag_event(PointerEvent::at(50.0, 10.0)));
        fx.layout.set_horizontal_offset(a.element(), 30.0);

        fx.handles.remove(a.key());

        assert!(!fx.reorder.is_dragging());
        assert_eq!(fx.layout.horizontal_offset(a.element()), Some(0.0));
        assert_eq!(a.listener_count(), 0);
    }

    #[test]
    fn test_keep_snapshot_policy() {
        let config = ReorderConfig::default().handle_removal(HandleRemovalPolicy::KeepSnapshot);
        let fx = Fixture::with_config(&["a", "b", "c"], config);
        fx.reorder.start().unwrap();
        let a = fx.handle("a");
        a.drag_start.emit(&a.drag_event(PointerEvent::at(50.0, 10.0)));

        fx.handles.remove(ColumnKey::new("c"));
        fx.handles.remove(a.key());

        assert!(fx.reorder.is_dragging());
        assert_eq!(fx.reorder.snapshot().unwrap().len(), 3);

        // The host can still finish the gesture directly.
        let reorder = fx
            .reorder
            .on_drag_end(&a.drag_event(PointerEvent::at(150.0, 10.0)))
            .unwrap();
        assert_eq!(reorder.map(|r| r.new_index), Some(1));
    }

    #[test]
    fn test_listener_may_reorder_handles_during_emit() {
        let fx = Fixture::new(&["a", "b", "c"]);
        fx.reorder.start().unwrap();

        let handles = fx.handles.clone();
        fx.reorder
            .reorder()
            .subscribe(move |e: &ReorderEvent| handles.move_handle(e.prev_index, e.new_index));

        let a = fx.handle("a");
        a.drag_start.emit(&a.drag_event(PointerEvent::at(50.0, 10.0)));
        a.drag_end.emit(&a.drag_event(PointerEvent::at(250.0, 10.0)));

        let order: Vec<_> = fx
            .handles
            .to_vec()
            .iter()
            .map(|h| h.prop().to_string())
            .collect();
        assert_eq!(order, vec!["b", "c", "a"]);
        assert_eq!(fx.reorder.subscribed_keys().len(), 3);
    }
}
