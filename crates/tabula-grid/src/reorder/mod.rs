//! Drag-to-reorder for grid column headers.
//!
//! This module provides:
//! - **ColumnReorder**: the coordinator that listens to every column handle's
//!   drag signals and emits intent events for the host grid
//! - **PositionSnapshot**: column geometry frozen at drag start
//! - **Target resolution**: which other column the pointer is over
//! - **Subscription sync**: key-based diffing of the live handle list
//!
//! The coordinator never moves columns itself. The host listens to
//! [`ColumnReorder::reorder`] and applies the move.
//!
//! # Quick Start
//!
//! ```
//! use std::rc::Rc;
//!
//! use tabula_grid::column::{ColumnHandle, ColumnModel, HandleList, PointerEvent};
//! use tabula_grid::layout::{ElementId, LayoutRect, RectLayout};
//! use tabula_grid::reorder::ColumnReorder;
//!
//! let layout = Rc::new(RectLayout::new());
//! let handles = HandleList::new();
//! for (i, prop) in ["name", "age"].into_iter().enumerate() {
//!     let element = ElementId(i as u64);
//!     layout.set_rect(element, LayoutRect::new(i as f32 * 100.0, 0.0, 100.0, 24.0));
//!     handles.push(Rc::new(ColumnHandle::new(prop, ColumnModel::new(prop), element)));
//! }
//!
//! let reorder = ColumnReorder::new(handles.clone(), layout);
//! let grid = handles.clone();
//! reorder
//!     .reorder()
//!     .subscribe(move |e| grid.move_handle(e.prev_index, e.new_index));
//! reorder.start().unwrap();
//!
//! let name = handles.to_vec()[0].clone();
//! name.drag_start.emit(&name.drag_event(PointerEvent::at(10.0, 10.0)));
//! name.dragging.emit(&name.drag_event(PointerEvent::at(150.0, 10.0)));
//! name.drag_end.emit(&name.drag_event(PointerEvent::at(150.0, 10.0)));
//!
//! assert_eq!(handles.to_vec()[1].prop(), "name");
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod snapshot;
pub mod sync;
pub mod target;

pub use config::{HandleRemovalPolicy, ReorderConfig};
pub use coordinator::ColumnReorder;
pub use error::{ReorderError, ReorderResult};
pub use events::{ReorderEvent, TargetChangedEvent};
pub use snapshot::{ColumnPosition, PositionSnapshot};
pub use sync::{DragListener, HandleDiff, HandleSubscriptions, SubscriptionRegistry};
pub use target::{ResolvedTarget, resolve_target};
