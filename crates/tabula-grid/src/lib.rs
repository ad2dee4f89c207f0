//! Tabula Grid - column interaction for data grids
//!
//! This crate provides the pieces a grid needs to let users drag column
//! headers into a new order:
//! - [`signal`]: single-threaded event emitters
//! - [`layout`]: the layout seam (hit testing and element geometry)
//! - [`column`]: column handles and the shared handle list
//! - [`reorder`]: the drag-to-reorder coordinator

pub mod column;
pub mod layout;
pub mod reorder;
pub mod signal;

pub use column::{ColumnHandle, ColumnKey, ColumnModel, DragEvent, HandleList, PointerEvent};
pub use layout::{ElementId, LayoutEngine, LayoutRect, RectLayout};
pub use reorder::{
    ColumnReorder, HandleRemovalPolicy, ReorderConfig, ReorderError, ReorderEvent, ReorderResult,
    TargetChangedEvent,
};
pub use signal::{Signal, SubscriptionId};
