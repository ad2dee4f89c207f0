//! Intent events emitted to the host grid.

use crate::column::ColumnModel;

/// Final instruction to move a column, emitted once at drag-end when the
/// pointer is released over another column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderEvent {
    /// Render index of the dragged column when the drag started.
    pub prev_index: usize,
    /// Target index the column should move to.
    pub new_index: usize,
    /// Model of the dragged column.
    pub model: ColumnModel,
}

/// The column under the pointer changed during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetChangedEvent {
    /// Previously reported target, `None` on the first change of a gesture.
    pub prev_index: Option<usize>,
    /// New target, `None` when the pointer is back over its origin or over no column.
    pub new_index: Option<usize>,
    /// Render index of the dragged column when the drag started.
    pub initial_index: usize,
}

impl TargetChangedEvent {
    /// True when the pointer left every valid drop target.
    pub fn returned_to_origin(&self) -> bool {
        self.new_index.is_none()
    }
}
