//! Pointer-to-column target resolution.

use tabula_core::profiling::profile_function;

use super::snapshot::{ColumnPosition, PositionSnapshot};
use crate::column::{ColumnModel, PointerEvent};
use crate::layout::LayoutEngine;

/// A column found under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Snapshot entry of the target column.
    pub position: ColumnPosition,
    /// Enumeration slot of the entry in the snapshot. This is the index
    /// reported to the host; it counts the dragged column's own entry too.
    pub target_index: usize,
}

/// Find the first snapshot column, other than `dragged`, whose element lies
/// under the pointer.
///
/// Ties go to snapshot order, not stacking order. Returns `None` when the
/// pointer has no usable coordinates or no other column is hit.
pub fn resolve_target(
    snapshot: &PositionSnapshot,
    layout: &dyn LayoutEngine,
    dragged: &ColumnModel,
    pointer: &PointerEvent,
) -> Option<ResolvedTarget> {
    profile_function!();

    let point = pointer.point()?;
    if snapshot.is_empty() {
        return None;
    }

    let under_pointer = layout.elements_from_point(point);

    snapshot
        .iter()
        .enumerate()
        .find(|(_, (prop, pos))| *prop != dragged.prop && under_pointer.contains(&pos.element))
        .map(|(target_index, (_, pos))| ResolvedTarget {
            position: *pos,
            target_index,
        })
}
