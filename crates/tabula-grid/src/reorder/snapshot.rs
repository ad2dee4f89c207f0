//! Column geometry frozen at drag start.

use std::rc::Rc;

use tabula_core::alloc::{IndexMap, index_map_with_capacity};

use crate::column::ColumnHandle;
use crate::layout::{ElementId, LayoutEngine};

/// Geometry of one column at drag start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnPosition {
    /// Left edge, truncated to whole pixels.
    pub left: i32,
    /// `left` plus the truncated width.
    pub right: i32,
    /// Render index when the snapshot was taken.
    pub index: usize,
    /// The column's element.
    pub element: ElementId,
}

impl ColumnPosition {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }
}

/// Per-gesture map of `prop` to [`ColumnPosition`], in enumeration order.
#[derive(Debug, Clone, Default)]
pub struct PositionSnapshot {
    positions: IndexMap<String, ColumnPosition>,
}

impl PositionSnapshot {
    /// Measure every handle in render order.
    ///
    /// Handles sharing a `prop` keep the first one's slot and the last one's
    /// geometry and index.
    pub fn capture(handles: &[Rc<ColumnHandle>], layout: &dyn LayoutEngine) -> Self {
        let mut positions = index_map_with_capacity(handles.len());

        for (index, handle) in handles.iter().enumerate() {
            let element = handle.element();
            let left = layout.offset_left(element) as i32;
            let width = layout.offset_width(element) as i32;
            positions.insert(
                handle.prop().to_string(),
                ColumnPosition {
                    left,
                    right: left.saturating_add(width),
                    index,
                    element,
                },
            );
        }

        Self { positions }
    }

    pub fn get(&self, prop: &str) -> Option<&ColumnPosition> {
        self.positions.get(prop)
    }

    /// Entries in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnPosition)> {
        self.positions.iter().map(|(prop, pos)| (prop.as_str(), pos))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnModel;
    use crate::layout::{LayoutRect, RectLayout};

    fn handle(prop: &str, element: u64) -> Rc<ColumnHandle> {
        Rc::new(ColumnHandle::new(prop, ColumnModel::new(prop), ElementId(element)))
    }

    #[test]
    fn test_capture_in_render_order() {
        let layout = RectLayout::new();
        layout.set_rect(ElementId(1), LayoutRect::new(0.0, 0.0, 100.0, 30.0));
        layout.set_rect(ElementId(2), LayoutRect::new(100.0, 0.0, 100.0, 30.0));
        layout.set_rect(ElementId(3), LayoutRect::new(200.0, 0.0, 100.0, 30.0));

        let handles = vec![handle("a", 1), handle("b", 2), handle("c", 3)];
        let snapshot = PositionSnapshot::capture(&handles, &layout);

        assert_eq!(snapshot.len(), 3);
        let b = snapshot.get("b").unwrap();
        assert_eq!((b.left, b.right, b.index, b.element), (100, 200, 1, ElementId(2)));

        let order: Vec<_> = snapshot.iter().map(|(prop, pos)| (prop, pos.index)).collect();
        assert_eq!(order, vec![("a", 0), ("b", 1), ("c", 2)]);
    }

    #[test]
    fn test_geometry_is_truncated() {
        let layout = RectLayout::new();
        layout.set_rect(ElementId(1), LayoutRect::new(10.9, 0.0, 50.7, 30.0));

        let snapshot = PositionSnapshot::capture(&[handle("a", 1)], &layout);
        let a = snapshot.get("a").unwrap();
        assert_eq!((a.left, a.right), (10, 60));
        assert_eq!(a.width(), 50);
    }

    #[test]
    fn test_far_right_column_saturates() {
        let layout = RectLayout::new();
        layout.set_rect(ElementId(1), LayoutRect::new(3.0e9, 0.0, 100.0, 30.0));

        let snapshot = PositionSnapshot::capture(&[handle("far", 1)], &layout);
        let pos = snapshot.get("far").unwrap();
        assert_eq!((pos.left, pos.right), (i32::MAX, i32::MAX));
        assert_eq!(pos.width(), 0);
    }

    #[test]
    fn test_zero_width_column() {
        let layout = RectLayout::new();
        layout.set_rect(ElementId(1), LayoutRect::new(40.0, 0.0, 0.0, 30.0));

        let snapshot = PositionSnapshot::capture(&[handle("hidden", 1)], &layout);
        let pos = snapshot.get("hidden").unwrap();
        assert_eq!(pos.left, pos.right);
    }

    #[test]
    fn test_empty_capture() {
        let snapshot = PositionSnapshot::capture(&[], &RectLayout::new());
        assert!(snapshot.is_empty());
        assert!(snapshot.get("a").is_none());
    }

    #[test]
    fn test_duplicate_prop_keeps_first_slot() {
        let layout = RectLayout::new();
        layout.set_rect(ElementId(1), LayoutRect::new(0.0, 0.0, 100.0, 30.0));
        layout.set_rect(ElementId(2), LayoutRect::new(100.0, 0.0, 100.0, 30.0));
        layout.set_rect(ElementId(3), LayoutRect::new(200.0, 0.0, 100.0, 30.0));

        let handles = vec![handle("a", 1), handle("b", 2), handle("a", 3)];
        let snapshot = PositionSnapshot::capture(&handles, &layout);

        let order: Vec<_> = snapshot.iter().map(|(prop, pos)| (prop, pos.index)).collect();
        assert_eq!(order, vec![("a", 2), ("b", 1)]);
        assert_eq!(snapshot.get("a").unwrap().element, ElementId(3));
    }
}
