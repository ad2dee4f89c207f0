//! Recording mock of the layout seam.

use parking_lot::Mutex;
use tabula_core::math::Vec2;
use tabula_grid::{ElementId, LayoutEngine, LayoutRect, RectLayout};

/// A call received by [`MockLayout`].
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutCall {
    ElementsFromPoint { point: Vec2 },
    OffsetLeft { element: ElementId },
    OffsetWidth { element: ElementId },
    ResetHorizontalOffset { element: ElementId },
}

/// Layout engine over plain rectangles that records every call.
///
/// Geometry and hit testing are delegated to a [`RectLayout`]; the mock only
/// adds call recording on top.
///
/// # Example
///
/// ```rust
/// use tabula_grid::{ElementId, LayoutEngine, LayoutRect};
/// use tabula_test_utils::MockLayout;
///
/// let mock = MockLayout::new();
/// mock.set_rect(ElementId(1), LayoutRect::new(0.0, 0.0, 80.0, 20.0));
///
/// assert_eq!(mock.offset_width(ElementId(1)), 80.0);
/// mock.reset_horizontal_offset(ElementId(1));
///
/// assert_eq!(mock.resets(), vec![ElementId(1)]);
/// assert_eq!(mock.call_count(), 2);
/// ```
pub struct MockLayout {
    rects: RectLayout,
    calls: Mutex<Vec<LayoutCall>>,
}

impl MockLayout {
    pub fn new() -> Self {
        Self {
            rects: RectLayout::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_rect(&self, element: ElementId, rect: LayoutRect) {
        self.rects.set_rect(element, rect);
    }

    pub fn remove(&self, element: ElementId) -> Option<LayoutRect> {
        self.rects.remove(element)
    }

    /// Shift an element the way a drag source does mid-gesture.
    pub fn set_horizontal_offset(&self, element: ElementId, offset: f32) {
        self.rects.set_horizontal_offset(element, offset);
    }

    pub fn horizontal_offset(&self, element: ElementId) -> Option<f32> {
        self.rects.horizontal_offset(element)
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<LayoutCall> {
        self.calls.lock().clone()
    }

    /// Count hit-test queries.
    pub fn count_hit_tests(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, LayoutCall::ElementsFromPoint { .. }))
            .count()
    }

    /// Count geometry reads (`offset_left` and `offset_width`).
    pub fn count_measurements(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    LayoutCall::OffsetLeft { .. } | LayoutCall::OffsetWidth { .. }
                )
            })
            .count()
    }

    /// Elements whose offset was reset, in call order.
    pub fn resets(&self) -> Vec<ElementId> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                LayoutCall::ResetHorizontalOffset { element } => Some(*element),
                _ => None,
            })
            .collect()
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(&self, call: LayoutCall) {
        self.calls.lock().push(call);
    }
}

impl Default for MockLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine for MockLayout {
    fn elements_from_point(&self, point: Vec2) -> Vec<ElementId> {
        self.record(LayoutCall::ElementsFromPoint { point });
        self.rects.elements_from_point(point)
    }

    fn offset_left(&self, element: ElementId) -> f32 {
        self.record(LayoutCall::OffsetLeft { element });
        self.rects.offset_left(element)
    }

    fn offset_width(&self, element: ElementId) -> f32 {
        self.record(LayoutCall::OffsetWidth { element });
        self.rects.offset_width(element)
    }

    fn reset_horizontal_offset(&self, element: ElementId) {
        self.record(LayoutCall::ResetHorizontalOffset { element });
        self.rects.reset_horizontal_offset(element);
    }
}
