//! A ready-made row of columns for coordinator tests.

use std::cell::Cell;
use std::rc::Rc;

use tabula_grid::{
    ColumnHandle, ColumnKey, ColumnModel, ColumnReorder, DragEvent, ElementId, HandleList,
    LayoutRect, PointerEvent, ReorderConfig,
};

use crate::MockLayout;

/// Height of every fixture column.
pub const FIXTURE_ROW_HEIGHT: f32 = 30.0;

/// Columns laid out left to right, `width` pixels each, starting at x = 0.
///
/// The n-th column pushed gets element `ElementId(n)` (1-based) and a key
/// equal to its prop.
pub struct ColumnFixture {
    pub layout: Rc<MockLayout>,
    pub handles: HandleList,
    pub width: f32,
    next_element: Cell<u64>,
}

impl ColumnFixture {
    pub fn new(props: &[&str], width: f32) -> Self {
        let fixture = Self {
            layout: Rc::new(MockLayout::new()),
            handles: HandleList::new(),
            width,
            next_element: Cell::new(1),
        };
        for prop in props {
            fixture.push_column(prop);
        }
        fixture.layout.clear_calls();
        fixture
    }

    /// Append a column to the right of the existing ones.
    pub fn push_column(&self, prop: &str) -> Rc<ColumnHandle> {
        let index = self.handles.len();
        let element = ElementId(self.next_element.get());
        self.next_element.set(element.0 + 1);
        self.layout.set_rect(
            element,
            LayoutRect::new(index as f32 * self.width, 0.0, self.width, FIXTURE_ROW_HEIGHT),
        );
        let handle = Rc::new(ColumnHandle::new(prop, ColumnModel::new(prop), element));
        self.handles.push(Rc::clone(&handle));
        handle
    }

    /// Handle for `prop`. Panics if there is none.
    pub fn handle(&self, prop: &str) -> Rc<ColumnHandle> {
        self.handles
            .get(ColumnKey::new(prop))
            .unwrap_or_else(|| panic!("no column handle for prop '{prop}'"))
    }

    /// Drag event for `prop` at `(x, FIXTURE_ROW_HEIGHT / 2)`.
    pub fn event(&self, prop: &str, x: f32) -> DragEvent {
        self.handle(prop)
            .drag_event(PointerEvent::at(x, FIXTURE_ROW_HEIGHT / 2.0))
    }

    /// Horizontal center of column `index`.
    pub fn center_of(&self, index: usize) -> f32 {
        index as f32 * self.width + self.width / 2.0
    }

    pub fn coordinator(&self) -> ColumnReorder {
        self.coordinator_with(ReorderConfig::default())
    }

    pub fn coordinator_with(&self, config: ReorderConfig) -> ColumnReorder {
        ColumnReorder::with_config(self.handles.clone(), self.layout.clone(), config)
    }

    /// Props in current render order.
    pub fn props(&self) -> Vec<String> {
        self.handles
            .to_vec()
            .iter()
            .map(|handle| handle.prop().to_string())
            .collect()
    }
}
