//! Layout seam between the grid and whatever renders it.
//!
//! The reorder coordinator never measures anything itself. It asks a
//! [`LayoutEngine`] for element geometry and for the elements stacked under a
//! point. [`RectLayout`] is a retained rectangle table implementing the trait
//! for hosts that keep their own layout results.

use std::cell::RefCell;
use std::fmt;

use tabula_core::alloc::{IndexMap, index_map};
use tabula_core::math::Vec2;

/// Reference to an on-screen element (a rendered column header, its label, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({})", self.0)
    }
}

/// Geometry and hit-testing primitives provided by the layout engine.
pub trait LayoutEngine {
    /// Elements at `point`, topmost first.
    fn elements_from_point(&self, point: Vec2) -> Vec<ElementId>;

    /// Left edge of the element in layout pixels, including any drag offset.
    fn offset_left(&self, element: ElementId) -> f32;

    /// Width of the element in layout pixels.
    fn offset_width(&self, element: ElementId) -> f32;

    /// Drop any explicit horizontal offset so the element returns to normal flow.
    fn reset_horizontal_offset(&self, element: ElementId);
}

/// Axis-aligned rectangle in layout pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment: the right and bottom edges belong to the next cell.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

#[derive(Debug, Clone, Copy)]
struct RectEntry {
    rect: LayoutRect,
    horizontal_offset: f32,
}

impl RectEntry {
    fn placed(&self) -> LayoutRect {
        LayoutRect {
            x: self.rect.x + self.horizontal_offset,
            ..self.rect
        }
    }
}

/// Retained layout table keyed by [`ElementId`].
///
/// Elements inserted later stack on top of earlier ones. A horizontal offset
/// set with [`RectLayout::set_horizontal_offset`] shifts the element while it
/// is being dragged; [`LayoutEngine::reset_horizontal_offset`] clears it.
#[derive(Debug, Default)]
pub struct RectLayout {
    entries: RefCell<IndexMap<ElementId, RectEntry>>,
}

impl RectLayout {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(index_map()),
        }
    }

    /// Insert or replace an element's rectangle. Replacing keeps its stacking slot.
    pub fn set_rect(&self, element: ElementId, rect: LayoutRect) {
        self.entries.borrow_mut().insert(
            element,
            RectEntry {
                rect,
                horizontal_offset: 0.0,
            },
        );
    }

    /// Remove an element. Returns its rectangle if it was present.
    pub fn remove(&self, element: ElementId) -> Option<LayoutRect> {
        self.entries
            .borrow_mut()
            .shift_remove(&element)
            .map(|entry| entry.rect)
    }

    /// The element's rectangle including its current horizontal offset.
    pub fn rect(&self, element: ElementId) -> Option<LayoutRect> {
        self.entries.borrow().get(&element).map(RectEntry::placed)
    }

    /// Shift an element horizontally, as a drag source does while moving it.
    pub fn set_horizontal_offset(&self, element: ElementId, offset: f32) {
        if let Some(entry) = self.entries.borrow_mut().get_mut(&element) {
            entry.horizontal_offset = offset;
        }
    }

    pub fn horizontal_offset(&self, element: ElementId) -> Option<f32> {
        self.entries
            .borrow()
            .get(&element)
            .map(|entry| entry.horizontal_offset)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl LayoutEngine for RectLayout {
    fn elements_from_point(&self, point: Vec2) -> Vec<ElementId> {
        self.entries
            .borrow()
            .iter()
            .rev()
            .filter(|(_, entry)| entry.placed().contains(point))
            .map(|(id, _)| *id)
            .collect()
    }

    fn offset_left(&self, element: ElementId) -> f32 {
        self.rect(element).map_or(0.0, |rect| rect.x)
    }

    fn offset_width(&self, element: ElementId) -> f32 {
        self.rect(element).map_or(0.0, |rect| rect.width)
    }

    fn reset_horizontal_offset(&self, element: ElementId) {
        self.set_horizontal_offset(element, 0.0);
    }
}
