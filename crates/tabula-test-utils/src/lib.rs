//! Test utilities for Tabula.
//!
//! This crate provides testing infrastructure for the grid crates:
//!
//! - [`MockLayout`] - a [`LayoutEngine`] over plain rectangles that records
//!   every call it receives
//! - [`EventRecorder`] - captures everything emitted on a [`Signal`]
//! - [`ColumnFixture`] - a row of equally sized columns with handles
//!
//! # Example
//!
//! ```rust
//! use tabula_core::math::Vec2;
//! use tabula_grid::LayoutEngine;
//! use tabula_test_utils::ColumnFixture;
//!
//! let fixture = ColumnFixture::new(&["a", "b", "c"], 100.0);
//! let b = fixture.handle("b");
//!
//! let hits = fixture.layout.elements_from_point(Vec2::new(150.0, 5.0));
//! assert_eq!(hits, vec![b.element()]);
//! assert_eq!(fixture.layout.count_hit_tests(), 1);
//! ```
//!
//! [`LayoutEngine`]: tabula_grid::LayoutEngine
//! [`Signal`]: tabula_grid::Signal

pub mod fixture;
pub mod mock_layout;
pub mod recorder;

pub use fixture::*;
pub use mock_layout::*;
pub use recorder::*;
