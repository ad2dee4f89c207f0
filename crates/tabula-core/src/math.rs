//! Vector math re-exported from [`glam`].
//!
//! Pointer positions and hit-test points are [`Vec2`] values in layout pixels.
//!
//! ```
//! use tabula_core::math::Vec2;
//!
//! let pointer = Vec2::new(150.0, 12.0);
//! assert_eq!(pointer.x, 150.0);
//! ```
//!
//! [`glam`]: https://docs.rs/glam

pub use glam::Vec2;
