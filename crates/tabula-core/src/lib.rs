//! Tabula Core
//!
//! Shared building blocks for the Tabula grid crates: hashed and
//! insertion-ordered collections, vector math, logging setup and profiling.

pub mod alloc;
pub mod logging;
pub mod math;
pub mod profiling;
