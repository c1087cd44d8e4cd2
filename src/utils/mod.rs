//! # Utilities Module
//!
//! Grid/world coordinate mapping shared by the engine and presentation layers.

pub mod math;

pub use math::*;
