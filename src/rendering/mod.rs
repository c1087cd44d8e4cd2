//! # Rendering Module
//!
//! Plain-text rendering of boards, level status and engine events for the
//! CLI and for test failure output.

pub mod display;

pub use display::*;
