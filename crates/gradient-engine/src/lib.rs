//! Gradient engine crate.
//!
//! Platform + GPU runtime for the gradient editor: window and event loop,
//! device/surface management, offscreen capture, and the strip renderer that
//! draws compiled gradient geometry.

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod window;
