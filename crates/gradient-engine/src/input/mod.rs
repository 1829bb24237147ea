//! Keyboard input.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The runtime translates platform key events into [`KeyPress`]es.

mod types;

pub use types::{Key, KeyPress, Modifiers};
