//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers) and draw into a
//! [`RenderTarget`] handed out per frame or per offscreen capture.
//!
//! Convention: geometry arrives already in clip space; shaders apply no
//! projection beyond the fixed `[-1, 1]` orthographic mapping.

mod ctx;
pub mod strip;

pub use ctx::{RenderCtx, RenderTarget};
pub use strip::StripRenderer;
