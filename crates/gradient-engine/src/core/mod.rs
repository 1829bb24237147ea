//! Core engine-facing contracts.
//!
//! Defines the interface between the runtime (platform loop) and the
//! application, plus the per-frame context handed to it.

mod app;
mod ctx;

pub use app::{App, AppControl, SurfaceSize};
pub use ctx::{FrameCtx, FrameStatus, WindowCtx};
