use crate::input::KeyPress;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Window content size as reported by the platform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceSize {
    /// Logical width.
    pub width: f64,
    /// Logical height.
    pub height: f64,
    /// Physical pixels per logical pixel.
    pub scale_factor: f64,
}

/// Application contract implemented by higher layers.
///
/// The runtime redraws on demand: after every callback it asks
/// [`wants_redraw`](App::wants_redraw) and schedules at most one frame.
pub trait App {
    /// Called for every key press, including auto-repeat.
    fn on_key(&mut self, key: KeyPress) -> AppControl {
        let _ = key;
        AppControl::Continue
    }

    /// Called when the window is resized or moved to a display with a different scale.
    fn on_resize(&mut self, size: SurfaceSize) {
        let _ = size;
    }

    /// Whether a frame should be scheduled.
    fn wants_redraw(&self) -> bool {
        true
    }

    /// Called once per scheduled frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
