use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use crate::device::{Gpu, OffscreenTarget, Raster, SurfaceErrorAction, OFFSCREEN_FORMAT};
use crate::render::{RenderCtx, RenderTarget};

/// Outcome of [`FrameCtx::render`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    /// The frame reached the window.
    Presented,
    /// Zero-sized (minimized) surface; nothing to draw until the next resize.
    Hidden,
    /// The surface was reconfigured or timed out; the frame must be redrawn.
    Retry,
    /// Unrecoverable surface error.
    Fatal,
}

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Reconfigures the window surface if its drawable size differs from `size`.
    pub fn ensure_surface_size(&mut self, size: PhysicalSize<u32>) {
        if self.gpu.size() != size {
            log::debug!("surface resized to {}x{}", size.width, size.height);
            self.gpu.resize(size);
        }
    }

    /// Clears the window surface with `clear`, calls `draw`, then presents.
    ///
    /// Anything but [`FrameStatus::Presented`] means `draw` did not reach the
    /// screen and the caller still owes a frame.
    pub fn render<F>(&mut self, clear: wgpu::Color, draw: F) -> FrameStatus
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let size = self.gpu.size();
        if size.width == 0 || size.height == 0 {
            return FrameStatus::Hidden;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => {
                        log::error!("fatal surface error; shutting down");
                        FrameStatus::Fatal
                    }
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        FrameStatus::Retry
                    }
                };
            }
        };

        clear_pass(&mut frame.encoder, &frame.view, clear);

        let rctx = RenderCtx::new(self.gpu.device(), self.gpu.queue(), self.gpu.surface_format());
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            draw(&rctx, &mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        FrameStatus::Presented
    }

    /// Renders one frame into an offscreen `width x height` target and reads it back.
    ///
    /// The window surface is not touched. Blocks until the pixels are on the CPU.
    pub fn capture<F>(&mut self, width: u32, height: u32, clear: wgpu::Color, draw: F) -> Result<Raster>
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let device = self.gpu.device();
        let queue = self.gpu.queue();

        let target = OffscreenTarget::new(device, width, height)
            .context("failed to allocate capture target")?;

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("gradient capture encoder"),
        });

        clear_pass(&mut encoder, target.view(), clear);

        let rctx = RenderCtx::new(device, queue, OFFSCREEN_FORMAT);
        {
            let mut rt = RenderTarget::new(&mut encoder, target.view());
            draw(&rctx, &mut rt);
        }

        target.copy_to_readback(&mut encoder);
        queue.submit(std::iter::once(encoder.finish()));

        target.read(device)
    }
}

fn clear_pass(encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, clear: wgpu::Color) {
    let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("gradient clear"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });
}
