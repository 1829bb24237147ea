//! Presentation surface.
//!
//! Sits between the stop collection and the GPU. Edits are compiled and staged
//! on the CPU side as they happen; the frame callback uploads whatever is
//! staged, runs a pending export, and draws. Several edits between two frames
//! therefore cost one upload and one render.

use std::io::Write;

use anyhow::{bail, Result};
use winit::dpi::PhysicalSize;

use gradient_core::{compile, CompiledGeometry, ExportFormat, StopCollection};
use gradient_engine::core::{AppControl, FrameCtx, FrameStatus};
use gradient_engine::render::{RenderCtx, StripRenderer};

use crate::encode::encode_raster;

/// Receives the outcome of an export once the file is written and closed.
pub type ExportCallback = Box<dyn FnOnce(Result<()>)>;

/// How staged geometry reaches the GPU.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UploadPath {
    /// Same stop count as the bound mesh: rewrite its buffers in place.
    Update,
    /// Stop count changed (or first upload): allocate a new mesh.
    Rebuild,
}

struct Upload {
    geometry: CompiledGeometry,
    path: UploadPath,
}

struct ExportRequest {
    width: u32,
    height: u32,
    quality: f32,
    format: ExportFormat,
    sink: Box<dyn Write>,
    on_complete: ExportCallback,
}

/// Logical display size plus density.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Display {
    width: f64,
    height: f64,
    pixel_density: f64,
}

pub struct Presenter {
    renderer: StripRenderer,
    clear: wgpu::Color,

    staged: Option<CompiledGeometry>,
    bound_stop_count: Option<usize>,
    pending_redraw: bool,
    pending_export: Option<ExportRequest>,

    display: Display,
}

impl Presenter {
    pub fn new(clear: wgpu::Color) -> Self {
        Self {
            renderer: StripRenderer::new(),
            clear,
            staged: None,
            bound_stop_count: None,
            pending_redraw: false,
            pending_export: None,
            display: Display {
                width: 0.0,
                height: 0.0,
                pixel_density: 1.0,
            },
        }
    }

    /// Compiles `stops` and stages the result for the next frame.
    ///
    /// An empty collection compiles to nothing; the previous geometry stays
    /// on screen and no redraw is requested.
    pub fn apply(&mut self, stops: &StopCollection) {
        let Some(geometry) = compile(stops) else {
            log::debug!("empty stop collection; keeping current geometry");
            return;
        };
        self.staged = Some(geometry);
        self.pending_redraw = true;
    }

    /// Records the logical display size. The surface follows on the next frame.
    pub fn resize(&mut self, width: f64, height: f64, pixel_density: f64) {
        let pixel_density = if pixel_density.is_finite() && pixel_density > 0.0 {
            pixel_density
        } else {
            1.0
        };
        self.display = Display {
            width: width.max(0.0),
            height: height.max(0.0),
            pixel_density,
        };
        self.pending_redraw = true;
    }

    /// Drawable size in physical pixels: logical size times density, rounded.
    pub fn physical_size(&self) -> PhysicalSize<u32> {
        let d = self.display;
        PhysicalSize::new(
            (d.width * d.pixel_density).round() as u32,
            (d.height * d.pixel_density).round() as u32,
        )
    }

    /// Queues an export of the current gradient at `width x height`.
    ///
    /// Runs on the next frame: the frame is rendered offscreen at unit density,
    /// encoded, written to `sink`, flushed, and dropped. `on_complete` then
    /// receives the result. A second request before that frame replaces the
    /// first, whose callback is told it was superseded.
    pub fn export_frame(
        &mut self,
        width: u32,
        height: u32,
        quality: f32,
        format: ExportFormat,
        sink: Box<dyn Write>,
        on_complete: impl FnOnce(Result<()>) + 'static,
    ) {
        let request = ExportRequest {
            width,
            height,
            quality,
            format,
            sink,
            on_complete: Box::new(on_complete),
        };
        if let Some(previous) = self.pending_export.replace(request) {
            (previous.on_complete)(Err(anyhow::anyhow!("export superseded by a newer request")));
        }
        self.pending_redraw = true;
    }

    pub fn wants_redraw(&self) -> bool {
        self.pending_redraw
    }

    pub fn has_pending_export(&self) -> bool {
        self.pending_export.is_some()
    }

    /// Frame callback: upload, export if requested, draw.
    pub fn render_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.pending_redraw = false;
        ctx.ensure_surface_size(self.physical_size());

        if let Some(upload) = self.take_upload() {
            let rctx = RenderCtx::new(ctx.gpu.device(), ctx.gpu.queue(), ctx.gpu.surface_format());
            self.upload(&rctx, upload);
        }

        if let Some(request) = self.pending_export.take() {
            self.run_export(ctx, request);
        }

        let renderer = &mut self.renderer;
        let status = ctx.render(self.clear, |rctx, target| renderer.draw(rctx, target));
        self.finish_frame(status)
    }

    /// A frame that did not reach the screen keeps the redraw pending. A hidden
    /// surface waits for the resize that shows it again.
    fn finish_frame(&mut self, status: FrameStatus) -> AppControl {
        match status {
            FrameStatus::Presented | FrameStatus::Hidden => AppControl::Continue,
            FrameStatus::Retry => {
                log::debug!("frame not presented; redrawing");
                self.pending_redraw = true;
                AppControl::Continue
            }
            FrameStatus::Fatal => AppControl::Exit,
        }
    }

    /// Headless stand-in for a frame: consumes staged state without a GPU.
    #[cfg(test)]
    pub(crate) fn settle(&mut self) {
        let _ = self.take_upload();
        self.pending_redraw = false;
    }

    fn take_upload(&mut self) -> Option<Upload> {
        let geometry = self.staged.take()?;
        let path = if self.bound_stop_count == Some(geometry.stop_count) {
            UploadPath::Update
        } else {
            UploadPath::Rebuild
        };
        self.bound_stop_count = Some(geometry.stop_count);
        Some(Upload { geometry, path })
    }

    fn upload(&mut self, rctx: &RenderCtx<'_>, upload: Upload) {
        let g = &upload.geometry;
        if upload.path == UploadPath::Update && self.renderer.update(rctx, &g.positions, &g.colors) {
            return;
        }
        self.renderer.rebuild(rctx, &g.positions, &g.colors, &g.indices());
    }

    fn run_export(&mut self, ctx: &mut FrameCtx<'_, '_>, request: ExportRequest) {
        let ExportRequest {
            width,
            height,
            quality,
            format,
            mut sink,
            on_complete,
        } = request;

        let clear = self.clear;
        let renderer = &mut self.renderer;
        let result = Self::check_exportable(renderer)
            .and_then(|()| {
                ctx.capture(width, height, clear, |rctx, target| renderer.draw(rctx, target))
            })
            .and_then(|raster| encode_raster(&raster, format, quality, &mut sink));
        drop(sink);

        match &result {
            Ok(()) => log::info!("exported {width}x{height} {}", format.mime()),
            Err(e) => log::warn!("export failed: {e:#}"),
        }
        on_complete(result);
    }

    fn check_exportable(renderer: &StripRenderer) -> Result<()> {
        if !renderer.has_mesh() {
            bail!("no gradient has been drawn yet");
        }
        Ok(())
    }
}
