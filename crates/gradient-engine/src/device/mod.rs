//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the window Surface (swapchain)
//! - acquiring frames for on-screen rendering
//! - offscreen render targets with CPU readback for export

mod error;
mod frame;
mod gpu;
mod init;
mod offscreen;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use offscreen::{padded_bytes_per_row, OffscreenTarget, Raster, OFFSCREEN_FORMAT};
