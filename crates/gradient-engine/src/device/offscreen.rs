use anyhow::{Context, Result};

/// Format of offscreen capture targets; matches the tightly packed RGBA8 raster.
pub const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

const BYTES_PER_PIXEL: u32 = 4;

/// Tightly packed RGBA8 pixels read back from the GPU, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Raster {
    /// Returns `None` when `pixels` does not hold exactly `width * height` RGBA texels.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL as usize;
        (pixels.len() == expected).then_some(Self {
            width,
            height,
            pixels,
        })
    }
}

/// Row pitch of the readback buffer; wgpu requires 256-byte aligned rows.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Render target + readback buffer for one offscreen capture.
///
/// Usage: render into [`view`](Self::view), call
/// [`copy_to_readback`](Self::copy_to_readback) on the same encoder, submit,
/// then [`read`](Self::read).
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    readback: wgpu::Buffer,
    width: u32,
    height: u32,
    padded_row: u32,
}

impl OffscreenTarget {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Result<Self> {
        let max = device.limits().max_texture_dimension_2d;
        anyhow::ensure!(
            width > 0 && height > 0 && width <= max && height <= max,
            "capture size {width}x{height} outside 1..={max}"
        );

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("gradient capture target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OFFSCREEN_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let padded_row = padded_bytes_per_row(width);
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gradient capture readback"),
            size: padded_row as u64 * height as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            texture,
            view,
            readback,
            width,
            height,
            padded_row,
        })
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn copy_to_readback(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Maps the readback buffer and strips row padding.
    ///
    /// Blocks the calling thread until the GPU has finished the copy.
    pub fn read(self, device: &wgpu::Device) -> Result<Raster> {
        let slice = self.readback.slice(..);

        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            sender.send(result).ok();
        });

        device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .context("device poll failed during capture readback")?;

        receiver
            .recv()
            .context("readback channel closed before mapping completed")?
            .context("failed to map capture readback buffer")?;

        let row = (self.width * BYTES_PER_PIXEL) as usize;
        let mut pixels = Vec::with_capacity(row * self.height as usize);
        {
            let mapped = slice.get_mapped_range();
            for chunk in mapped.chunks_exact(self.padded_row as usize) {
                pixels.extend_from_slice(&chunk[..row]);
            }
        }
        self.readback.unmap();

        Raster::new(self.width, self.height, pixels).context("capture readback size mismatch")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_padded_to_copy_alignment() {
        assert_eq!(padded_bytes_per_row(1), 256);
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
        assert_eq!(padded_bytes_per_row(8192), 8192 * 4);
    }

    #[test]
    fn raster_rejects_mismatched_buffers() {
        assert!(Raster::new(2, 2, vec![0; 16]).is_some());
        assert!(Raster::new(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn raster_keeps_pixels_row_major() {
        let mut pixels = vec![0u8; 2 * 2 * 4];
        pixels[12..16].copy_from_slice(&[1, 2, 3, 4]);
        let raster = Raster::new(2, 2, pixels).unwrap();
        assert_eq!((raster.width, raster.height), (2, 2));
        assert_eq!(&raster.pixels[12..16], &[1, 2, 3, 4]);
        assert!(raster.pixels[..12].iter().all(|&b| b == 0));
    }
}
