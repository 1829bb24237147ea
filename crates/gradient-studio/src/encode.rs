use std::io::Write;

use anyhow::{Context, Result};
use image::codecs::bmp::BmpEncoder;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use gradient_core::ExportFormat;
use gradient_engine::device::Raster;

/// Encodes a captured RGBA raster into `sink`.
///
/// `quality` is the `[0, 1]` export quality; only JPEG uses it. JPEG has no
/// alpha channel, so the raster is flattened to RGB first.
pub fn encode_raster<W: Write>(
    raster: &Raster,
    format: ExportFormat,
    quality: f32,
    mut sink: W,
) -> Result<()> {
    let (w, h) = (raster.width, raster.height);

    match format {
        ExportFormat::Png => PngEncoder::new(&mut sink)
            .write_image(&raster.pixels, w, h, ExtendedColorType::Rgba8)
            .context("PNG encoding failed")?,

        ExportFormat::Jpeg => {
            let rgb = drop_alpha(&raster.pixels);
            JpegEncoder::new_with_quality(&mut sink, ExportFormat::jpeg_quality(quality))
                .write_image(&rgb, w, h, ExtendedColorType::Rgb8)
                .context("JPEG encoding failed")?;
        }

        ExportFormat::Bmp => BmpEncoder::new(&mut sink)
            .write_image(&raster.pixels, w, h, ExtendedColorType::Rgba8)
            .context("BMP encoding failed")?,

        ExportFormat::Gif => {
            // The trailer is written when the encoder drops.
            let mut encoder = GifEncoder::new(&mut sink);
            encoder
                .encode(&raster.pixels, w, h, ExtendedColorType::Rgba8)
                .context("GIF encoding failed")?;
        }
    }

    sink.flush().context("failed to flush encoded image")?;
    log::debug!("encoded {w}x{h} raster as {}", format.mime());
    Ok(())
}

fn drop_alpha(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x2 raster: left half blue, right half red.
    fn sample() -> Raster {
        let mut pixels = Vec::new();
        for _ in 0..2 {
            for x in 0..4 {
                if x < 2 {
                    pixels.extend_from_slice(&[0, 0, 255, 255]);
                } else {
                    pixels.extend_from_slice(&[255, 0, 0, 255]);
                }
            }
        }
        Raster::new(4, 2, pixels).unwrap()
    }

    fn encode(format: ExportFormat, quality: f32) -> Vec<u8> {
        let mut out = Vec::new();
        encode_raster(&sample(), format, quality, &mut out).unwrap();
        out
    }

    // ── containers ────────────────────────────────────────────────────────

    #[test]
    fn each_format_writes_its_signature() {
        assert!(encode(ExportFormat::Png, 1.0).starts_with(b"\x89PNG\r\n\x1a\n"));
        assert!(encode(ExportFormat::Jpeg, 1.0).starts_with(&[0xFF, 0xD8]));
        assert!(encode(ExportFormat::Bmp, 1.0).starts_with(b"BM"));
        assert!(encode(ExportFormat::Gif, 1.0).starts_with(b"GIF8"));
    }

    #[test]
    fn gif_output_is_terminated() {
        let gif = encode(ExportFormat::Gif, 1.0);
        assert_eq!(gif.last(), Some(&0x3B));
    }

    // ── content ───────────────────────────────────────────────────────────

    #[test]
    fn png_is_lossless() {
        let bytes = encode(ExportFormat::Png, 0.1);
        let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 2));
        assert_eq!(decoded.into_raw(), sample().pixels);
    }

    #[test]
    fn jpeg_quality_changes_output() {
        let high = encode(ExportFormat::Jpeg, 1.0);
        let low = encode(ExportFormat::Jpeg, 0.05);
        assert_ne!(high, low);
    }

    #[test]
    fn quality_is_ignored_by_lossless_formats() {
        assert_eq!(encode(ExportFormat::Png, 1.0), encode(ExportFormat::Png, 0.2));
        assert_eq!(encode(ExportFormat::Bmp, 1.0), encode(ExportFormat::Bmp, 0.2));
    }

    #[test]
    fn drop_alpha_keeps_channel_order() {
        assert_eq!(drop_alpha(&[1, 2, 3, 4, 5, 6, 7, 8]), vec![1, 2, 3, 5, 6, 7]);
    }
}
