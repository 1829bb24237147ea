use std::path::Path;

/// Largest export edge, in pixels. Matches the default wgpu 2D texture limit.
pub const MAX_EXPORT_DIMENSION: u32 = 8192;

/// File name suggested by the export dialog.
pub const SUGGESTED_EXPORT_NAME: &str = "color-gradient.png";

/// Raster format of an exported frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Bmp,
    Gif,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Png,
        ExportFormat::Jpeg,
        ExportFormat::Bmp,
        ExportFormat::Gif,
    ];

    /// Picks the format from the destination's extension, falling back to PNG.
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Self::Png;
        };
        Self::from_extension(ext)
    }

    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Self::Jpeg,
            "bmp" => Self::Bmp,
            "gif" => Self::Gif,
            _ => Self::Png,
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Png => &["png"],
            Self::Jpeg => &["jpg", "jpeg"],
            Self::Bmp => &["bmp"],
            Self::Gif => &["gif"],
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Png => "PNG Image",
            Self::Jpeg => "JPEG Image",
            Self::Bmp => "BMP Image",
            Self::Gif => "GIF Image",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Bmp => "image/bmp",
            Self::Gif => "image/gif",
        }
    }

    /// Maps a `[0, 1]` quality fraction onto the JPEG encoder's `1..=100` scale.
    pub fn jpeg_quality(fraction: f32) -> u8 {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            1.0
        };
        ((fraction * 100.0).round() as u8).max(1)
    }
}

/// User-configurable export parameters.
///
/// Setters clamp to the accepted input range instead of rejecting values.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ExportSettings {
    width: u32,
    height: u32,
    quality: f32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            width: 64,
            height: 1,
            quality: 1.0,
        }
    }
}

impl ExportSettings {
    pub fn new(width: u32, height: u32, quality: f32) -> Self {
        let mut settings = Self::default();
        settings.set_width(width);
        settings.set_height(height);
        settings.set_quality(quality);
        settings
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn quality(&self) -> f32 {
        self.quality
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = clamp_dimension(width);
    }

    pub fn set_height(&mut self, height: u32) {
        self.height = clamp_dimension(height);
    }

    /// Non-finite input resets the quality to full.
    pub fn set_quality(&mut self, quality: f32) {
        self.quality = if quality.is_finite() {
            quality.clamp(0.0, 1.0)
        } else {
            1.0
        };
    }
}

fn clamp_dimension(v: u32) -> u32 {
    v.clamp(1, MAX_EXPORT_DIMENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── format selection ──────────────────────────────────────────────────

    #[test]
    fn format_follows_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("a/out.png")), ExportFormat::Png);
        assert_eq!(ExportFormat::from_path(Path::new("out.jpg")), ExportFormat::Jpeg);
        assert_eq!(ExportFormat::from_path(Path::new("out.jpeg")), ExportFormat::Jpeg);
        assert_eq!(ExportFormat::from_path(Path::new("out.bmp")), ExportFormat::Bmp);
        assert_eq!(ExportFormat::from_path(Path::new("out.gif")), ExportFormat::Gif);
    }

    #[test]
    fn format_extension_is_case_insensitive() {
        assert_eq!(ExportFormat::from_path(Path::new("OUT.JPEG")), ExportFormat::Jpeg);
        assert_eq!(ExportFormat::from_path(Path::new("out.Gif")), ExportFormat::Gif);
    }

    #[test]
    fn unknown_or_missing_extension_defaults_to_png() {
        assert_eq!(ExportFormat::from_path(Path::new("out.webp")), ExportFormat::Png);
        assert_eq!(ExportFormat::from_path(Path::new("gradient")), ExportFormat::Png);
    }

    #[test]
    fn every_format_round_trips_through_its_extensions() {
        for format in ExportFormat::ALL {
            for ext in format.extensions() {
                assert_eq!(ExportFormat::from_extension(ext), format);
            }
        }
    }

    #[test]
    fn jpeg_quality_maps_fraction_to_percent() {
        assert_eq!(ExportFormat::jpeg_quality(1.0), 100);
        assert_eq!(ExportFormat::jpeg_quality(0.5), 50);
        assert_eq!(ExportFormat::jpeg_quality(0.0), 1);
        assert_eq!(ExportFormat::jpeg_quality(7.0), 100);
        assert_eq!(ExportFormat::jpeg_quality(f32::NAN), 100);
    }

    // ── settings ──────────────────────────────────────────────────────────

    #[test]
    fn defaults_match_editor_defaults() {
        let s = ExportSettings::default();
        assert_eq!((s.width(), s.height(), s.quality()), (64, 1, 1.0));
    }

    #[test]
    fn settings_clamp_to_input_range() {
        let s = ExportSettings::new(0, 100_000, -0.5);
        assert_eq!(s.width(), 1);
        assert_eq!(s.height(), MAX_EXPORT_DIMENSION);
        assert_eq!(s.quality(), 0.0);

        let mut s = ExportSettings::default();
        s.set_quality(f32::INFINITY);
        assert_eq!(s.quality(), 1.0);
        s.set_quality(0.35);
        assert_eq!(s.quality(), 0.35);
    }
}
