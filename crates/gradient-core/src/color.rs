use serde::{Deserialize, Serialize};

/// Straight RGB color, components conventionally in `[0, 1]`.
///
/// Values are passed to the vertex color buffer untouched; nothing here clamps.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLUE: Rgb = Rgb::new(0.0, 0.0, 1.0);
    pub const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Layout used by the per-vertex color buffer.
    #[inline]
    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}
