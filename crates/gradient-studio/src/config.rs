use winit::dpi::LogicalSize;

use gradient_core::ExportSettings;
use gradient_engine::device::GpuInit;
use gradient_engine::logging::LoggingConfig;
use gradient_engine::window::RuntimeConfig;

pub const WINDOW_TITLE: &str = "Color Gradient Editor";

/// Startup configuration for the editor.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub runtime: RuntimeConfig,
    pub gpu: GpuInit,
    pub logging: LoggingConfig,
    /// Fill behind the strip; only visible where no geometry is bound yet.
    pub clear_color: wgpu::Color,
    pub export: ExportSettings,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            runtime: RuntimeConfig {
                title: WINDOW_TITLE.to_string(),
                initial_size: LogicalSize::new(960.0, 240.0),
            },
            gpu: GpuInit::default(),
            logging: LoggingConfig::default(),
            clear_color: wgpu::Color::BLACK,
            export: ExportSettings::default(),
        }
    }
}
