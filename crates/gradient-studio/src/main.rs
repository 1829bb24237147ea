mod app;
mod config;
mod control;
mod encode;
mod files;
mod presenter;

use gradient_engine::logging::init_logging;
use gradient_engine::window::Runtime;

use crate::app::StudioApp;
use crate::config::StudioConfig;
use crate::files::DialogPicker;

fn main() -> anyhow::Result<()> {
    let config = StudioConfig::default();
    init_logging(config.logging.clone());

    log::info!("starting {}", config.runtime.title);
    let app = StudioApp::new(&config, DialogPicker);
    Runtime::run(config.runtime, config.gpu, app)
}
