mod controls;
mod viewer;

use anyhow::Result;

use cubeland_engine::config::ViewerConfig;
use cubeland_engine::device::GpuInit;
use cubeland_engine::logging::{init_logging, LoggingConfig};
use cubeland_engine::window::{Runtime, RuntimeConfig};

use viewer::Viewer;

fn main() -> Result<()> {
    init_logging(LoggingConfig::from_env("CUBELAND_LOG"));

    let config = ViewerConfig::default().with_env_overrides();
    log::info!("assets from {}", config.assets_dir.display());

    let viewer = Viewer::new(&config);
    let runtime = RuntimeConfig::new(config.title.clone(), config.width, config.height);

    Runtime::run(runtime, GpuInit::default(), viewer)
}
