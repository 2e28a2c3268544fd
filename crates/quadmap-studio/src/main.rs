mod app;
mod cli;
mod texture;

use anyhow::Result;
use quadmap_engine::device::GpuInit;
use quadmap_engine::logging::{init_logging, LoggingConfig};
use quadmap_engine::window::{Runtime, RuntimeConfig};

use crate::app::StudioApp;

fn main() -> Result<()> {
    let config = cli::parse();

    init_logging(LoggingConfig {
        env_filter: config.log_filter.clone(),
        ..LoggingConfig::default()
    });

    let texture = match &config.texture {
        Some(path) => texture::load(path)?,
        None => texture::checkerboard(),
    };

    let app = StudioApp::new(&config, texture);

    Runtime::run(
        RuntimeConfig {
            title: "quadmap studio".to_string(),
            ..RuntimeConfig::default()
        },
        GpuInit::default(),
        app,
    )
}
