mod app;
mod demo;

use bufscope_engine::device::GpuInit;
use bufscope_engine::logging::{init_logging, LoggingConfig};
use bufscope_engine::window::{Runtime, RuntimeConfig};

use app::StudioApp;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    log::info!("keys: V next version, I indexed/points, F fit camera, C clear, Esc quit");

    let config = RuntimeConfig {
        title: "bufscope studio".to_string(),
        ..RuntimeConfig::default()
    };
    Runtime::run(config, GpuInit::default(), StudioApp::new())
}
