use anyhow::Context;
use researcher::{init, logging::init_logging, server::run_server, Configuration, Orchestrator};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize environment variables from .env
    init();

    let config = Configuration::from_env().context("Configuration error")?;
    let _guard = init_logging(&config.log_dir)?;
    info!("Starting research assistant");
    config.log_summary();

    let orchestrator =
        Orchestrator::from_config(&config).context("Failed to initialize research pipeline")?;

    run_server(config, orchestrator).await
}
