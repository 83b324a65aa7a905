use clap::Parser;
use ocusage::cli::Cli;
use ocusage::services::{AppConfig, LogLevel};
use tracing_subscriber::EnvFilter;

fn init_tracing(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(&cli.overrides());
    init_tracing(config.log_level);
    cli.run(&config).await
}
