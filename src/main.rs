use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use basket_cli::{
    cli::{Args, CliApp},
    utils::Config,
};

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::from_env()?.with_store_path(args.store.clone())?;

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        "Configuration loaded for {} environment",
        config.environment
    );

    let app = CliApp::new(&config);
    app.run(args).map_err(|e| {
        tracing::error!("Command failed: {}", e);
        e
    })
}
