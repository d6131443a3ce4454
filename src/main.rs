use clap::Parser;
use prompt_library::cli::{Cli, Cmd};
use prompt_library::commands;
use prompt_library::core::config::Config;
use prompt_library::core::storage::AppCtx;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("• {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();

    let default_level = match cli.command {
        Cmd::Serve { .. } => "info",
        _ => "warn",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .map_err(|e| e.to_string())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(url) = cli.api_url {
        config.remote.api_url = Some(url);
    }

    let ctx = AppCtx::init(config)?;
    commands::dispatch(cli.command, &ctx).await
}
