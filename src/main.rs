// Binary entry point: load config, wire state, run the HTTP server

use anyhow::anyhow;
use clap::Parser;
use std::path::PathBuf;
use storyforge::config::load_config;
use storyforge::server::{run_server, ServerAppState};
use storyforge::shutdown::{register_signal_handlers, ShutdownState};

#[derive(Debug, Parser)]
#[command(name = "storyforge", about = "Agile story and test case generation server")]
struct Cli {
    /// Path to a TOML config file (default: ./storyforge.toml if present)
    #[arg(long, env = "STORYFORGE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured port
    #[arg(long)]
    port: Option<u16>,

    /// Override the configured bind address
    #[arg(long)]
    bind: Option<String>,

    /// Allowed CORS origin (repeatable); empty means permissive
    #[arg(long = "cors-origin")]
    cors_origins: Vec<String>,

    /// Override the runs directory
    #[arg(long)]
    runs_dir: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).map_err(|e| anyhow!(e))?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    if !cli.cors_origins.is_empty() {
        config.server.cors_origins = cli.cors_origins;
    }
    if let Some(runs_dir) = cli.runs_dir {
        config.storage.runs_dir = runs_dir;
    }

    let shutdown_state = ShutdownState::new();
    register_signal_handlers(shutdown_state.clone())?;

    let state = ServerAppState::new(config, shutdown_state);
    run_server(state).await.map_err(|e| anyhow!(e))
}
