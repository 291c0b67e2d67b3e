//! WinliamOS games - tic-tac-toe client CLI

#![warn(missing_docs)]

mod cli;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use winliam_games::{Actor, BoardView, ClientConfig, GameService, RestGameService};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            server_url,
            user,
            join,
            config,
        } => run_play(config, server_url, user, join).await,
        Command::Status {
            session,
            server_url,
            config,
        } => run_status(config, server_url, session).await,
    }
}

/// Config file, then environment, then command-line flags.
fn resolve_config(path: Option<PathBuf>, server_url: Option<String>) -> Result<ClientConfig> {
    let config = ClientConfig::load(path.as_deref()).context("Failed to load client config")?;
    match server_url {
        Some(url) => config
            .with_server_url(url)
            .validate()
            .context("Invalid --server-url"),
        None => Ok(config),
    }
}

/// Run the interactive board
async fn run_play(
    config: Option<PathBuf>,
    server_url: Option<String>,
    user: Option<String>,
    join: Option<String>,
) -> Result<()> {
    // Log to a file; stdout belongs to the TUI
    let log_file = std::fs::File::create("winliam_games.log")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    let config = resolve_config(config, server_url)?;
    let actor = Actor::from_name(user.as_deref().unwrap_or_default());
    tui::run_play(config, actor, join).await
}

/// Print one session's board and exit
async fn run_status(
    config: Option<PathBuf>,
    server_url: Option<String>,
    session: String,
) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(config, server_url)?;
    info!(server_url = %config.server_url(), "Fetching session state");
    let service = RestGameService::new(&config)?;
    let state = service.state(&session).await?;
    println!("{}", BoardView::project(&state, None).to_text());
    Ok(())
}
