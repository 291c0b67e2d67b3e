//! Command-line interface for winliam_games.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// WinliamOS games - tic-tac-toe, locally or against another user online
#[derive(Parser, Debug)]
#[command(name = "winliam_games")]
#[command(about = "Online tic-tac-toe client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the board in the terminal
    Play {
        /// Game service URL (overrides config file and environment)
        #[arg(long)]
        server_url: Option<String>,

        /// Username to play as. Omitted or "Guest" means local play only.
        #[arg(short, long)]
        user: Option<String>,

        /// Join this session on startup
        #[arg(short, long)]
        join: Option<String>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the current board of a session and exit
    Status {
        /// Session to fetch
        #[arg(short, long)]
        session: String,

        /// Game service URL (overrides config file and environment)
        #[arg(long)]
        server_url: Option<String>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_flags() {
        let cli = Cli::parse_from(["winliam_games", "play", "--user", "alice", "--join", "g1"]);
        match cli.command {
            Command::Play { user, join, server_url, config } => {
                assert_eq!(user.as_deref(), Some("alice"));
                assert_eq!(join.as_deref(), Some("g1"));
                assert!(server_url.is_none());
                assert!(config.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_status_requires_session() {
        assert!(Cli::try_parse_from(["winliam_games", "status"]).is_err());
    }
}
