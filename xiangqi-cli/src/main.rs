//! Xiangqi CLI - Command-line interface
//!
//! Commands:
//! - play: Play a game in the terminal
//! - match: Pit two AI difficulties against each other
//! - serve: Start the HTTP server

mod match_cmd;
mod play;
mod server;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "xiangqi")]
#[command(about = "Xiangqi (Chinese chess) with computer opponents")]
#[command(version)]
struct Cli {
    /// Random seed for reproducible AI play
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game in the terminal
    Play(play::PlayArgs),
    /// Play AI against AI
    Match(match_cmd::MatchArgs),
    /// Start the HTTP server
    Serve(server::ServerArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs on stderr, the board on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args, cli.seed),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::Serve(args) => server::run(args, cli.seed),
    }
}
