//! Serve command - HTTP API plus the browser board
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_server_config()
//! - Level 3: session_defaults(), check_front_end()
//! - Level 4: runtime bootstrap

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use xiangqi_core::{Difficulty, SessionConfig};
use xiangqi_server::{run_server, ServerConfig, DEFAULT_MAX_SESSIONS};

/// Page the browser board is served from
const FRONT_END_ENTRY: &str = "index.html";

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "5000")]
    pub port: u16,

    /// Directory holding the browser board (index.html and assets)
    #[arg(long, default_value = "static")]
    pub static_dir: PathBuf,

    /// Session config JSON used for games created without a body
    #[arg(long, value_name = "FILE")]
    pub session_config: Option<PathBuf>,

    /// Difficulty for games created without a body; overrides the file
    #[arg(long)]
    pub difficulty: Option<Difficulty>,

    /// Live games kept before the oldest is dropped
    #[arg(long, default_value_t = DEFAULT_MAX_SESSIONS)]
    pub max_sessions: usize,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run serve command
///
/// 1. Work out session defaults and check the front end
/// 2. Serve until interrupted
pub fn run(args: ServerArgs, seed: Option<u64>) -> Result<()> {
    let config = build_server_config(&args, seed)?;

    tracing::info!(
        port = config.port,
        difficulty = %config.session_defaults.difficulty,
        "Starting Xiangqi server"
    );

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(run_server(config))
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_server_config(args: &ServerArgs, seed: Option<u64>) -> Result<ServerConfig> {
    if args.max_sessions == 0 {
        anyhow::bail!("--max-sessions must be at least 1");
    }
    check_front_end(&args.static_dir)?;

    Ok(ServerConfig {
        port: args.port,
        static_dir: args.static_dir.to_string_lossy().into_owned(),
        session_defaults: session_defaults(args, seed)?,
        max_sessions: args.max_sessions,
    })
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Config file first, then flags. A global seed makes every default game
/// replay the same AI choices.
fn session_defaults(args: &ServerArgs, seed: Option<u64>) -> Result<SessionConfig> {
    let mut config = match &args.session_config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("Failed to load session config: {}", path.display()))?,
        None => SessionConfig::default(),
    };

    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty;
    }
    if seed.is_some() {
        config.seed = seed;
    }

    Ok(config)
}

/// The API works without a front end, so a missing board only warns.
/// A static path that is a file is a mistake worth stopping for.
fn check_front_end(dir: &Path) -> Result<()> {
    if dir.is_file() {
        anyhow::bail!("Static path is a file, not a directory: {}", dir.display());
    }

    if !dir.join(FRONT_END_ENTRY).is_file() {
        tracing::warn!(
            "No {} in {}: the JSON API is up but there is no board to open in a browser",
            FRONT_END_ENTRY,
            dir.display()
        );
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
