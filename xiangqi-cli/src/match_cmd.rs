//! Match command - play AI against AI
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;

use xiangqi_core::{play_game, Difficulty, Side, XiangqiAi};

/// Base seed when none is given on the command line
const DEFAULT_BASE_SEED: u64 = 42;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Difficulty of the AI playing Red
    #[arg(long, default_value = "hard")]
    pub red: Difficulty,

    /// Difficulty of the AI playing Black
    #[arg(long, default_value = "medium")]
    pub black: Difficulty,

    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Plies before a game is called a draw
    #[arg(long, default_value = "200")]
    pub max_plies: u32,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    game_number: usize,
    /// `None` for a draw
    winner: Option<Side>,
    plies: u32,
    seed: u64,
}

/// Aggregated match results
#[derive(Clone, Debug, Serialize)]
struct MatchResults {
    red: Difficulty,
    black: Difficulty,
    total_games: usize,
    red_wins: usize,
    black_wins: usize,
    draws: usize,
    avg_plies: f32,
    games: Vec<GameRecord>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Play the games in parallel
/// 2. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    if args.games == 0 {
        anyhow::bail!("--games must be at least 1");
    }

    tracing::info!(
        "Starting match: {} (red) vs {} (black), {} games, max {} plies",
        args.red,
        args.black,
        args.games,
        args.max_plies
    );

    let results = play_match(&args, seed.unwrap_or(DEFAULT_BASE_SEED), !args.json);

    report_results(&results, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games of the match, one rayon task per game
fn play_match(args: &MatchArgs, base_seed: u64, show_progress: bool) -> MatchResults {
    let progress = if show_progress {
        create_progress_bar(args.games as u64)
    } else {
        ProgressBar::hidden()
    };

    let games: Vec<GameRecord> = (0..args.games)
        .into_par_iter()
        .map(|index| {
            let seed = base_seed.wrapping_add(index as u64);
            let record = play_single_game(args.red, args.black, index + 1, args.max_plies, seed);

            tracing::info!(
                "Game {}: {} in {} plies",
                record.game_number,
                describe_winner(record.winner),
                record.plies
            );
            progress.inc(1);
            record
        })
        .collect();

    progress.finish_and_clear();

    compute_match_statistics(args.red, args.black, games)
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) -> Result<()> {
    if args.json {
        println!("{}", format_json_results(results)?);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game. Each side's AI gets its own stream derived from `seed`.
fn play_single_game(
    red: Difficulty,
    black: Difficulty,
    game_number: usize,
    max_plies: u32,
    seed: u64,
) -> GameRecord {
    let mut red_ai = XiangqiAi::with_seed(red, seed);
    let mut black_ai = XiangqiAi::with_seed(black, seed.wrapping_mul(31).wrapping_add(7));

    let state = play_game(&mut red_ai, &mut black_ai, max_plies);

    GameRecord {
        game_number,
        winner: state.status().winner(),
        plies: state.move_count(),
        seed,
    }
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(
    red: Difficulty,
    black: Difficulty,
    games: Vec<GameRecord>,
) -> MatchResults {
    let red_wins = games.iter().filter(|g| g.winner == Some(Side::Red)).count();
    let black_wins = games.iter().filter(|g| g.winner == Some(Side::Black)).count();
    let draws = games.iter().filter(|g| g.winner.is_none()).count();

    let total_plies: u32 = games.iter().map(|g| g.plies).sum();
    let avg_plies = if games.is_empty() {
        0.0
    } else {
        total_plies as f32 / games.len() as f32
    };

    MatchResults {
        red,
        black,
        total_games: games.len(),
        red_wins,
        black_wins,
        draws,
        avg_plies,
        games,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn create_progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} games ({elapsed})") {
        bar.set_style(style);
    }
    bar
}

fn describe_winner(winner: Option<Side>) -> String {
    match winner {
        Some(side) => format!("{} wins", side),
        None => "draw".to_string(),
    }
}

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

fn format_json_results(results: &MatchResults) -> Result<String> {
    serde_json::to_string_pretty(results).context("Failed to serialize match results")
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.total_games;

    println!("\n=== Match Results: {} vs {} ===", results.red, results.black);
    println!("Total games: {}", total);
    println!(
        "Red wins:    {} ({:.1}%)",
        results.red_wins,
        percent(results.red_wins, total)
    );
    println!(
        "Black wins:  {} ({:.1}%)",
        results.black_wins,
        percent(results.black_wins, total)
    );
    println!(
        "Draws:       {} ({:.1}%)",
        results.draws,
        percent(results.draws, total)
    );
    println!("Avg plies:   {:.1}", results.avg_plies);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {} in {} plies (seed {})",
            game.game_number,
            describe_winner(game.winner),
            game.plies,
            game.seed
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
