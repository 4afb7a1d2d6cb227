//! Play command - a game in the terminal, against the computer or a friend
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), play_loop()
//! - Level 3: parse_command(), execute_command(), ai_reply()
//! - Level 4: rendering utilities

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use xiangqi_core::{Difficulty, GameMode, Move, Session, SessionConfig, Side, Square};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// AI difficulty (easy, medium, hard)
    #[arg(long)]
    pub difficulty: Option<Difficulty>,

    /// Side you play (red moves first)
    #[arg(long, value_parser = parse_side)]
    pub side: Option<Side>,

    /// Two players at one keyboard, no computer
    #[arg(long)]
    pub pvp: bool,

    /// Session config JSON file; flags override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// One line of player input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Move(Square, Square),
    Moves(Square),
    Undo,
    Hint,
    History,
    Board,
    New,
    Help,
    Quit,
}

const HELP: &str = "\
Commands:
  <from> <to>   move a piece, e.g. `b3 e3`
  moves <sq>    list destinations for the piece on <sq>
  undo          take back your last move
  hint          suggest a move
  history       list the moves so far
  board         redraw the board
  new           start a new game
  help          show this help
  quit          leave";

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Build the session config from file and flags
/// 2. Run the interactive loop on stdin/stdout
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args, seed)?;

    tracing::info!(mode = ?config.mode, difficulty = %config.difficulty, "starting game");

    let mut session = Session::new(config);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    play_loop(&mut session, stdin.lock(), stdout.lock())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Merge the optional config file with command-line flags
fn build_config(args: &PlayArgs, seed: Option<u64>) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("Failed to load session config: {}", path.display()))?,
        None => SessionConfig::default(),
    };

    if args.pvp {
        config.mode = GameMode::PlayerVsPlayer;
    } else if let Some(human) = args.side {
        config.mode = GameMode::PlayerVsAi {
            ai_side: human.opponent(),
        };
    }
    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(seed) = seed {
        config.seed = Some(seed);
    }

    Ok(config)
}

/// Read commands until `quit` or end of input
pub fn play_loop<R: BufRead, W: Write>(session: &mut Session, input: R, mut out: W) -> Result<()> {
    writeln!(out, "{}", HELP)?;
    ai_reply(session, &mut out)?;
    print_position(session, &mut out)?;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{}", err)?;
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        execute_command(session, command, &mut out)?;
    }

    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn parse_command(line: &str) -> Result<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();

    let command = match words.as_slice() {
        ["quit"] | ["exit"] | ["q"] => Command::Quit,
        ["undo"] | ["u"] => Command::Undo,
        ["hint"] => Command::Hint,
        ["history"] => Command::History,
        ["board"] => Command::Board,
        ["new"] => Command::New,
        ["help"] | ["?"] => Command::Help,
        ["moves", square] => Command::Moves(square.parse()?),
        [from, to] => Command::Move(from.parse()?, to.parse()?),
        _ => anyhow::bail!("Unrecognised command {:?} (type `help`)", line.trim()),
    };

    Ok(command)
}

fn execute_command<W: Write>(session: &mut Session, command: Command, out: &mut W) -> Result<()> {
    match command {
        Command::Move(from, to) => match session.attempt_move(from, to) {
            Ok(mv) => {
                writeln!(out, "{}: {}", mv.side, mv)?;
                ai_reply(session, out)?;
                print_position(session, out)?;
            }
            Err(err) => writeln!(out, "Illegal move: {}", err)?,
        },
        Command::Moves(square) => {
            let moves = session.legal_moves(square);
            if moves.is_empty() {
                writeln!(out, "No moves from {}", square)?;
            } else {
                let list: Vec<String> = moves.iter().map(Square::to_string).collect();
                writeln!(out, "{}: {}", square, list.join(" "))?;
            }
        }
        Command::Undo => {
            let undone = session.undo();
            if undone.is_empty() {
                writeln!(out, "Nothing to undo")?;
            } else {
                for mv in &undone {
                    writeln!(out, "Took back {}", mv)?;
                }
                print_position(session, out)?;
            }
        }
        Command::Hint => match session.hint() {
            Some(mv) => writeln!(out, "Hint: {}", mv)?,
            None => writeln!(out, "No hint available")?,
        },
        Command::History => {
            if session.history().is_empty() {
                writeln!(out, "No moves yet")?;
            }
            for line in session.state().move_list() {
                writeln!(out, "{}", line)?;
            }
        }
        Command::Board => print_position(session, out)?,
        Command::New => {
            session.new_game();
            writeln!(out, "New game")?;
            ai_reply(session, out)?;
            print_position(session, out)?;
        }
        Command::Help => writeln!(out, "{}", HELP)?,
        Command::Quit => {}
    }

    Ok(())
}

/// Let the computer move if it is its turn
fn ai_reply<W: Write>(session: &mut Session, out: &mut W) -> Result<Option<Move>> {
    if !session.is_ai_turn() {
        return Ok(None);
    }

    let reply = session.play_ai_move()?;
    match reply {
        Some(mv) => writeln!(out, "{} ({}): {}", mv.side, session.config().difficulty, mv)?,
        None => writeln!(out, "The computer has no legal move")?,
    }
    Ok(reply)
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_position<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    writeln!(out, "\n{}", session.board())?;
    match session.status().winner() {
        Some(winner) => writeln!(out, "Game over: {} wins. Type `new` or `quit`.", winner)?,
        None => writeln!(out, "{} to move", session.side_to_move())?,
    }
    Ok(())
}

fn parse_side(s: &str) -> Result<Side, String> {
    match s.to_ascii_lowercase().as_str() {
        "red" | "r" => Ok(Side::Red),
        "black" | "b" => Ok(Side::Black),
        _ => Err(format!("unknown side {:?} (expected red or black)", s)),
    }
}

// ============================================================================
// TESTS
// ============================================================================
