//! Xiangqi Core - Rules engine and AI
//!
//! This crate provides the core game logic for Xiangqi (Chinese chess):
//! - Board geometry (10x9 grid, palaces and river)
//! - Piece catalog and movement rules
//! - Game state machine with undo
//! - Move and position evaluation
//! - Easy / Medium / Hard computer opponents
//! - Sessions that tie a game to a mode and an AI

pub mod board;
pub mod pieces;
pub mod movegen;
pub mod game;
pub mod eval;
pub mod ai;
pub mod config;
pub mod session;

// Re-exports for convenient access
pub use board::{Board, BoardError, GlyphRows, Square, SquareError, BOARD_COLS, BOARD_ROWS};
pub use pieces::{get_piece_info, Piece, PieceInfo, PieceKind, Side, PIECE_KINDS};
pub use movegen::{all_moves, is_legal, legal_destinations};
pub use game::{GameState, GameStatus, Move, MoveError};
pub use eval::{evaluate, move_score, Advantage};
pub use ai::{play_game, suggest_move, Difficulty, ParseDifficultyError, XiangqiAi};
pub use config::{GameMode, SessionConfig};
pub use session::{Session, SessionError};
