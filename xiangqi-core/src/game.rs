//! Game state machine: move execution, undo and the terminal check

use crate::board::{Board, Square};
use crate::movegen::{all_moves, legal_destinations};
use crate::pieces::{Piece, Side};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Game status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "state", content = "winner")]
pub enum GameStatus {
    Playing,
    Ended(Side),
}

impl GameStatus {
    pub fn is_playing(self) -> bool {
        self == GameStatus::Playing
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            GameStatus::Playing => None,
            GameStatus::Ended(side) => Some(side),
        }
    }
}

/// An executed move, as recorded in the history
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub side: Side,
}

impl Move {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

/// `車 b1-b3`, with ` x马` appended on captures
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.piece, self.from, self.to)?;
        if let Some(captured) = self.captured {
            write!(f, " x{}", captured)?;
        }
        Ok(())
    }
}

/// Why a move attempt was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("the game is over")]
    GameOver,

    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("the piece on {square} belongs to {owner}, but {to_move} is to move")]
    WrongSide {
        square: Square,
        owner: Side,
        to_move: Side,
    },

    #[error("{from} to {to} is not a legal move")]
    IllegalDestination { from: Square, to: Square },
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Board, side to move, history and status of one game
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    side_to_move: Side,
    history: Vec<Move>,
    status: GameStatus,
    move_count: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Starting position, Red to move
    pub fn new() -> Self {
        Self::from_position(Board::initial(), Side::Red)
    }

    /// Start from an arbitrary position
    pub fn from_position(board: Board, side_to_move: Side) -> Self {
        let status = if board.find_general(side_to_move).is_none() {
            GameStatus::Ended(side_to_move.opponent())
        } else if board.find_general(side_to_move.opponent()).is_none() {
            GameStatus::Ended(side_to_move)
        } else {
            GameStatus::Playing
        };

        Self {
            board,
            side_to_move,
            history: Vec::new(),
            status,
            move_count: 0,
        }
    }

    /// Replace this game with a fresh one
    pub fn new_game(&mut self) {
        *self = Self::new();
    }

    /// Alias of `new_game`
    pub fn reset(&mut self) {
        self.new_game();
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Read-only view of the board
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    /// Destinations for the piece on `square`, whoever owns it
    pub fn legal_moves(&self, square: Square) -> Vec<Square> {
        legal_destinations(&self.board, square)
    }

    /// All `(from, to)` pairs for the side to move
    pub fn moves_for_side_to_move(&self) -> Vec<(Square, Square)> {
        all_moves(&self.board, self.side_to_move)
    }

    /// Numbered move list, e.g. `1. red 炮 b3-e3`
    pub fn move_list(&self) -> Vec<String> {
        self.history
            .iter()
            .enumerate()
            .map(|(i, mv)| format!("{}. {} {}", i + 1, mv.side, mv))
            .collect()
    }

    // ========================================================================
    // MOVE EXECUTION
    // ========================================================================

    /// Execute a move for the side to move.
    ///
    /// On failure the state is left untouched.
    pub fn attempt_move(&mut self, from: Square, to: Square) -> Result<Move, MoveError> {
        if !self.status.is_playing() {
            return Err(MoveError::GameOver);
        }

        let piece = self.board.get(from).ok_or(MoveError::EmptySquare(from))?;
        if piece.side != self.side_to_move {
            return Err(MoveError::WrongSide {
                square: from,
                owner: piece.side,
                to_move: self.side_to_move,
            });
        }

        if !legal_destinations(&self.board, from).contains(&to) {
            return Err(MoveError::IllegalDestination { from, to });
        }

        let captured = self.board.take(to);
        self.board.take(from);
        self.board.set(to, Some(piece));

        let mv = Move {
            from,
            to,
            piece,
            captured,
            side: self.side_to_move,
        };
        self.history.push(mv);
        self.move_count += 1;

        tracing::debug!(move_number = self.move_count, "{} {}", mv.side, mv);

        // Terminal check: the opponent's General is gone
        let opponent = self.side_to_move.opponent();
        if self.board.find_general(opponent).is_none() {
            self.status = GameStatus::Ended(self.side_to_move);
            tracing::info!(winner = %self.side_to_move, moves = self.move_count, "general captured");
        } else {
            self.side_to_move = opponent;
        }

        Ok(mv)
    }

    /// Take back the most recent ply. Returns `None` when there is nothing to undo.
    pub fn undo_last_move(&mut self) -> Option<Move> {
        let mv = self.history.pop()?;

        self.board.set(mv.from, Some(mv.piece));
        self.board.set(mv.to, mv.captured);
        self.side_to_move = mv.side;
        self.move_count -= 1;
        self.status = GameStatus::Playing;

        tracing::debug!(move_number = self.move_count + 1, "undo {} {}", mv.side, mv);

        Some(mv)
    }
}

// ============================================================================
// TESTS
// ============================================================================
