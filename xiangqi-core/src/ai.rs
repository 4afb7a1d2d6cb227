//! Computer opponent: three single-ply move-selection strategies

use crate::board::{Board, Square};
use crate::eval::move_score;
use crate::game::GameState;
use crate::movegen::all_moves;
use crate::pieces::Side;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default seed, so an unseeded AI still plays reproducibly
const DEFAULT_SEED: u64 = 42;

// ============================================================================
// STRATEGIES
// ============================================================================

/// AI strength
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Uniformly random legal move
    Easy,
    /// Random capture if one exists, otherwise random move
    #[default]
    Medium,
    /// Best single-ply score, first in board order on ties
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Pick a `(from, to)` pair for `side`, or `None` when it has no move
    pub fn select_move<R: Rng + ?Sized>(
        self,
        board: &Board,
        side: Side,
        rng: &mut R,
    ) -> Option<(Square, Square)> {
        let candidates = all_moves(board, side);
        if candidates.is_empty() {
            return None;
        }

        match self {
            Difficulty::Easy => candidates.choose(rng).copied(),
            Difficulty::Medium => {
                let captures: Vec<_> = candidates
                    .iter()
                    .copied()
                    .filter(|&(_, to)| !board.is_empty(to))
                    .collect();
                if captures.is_empty() {
                    candidates.choose(rng).copied()
                } else {
                    captures.choose(rng).copied()
                }
            }
            Difficulty::Hard => best_scored(board, &candidates),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty {0:?} (expected easy, medium or hard)")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

/// Highest scoring candidate; the earliest one wins ties
fn best_scored(board: &Board, candidates: &[(Square, Square)]) -> Option<(Square, Square)> {
    let mut best = None;
    let mut best_score = i32::MIN;

    for &(from, to) in candidates {
        let score = move_score(board, from, to);
        if score > best_score {
            best_score = score;
            best = Some((from, to));
        }
    }

    best
}

/// Hint for `side`: the move the Hard strategy would play
pub fn suggest_move(board: &Board, side: Side) -> Option<(Square, Square)> {
    best_scored(board, &all_moves(board, side))
}

// ============================================================================
// AI PLAYER
// ============================================================================

/// AI player with its own random source
pub struct XiangqiAi {
    pub difficulty: Difficulty,
    rng: ChaCha8Rng,
}

impl XiangqiAi {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_seed(difficulty, DEFAULT_SEED)
    }

    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Move for the side to move, or `None` if the game is over or it has no move
    pub fn best_move(&mut self, state: &GameState) -> Option<(Square, Square)> {
        if !state.status().is_playing() {
            return None;
        }
        self.select_for(state.board(), state.side_to_move())
    }

    /// Move for an arbitrary side on an arbitrary board
    pub fn select_for(&mut self, board: &Board, side: Side) -> Option<(Square, Square)> {
        self.select_with(self.difficulty, board, side)
    }

    /// Like `select_for`, at a one-off difficulty
    pub fn select_with(
        &mut self,
        difficulty: Difficulty,
        board: &Board,
        side: Side,
    ) -> Option<(Square, Square)> {
        let choice = difficulty.select_move(board, side, &mut self.rng);
        if let Some((from, to)) = choice {
            tracing::debug!(%difficulty, %side, "ai picks {}-{}", from, to);
        }
        choice
    }
}

/// Play two AIs against each other until the game ends, a side has no move,
/// or `max_plies` moves have been made
pub fn play_game(red: &mut XiangqiAi, black: &mut XiangqiAi, max_plies: u32) -> GameState {
    let mut state = GameState::new();

    while state.status().is_playing() && state.move_count() < max_plies {
        let ai = match state.side_to_move() {
            Side::Red => &mut *red,
            Side::Black => &mut *black,
        };
        let Some((from, to)) = ai.best_move(&state) else {
            break;
        };
        if state.attempt_move(from, to).is_err() {
            break;
        }
    }

    state
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameStatus;
    use crate::pieces::{Piece, PieceKind};

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col).unwrap()
    }

    fn put(board: &mut Board, row: u8, col: u8, kind: PieceKind, side: Side) {
        board.set(sq(row, col), Some(Piece::new(kind, side)));
    }

    /// Black has one capture (chariot takes soldier) among many quiet moves
    fn one_capture() -> Board {
        let mut board = Board::empty();
        put(&mut board, 0, 4, PieceKind::General, Side::Black);
        put(&mut board, 2, 0, PieceKind::Chariot, Side::Black);
        put(&mut board, 3, 8, PieceKind::Soldier, Side::Black);
        put(&mut board, 9, 4, PieceKind::General, Side::Red);
        put(&mut board, 6, 0, PieceKind::Soldier, Side::Red);
        board
    }

    #[test]
    fn test_ai_returns_move() {
        let state = GameState::new();
        for difficulty in Difficulty::ALL {
            let mut ai = XiangqiAi::new(difficulty);
            let (from, to) = ai.best_move(&state).unwrap();
            assert_eq!(state.board().get(from).unwrap().side, Side::Red);
            assert!(state.legal_moves(from).contains(&to));
        }
    }

    #[test]
    fn test_no_move_available() {
        let mut board = Board::empty();
        put(&mut board, 9, 4, PieceKind::General, Side::Red);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.select_move(&board, Side::Black, &mut rng), None);
        }
    }

    #[test]
    fn test_medium_prefers_captures() {
        let board = one_capture();
        assert!(all_moves(&board, Side::Black).len() > 1);

        for seed in 0..20 {
            let mut ai = XiangqiAi::with_seed(Difficulty::Medium, seed);
            assert_eq!(ai.select_for(&board, Side::Black), Some((sq(2, 0), sq(6, 0))));
        }
    }

    #[test]
    fn test_medium_opening_shot() {
        // From the start, Black's only captures are the cannons over the red cannons
        let board = Board::initial();
        let mut ai = XiangqiAi::with_seed(Difficulty::Medium, 7);
        let (_, to) = ai.select_for(&board, Side::Black).unwrap();
        assert!(to == sq(9, 1) || to == sq(9, 7));
    }

    #[test]
    fn test_medium_falls_back_to_any_move() {
        let mut quiet = Board::empty();
        put(&mut quiet, 0, 4, PieceKind::General, Side::Black);
        put(&mut quiet, 9, 3, PieceKind::General, Side::Red);

        for seed in 0..10 {
            let mut ai = XiangqiAi::with_seed(Difficulty::Medium, seed);
            let (from, to) = ai.select_for(&quiet, Side::Black).unwrap();
            assert_eq!(from, sq(0, 4));
            assert!([sq(1, 4), sq(0, 3), sq(0, 5)].contains(&to));
        }
    }

    #[test]
    fn test_hard_takes_most_valuable() {
        let mut board = one_capture();
        put(&mut board, 2, 6, PieceKind::Horse, Side::Red);
        let mut ai = XiangqiAi::new(Difficulty::Hard);
        assert_eq!(ai.select_for(&board, Side::Black), Some((sq(2, 0), sq(2, 6))));
    }

    #[test]
    fn test_hard_tie_breaks_by_board_order() {
        // Two black chariots can each take a red horse (40 apiece)
        let mut board = Board::empty();
        put(&mut board, 0, 3, PieceKind::General, Side::Black);
        put(&mut board, 1, 0, PieceKind::Chariot, Side::Black);
        put(&mut board, 4, 8, PieceKind::Chariot, Side::Black);
        put(&mut board, 5, 0, PieceKind::Horse, Side::Red);
        put(&mut board, 8, 8, PieceKind::Horse, Side::Red);
        put(&mut board, 9, 4, PieceKind::General, Side::Red);

        for seed in 0..5 {
            let mut ai = XiangqiAi::with_seed(Difficulty::Hard, seed);
            assert_eq!(ai.select_for(&board, Side::Black), Some((sq(1, 0), sq(5, 0))));
        }
    }

    #[test]
    fn test_hard_values_soldier_advance() {
        // No captures: a soldier step is the only scoring move
        let mut board = Board::empty();
        put(&mut board, 0, 4, PieceKind::General, Side::Black);
        put(&mut board, 1, 0, PieceKind::Chariot, Side::Black);
        put(&mut board, 3, 8, PieceKind::Soldier, Side::Black);
        put(&mut board, 9, 3, PieceKind::General, Side::Red);
        assert_eq!(suggest_move(&board, Side::Black), Some((sq(3, 8), sq(4, 8))));
    }

    #[test]
    fn test_seeded_ai_is_reproducible() {
        let state = GameState::new();
        let mut a = XiangqiAi::with_seed(Difficulty::Easy, 99);
        let mut b = XiangqiAi::with_seed(Difficulty::Easy, 99);
        for _ in 0..10 {
            assert_eq!(a.best_move(&state), b.best_move(&state));
        }
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" easy ".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert!("expert".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn test_play_game() {
        let mut red = XiangqiAi::with_seed(Difficulty::Hard, 1);
        let mut black = XiangqiAi::with_seed(Difficulty::Easy, 2);
        let state = play_game(&mut red, &mut black, 200);

        assert!(state.move_count() > 0);
        assert!(state.move_count() <= 200);
        if state.move_count() < 200 {
            assert_ne!(state.status(), GameStatus::Playing);
        }
    }
}
