//! Session: a game plus the mode and AI that drive it
//!
//! `GameState` knows nothing about who controls each side. A `Session`
//! adds that, so undo can take back the AI's reply along with the human
//! move that provoked it.

use crate::ai::{suggest_move, Difficulty, XiangqiAi};
use crate::board::{Board, Square};
use crate::config::SessionConfig;
use crate::game::{GameState, GameStatus, Move, MoveError};
use crate::pieces::Side;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("it is not the computer's turn")]
    NotAiTurn,

    #[error("it is the computer's turn")]
    AiTurn,

    #[error(transparent)]
    Move(#[from] MoveError),
}

pub struct Session {
    state: GameState,
    config: SessionConfig,
    ai: XiangqiAi,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_state(config, GameState::new())
    }

    /// Wrap an existing game, e.g. one set up from a custom position
    pub fn with_state(config: SessionConfig, state: GameState) -> Self {
        let ai = create_ai(&config);
        Self { state, config, ai }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        self.state.board()
    }

    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    pub fn history(&self) -> &[Move] {
        self.state.history()
    }

    pub fn side_to_move(&self) -> Side {
        self.state.side_to_move()
    }

    pub fn legal_moves(&self, square: Square) -> Vec<Square> {
        self.state.legal_moves(square)
    }

    /// Play a human move. Refused while the computer is to move.
    pub fn attempt_move(&mut self, from: Square, to: Square) -> Result<Move, SessionError> {
        if self.is_ai_turn() {
            return Err(SessionError::AiTurn);
        }
        Ok(self.state.attempt_move(from, to)?)
    }

    /// True when the game is live and the computer is to move
    pub fn is_ai_turn(&self) -> bool {
        self.status().is_playing() && self.config.mode.ai_side() == Some(self.side_to_move())
    }

    /// The move the AI would play at `difficulty` for the side to move,
    /// without playing it. Advances the AI's random source.
    pub fn compute_ai_move(&mut self, difficulty: Difficulty) -> Option<Move> {
        if !self.status().is_playing() {
            return None;
        }
        let (from, to) = self
            .ai
            .select_with(difficulty, self.state.board(), self.state.side_to_move())?;
        preview(self.board(), from, to)
    }

    /// Let the computer make its move. `Ok(None)` when it has no legal move.
    pub fn play_ai_move(&mut self) -> Result<Option<Move>, SessionError> {
        if !self.is_ai_turn() {
            return Err(SessionError::NotAiTurn);
        }

        let Some((from, to)) = self.ai.best_move(&self.state) else {
            tracing::warn!(side = %self.side_to_move(), "computer has no legal move");
            return Ok(None);
        };
        Ok(Some(self.state.attempt_move(from, to)?))
    }

    /// Take back the last ply. Against the computer, an undone AI reply also
    /// takes back the human move before it. Returns the undone moves, most
    /// recent first.
    pub fn undo(&mut self) -> Vec<Move> {
        let mut undone = Vec::with_capacity(2);

        let Some(last) = self.state.undo_last_move() else {
            return undone;
        };
        undone.push(last);

        if self.config.mode.ai_side() == Some(last.side) {
            if let Some(previous) = self.state.undo_last_move() {
                undone.push(previous);
            }
        }

        undone
    }

    /// Suggested move for the side to move
    pub fn hint(&self) -> Option<Move> {
        if !self.status().is_playing() {
            return None;
        }
        let (from, to) = suggest_move(self.board(), self.side_to_move())?;
        preview(self.board(), from, to)
    }

    /// Start over with the same configuration
    pub fn new_game(&mut self) {
        self.state.reset();
        self.ai = create_ai(&self.config);
    }
}

fn create_ai(config: &SessionConfig) -> XiangqiAi {
    match config.seed {
        Some(seed) => XiangqiAi::with_seed(config.difficulty, seed),
        None => XiangqiAi::from_entropy(config.difficulty),
    }
}

/// Describe a move that has not been played yet
fn preview(board: &Board, from: Square, to: Square) -> Option<Move> {
    let piece = board.get(from)?;
    Some(Move {
        from,
        to,
        piece,
        captured: board.get(to),
        side: piece.side,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::{Piece, PieceKind};

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col).unwrap()
    }

    fn seeded() -> Session {
        Session::new(SessionConfig::default().with_seed(5))
    }

    #[test]
    fn test_undo_against_ai_takes_back_both_plies() {
        let mut session = seeded();
        session.attempt_move(sq(7, 1), sq(7, 4)).unwrap();
        let reply = session.play_ai_move().unwrap().unwrap();
        assert_eq!(reply.side, Side::Black);
        assert_eq!(session.history().len(), 2);

        let undone = session.undo();
        assert_eq!(undone.len(), 2);
        assert_eq!(undone[0], reply);
        assert_eq!(session.side_to_move(), Side::Red);
        assert_eq!(session.board(), &Board::initial());
        assert_eq!(session.state().move_count(), 0);
    }

    #[test]
    fn test_undo_human_move_only() {
        let mut session = seeded();
        session.attempt_move(sq(6, 4), sq(5, 4)).unwrap();

        let undone = session.undo();
        assert_eq!(undone.len(), 1);
        assert_eq!(session.side_to_move(), Side::Red);
        assert!(session.undo().is_empty());
    }

    #[test]
    fn test_pvp_single_undo() {
        let mut session = Session::new(SessionConfig::pvp());
        session.attempt_move(sq(6, 4), sq(5, 4)).unwrap();
        session.attempt_move(sq(3, 4), sq(4, 4)).unwrap();

        assert_eq!(session.undo().len(), 1);
        assert_eq!(session.side_to_move(), Side::Black);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_ai_turn_checks() {
        let mut session = seeded();
        assert_eq!(session.play_ai_move(), Err(SessionError::NotAiTurn));

        let mut pvp = Session::new(SessionConfig::pvp());
        pvp.attempt_move(sq(6, 4), sq(5, 4)).unwrap();
        assert_eq!(pvp.play_ai_move(), Err(SessionError::NotAiTurn));
    }

    #[test]
    fn test_ai_plays_red() {
        let mut session = Session::new(SessionConfig::vs_ai(Side::Red).with_seed(1));
        assert!(session.is_ai_turn());
        let mv = session.play_ai_move().unwrap().unwrap();
        assert_eq!(mv.side, Side::Red);
        assert_eq!(session.side_to_move(), Side::Black);
    }

    #[test]
    fn test_compute_ai_move_does_not_play() {
        let mut session = Session::new(SessionConfig::pvp());
        let mv = session.compute_ai_move(Difficulty::Hard).unwrap();
        assert!(mv.is_capture());
        assert_eq!(mv.side, Side::Red);
        assert_eq!(session.history().len(), 0);
        assert_eq!(session.board(), &Board::initial());
    }

    #[test]
    fn test_hint_matches_hard_choice() {
        let session = seeded();
        let hint = session.hint().unwrap();
        // Red's best opening shot: cannon takes a horse
        assert_eq!(hint.piece.kind, PieceKind::Cannon);
        assert!(hint.is_capture());
    }

    #[test]
    fn test_human_cannot_move_for_ai() {
        let mut session = seeded();
        session.attempt_move(sq(6, 4), sq(5, 4)).unwrap();

        let err = session.attempt_move(sq(3, 4), sq(4, 4)).unwrap_err();
        assert_eq!(err, SessionError::AiTurn);
        assert_eq!(session.history().len(), 1);

        session.play_ai_move().unwrap();
        assert_eq!(session.undo().len(), 2);
        assert_eq!(session.board(), &Board::initial());
    }

    #[test]
    fn test_custom_position_with_ai_to_move() {
        let mut board = Board::empty();
        board.set(sq(0, 4), Some(Piece::new(PieceKind::General, Side::Black)));
        board.set(sq(4, 4), Some(Piece::new(PieceKind::Chariot, Side::Black)));
        board.set(sq(9, 4), Some(Piece::new(PieceKind::General, Side::Red)));
        board.set(sq(9, 0), Some(Piece::new(PieceKind::Chariot, Side::Red)));
        let state = GameState::from_position(board, Side::Black);
        let config = SessionConfig::default().with_difficulty(Difficulty::Hard);
        let mut session = Session::with_state(config, state);

        assert!(session.is_ai_turn());
        assert!(session.attempt_move(sq(9, 0), sq(8, 0)).is_err());

        // Black chariot has a clear file down to the red general
        let reply = session.play_ai_move().unwrap().unwrap();
        assert_eq!(reply.to, sq(9, 4));
        assert_eq!(session.status(), GameStatus::Ended(Side::Black));
    }

    #[test]
    fn test_illegal_move_reported() {
        let mut session = seeded();
        let err = session.attempt_move(sq(9, 0), sq(5, 5)).unwrap_err();
        assert!(matches!(err, SessionError::Move(MoveError::IllegalDestination { .. })));
    }

    #[test]
    fn test_seeded_new_game_replays_same_moves() {
        let config = SessionConfig::vs_ai(Side::Red)
            .with_difficulty(Difficulty::Easy)
            .with_seed(17);
        let mut session = Session::new(config);
        let first = session.play_ai_move().unwrap();

        session.new_game();
        assert_eq!(session.history().len(), 0);
        assert_eq!(session.play_ai_move().unwrap(), first);
    }
}
