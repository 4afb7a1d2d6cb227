//! Game session endpoints
//!
//! Each session is a full game held on the server: the client sends only
//! moves and commands, and gets the updated game back.

use crate::error::ApiError;
use crate::state::ServerState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use xiangqi_core::{
    Board, Difficulty, GameMode, GameState, GameStatus, GlyphRows, Move, Session, SessionConfig,
    Side, Square,
};

type GameId = Result<Path<u64>, PathRejection>;

/// Everything a client needs to draw the game
#[derive(Serialize)]
pub struct GameView {
    pub board: Board,
    pub side_to_move: Side,
    pub status: GameStatus,
    pub winner: Option<Side>,
    pub move_count: u32,
    pub history: Vec<Move>,
    pub mode: GameMode,
    pub difficulty: Difficulty,
}

impl GameView {
    fn of(session: &Session) -> Self {
        let state = session.state();
        Self {
            board: state.board().clone(),
            side_to_move: state.side_to_move(),
            status: state.status(),
            winner: state.status().winner(),
            move_count: state.move_count(),
            history: state.history().to_vec(),
            mode: session.config().mode,
            difficulty: session.config().difficulty,
        }
    }
}

#[derive(Serialize)]
pub struct GameResponse {
    pub success: bool,
    pub id: u64,
    pub game: GameView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_move: Option<Move>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub undone: Option<Vec<Move>>,
}

impl GameResponse {
    fn new(id: u64, session: &Session) -> Self {
        Self {
            success: true,
            id,
            game: GameView::of(session),
            ai_move: None,
            undone: None,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateGameRequest {
    #[serde(flatten)]
    pub config: SessionConfig,
    /// Start from this position instead of the initial one
    pub board: Option<GlyphRows>,
    /// Defaults to Red
    pub side_to_move: Option<Side>,
}

impl CreateGameRequest {
    fn into_session(self) -> Result<Session, ApiError> {
        if self.board.is_none() && self.side_to_move.is_none() {
            return Ok(Session::new(self.config));
        }

        let board = match &self.board {
            Some(rows) => Board::from_glyph_rows(rows)?,
            None => Board::initial(),
        };
        let state = GameState::from_position(board, self.side_to_move.unwrap_or(Side::Red));
        Ok(Session::with_state(self.config, state))
    }
}

/// Start a new game. Without a body the server's session defaults apply.
pub async fn create_game(
    State(state): State<Arc<ServerState>>,
    body: Result<Json<CreateGameRequest>, JsonRejection>,
) -> Result<Json<GameResponse>, ApiError> {
    let session = match body {
        Ok(Json(req)) => req.into_session()?,
        Err(JsonRejection::MissingJsonContentType(_)) => Session::new(state.session_defaults()),
        Err(rejection) => return Err(rejection.into()),
    };

    let id = state.insert_session(session);
    let response = state.read_session(id, |session| GameResponse::new(id, session))?;
    Ok(Json(response))
}

pub async fn get_game(
    State(state): State<Arc<ServerState>>,
    id: GameId,
) -> Result<Json<GameResponse>, ApiError> {
    let Path(id) = id?;
    let response = state.read_session(id, |session| GameResponse::new(id, session))?;
    Ok(Json(response))
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub id: u64,
}

pub async fn delete_game(
    State(state): State<Arc<ServerState>>,
    id: GameId,
) -> Result<Json<DeleteResponse>, ApiError> {
    let Path(id) = id?;
    state.remove_session(id)?;
    Ok(Json(DeleteResponse { success: true, id }))
}

#[derive(Deserialize)]
pub struct SquareQuery {
    pub row: u8,
    pub col: u8,
}

#[derive(Serialize)]
pub struct LegalMovesResponse {
    pub success: bool,
    pub from: Square,
    pub moves: Vec<Square>,
}

/// Destinations for the piece on `row`, `col`
pub async fn legal_moves(
    State(state): State<Arc<ServerState>>,
    id: GameId,
    query: Result<Query<SquareQuery>, QueryRejection>,
) -> Result<Json<LegalMovesResponse>, ApiError> {
    let Path(id) = id?;
    let Query(query) = query?;
    let from = Square::try_from([query.row, query.col])?;
    let moves = state.read_session(id, |session| session.legal_moves(from))?;
    Ok(Json(LegalMovesResponse {
        success: true,
        from,
        moves,
    }))
}

#[derive(Deserialize)]
pub struct MoveRequest {
    pub from: [u8; 2],
    pub to: [u8; 2],
}

pub async fn make_move(
    State(state): State<Arc<ServerState>>,
    id: GameId,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<GameResponse>, ApiError> {
    let Path(id) = id?;
    let Json(req) = body?;
    let from = Square::try_from(req.from)?;
    let to = Square::try_from(req.to)?;

    let response = state.with_session(id, |session| -> Result<_, ApiError> {
        session.attempt_move(from, to)?;
        Ok(GameResponse::new(id, session))
    })??;
    Ok(Json(response))
}

/// Let the computer play for its side
pub async fn ai_move(
    State(state): State<Arc<ServerState>>,
    id: GameId,
) -> Result<Json<GameResponse>, ApiError> {
    let Path(id) = id?;
    let response = state.with_session(id, |session| -> Result<_, ApiError> {
        let played = session.play_ai_move()?;
        let mut response = GameResponse::new(id, session);
        response.ai_move = played;
        Ok(response)
    })??;
    Ok(Json(response))
}

pub async fn undo(
    State(state): State<Arc<ServerState>>,
    id: GameId,
) -> Result<Json<GameResponse>, ApiError> {
    let Path(id) = id?;
    let response = state.with_session(id, |session| {
        let undone = session.undo();
        let mut response = GameResponse::new(id, session);
        response.undone = Some(undone);
        response
    })?;
    Ok(Json(response))
}

pub async fn new_game(
    State(state): State<Arc<ServerState>>,
    id: GameId,
) -> Result<Json<GameResponse>, ApiError> {
    let Path(id) = id?;
    let response = state.with_session(id, |session| {
        session.new_game();
        GameResponse::new(id, session)
    })?;
    Ok(Json(response))
}

#[derive(Serialize)]
pub struct HintResponse {
    pub success: bool,
    pub hint: Option<Move>,
}

pub async fn hint(
    State(state): State<Arc<ServerState>>,
    id: GameId,
) -> Result<Json<HintResponse>, ApiError> {
    let Path(id) = id?;
    let hint = state.read_session(id, |session| session.hint())?;
    Ok(Json(HintResponse {
        success: true,
        hint,
    }))
}
