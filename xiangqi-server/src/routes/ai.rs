//! Stateless AI endpoints
//!
//! The client sends the whole board with every request; nothing is stored.

use crate::error::ApiError;
use axum::{extract::rejection::JsonRejection, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use xiangqi_core::{
    evaluate, suggest_move, Advantage, Board, Difficulty, GlyphRows, Piece, Side, Square,
    XiangqiAi,
};

/// A move as the board front end expects it
#[derive(Serialize)]
pub struct MoveView {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
}

impl MoveView {
    fn on(board: &Board, (from, to): (Square, Square)) -> Option<Self> {
        let piece = board.get(from)?;
        Some(Self { from, to, piece })
    }
}

fn default_ai_side() -> Side {
    Side::Black
}

fn default_red_turn() -> bool {
    true
}

#[derive(Deserialize)]
pub struct AiMoveRequest {
    pub board: GlyphRows,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_ai_side")]
    pub side: Side,
}

/// Pick a move for the AI side on the posted board
pub async fn ai_move(
    body: Result<Json<AiMoveRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = body?;
    let board = Board::from_glyph_rows(&req.board)?;
    let mut ai = XiangqiAi::from_entropy(req.difficulty);

    let choice = ai.select_for(&board, req.side).and_then(|mv| MoveView::on(&board, mv));
    Ok(Json(match choice {
        Some(mv) => json!({ "success": true, "move": mv }),
        None => no_moves(),
    }))
}

#[derive(Deserialize)]
pub struct HintRequest {
    pub board: GlyphRows,
    #[serde(default = "default_red_turn")]
    pub is_red_turn: bool,
}

/// Suggest a move for the side to move on the posted board
pub async fn hint(
    body: Result<Json<HintRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = body?;
    let board = Board::from_glyph_rows(&req.board)?;
    let side = if req.is_red_turn { Side::Red } else { Side::Black };

    let suggestion = suggest_move(&board, side).and_then(|mv| MoveView::on(&board, mv));
    Ok(Json(match suggestion {
        Some(mv) => json!({ "success": true, "hint": mv }),
        None => no_moves(),
    }))
}

#[derive(Deserialize)]
pub struct EvaluateRequest {
    pub board: GlyphRows,
}

#[derive(Serialize)]
pub struct Evaluation {
    pub score: i32,
    pub advantage: Advantage,
}

/// Score the posted board from Red's point of view
pub async fn evaluate_position(
    body: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = body?;
    let board = Board::from_glyph_rows(&req.board)?;
    let score = evaluate(&board);

    Ok(Json(json!({
        "success": true,
        "evaluation": Evaluation {
            score,
            advantage: Advantage::from_score(score),
        },
    })))
}

fn no_moves() -> Value {
    json!({ "success": false, "error": "No valid moves available" })
}
