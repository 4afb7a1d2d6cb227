//! Static evaluation of moves and positions

use crate::board::{Board, Square};
use crate::pieces::{Piece, PieceKind, Side};
use serde::{Deserialize, Serialize};

/// Soldier bonus by rows advanced from its own back rank (row index) and file
const SOLDIER_TABLE: [[i32; 9]; 10] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 1, 1, 1, 1, 1, 0, 0],
    [1, 1, 2, 2, 3, 2, 2, 1, 1],
    [2, 2, 3, 3, 4, 3, 3, 2, 2],
    [3, 3, 4, 4, 5, 4, 4, 3, 3],
    [4, 4, 5, 5, 6, 5, 5, 4, 4],
    [5, 5, 6, 6, 7, 6, 6, 5, 5],
    [6, 6, 7, 7, 8, 7, 7, 6, 6],
];

/// Rows `side` has advanced from its own back rank when standing on `square`
fn rows_advanced(square: Square, side: Side) -> i32 {
    match side {
        Side::Red => 9 - square.row() as i32,
        Side::Black => square.row() as i32,
    }
}

/// Bonus for landing `piece` on `to`; only Soldiers earn one
pub fn positional_bonus(piece: Piece, to: Square) -> i32 {
    match piece.kind {
        PieceKind::Soldier => rows_advanced(to, piece.side),
        _ => 0,
    }
}

/// Single-ply score of moving the piece on `from` to `to`:
/// captured material plus the positional bonus
pub fn move_score(board: &Board, from: Square, to: Square) -> i32 {
    let captured = board.get(to).map_or(0, |piece| piece.value());
    let bonus = board.get(from).map_or(0, |piece| positional_bonus(piece, to));
    captured + bonus
}

/// Which side a position favours
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Advantage {
    Red,
    Black,
    Equal,
}

impl Advantage {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s > 0 => Advantage::Red,
            s if s < 0 => Advantage::Black,
            _ => Advantage::Equal,
        }
    }
}

/// Material balance plus soldier placement, positive when Red is ahead
pub fn evaluate(board: &Board) -> i32 {
    board
        .pieces()
        .map(|(square, piece)| {
            let mut value = piece.value();
            if piece.kind == PieceKind::Soldier {
                let advanced = rows_advanced(square, piece.side) as usize;
                value += SOLDIER_TABLE[advanced][square.col() as usize];
            }
            match piece.side {
                Side::Red => value,
                Side::Black => -value,
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn test_evaluate_symmetric() {
        assert_eq!(evaluate(&Board::initial()), 0);
        assert_eq!(Advantage::from_score(0), Advantage::Equal);
    }

    #[test]
    fn test_evaluate_material() {
        let mut board = Board::initial();
        board.take(sq(0, 0)); // black chariot
        assert_eq!(evaluate(&board), 90);
        assert_eq!(Advantage::from_score(evaluate(&board)), Advantage::Red);
    }

    #[test]
    fn test_evaluate_soldier_advance() {
        let mut board = Board::initial();
        let soldier = board.take(sq(3, 4));
        board.set(sq(7, 4), soldier);
        // Black soldier on row 7 centre file: 10 + 6, versus 10 + 1 at home
        assert_eq!(evaluate(&board), -5);
    }

    #[test]
    fn test_move_score() {
        let board = Board::initial();
        // Red cannon takes the black horse
        assert_eq!(move_score(&board, sq(7, 1), sq(0, 1)), 40);
        // Red soldier steps to row 5: four rows from its back rank
        assert_eq!(move_score(&board, sq(6, 0), sq(5, 0)), 4);
        // Black soldier steps to row 4
        assert_eq!(move_score(&board, sq(3, 0), sq(4, 0)), 4);
        // Quiet chariot move
        assert_eq!(move_score(&board, sq(9, 0), sq(8, 0)), 0);
    }
}
