//! Move generation: per-kind destination rules
//!
//! Destinations are produced in a fixed order per kind. The AI relies on
//! that order (together with row-major board scanning) to break ties.

use crate::board::{Board, Square};
use crate::pieces::{Piece, PieceKind, Side};

/// Orthogonal directions: up, down, left, right
const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Diagonal directions
const DIAGONAL: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Horse offsets paired with the leg square that blocks them
const HORSE_MOVES: [((i8, i8), (i8, i8)); 8] = [
    ((-2, -1), (-1, 0)),
    ((-2, 1), (-1, 0)),
    ((-1, -2), (0, -1)),
    ((-1, 2), (0, 1)),
    ((1, -2), (0, -1)),
    ((1, 2), (0, 1)),
    ((2, -1), (1, 0)),
    ((2, 1), (1, 0)),
];

/// Every square the piece on `from` may move to.
///
/// The only legality rules are the piece's movement pattern, the board edge
/// and the own-piece block; leaving one's General exposed is allowed.
pub fn legal_destinations(board: &Board, from: Square) -> Vec<Square> {
    let mut moves = Vec::new();
    if let Some(piece) = board.get(from) {
        generate_destinations(board, from, piece, &mut moves);
    }
    moves
}

/// Every `(from, to)` pair for `side`, scanning the board row-major
pub fn all_moves(board: &Board, side: Side) -> Vec<(Square, Square)> {
    let mut moves = Vec::new();
    let mut destinations = Vec::new();

    for (from, piece) in board.pieces_of(side) {
        destinations.clear();
        generate_destinations(board, from, piece, &mut destinations);
        moves.extend(destinations.iter().map(|&to| (from, to)));
    }

    moves
}

/// Whether `to` is among the destinations of the piece on `from`
pub fn is_legal(board: &Board, from: Square, to: Square) -> bool {
    legal_destinations(board, from).contains(&to)
}

fn generate_destinations(board: &Board, from: Square, piece: Piece, moves: &mut Vec<Square>) {
    match piece.kind {
        PieceKind::General => generate_general_moves(board, from, piece.side, moves),
        PieceKind::Advisor => generate_advisor_moves(board, from, piece.side, moves),
        PieceKind::Elephant => generate_elephant_moves(board, from, piece.side, moves),
        PieceKind::Horse => generate_horse_moves(board, from, piece.side, moves),
        PieceKind::Chariot => generate_chariot_moves(board, from, piece.side, moves),
        PieceKind::Cannon => generate_cannon_moves(board, from, piece.side, moves),
        PieceKind::Soldier => generate_soldier_moves(board, from, piece.side, moves),
    }
}

/// Empty, or held by the opponent
fn can_land(board: &Board, to: Square, side: Side) -> bool {
    board.get(to).map_or(true, |occupant| occupant.side != side)
}

fn generate_general_moves(board: &Board, from: Square, side: Side, moves: &mut Vec<Square>) {
    for &(dr, dc) in &ORTHOGONAL {
        if let Some(to) = from.offset(dr, dc) {
            if to.in_palace(side) && can_land(board, to, side) {
                moves.push(to);
            }
        }
    }
}

fn generate_advisor_moves(board: &Board, from: Square, side: Side, moves: &mut Vec<Square>) {
    for &(dr, dc) in &DIAGONAL {
        if let Some(to) = from.offset(dr, dc) {
            if to.in_palace(side) && can_land(board, to, side) {
                moves.push(to);
            }
        }
    }
}

fn generate_elephant_moves(board: &Board, from: Square, side: Side, moves: &mut Vec<Square>) {
    for &(dr, dc) in &DIAGONAL {
        let Some(to) = from.offset(dr * 2, dc * 2) else {
            continue;
        };
        if to.has_crossed_river(side) {
            continue;
        }

        // Elephant eye
        let blocked = from.offset(dr, dc).map_or(true, |eye| !board.is_empty(eye));
        if !blocked && can_land(board, to, side) {
            moves.push(to);
        }
    }
}

fn generate_horse_moves(board: &Board, from: Square, side: Side, moves: &mut Vec<Square>) {
    for &((dr, dc), (leg_r, leg_c)) in &HORSE_MOVES {
        let Some(to) = from.offset(dr, dc) else {
            continue;
        };

        // The leg lies between origin and destination, so it is on the board
        let blocked = from.offset(leg_r, leg_c).map_or(true, |leg| !board.is_empty(leg));
        if !blocked && can_land(board, to, side) {
            moves.push(to);
        }
    }
}

fn generate_chariot_moves(board: &Board, from: Square, side: Side, moves: &mut Vec<Square>) {
    for &(dr, dc) in &ORTHOGONAL {
        let mut current = from;

        while let Some(next) = current.offset(dr, dc) {
            current = next;
            match board.get(current) {
                None => moves.push(current),
                Some(occupant) => {
                    if occupant.side != side {
                        moves.push(current);
                    }
                    break; // Blocked
                }
            }
        }
    }
}

fn generate_cannon_moves(board: &Board, from: Square, side: Side, moves: &mut Vec<Square>) {
    for &(dr, dc) in &ORTHOGONAL {
        let mut current = from;
        let mut screened = false;

        while let Some(next) = current.offset(dr, dc) {
            current = next;
            match (board.get(current), screened) {
                (None, false) => moves.push(current),
                (None, true) => {}
                (Some(_), false) => screened = true,
                (Some(occupant), true) => {
                    if occupant.side != side {
                        moves.push(current);
                    }
                    break;
                }
            }
        }
    }
}

fn generate_soldier_moves(board: &Board, from: Square, side: Side, moves: &mut Vec<Square>) {
    let forward = match side {
        Side::Red => -1,
        Side::Black => 1,
    };

    let mut steps = vec![(forward, 0)];
    if from.has_crossed_river(side) {
        steps.push((0, -1));
        steps.push((0, 1));
    }

    for (dr, dc) in steps {
        if let Some(to) = from.offset(dr, dc) {
            if can_land(board, to, side) {
                moves.push(to);
            }
        }
    }
}
