//! Board geometry: squares, the 10x9 grid and the starting layout

use crate::pieces::{Piece, PieceKind, Side};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of rows (ranks)
pub const BOARD_ROWS: u8 = 10;
/// Number of columns (files)
pub const BOARD_COLS: u8 = 9;
/// Total number of squares
pub const BOARD_SQUARES: usize = BOARD_ROWS as usize * BOARD_COLS as usize;

/// Palace columns (inclusive)
const PALACE_COLS: (u8, u8) = (3, 5);

/// Errors raised while building squares from untrusted input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SquareError {
    #[error("square out of range: row {row}, col {col}")]
    OutOfRange { row: u8, col: u8 },

    #[error("invalid square notation: {0:?}")]
    BadNotation(String),
}

/// Errors raised while building a board from untrusted input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board must have {expected} rows, got {actual}")]
    RowCount { expected: usize, actual: usize },

    #[error("row {row} must have {expected} columns, got {actual}")]
    ColumnCount { row: usize, expected: usize, actual: usize },

    #[error("unknown piece glyph {glyph:?} at row {row}, col {col}")]
    UnknownGlyph { glyph: String, row: usize, col: usize },
}

/// A square on the board. Row 0 is Black's back rank, row 9 is Red's.
///
/// Squares can only be built through bounds-checked constructors, so every
/// `Square` value is on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "[u8; 2]", into = "[u8; 2]")]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < BOARD_ROWS && col < BOARD_COLS {
            Some(Self { row, col })
        } else {
            None
        }
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn col(&self) -> u8 {
        self.col
    }

    /// Row-major index into the board array
    pub fn index(&self) -> usize {
        self.row as usize * BOARD_COLS as usize + self.col as usize
    }

    /// Square shifted by (drow, dcol), if still on the board
    pub fn offset(&self, drow: i8, dcol: i8) -> Option<Square> {
        let row = self.row as i8 + drow;
        let col = self.col as i8 + dcol;
        if row < 0 || col < 0 {
            return None;
        }
        Square::new(row as u8, col as u8)
    }

    /// Inside the 3x3 palace of `side`
    pub fn in_palace(&self, side: Side) -> bool {
        if self.col < PALACE_COLS.0 || self.col > PALACE_COLS.1 {
            return false;
        }
        match side {
            Side::Red => (7..=9).contains(&self.row),
            Side::Black => self.row <= 2,
        }
    }

    /// On the far side of the river from `side`'s home
    pub fn has_crossed_river(&self, side: Side) -> bool {
        match side {
            Side::Red => self.row < 5,
            Side::Black => self.row > 4,
        }
    }

    /// All squares in row-major order
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_ROWS).flat_map(|row| (0..BOARD_COLS).map(move |col| Square { row, col }))
    }
}

impl TryFrom<[u8; 2]> for Square {
    type Error = SquareError;

    fn try_from([row, col]: [u8; 2]) -> Result<Self, Self::Error> {
        Square::new(row, col).ok_or(SquareError::OutOfRange { row, col })
    }
}

impl From<Square> for [u8; 2] {
    fn from(square: Square) -> Self {
        [square.row, square.col]
    }
}

/// File letter + rank number, e.g. `(9, 0)` is `a1` and `(0, 8)` is `i10`
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, BOARD_ROWS - self.row)
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || SquareError::BadNotation(s.to_string());
        let s = s.trim();
        let mut chars = s.chars();
        let file = chars.next().ok_or_else(bad)?.to_ascii_lowercase();
        if !file.is_ascii_lowercase() {
            return Err(bad());
        }
        let rank: u8 = chars.as_str().parse().map_err(|_| bad())?;
        if rank == 0 || rank > BOARD_ROWS {
            return Err(bad());
        }
        let col = file as u8 - b'a';
        Square::new(BOARD_ROWS - rank, col).ok_or_else(bad)
    }
}

/// Wire form of a board: 10 rows of 9 glyphs (or null for empty)
pub type GlyphRows = Vec<Vec<Option<String>>>;

/// The 10x9 grid of optional pieces
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GlyphRows", into = "GlyphRows")]
pub struct Board {
    squares: [Option<Piece>; BOARD_SQUARES],
}

const BACK_RANK: [PieceKind; 9] = [
    PieceKind::Chariot,
    PieceKind::Horse,
    PieceKind::Elephant,
    PieceKind::Advisor,
    PieceKind::General,
    PieceKind::Advisor,
    PieceKind::Elephant,
    PieceKind::Horse,
    PieceKind::Chariot,
];
const CANNON_COLS: [u8; 2] = [1, 7];
const SOLDIER_COLS: [u8; 5] = [0, 2, 4, 6, 8];

impl Board {
    /// Board with no pieces
    pub fn empty() -> Self {
        Self {
            squares: [None; BOARD_SQUARES],
        }
    }

    /// Standard starting layout
    pub fn initial() -> Self {
        let mut board = Self::empty();
        for (side, back, cannons, soldiers) in [(Side::Black, 0, 2, 3), (Side::Red, 9, 7, 6)] {
            for (col, &kind) in BACK_RANK.iter().enumerate() {
                board.place(back, col as u8, kind, side);
            }
            for &col in &CANNON_COLS {
                board.place(cannons, col, PieceKind::Cannon, side);
            }
            for &col in &SOLDIER_COLS {
                board.place(soldiers, col, PieceKind::Soldier, side);
            }
        }
        board
    }

    fn place(&mut self, row: u8, col: u8, kind: PieceKind, side: Side) {
        if let Some(square) = Square::new(row, col) {
            self.set(square, Some(Piece::new(kind, side)));
        }
    }

    pub fn get(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.index()] = piece;
    }

    /// Remove and return the piece at `square`
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.index()].take()
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.get(square).is_none()
    }

    /// Iterate occupied squares in row-major order
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|piece| (sq, piece)))
    }

    /// Iterate `side`'s pieces in row-major order
    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.side == side)
    }

    /// Location of `side`'s General, if it is still on the board
    pub fn find_general(&self, side: Side) -> Option<Square> {
        self.pieces_of(side)
            .find(|(_, piece)| piece.is_general())
            .map(|(sq, _)| sq)
    }

    /// Glyph grid for rendering or the wire
    pub fn to_glyph_rows(&self) -> GlyphRows {
        (0..BOARD_ROWS)
            .map(|row| {
                (0..BOARD_COLS)
                    .map(|col| {
                        Square::new(row, col)
                            .and_then(|sq| self.get(sq))
                            .map(|piece| piece.glyph().to_string())
                    })
                    .collect()
            })
            .collect()
    }

    /// Parse a glyph grid; empty strings count as empty squares
    pub fn from_glyph_rows(rows: &[Vec<Option<String>>]) -> Result<Self, BoardError> {
        if rows.len() != BOARD_ROWS as usize {
            return Err(BoardError::RowCount {
                expected: BOARD_ROWS as usize,
                actual: rows.len(),
            });
        }

        let mut board = Self::empty();
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != BOARD_COLS as usize {
                return Err(BoardError::ColumnCount {
                    row,
                    expected: BOARD_COLS as usize,
                    actual: cells.len(),
                });
            }
            for (col, cell) in cells.iter().enumerate() {
                let glyph = match cell.as_deref().map(str::trim) {
                    None | Some("") => continue,
                    Some(glyph) => glyph,
                };
                let piece = Piece::from_glyph(glyph).ok_or_else(|| BoardError::UnknownGlyph {
                    glyph: glyph.to_string(),
                    row,
                    col,
                })?;
                board.squares[row * BOARD_COLS as usize + col] = Some(piece);
            }
        }
        Ok(board)
    }
}

impl TryFrom<GlyphRows> for Board {
    type Error = BoardError;

    fn try_from(rows: GlyphRows) -> Result<Self, Self::Error> {
        Board::from_glyph_rows(&rows)
    }
}

impl From<Board> for GlyphRows {
    fn from(board: Board) -> Self {
        board.to_glyph_rows()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_ROWS {
            write!(f, "{:>2} ", BOARD_ROWS - row)?;
            for col in 0..BOARD_COLS {
                match Square::new(row, col).and_then(|sq| self.get(sq)) {
                    Some(piece) => write!(f, "{} ", piece)?,
                    None => write!(f, "＋ ")?,
                }
            }
            writeln!(f)?;
            if row == 4 {
                writeln!(f, "   ~~~~~~~~~~~~~~~~~~~~~~~~~~")?;
            }
        }
        write!(f, "  ")?;
        for file in 'a'..='i' {
            write!(f, " {} ", file)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn test_square_bounds() {
        assert!(Square::new(0, 0).is_some());
        assert!(Square::new(9, 8).is_some());
        assert!(Square::new(10, 0).is_none());
        assert!(Square::new(0, 9).is_none());
        assert_eq!(sq(0, 0).offset(-1, 0), None);
        assert_eq!(sq(9, 8).offset(0, 1), None);
        assert_eq!(sq(4, 4).offset(-2, 1), Some(sq(2, 5)));
    }

    #[test]
    fn test_notation() {
        assert_eq!(sq(9, 0).to_string(), "a1");
        assert_eq!(sq(0, 8).to_string(), "i10");
        assert_eq!(sq(7, 1).to_string(), "b3");
        assert_eq!("b3".parse::<Square>(), Ok(sq(7, 1)));
        assert_eq!("I10".parse::<Square>(), Ok(sq(0, 8)));
        assert!("j1".parse::<Square>().is_err());
        assert!("a0".parse::<Square>().is_err());
        assert!("a11".parse::<Square>().is_err());
        assert!("".parse::<Square>().is_err());
    }

    #[test]
    fn test_palace_and_river() {
        assert!(sq(9, 4).in_palace(Side::Red));
        assert!(sq(7, 3).in_palace(Side::Red));
        assert!(!sq(6, 4).in_palace(Side::Red));
        assert!(!sq(9, 2).in_palace(Side::Red));
        assert!(sq(0, 5).in_palace(Side::Black));
        assert!(!sq(3, 4).in_palace(Side::Black));

        assert!(sq(4, 0).has_crossed_river(Side::Red));
        assert!(!sq(5, 0).has_crossed_river(Side::Red));
        assert!(sq(5, 0).has_crossed_river(Side::Black));
        assert!(!sq(4, 0).has_crossed_river(Side::Black));
    }

    #[test]
    fn test_initial_layout() {
        let board = Board::initial();
        let black_rank: Vec<_> = (0..9).map(|c| board.get(sq(0, c))).collect();
        let red_rank: Vec<_> = (0..9).map(|c| board.get(sq(9, c))).collect();
        for (col, kind) in BACK_RANK.iter().enumerate() {
            assert_eq!(black_rank[col], Some(Piece::new(*kind, Side::Black)));
            assert_eq!(red_rank[col], Some(Piece::new(*kind, Side::Red)));
        }

        assert_eq!(board.get(sq(2, 1)), Some(Piece::new(PieceKind::Cannon, Side::Black)));
        assert_eq!(board.get(sq(2, 7)), Some(Piece::new(PieceKind::Cannon, Side::Black)));
        assert_eq!(board.get(sq(7, 1)), Some(Piece::new(PieceKind::Cannon, Side::Red)));
        assert_eq!(board.get(sq(7, 7)), Some(Piece::new(PieceKind::Cannon, Side::Red)));
        for col in [0, 2, 4, 6, 8] {
            assert_eq!(board.get(sq(3, col)), Some(Piece::new(PieceKind::Soldier, Side::Black)));
            assert_eq!(board.get(sq(6, col)), Some(Piece::new(PieceKind::Soldier, Side::Red)));
        }

        assert_eq!(board.pieces().count(), 32);
        assert_eq!(board.pieces_of(Side::Red).count(), 16);
        assert_eq!(board.find_general(Side::Red), Some(sq(9, 4)));
        assert_eq!(board.find_general(Side::Black), Some(sq(0, 4)));
    }

    #[test]
    fn test_glyph_rows() {
        let board = Board::initial();
        let rows = board.to_glyph_rows();
        assert_eq!(rows[0][4].as_deref(), Some("将"));
        assert_eq!(rows[9][0].as_deref(), Some("車"));
        assert_eq!(rows[5][0], None);
        assert_eq!(Board::from_glyph_rows(&rows), Ok(board));
    }

    #[test]
    fn test_glyph_rows_rejects_bad_input() {
        let mut rows = Board::initial().to_glyph_rows();
        rows[4][4] = Some("X".to_string());
        assert!(matches!(
            Board::from_glyph_rows(&rows),
            Err(BoardError::UnknownGlyph { row: 4, col: 4, .. })
        ));

        rows.pop();
        assert!(matches!(
            Board::from_glyph_rows(&rows),
            Err(BoardError::RowCount { actual: 9, .. })
        ));
    }

    #[test]
    fn test_board_json() {
        let board = Board::initial();
        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);

        let square: Square = serde_json::from_str("[7, 1]").unwrap();
        assert_eq!(square, sq(7, 1));
        assert!(serde_json::from_str::<Square>("[10, 1]").is_err());
    }
}
