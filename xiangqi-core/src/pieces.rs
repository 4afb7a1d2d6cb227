//! Piece catalog: kinds, sides, glyphs and material values

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side to play
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Red = 0,
    Black = 1,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Red => "red",
            Side::Black => "black",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Piece kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    General,
    Advisor,
    Elephant,
    Horse,
    Chariot,
    Cannon,
    Soldier,
}

/// Static description of a piece kind
#[derive(Clone, Debug)]
pub struct PieceInfo {
    pub kind: PieceKind,
    pub value: i32,
    pub red_glyph: &'static str,
    pub black_glyph: &'static str,
    /// Alternate glyphs accepted when parsing (traditional/simplified variants)
    pub aliases: &'static [(&'static str, Side)],
}

impl PieceInfo {
    const fn new(
        kind: PieceKind,
        value: i32,
        red_glyph: &'static str,
        black_glyph: &'static str,
        aliases: &'static [(&'static str, Side)],
    ) -> Self {
        Self {
            kind,
            value,
            red_glyph,
            black_glyph,
            aliases,
        }
    }
}

/// All 7 piece kinds, indexed by `PieceKind as usize`
pub static PIECE_KINDS: [PieceInfo; 7] = [
    PieceInfo::new(PieceKind::General, 1000, "帥", "将", &[("帅", Side::Red), ("將", Side::Black)]),
    PieceInfo::new(PieceKind::Advisor, 20, "仕", "士", &[]),
    PieceInfo::new(PieceKind::Elephant, 20, "相", "象", &[]),
    PieceInfo::new(PieceKind::Horse, 40, "馬", "马", &[("傌", Side::Red)]),
    PieceInfo::new(PieceKind::Chariot, 90, "車", "车", &[("俥", Side::Red)]),
    PieceInfo::new(PieceKind::Cannon, 45, "炮", "砲", &[]),
    PieceInfo::new(PieceKind::Soldier, 10, "兵", "卒", &[]),
];

/// Get the static description of a piece kind
pub fn get_piece_info(kind: PieceKind) -> &'static PieceInfo {
    &PIECE_KINDS[kind as usize]
}

/// A piece on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
}

impl Piece {
    pub const fn new(kind: PieceKind, side: Side) -> Self {
        Self { kind, side }
    }

    /// Material value used by evaluation and the AI
    pub fn value(&self) -> i32 {
        get_piece_info(self.kind).value
    }

    pub fn glyph(&self) -> &'static str {
        let info = get_piece_info(self.kind);
        match self.side {
            Side::Red => info.red_glyph,
            Side::Black => info.black_glyph,
        }
    }

    /// Parse a piece from its glyph
    pub fn from_glyph(glyph: &str) -> Option<Self> {
        for info in &PIECE_KINDS {
            if info.red_glyph == glyph {
                return Some(Piece::new(info.kind, Side::Red));
            }
            if info.black_glyph == glyph {
                return Some(Piece::new(info.kind, Side::Black));
            }
            if let Some(&(_, side)) = info.aliases.iter().find(|(alias, _)| *alias == glyph) {
                return Some(Piece::new(info.kind, side));
            }
        }
        None
    }

    pub fn is_general(&self) -> bool {
        self.kind == PieceKind::General
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

impl Serialize for Piece {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.glyph())
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let glyph = String::deserialize(deserializer)?;
        Piece::from_glyph(&glyph)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown piece glyph: {}", glyph)))
    }
}
