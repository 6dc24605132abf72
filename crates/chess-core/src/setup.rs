//! Board setup records handed to the move generator.

use crate::{CastlingRights, Color, Piece, Square};

/// One piece standing on one square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacedPiece {
    pub square: Square,
    pub piece: Piece,
    pub color: Color,
}

impl PlacedPiece {
    #[inline]
    pub const fn new(square: Square, piece: Piece, color: Color) -> Self {
        PlacedPiece {
            square,
            piece,
            color,
        }
    }
}

/// Everything needed to place a board into an arbitrary position.
///
/// Produced by notation front-ends such as [`FenParser`](crate::FenParser).
/// Nothing here is validated against the rules of chess; consumers must not
/// rely on a `Setup` describing a reachable position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setup {
    pub pieces: Vec<PlacedPiece>,
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Default for Setup {
    /// An empty board, White to move, no rights.
    fn default() -> Self {
        Setup {
            pieces: Vec::new(),
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}
