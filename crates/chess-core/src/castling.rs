//! Castling rights.

use crate::{Color, Square};
use std::fmt;

/// The two sides of the board a king can castle towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleWing {
    Kingside,
    Queenside,
}

impl CastleWing {
    pub const ALL: [CastleWing; 2] = [CastleWing::Kingside, CastleWing::Queenside];
}

/// Per-side, per-wing castling flags packed into four bits (`KQkq`).
///
/// Rights are only ever revoked while a game is played; nothing in the move
/// path sets a flag again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    const fn flag(color: Color, wing: CastleWing) -> u8 {
        match (color, wing) {
            (Color::White, CastleWing::Kingside) => 0b0001,
            (Color::White, CastleWing::Queenside) => 0b0010,
            (Color::Black, CastleWing::Kingside) => 0b0100,
            (Color::Black, CastleWing::Queenside) => 0b1000,
        }
    }

    /// Flags lost when a piece leaves or arrives on `sq`.
    ///
    /// Only the king and rook home squares carry flags; every other square
    /// maps to zero.
    const fn square_flags(sq: Square) -> u8 {
        match sq.index() {
            0 => 0b0010,  // a1
            4 => 0b0011,  // e1
            7 => 0b0001,  // h1
            56 => 0b1000, // a8
            60 => 0b1100, // e8
            63 => 0b0100, // h8
            _ => 0,
        }
    }

    /// Creates rights from raw `KQkq` bits (bit 0 = White kingside).
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        CastlingRights(bits & 0b1111)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn has(self, color: Color, wing: CastleWing) -> bool {
        self.0 & Self::flag(color, wing) != 0
    }

    #[inline]
    pub fn grant(&mut self, color: Color, wing: CastleWing) {
        self.0 |= Self::flag(color, wing);
    }

    /// Revokes whatever rights depend on the piece standing on `sq`.
    ///
    /// Applied to both the origin and the destination of every move: moving a
    /// king or rook off its home square, or capturing a rook on its home
    /// square, clears the matching flags.
    #[inline]
    pub fn revoke_square(&mut self, sq: Square) {
        self.0 &= !Self::square_flags(sq);
    }

    /// Parses the castling field of a FEN record (`"KQkq"`, `"Kq"`, `"-"`).
    pub fn from_fen_field(field: &str) -> Option<Self> {
        if field == "-" {
            return Some(Self::NONE);
        }
        let mut rights = Self::NONE;
        for c in field.chars() {
            match c {
                'K' => rights.grant(Color::White, CastleWing::Kingside),
                'Q' => rights.grant(Color::White, CastleWing::Queenside),
                'k' => rights.grant(Color::Black, CastleWing::Kingside),
                'q' => rights.grant(Color::Black, CastleWing::Queenside),
                _ => return None,
            }
        }
        Some(rights)
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (color, wing, c) in [
            (Color::White, CastleWing::Kingside, 'K'),
            (Color::White, CastleWing::Queenside, 'Q'),
            (Color::Black, CastleWing::Kingside, 'k'),
            (Color::Black, CastleWing::Queenside, 'q'),
        ] {
            if self.has(color, wing) {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}
