//! Packed move representation.

use crate::{Piece, Square};
use std::fmt;

const FROM_SHIFT: u32 = 0;
const TO_SHIFT: u32 = 6;
const PIECE_SHIFT: u32 = 12;
const CAPTURED_SHIFT: u32 = 15;
const PROMOTION_SHIFT: u32 = 18;

const SQUARE_MASK: u32 = 0x3F;
const PIECE_MASK: u32 = 0x7;

/// Piece fields store `index + 1` so that zero can mean "none".
#[inline]
const fn piece_code(piece: Option<Piece>) -> u32 {
    match piece {
        Some(p) => p as u32 + 1,
        None => 0,
    }
}

#[inline]
const fn decode_piece(code: u32) -> Option<Piece> {
    if code == 0 {
        None
    } else {
        Piece::from_index(code as usize - 1)
    }
}

/// A move, packed into the low 21 bits of a `u32`.
///
/// | bits  | field                                    |
/// |-------|------------------------------------------|
/// | 0-5   | origin square                            |
/// | 6-11  | destination square                       |
/// | 12-14 | moved piece (`index + 1`)                |
/// | 15-17 | captured piece (`index + 1`, 0 = none)   |
/// | 18-20 | promotion piece (`index + 1`, 0 = none)  |
///
/// A move only means something relative to the board it was generated on.
/// Castling is a king move of two files; en passant is a pawn capture whose
/// destination is the board's en-passant target. Two moves are equal exactly
/// when all five fields are equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    /// Placeholder that no generator ever produces.
    pub const NULL: Move = Move(0);

    /// Packs all five fields.
    #[inline]
    pub const fn new(
        from: Square,
        to: Square,
        piece: Piece,
        captured: Option<Piece>,
        promotion: Option<Piece>,
    ) -> Self {
        Move(
            ((from.index() as u32) << FROM_SHIFT)
                | ((to.index() as u32) << TO_SHIFT)
                | (piece_code(Some(piece)) << PIECE_SHIFT)
                | (piece_code(captured) << CAPTURED_SHIFT)
                | (piece_code(promotion) << PROMOTION_SHIFT),
        )
    }

    /// A non-capturing, non-promoting move.
    #[inline]
    pub const fn quiet(from: Square, to: Square, piece: Piece) -> Self {
        Self::new(from, to, piece, None, None)
    }

    #[inline]
    pub const fn from(self) -> Square {
        Square::from_index_masked(((self.0 >> FROM_SHIFT) & SQUARE_MASK) as u8)
    }

    #[inline]
    pub const fn to(self) -> Square {
        Square::from_index_masked(((self.0 >> TO_SHIFT) & SQUARE_MASK) as u8)
    }

    /// The piece being moved.
    ///
    /// Every constructor stores a piece here; only [`Move::NULL`] holds code
    /// zero, which decodes as a pawn.
    #[inline]
    pub const fn piece(self) -> Piece {
        match decode_piece((self.0 >> PIECE_SHIFT) & PIECE_MASK) {
            Some(piece) => piece,
            None => Piece::Pawn,
        }
    }

    #[inline]
    pub const fn captured(self) -> Option<Piece> {
        decode_piece((self.0 >> CAPTURED_SHIFT) & PIECE_MASK)
    }

    #[inline]
    pub const fn promotion(self) -> Option<Piece> {
        decode_piece((self.0 >> PROMOTION_SHIFT) & PIECE_MASK)
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.captured().is_some()
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion().is_some()
    }

    /// True for a king move spanning two files.
    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self.piece(), Piece::King) && self.from().file_distance(self.to()) == 2
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// The packed representation.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Long algebraic notation (`"e2e4"`, `"a7a8q"`).
    pub fn to_uci(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(promotion) = self.promotion() {
            write!(f, "{}", promotion.to_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {}", self, self.piece())?;
        if let Some(captured) = self.captured() {
            write!(f, "x{}", captured)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn field_layout() {
        let m = Move::new(sq("b7"), sq("a8"), Piece::Pawn, Some(Piece::Rook), Some(Piece::Queen));
        let raw = m.raw();
        assert_eq!(raw & 0x3F, 49);
        assert_eq!((raw >> 6) & 0x3F, 56);
        assert_eq!((raw >> 12) & 7, 1);
        assert_eq!((raw >> 15) & 7, 4);
        assert_eq!((raw >> 18) & 7, 5);
        assert!(raw < 1 << 21);
    }

    #[test]
    fn quiet_move_has_no_extras() {
        let m = Move::quiet(sq("g1"), sq("f3"), Piece::Knight);
        assert_eq!(m.piece(), Piece::Knight);
        assert_eq!(m.captured(), None);
        assert_eq!(m.promotion(), None);
        assert!(!m.is_capture());
        assert!(!m.is_castle());
    }

    #[test]
    fn castle_detection() {
        assert!(Move::quiet(Square::E1, Square::G1, Piece::King).is_castle());
        assert!(Move::quiet(Square::E8, Square::C8, Piece::King).is_castle());
        assert!(!Move::quiet(Square::E1, Square::F1, Piece::King).is_castle());
        assert!(!Move::quiet(Square::A1, Square::C1, Piece::Rook).is_castle());
    }

    #[test]
    fn uci_text() {
        assert_eq!(Move::quiet(sq("e2"), sq("e4"), Piece::Pawn).to_uci(), "e2e4");
        let promo = Move::new(sq("a7"), sq("a8"), Piece::Pawn, None, Some(Piece::Knight));
        assert_eq!(promo.to_uci(), "a7a8n");
        assert_eq!(Move::NULL.to_string(), "0000");
    }

    #[test]
    fn debug_shows_capture() {
        let m = Move::new(sq("e4"), sq("d5"), Piece::Pawn, Some(Piece::Pawn), None);
        assert_eq!(format!("{:?}", m), "Move(e4d5 pawnxpawn)");
    }

    #[test]
    fn equality_needs_every_field() {
        let a = Move::new(sq("e4"), sq("d5"), Piece::Pawn, Some(Piece::Pawn), None);
        let b = Move::new(sq("e4"), sq("d5"), Piece::Pawn, Some(Piece::Knight), None);
        let c = Move::new(sq("e4"), sq("d5"), Piece::Pawn, Some(Piece::Pawn), None);
        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    fn any_piece() -> impl Strategy<Value = Piece> {
        (0usize..6).prop_map(|i| Piece::ALL[i])
    }

    proptest! {
        #[test]
        fn encode_decode_roundtrip(
            from in 0u8..64,
            to in 0u8..64,
            piece in any_piece(),
            captured in proptest::option::of(any_piece()),
            promotion in proptest::option::of(any_piece()),
        ) {
            let from = Square::from_index(from).unwrap();
            let to = Square::from_index(to).unwrap();
            let m = Move::new(from, to, piece, captured, promotion);
            prop_assert_eq!(m.from(), from);
            prop_assert_eq!(m.to(), to);
            prop_assert_eq!(m.piece(), piece);
            prop_assert_eq!(m.captured(), captured);
            prop_assert_eq!(m.promotion(), promotion);
        }
    }
}
