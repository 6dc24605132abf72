//! Leaper attack tables (king, knight, pawn), built at compile time.

use crate::Bitboard;
use chess_core::{Color, Square};

pub use super::magics::{bishop_attacks, queen_attacks, rook_attacks};

/// (file, rank) steps of a knight.
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// (file, rank) steps of a king.
const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Captures of a white pawn.
const WHITE_PAWN_OFFSETS: [(i8, i8); 2] = [(-1, 1), (1, 1)];

const KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table(&KNIGHT_OFFSETS);
const KING_ATTACKS: [Bitboard; 64] = leaper_table(&KING_OFFSETS);
const PAWN_ATTACKS: [[Bitboard; 64]; 2] = pawn_tables();

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Squares a pawn of `color` standing on `sq` attacks.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

/// One bitboard per square: every on-board square reached by a single offset.
const fn leaper_table(offsets: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;
    while sq < 64 {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8;
        let mut bits = 0u64;
        let mut i = 0;
        while i < offsets.len() {
            let (df, dr) = offsets[i];
            let f = file + df;
            let r = rank + dr;
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                bits |= 1u64 << (r * 8 + f);
            }
            i += 1;
        }
        table[sq as usize] = Bitboard(bits);
        sq += 1;
    }
    table
}

/// Black's table is White's mirrored top to bottom.
const fn pawn_tables() -> [[Bitboard; 64]; 2] {
    let white = leaper_table(&WHITE_PAWN_OFFSETS);
    let mut black = [Bitboard::EMPTY; 64];
    let mut sq = 0usize;
    while sq < 64 {
        black[sq] = white[sq ^ 56].flip_vertical();
        sq += 1;
    }
    [white, black]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn squares(names: &[&str]) -> Bitboard {
        names.iter().map(|n| sq(n)).collect()
    }

    #[test]
    fn knight_centre_and_corner() {
        assert_eq!(knight_attacks(sq("d4")).count(), 8);
        assert_eq!(knight_attacks(Square::A1), squares(&["b3", "c2"]));
        assert_eq!(knight_attacks(Square::H8), squares(&["g6", "f7"]));
    }

    #[test]
    fn king_centre_and_edges() {
        assert_eq!(king_attacks(sq("e4")).count(), 8);
        assert_eq!(king_attacks(Square::A1), squares(&["a2", "b1", "b2"]));
        assert_eq!(king_attacks(sq("h5")).count(), 5);
    }

    #[test]
    fn pawn_attacks_per_color() {
        assert_eq!(pawn_attacks(sq("e4"), Color::White), squares(&["d5", "f5"]));
        assert_eq!(pawn_attacks(sq("e4"), Color::Black), squares(&["d3", "f3"]));
        assert_eq!(pawn_attacks(sq("a2"), Color::White), squares(&["b3"]));
        assert_eq!(pawn_attacks(sq("h7"), Color::Black), squares(&["g6"]));
        assert!(pawn_attacks(sq("c8"), Color::White).is_empty());
        assert!(pawn_attacks(sq("c1"), Color::Black).is_empty());
    }

    #[test]
    fn leaper_tables_are_symmetric() {
        for a in Square::all() {
            for b in knight_attacks(a) {
                assert!(knight_attacks(b).contains(a));
            }
            for b in king_attacks(a) {
                assert!(king_attacks(b).contains(a));
            }
            for b in pawn_attacks(a, Color::White) {
                assert!(pawn_attacks(b, Color::Black).contains(a));
            }
        }
    }
}
