//! Move application and reversal.

use super::Board;
use crate::{Bitboard, MoveError};
use chess_core::{CastleWing, Color, Move, Piece, Square};

/// Everything `unmake_move` needs that the move itself does not carry.
///
/// Castling rights are snapshotted separately in the board's rights history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Undo {
    pub(crate) mv: Move,
    /// The captured piece and the square it stood on (differs from the
    /// destination for en passant).
    pub(crate) capture: Option<(Piece, Square)>,
    pub(crate) en_passant_target: Option<Square>,
    pub(crate) halfmove_clock: u32,
}

/// Fixed squares involved in one castle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CastlePath {
    pub(crate) king_from: Square,
    pub(crate) king_to: Square,
    pub(crate) rook_from: Square,
    pub(crate) rook_to: Square,
    /// Squares that must be empty.
    pub(crate) between: Bitboard,
    /// Squares the king stands on or crosses; none may be attacked.
    pub(crate) king_walk: Bitboard,
}

const fn squares(indices: &[u8]) -> Bitboard {
    let mut bits = 0u64;
    let mut i = 0;
    while i < indices.len() {
        bits |= 1u64 << indices[i];
        i += 1;
    }
    Bitboard(bits)
}

/// Indexed by `[color][wing]`, kingside first.
static CASTLE_PATHS: [[CastlePath; 2]; 2] = [
    [
        CastlePath {
            king_from: Square::E1,
            king_to: Square::G1,
            rook_from: Square::H1,
            rook_to: Square::F1,
            between: squares(&[5, 6]),
            king_walk: squares(&[4, 5, 6]),
        },
        CastlePath {
            king_from: Square::E1,
            king_to: Square::C1,
            rook_from: Square::A1,
            rook_to: Square::D1,
            between: squares(&[1, 2, 3]),
            king_walk: squares(&[2, 3, 4]),
        },
    ],
    [
        CastlePath {
            king_from: Square::E8,
            king_to: Square::G8,
            rook_from: Square::H8,
            rook_to: Square::F8,
            between: squares(&[61, 62]),
            king_walk: squares(&[60, 61, 62]),
        },
        CastlePath {
            king_from: Square::E8,
            king_to: Square::C8,
            rook_from: Square::A8,
            rook_to: Square::D8,
            between: squares(&[57, 58, 59]),
            king_walk: squares(&[58, 59, 60]),
        },
    ],
];

impl CastlePath {
    #[inline]
    pub(crate) fn get(color: Color, wing: CastleWing) -> &'static CastlePath {
        let wing_index = match wing {
            CastleWing::Kingside => 0,
            CastleWing::Queenside => 1,
        };
        &CASTLE_PATHS[color.index()][wing_index]
    }

    /// The path whose king lands on `king_to`.
    fn for_destination(color: Color, king_to: Square) -> Option<&'static CastlePath> {
        CastleWing::ALL
            .into_iter()
            .map(|wing| Self::get(color, wing))
            .find(|path| path.king_to == king_to)
    }
}

/// Square one rank behind `target` from `mover`'s point of view.
#[inline]
fn behind(target: Square, mover: Color) -> Square {
    Square::from_index_masked((target.index() as i8 - mover.pawn_push()) as u8)
}

impl Board {
    /// Applies `m` for the side to move.
    ///
    /// The move must come from this board's generator (or be equivalent).
    ///
    /// # Panics
    ///
    /// Panics if the origin does not hold the mover's `m.piece()`, or the
    /// destination does not hold `m.captured()` (the pawn behind the
    /// en-passant target for an en-passant capture). Castles need their rook
    /// and an empty path; promotions need a pawn landing on the last rank.
    /// Legality is not checked; use [`try_make_move`](Self::try_make_move)
    /// for untrusted moves.
    pub fn make_move(&mut self, m: Move) {
        let us = self.side_to_move;
        let them = !us;
        let from = m.from();
        let to = m.to();
        let piece = m.piece();

        assert!(
            self.piece_at(from) == Some(piece) && self.color_at(from) == Some(us),
            "cannot apply {m:?}: {from} does not hold a {us} {piece}"
        );
        let capture = self.capture_square(m, us);
        self.check_castle_and_promotion(m, us);

        self.history.push(Undo {
            mv: m,
            capture: m.captured().zip(capture),
            en_passant_target: self.en_passant_target,
            halfmove_clock: self.halfmove_clock,
        });

        if let (Some(captured), Some(sq)) = (m.captured(), capture) {
            self.remove_piece(sq, captured, them);
        }

        self.move_piece(from, to, piece, us);

        if m.is_castle() {
            if let Some(path) = CastlePath::for_destination(us, to) {
                self.move_piece(path.rook_from, path.rook_to, Piece::Rook, us);
            }
        }

        if let Some(promotion) = m.promotion() {
            self.remove_piece(to, Piece::Pawn, us);
            self.put_piece(to, promotion, us);
        }

        self.en_passant_target =
            if piece == Piece::Pawn && from.index().abs_diff(to.index()) == 16 {
                Some(behind(to, us))
            } else {
                None
            };

        let mut rights = self.castling_rights();
        rights.revoke_square(from);
        rights.revoke_square(to);
        self.castling_history.push(rights);

        if piece == Piece::Pawn || m.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = them;
        self.refresh_occupancy();
    }

    /// Where `m`'s capture happens, after checking the destination against
    /// `m.captured()`.
    fn capture_square(&self, m: Move, us: Color) -> Option<Square> {
        let to = m.to();
        let them = !us;
        match m.captured() {
            Some(captured) => {
                let en_passant = m.piece() == Piece::Pawn
                    && self.en_passant_target == Some(to)
                    && self.piece_at(to).is_none();
                let sq = if en_passant { behind(to, us) } else { to };
                assert!(
                    self.piece_at(sq) == Some(captured) && self.color_at(sq) == Some(them),
                    "cannot apply {m:?}: {sq} does not hold a {them} {captured}"
                );
                Some(sq)
            }
            None => {
                assert!(
                    self.piece_at(to).is_none(),
                    "cannot apply {m:?}: {to} is occupied but the move captures nothing"
                );
                None
            }
        }
    }

    /// Asserts that a castle has its rook and a clear path, and that only a
    /// pawn reaching the last rank promotes.
    fn check_castle_and_promotion(&self, m: Move, us: Color) {
        if m.is_castle() {
            let ready = CastlePath::for_destination(us, m.to()).is_some_and(|path| {
                path.king_from == m.from()
                    && self.pieces_of(Piece::Rook, us).contains(path.rook_from)
                    && (self.occupied() & path.between).is_empty()
            });
            assert!(
                ready,
                "cannot apply {m:?}: no {us} castle from {} to {}",
                m.from(),
                m.to()
            );
        }

        let reaches_last_rank =
            m.piece() == Piece::Pawn && m.to().rank() == us.promotion_rank();
        match m.promotion() {
            Some(promotion) => assert!(
                reaches_last_rank && promotion.is_promotion_target(),
                "cannot apply {m:?}: only a pawn reaching the last rank promotes"
            ),
            None => assert!(
                !reaches_last_rank,
                "cannot apply {m:?}: a pawn reaching the last rank must promote"
            ),
        }
    }

    /// Reverts the most recent [`make_move`](Self::make_move).
    ///
    /// Returns the move undone, or `None` when there is nothing to undo.
    pub fn unmake_move(&mut self) -> Option<Move> {
        let undo = self.history.pop()?;
        self.castling_history.pop();

        let m = undo.mv;
        let us = !self.side_to_move;
        let from = m.from();
        let to = m.to();

        self.side_to_move = us;
        if us == Color::Black {
            self.fullmove_number -= 1;
        }
        self.halfmove_clock = undo.halfmove_clock;
        self.en_passant_target = undo.en_passant_target;

        if let Some(promotion) = m.promotion() {
            self.remove_piece(to, promotion, us);
            self.put_piece(to, Piece::Pawn, us);
        }

        if m.is_castle() {
            if let Some(path) = CastlePath::for_destination(us, to) {
                self.move_piece(path.rook_to, path.rook_from, Piece::Rook, us);
            }
        }

        self.move_piece(to, from, m.piece(), us);

        if let Some((captured, sq)) = undo.capture {
            self.put_piece(sq, captured, !us);
        }

        self.refresh_occupancy();
        Some(m)
    }

    /// Applies `m` only if it is legal for the side to move.
    pub fn try_make_move(&mut self, m: Move) -> Result<(), MoveError> {
        let side = self.side_to_move;
        if self.legal_moves(side).contains(m) {
            self.make_move(m);
            Ok(())
        } else {
            Err(MoveError::Illegal(m))
        }
    }

    /// The legal move for the side to move matching a square pair and an
    /// optional promotion piece.
    pub fn find_move(&mut self, from: Square, to: Square, promotion: Option<Piece>) -> Option<Move> {
        let side = self.side_to_move;
        self.legal_moves(side)
            .iter()
            .copied()
            .find(|m| m.from() == from && m.to() == to && m.promotion() == promotion)
    }
}
