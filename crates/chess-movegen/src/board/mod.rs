//! Board state.
//!
//! A [`Board`] keeps one bitboard per piece kind, one per side, the derived
//! occupied/empty sets and a mailbox mirror, plus the game-state fields that
//! make/unmake must restore. It is created once and then mutated in place.

mod make;
mod scoped;

pub use scoped::ScopedMove;

pub(crate) use make::{CastlePath, Undo};

use crate::Bitboard;
use chess_core::{CastlingRights, Color, Move, Piece, PlacedPiece, Setup, Square};

/// A chess position with undo history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub(crate) piece_bb: [Bitboard; 6],
    pub(crate) side_bb: [Bitboard; 2],
    pub(crate) occupied_bb: Bitboard,
    pub(crate) empty_bb: Bitboard,
    pub(crate) mailbox: [Option<Piece>; 64],
    pub(crate) king_square: [Option<Square>; 2],
    pub(crate) side_to_move: Color,
    /// One entry per ply plus the initial rights; the last entry is current.
    pub(crate) castling_history: Vec<CastlingRights>,
    pub(crate) en_passant_target: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) history: Vec<Undo>,
}

impl Board {
    /// A board with no pieces, White to move.
    pub fn empty() -> Self {
        Board {
            piece_bb: [Bitboard::EMPTY; 6],
            side_bb: [Bitboard::EMPTY; 2],
            occupied_bb: Bitboard::EMPTY,
            empty_bb: Bitboard::FULL,
            mailbox: [None; 64],
            king_square: [None; 2],
            side_to_move: Color::White,
            castling_history: vec![CastlingRights::NONE],
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            history: Vec::new(),
        }
    }

    /// The standard starting position.
    pub fn new_initial() -> Self {
        let mut board = Board::empty();
        board.piece_bb = [
            Bitboard(0x00FF_0000_0000_FF00),
            Bitboard(0x4200_0000_0000_0042),
            Bitboard(0x2400_0000_0000_0024),
            Bitboard(0x8100_0000_0000_0081),
            Bitboard(0x0800_0000_0000_0008),
            Bitboard(0x1000_0000_0000_0010),
        ];
        board.side_bb = [Bitboard(0x0000_0000_0000_FFFF), Bitboard(0xFFFF_0000_0000_0000)];
        for piece in Piece::ALL {
            for sq in board.piece_bb[piece.index()] {
                board.mailbox[sq.index() as usize] = Some(piece);
            }
        }
        board.king_square = [Some(Square::E1), Some(Square::E8)];
        board.castling_history = vec![CastlingRights::ALL];
        board.refresh_occupancy();
        board
    }

    /// Replaces the placement with `pieces` and resets every other field:
    /// White to move, no castling rights or en-passant target, clocks reset,
    /// history cleared.
    ///
    /// The list is trusted. Two pieces on one square or a missing king are
    /// caught only by debug assertions.
    pub fn set_from_piece_list(&mut self, pieces: &[PlacedPiece]) {
        *self = Board::empty();
        for placed in pieces {
            debug_assert!(
                self.mailbox[placed.square.index() as usize].is_none(),
                "two pieces on {}",
                placed.square
            );
            self.put_piece(placed.square, placed.piece, placed.color);
        }
        self.refresh_occupancy();
        debug_assert!(self.is_consistent(), "inconsistent piece list");
    }

    /// Builds a board from a full setup record.
    pub fn from_setup(setup: &Setup) -> Self {
        let mut board = Board::empty();
        board.set_from_piece_list(&setup.pieces);
        board.side_to_move = setup.side_to_move;
        board.castling_history = vec![setup.castling];
        board.en_passant_target = setup.en_passant;
        board.halfmove_clock = setup.halfmove_clock;
        board.fullmove_number = setup.fullmove_number;
        board
    }

    /// The current placement and state as a setup record.
    pub fn to_setup(&self) -> Setup {
        let pieces = Square::all()
            .filter_map(|sq| {
                let piece = self.piece_at(sq)?;
                let color = self.color_at(sq)?;
                Some(PlacedPiece::new(sq, piece, color))
            })
            .collect();
        Setup {
            pieces,
            side_to_move: self.side_to_move,
            castling: self.castling_rights(),
            en_passant: self.en_passant_target,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    #[inline]
    pub fn piece_bb(&self, piece: Piece) -> Bitboard {
        self.piece_bb[piece.index()]
    }

    #[inline]
    pub fn side_bb(&self, color: Color) -> Bitboard {
        self.side_bb[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied_bb
    }

    #[inline]
    pub fn empty_squares(&self) -> Bitboard {
        self.empty_bb
    }

    /// Pieces of one kind and one side.
    #[inline]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.piece_bb[piece.index()] & self.side_bb[color.index()]
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.mailbox[sq.index() as usize]
    }

    #[inline]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        if self.side_bb[Color::White.index()].contains(sq) {
            Some(Color::White)
        } else if self.side_bb[Color::Black.index()].contains(sq) {
            Some(Color::Black)
        } else {
            None
        }
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_history
            .last()
            .copied()
            .unwrap_or(CastlingRights::NONE)
    }

    #[inline]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.king_square[color.index()]
    }

    /// Number of moves that can be unmade.
    #[inline]
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|undo| undo.mv)
    }

    /// Checks every structural invariant between the redundant fields.
    pub fn is_consistent(&self) -> bool {
        let [white, black] = self.side_bb;
        if (white & black).is_not_empty()
            || self.occupied_bb != (white | black)
            || self.empty_bb != !self.occupied_bb
            || (self.occupied_bb & self.empty_bb).is_not_empty()
            || (self.occupied_bb | self.empty_bb) != Bitboard::FULL
        {
            return false;
        }

        let mut seen = Bitboard::EMPTY;
        for bb in self.piece_bb {
            if (seen & bb).is_not_empty() {
                return false;
            }
            seen |= bb;
        }
        if seen != self.occupied_bb {
            return false;
        }

        let mailbox_agrees = Square::all().all(|sq| {
            let from_bitboards = Piece::ALL
                .into_iter()
                .find(|p| self.piece_bb[p.index()].contains(sq));
            self.piece_at(sq) == from_bitboards
        });
        let kings_agree = Color::ALL
            .into_iter()
            .all(|c| self.king_square(c) == self.pieces_of(Piece::King, c).lsb());

        mailbox_agrees
            && kings_agree
            && self.castling_history.len() == self.history.len() + 1
    }

    pub(crate) fn put_piece(&mut self, sq: Square, piece: Piece, color: Color) {
        self.piece_bb[piece.index()].set(sq);
        self.side_bb[color.index()].set(sq);
        self.mailbox[sq.index() as usize] = Some(piece);
        if piece == Piece::King {
            self.king_square[color.index()] = Some(sq);
        }
    }

    pub(crate) fn remove_piece(&mut self, sq: Square, piece: Piece, color: Color) {
        self.piece_bb[piece.index()].clear(sq);
        self.side_bb[color.index()].clear(sq);
        self.mailbox[sq.index() as usize] = None;
        if piece == Piece::King && self.king_square[color.index()] == Some(sq) {
            self.king_square[color.index()] = None;
        }
    }

    pub(crate) fn move_piece(&mut self, from: Square, to: Square, piece: Piece, color: Color) {
        let both = Bitboard::from_square(from) | Bitboard::from_square(to);
        self.piece_bb[piece.index()] ^= both;
        self.side_bb[color.index()] ^= both;
        self.mailbox[from.index() as usize] = None;
        self.mailbox[to.index() as usize] = Some(piece);
        if piece == Piece::King {
            self.king_square[color.index()] = Some(to);
        }
    }

    #[inline]
    pub(crate) fn refresh_occupancy(&mut self) {
        self.occupied_bb = self.side_bb[0] | self.side_bb[1];
        self.empty_bb = !self.occupied_bb;
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new_initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{parse_setup, FenParser};

    #[test]
    fn initial_position_matches_fen() {
        let from_fen = Board::from_setup(&parse_setup(FenParser::STARTPOS).unwrap());
        assert_eq!(Board::new_initial(), from_fen);
    }

    #[test]
    fn initial_position_layout() {
        let board = Board::new_initial();
        assert!(board.is_consistent());
        assert_eq!(board.occupied().count(), 32);
        assert_eq!(board.empty_squares().count(), 32);
        assert_eq!(board.piece_at(Square::D1), Some(Piece::Queen));
        assert_eq!(board.color_at(Square::D8), Some(Color::Black));
        assert_eq!(board.king_square(Color::White), Some(Square::E1));
        assert_eq!(board.king_square(Color::Black), Some(Square::E8));
        assert_eq!(board.castling_rights(), CastlingRights::ALL);
        assert_eq!(board.pieces_of(Piece::Pawn, Color::Black).count(), 8);
        assert_eq!(board.ply(), 0);
        assert_eq!(board.last_move(), None);
    }

    #[test]
    fn piece_list_resets_state() {
        let mut board = Board::new_initial();
        let e4 = Square::from_algebraic("e4").unwrap();
        board.set_from_piece_list(&[
            PlacedPiece::new(Square::E1, Piece::King, Color::White),
            PlacedPiece::new(Square::E8, Piece::King, Color::Black),
            PlacedPiece::new(e4, Piece::Knight, Color::White),
        ]);
        assert!(board.is_consistent());
        assert_eq!(board.occupied().count(), 3);
        assert_eq!(board.piece_at(e4), Some(Piece::Knight));
        assert_eq!(board.side_to_move(), Color::White);
        assert_eq!(board.castling_rights(), CastlingRights::NONE);
        assert_eq!(board.en_passant_target(), None);
    }

    #[test]
    fn setup_roundtrip() {
        let setup =
            parse_setup("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R b Kq - 7 31")
                .unwrap();
        let board = Board::from_setup(&setup);
        assert!(board.is_consistent());
        assert_eq!(board.side_to_move(), Color::Black);
        assert_eq!(board.halfmove_clock(), 7);
        assert_eq!(board.fullmove_number(), 31);
        let rebuilt = Board::from_setup(&board.to_setup());
        assert_eq!(rebuilt, board);
        assert_eq!(board.to_setup().pieces.len(), setup.pieces.len());
    }

    #[test]
    fn inconsistent_board_is_detected() {
        let mut board = Board::new_initial();
        board.mailbox[Square::E1.index() as usize] = Some(Piece::Queen);
        assert!(!board.is_consistent());

        let mut board = Board::new_initial();
        board.empty_bb = Bitboard::EMPTY;
        assert!(!board.is_consistent());
    }
}
