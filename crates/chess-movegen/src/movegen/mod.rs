//! Move generation.
//!
//! Pseudo-legal moves come from one generator per piece kind, dispatched
//! through a table indexed by [`Piece::index`]. Legal moves are the
//! pseudo-legal ones that survive make, check test, unmake.

mod attacks;
mod magics;
pub mod perft;
mod storage;

use crate::board::CastlePath;
use crate::{Bitboard, Board};
use chess_core::{CastleWing, Color, Move, Piece, Square};

pub use attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
};
pub use magics::{attack_tables, init_attack_tables, AttackTables, Magic, Slider, TableSource};
pub use storage::{store_attack_tables, TABLE_FILE_LEN};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of moves the list can hold.
    pub const MAX_MOVES: usize = 256;

    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[inline]
    pub fn contains(&self, m: Move) -> bool {
        self.as_slice().contains(&m)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Per-call view of the board from the generating side.
struct Targets {
    us: Color,
    them: Color,
    own: Bitboard,
    enemy: Bitboard,
    empty: Bitboard,
    occupied: Bitboard,
    en_passant: Option<Square>,
}

type Generator = fn(&Board, &Targets, &mut MoveList);

/// Indexed by [`Piece::index`].
const GENERATORS: [Generator; 6] = [
    pawn_moves,
    knight_moves,
    bishop_moves,
    rook_moves,
    queen_moves,
    king_moves,
];

impl Board {
    /// Moves for `side` that obey piece movement and occupancy, ignoring
    /// whether they leave `side`'s king attacked.
    ///
    /// When `side` is not the side to move, it is treated as `side`'s turn
    /// with no en-passant target.
    pub fn pseudo_legal_moves(&self, side: Color) -> MoveList {
        let targets = Targets {
            us: side,
            them: !side,
            own: self.side_bb(side),
            enemy: self.side_bb(!side),
            empty: self.empty_bb,
            occupied: self.occupied_bb,
            en_passant: if side == self.side_to_move {
                self.en_passant_target
            } else {
                None
            },
        };
        let mut moves = MoveList::new();
        for piece in Piece::ALL {
            GENERATORS[piece.index()](self, &targets, &mut moves);
        }
        moves
    }

    /// Legal moves for `side`, recomputed on every call.
    ///
    /// Each pseudo-legal move is made, tested for leaving the mover in check
    /// and unmade, so the board is unchanged on return.
    pub fn legal_moves(&mut self, side: Color) -> MoveList {
        if side != self.side_to_move {
            let saved_side = self.side_to_move;
            let saved_en_passant = self.en_passant_target.take();
            self.side_to_move = side;
            let moves = self.legal_moves(side);
            self.side_to_move = saved_side;
            self.en_passant_target = saved_en_passant;
            return moves;
        }

        let mut moves = self.pseudo_legal_moves(side);
        moves.retain(|&m| {
            self.make_move(m);
            let legal = !self.in_check(side);
            self.unmake_move();
            legal
        });
        moves
    }

    /// True if `side`'s king is attacked. A side without a king is never in
    /// check.
    pub fn in_check(&self, side: Color) -> bool {
        self.king_square(side)
            .is_some_and(|king| self.is_square_attacked(king, !side))
    }

    /// True if any piece of `by` attacks `sq` given the current occupancy.
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        let occupied = self.occupied_bb;
        let queens = self.pieces_of(Piece::Queen, by);

        (pawn_attacks(sq, !by) & self.pieces_of(Piece::Pawn, by)).is_not_empty()
            || (knight_attacks(sq) & self.pieces_of(Piece::Knight, by)).is_not_empty()
            || (king_attacks(sq) & self.pieces_of(Piece::King, by)).is_not_empty()
            || (bishop_attacks(sq, occupied) & (self.pieces_of(Piece::Bishop, by) | queens))
                .is_not_empty()
            || (rook_attacks(sq, occupied) & (self.pieces_of(Piece::Rook, by) | queens))
                .is_not_empty()
    }

    /// Every square attacked by `side`, own pieces included.
    pub fn attacks_by(&self, side: Color) -> Bitboard {
        let occupied = self.occupied_bb;
        let pawns = self.pieces_of(Piece::Pawn, side);
        let mut attacks = match side {
            Color::White => pawns.north_east() | pawns.north_west(),
            Color::Black => pawns.south_east() | pawns.south_west(),
        };
        for sq in self.pieces_of(Piece::Knight, side) {
            attacks |= knight_attacks(sq);
        }
        for sq in self.pieces_of(Piece::King, side) {
            attacks |= king_attacks(sq);
        }
        let queens = self.pieces_of(Piece::Queen, side);
        for sq in self.pieces_of(Piece::Bishop, side) | queens {
            attacks |= bishop_attacks(sq, occupied);
        }
        for sq in self.pieces_of(Piece::Rook, side) | queens {
            attacks |= rook_attacks(sq, occupied);
        }
        attacks
    }
}

/// Origin of a pawn move that landed on `to` after moving `delta` squares.
#[inline]
fn pawn_origin(to: Square, delta: i8) -> Square {
    Square::from_index_masked((to.index() as i8 - delta) as u8)
}

/// Pushes one move per destination, with the four promotions when the
/// destination is on the last rank.
fn push_pawn_moves(
    board: &Board,
    destinations: Bitboard,
    delta: i8,
    last_rank: Bitboard,
    moves: &mut MoveList,
) {
    for to in destinations {
        let from = pawn_origin(to, delta);
        let captured = board.piece_at(to);
        if last_rank.contains(to) {
            for promotion in Piece::PROMOTIONS {
                moves.push(Move::new(from, to, Piece::Pawn, captured, Some(promotion)));
            }
        } else {
            moves.push(Move::new(from, to, Piece::Pawn, captured, None));
        }
    }
}

fn pawn_moves(board: &Board, t: &Targets, moves: &mut MoveList) {
    let pawns = board.pieces_of(Piece::Pawn, t.us);
    if pawns.is_empty() {
        return;
    }
    let push = t.us.pawn_push();

    let start = pawns & Bitboard::rank(t.us.pawn_rank());
    let last_rank = Bitboard::rank(t.us.promotion_rank());

    let (single, double) = match t.us {
        Color::White => (
            pawns.north() & t.empty,
            (start.north() & t.empty).north() & t.empty,
        ),
        Color::Black => (
            pawns.south() & t.empty,
            (start.south() & t.empty).south() & t.empty,
        ),
    };
    push_pawn_moves(board, single, push, last_rank, moves);
    push_pawn_moves(board, double, 2 * push, last_rank, moves);

    let (left, right) = match t.us {
        Color::White => ((pawns.north_west(), 7), (pawns.north_east(), 9)),
        Color::Black => ((pawns.south_west(), -9), (pawns.south_east(), -7)),
    };
    for (shifted, delta) in [left, right] {
        push_pawn_moves(board, shifted & t.enemy, delta, last_rank, moves);
    }

    if let Some(target) = t.en_passant {
        let victim = pawn_origin(target, push);
        if board.pieces_of(Piece::Pawn, t.them).contains(victim) && !t.occupied.contains(target) {
            for from in pawn_attacks(target, t.them) & pawns {
                moves.push(Move::new(from, target, Piece::Pawn, Some(Piece::Pawn), None));
            }
        }
    }
}

/// Moves from every `piece` of the side to its attacked squares not held by
/// the side itself.
fn piece_moves(
    board: &Board,
    t: &Targets,
    piece: Piece,
    attacks: impl Fn(Square) -> Bitboard,
    moves: &mut MoveList,
) {
    for from in board.pieces_of(piece, t.us) {
        for to in attacks(from) & !t.own {
            moves.push(Move::new(from, to, piece, board.piece_at(to), None));
        }
    }
}

fn knight_moves(board: &Board, t: &Targets, moves: &mut MoveList) {
    piece_moves(board, t, Piece::Knight, knight_attacks, moves);
}

fn bishop_moves(board: &Board, t: &Targets, moves: &mut MoveList) {
    piece_moves(board, t, Piece::Bishop, |sq| bishop_attacks(sq, t.occupied), moves);
}

fn rook_moves(board: &Board, t: &Targets, moves: &mut MoveList) {
    piece_moves(board, t, Piece::Rook, |sq| rook_attacks(sq, t.occupied), moves);
}

fn queen_moves(board: &Board, t: &Targets, moves: &mut MoveList) {
    piece_moves(board, t, Piece::Queen, |sq| queen_attacks(sq, t.occupied), moves);
}

fn king_moves(board: &Board, t: &Targets, moves: &mut MoveList) {
    piece_moves(board, t, Piece::King, king_attacks, moves);
    castling_moves(board, t, moves);
}

/// Castles need the right, an empty path between king and rook, both pieces
/// on their home squares, and no attacked square on the king's walk.
fn castling_moves(board: &Board, t: &Targets, moves: &mut MoveList) {
    let rights = board.castling_rights();
    for wing in CastleWing::ALL {
        if !rights.has(t.us, wing) {
            continue;
        }
        let path = CastlePath::get(t.us, wing);
        if (path.between & t.occupied).is_not_empty()
            || board.king_square(t.us) != Some(path.king_from)
            || !board.pieces_of(Piece::Rook, t.us).contains(path.rook_from)
        {
            continue;
        }
        if path
            .king_walk
            .into_iter()
            .any(|sq| board.is_square_attacked(sq, t.them))
        {
            continue;
        }
        moves.push(Move::quiet(path.king_from, path.king_to, Piece::King));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::parse_setup;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn board(fen: &str) -> Board {
        Board::from_setup(&parse_setup(fen).unwrap())
    }

    #[test]
    fn movelist_push_and_iterate() {
        let mut list = MoveList::new();
        assert!(list.is_empty());
        let m1 = Move::quiet(sq("e2"), sq("e4"), Piece::Pawn);
        let m2 = Move::quiet(sq("d2"), sq("d4"), Piece::Pawn);
        list.push(m1);
        list.push(m2);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], m1);
        assert_eq!(list[1], m2);
        assert!(list.contains(m2));
        assert_eq!(list.iter().count(), 2);
    }

    #[test]
    fn movelist_retain_and_clear() {
        let mut list = MoveList::default();
        list.push(Move::quiet(sq("e2"), sq("e3"), Piece::Pawn));
        list.push(Move::quiet(sq("e2"), sq("e4"), Piece::Pawn));
        list.push(Move::quiet(sq("e3"), sq("e4"), Piece::Pawn));
        list.retain(|m| m.from() == sq("e2"));
        assert_eq!(list.len(), 2);
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn startpos_has_twenty_moves() {
        let mut b = Board::new_initial();
        let moves = b.legal_moves(Color::White);
        assert_eq!(moves.len(), 20);
        assert_eq!(
            moves.iter().filter(|m| m.piece() == Piece::Knight).count(),
            4
        );
        assert_eq!(b, Board::new_initial());
    }

    #[test]
    fn generating_for_the_other_side_restores_state() {
        let mut b = board("rnbqkbnr/pppp1ppp/8/4pP2/8/8/PPPPP1PP/RNBQKBNR w KQkq e6 0 3");
        let before = b.clone();
        let black = b.legal_moves(Color::Black);
        assert!(black.iter().all(|m| b.color_at(m.from()) == Some(Color::Black)));
        assert_eq!(b, before);
    }

    #[test]
    fn captures_carry_the_victim() {
        let mut b = board("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1");
        let capture = b.find_move(sq("e4"), sq("d5"), None).unwrap();
        assert_eq!(capture.captured(), Some(Piece::Pawn));
        let push = b.find_move(sq("e4"), sq("e5"), None).unwrap();
        assert_eq!(push.captured(), None);
    }

    #[test]
    fn pawn_pushes_are_blocked() {
        let mut b = board("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
        let moves = b.legal_moves(Color::White);
        assert!(moves.iter().all(|m| m.piece() != Piece::Pawn));

        let mut b = board("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1");
        let pawn_moves: Vec<Move> = b
            .legal_moves(Color::White)
            .iter()
            .copied()
            .filter(|m| m.piece() == Piece::Pawn)
            .collect();
        assert_eq!(pawn_moves, vec![Move::quiet(sq("e2"), sq("e3"), Piece::Pawn)]);
    }

    #[test]
    fn black_pawns_move_south() {
        let mut b = board("4k3/4p3/8/8/8/8/8/4K3 b - - 0 1");
        let moves = b.legal_moves(Color::Black);
        assert!(moves.contains(Move::quiet(sq("e7"), sq("e6"), Piece::Pawn)));
        assert!(moves.contains(Move::quiet(sq("e7"), sq("e5"), Piece::Pawn)));
    }

    #[test]
    fn four_promotions_per_destination() {
        let mut b = board("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let moves = b.legal_moves(Color::White);
        let promotions: Vec<Move> = moves.iter().copied().filter(|m| m.is_promotion()).collect();
        assert_eq!(promotions.len(), 8);
        assert_eq!(promotions.iter().filter(|m| m.is_capture()).count(), 4);
        assert!(promotions.iter().all(|m| m.promotion() != Some(Piece::King)));
    }

    #[test]
    fn castling_both_wings() {
        let mut b = board("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        let moves = b.legal_moves(Color::White);
        assert!(moves.contains(Move::quiet(Square::E1, Square::G1, Piece::King)));
        assert!(moves.contains(Move::quiet(Square::E1, Square::C1, Piece::King)));
    }

    #[test]
    fn castling_needs_the_right_and_an_empty_path() {
        let mut b = board("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/RN2K2R w Kkq - 0 1");
        let castles: Vec<Move> = b
            .legal_moves(Color::White)
            .iter()
            .copied()
            .filter(|m| m.is_castle())
            .collect();
        assert_eq!(castles, vec![Move::quiet(Square::E1, Square::G1, Piece::King)]);

        let mut b = board("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w kq - 0 1");
        assert!(b.legal_moves(Color::White).iter().all(|m| !m.is_castle()));
    }

    #[test]
    fn queenside_castle_allows_attacked_b_file() {
        // b1 is attacked but the king never crosses it.
        let mut b = board("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert!(b
            .legal_moves(Color::White)
            .contains(Move::quiet(Square::E1, Square::C1, Piece::King)));
    }

    #[test]
    fn attack_queries() {
        let b = Board::new_initial();
        assert!(b.is_square_attacked(sq("e3"), Color::White));
        assert!(!b.is_square_attacked(sq("e4"), Color::White));
        assert!(b.is_square_attacked(sq("f6"), Color::Black));
        assert!(!b.in_check(Color::White));
        assert!(!b.in_check(Color::Black));

        let white = b.attacks_by(Color::White);
        let third = Bitboard::rank(chess_core::Rank::R3);
        assert_eq!(white & third, third);
        assert!(!white.contains(sq("e4")));
        assert!(white.contains(sq("d1")));
    }

    #[test]
    fn attacks_by_agrees_with_is_square_attacked() {
        let b = board("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        for side in Color::ALL {
            let attacked = b.attacks_by(side);
            for s in Square::all() {
                assert_eq!(attacked.contains(s), b.is_square_attacked(s, side), "{side} {s}");
            }
        }
    }

    #[test]
    fn king_without_a_king_is_never_in_check() {
        let b = board("4k3/8/8/8/8/8/8/r7 w - - 0 1");
        assert!(!b.in_check(Color::White));
    }
}
