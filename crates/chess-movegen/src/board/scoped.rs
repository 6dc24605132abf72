//! Scoped make/unmake.

use super::Board;
use chess_core::Move;
use std::ops::{Deref, DerefMut};

/// A move applied to a borrowed board, undone when the guard drops.
///
/// Guards nest like the moves of a search tree: a child guard borrows its
/// parent mutably, so it always drops first.
///
/// ```
/// use chess_movegen::Board;
///
/// let mut board = Board::new_initial();
/// let moves = board.legal_moves(board.side_to_move());
/// {
///     let child = board.scoped(moves[0]);
///     assert_eq!(child.ply(), 1);
/// }
/// assert_eq!(board, Board::new_initial());
/// ```
pub struct ScopedMove<'a> {
    board: &'a mut Board,
    mv: Move,
}

impl ScopedMove<'_> {
    /// The move this guard applied.
    #[inline]
    pub fn mv(&self) -> Move {
        self.mv
    }
}

impl Deref for ScopedMove<'_> {
    type Target = Board;

    #[inline]
    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for ScopedMove<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for ScopedMove<'_> {
    fn drop(&mut self) {
        debug_assert_eq!(
            self.board.last_move(),
            Some(self.mv),
            "scoped move is not the most recent move on drop"
        );
        self.board.unmake_move();
    }
}

impl Board {
    /// Makes `m` and returns a guard that unmakes it on drop.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`make_move`](Board::make_move).
    pub fn scoped(&mut self, m: Move) -> ScopedMove<'_> {
        self.make_move(m);
        ScopedMove { board: self, mv: m }
    }
}
