//! Game status derived from the legal move list.

use crate::Board;
use chess_core::Color;

/// Halfmove clock value at which the fifty-move rule applies.
pub const FIFTY_MOVE_PLIES: u32 = 100;

/// Whether the game can go on from a position, and if not, why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
    /// A hundred plies without a capture or pawn move.
    FiftyMoveRule,
}

impl GameStatus {
    #[inline]
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }
}

impl Board {
    /// Status for the side to move.
    ///
    /// Mate and stalemate take precedence over the fifty-move rule.
    pub fn status(&mut self) -> GameStatus {
        let side = self.side_to_move();
        if self.legal_moves(side).is_empty() {
            if self.in_check(side) {
                GameStatus::Checkmate { winner: !side }
            } else {
                GameStatus::Stalemate
            }
        } else if self.halfmove_clock() >= FIFTY_MOVE_PLIES {
            GameStatus::FiftyMoveRule
        } else {
            GameStatus::Ongoing
        }
    }

    pub fn is_checkmate(&mut self) -> bool {
        matches!(self.status(), GameStatus::Checkmate { .. })
    }

    pub fn is_stalemate(&mut self) -> bool {
        self.status() == GameStatus::Stalemate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::parse_setup;

    fn board(fen: &str) -> Board {
        Board::from_setup(&parse_setup(fen).unwrap())
    }

    #[test]
    fn fresh_game_is_ongoing() {
        let mut b = Board::new_initial();
        assert_eq!(b.status(), GameStatus::Ongoing);
        assert!(!b.status().is_over());
    }

    #[test]
    fn fools_mate() {
        let mut b = board("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert_eq!(b.status(), GameStatus::Checkmate { winner: Color::Black });
        assert!(b.is_checkmate());
        assert!(!b.is_stalemate());
    }

    #[test]
    fn cornered_king_stalemate() {
        let mut b = board("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(b.status(), GameStatus::Stalemate);
        assert!(b.is_stalemate());
    }

    #[test]
    fn fifty_move_rule() {
        let mut b = board("4k3/8/8/8/8/8/8/4K2R w - - 100 80");
        assert_eq!(b.status(), GameStatus::FiftyMoveRule);
        let mut b = board("4k3/8/8/8/8/8/8/4K2R w - - 99 80");
        assert_eq!(b.status(), GameStatus::Ongoing);
    }

    #[test]
    fn mate_beats_the_fifty_move_rule() {
        let mut b = board("R5k1/5ppp/8/8/8/8/8/6K1 b - - 120 90");
        assert_eq!(b.status(), GameStatus::Checkmate { winner: Color::White });
    }
}
