//! Perft (performance test) for move generator validation.
//!
//! Perft counts the leaf nodes of the legal move tree to a fixed depth, which
//! can be compared against published values.

use crate::Board;
use chess_core::Move;

/// Counts the leaf nodes `depth` plies below `board`.
///
/// The board is walked with make/unmake and is unchanged on return. At depth
/// one the legal move count is returned directly.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let side = board.side_to_move();
    let moves = board.legal_moves(side);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for &m in &moves {
        board.make_move(m);
        nodes += perft(board, depth - 1);
        board.unmake_move();
    }
    nodes
}

/// Leaf counts below each root move, sorted by long algebraic notation.
///
/// Useful for bisecting a wrong total against a reference generator.
pub fn perft_divide(board: &mut Board, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let side = board.side_to_move();
    let moves = board.legal_moves(side);
    let mut results = Vec::with_capacity(moves.len());

    for &m in &moves {
        let mut child = board.scoped(m);
        let nodes = perft(&mut child, depth - 1);
        results.push((child.mv(), nodes));
    }

    results.sort_by_key(|(m, _)| m.to_uci());
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_zero_is_one_node() {
        assert_eq!(perft(&mut Board::new_initial(), 0), 1);
        assert!(perft_divide(&mut Board::new_initial(), 0).is_empty());
    }

    #[test]
    fn startpos_shallow() {
        let mut board = Board::new_initial();
        assert_eq!(perft(&mut board, 1), 20);
        assert_eq!(perft(&mut board, 2), 400);
        assert_eq!(board, Board::new_initial());
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut board = Board::new_initial();
        let results = perft_divide(&mut board, 2);
        assert_eq!(results.len(), 20);
        assert!(results.iter().all(|(_, n)| *n == 20));
        let total: u64 = results.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 400);
        assert_eq!(results[0].0.to_uci(), "a2a3");
        assert_eq!(board, Board::new_initial());
    }
}
