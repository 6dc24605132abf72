//! Perft counts for the standard validation positions.
//!
//! The deepest runs are ignored by default; run them with
//! `cargo test --release -p chess-movegen --test perft -- --ignored`.

use chess_core::parse_setup;
use chess_movegen::{perft, perft_divide, Board};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -";
const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -";
const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq -";
const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ -";

fn board(fen: &str) -> Board {
    Board::from_setup(&parse_setup(fen).expect("test FEN is valid"))
}

fn assert_perft(mut board: Board, expected: &[u64]) {
    let before = board.clone();
    for (depth, &nodes) in expected.iter().enumerate() {
        let depth = depth as u32 + 1;
        assert_eq!(perft(&mut board, depth), nodes, "depth {depth}");
    }
    assert_eq!(board, before, "perft must leave the board untouched");
}

#[test]
fn startpos() {
    assert_perft(Board::new_initial(), &[20, 400, 8_902]);
}

#[test]
#[ignore = "slow in debug builds"]
fn startpos_deep() {
    let mut board = Board::new_initial();
    assert_eq!(perft(&mut board, 4), 197_281);
    assert_eq!(perft(&mut board, 5), 4_865_609);
}

#[test]
fn kiwipete() {
    assert_perft(board(KIWIPETE), &[48, 2_039]);
}

#[test]
#[ignore = "slow in debug builds"]
fn kiwipete_deep() {
    assert_eq!(perft(&mut board(KIWIPETE), 3), 97_862);
}

#[test]
fn position_3() {
    assert_perft(board(POSITION_3), &[14, 191, 2_812]);
}

#[test]
fn position_4() {
    assert_perft(board(POSITION_4), &[6, 264, 9_467]);
}

#[test]
fn position_5() {
    assert_perft(board(POSITION_5), &[44, 1_486]);
}

#[test]
#[ignore = "slow in debug builds"]
fn position_5_deep() {
    assert_eq!(perft(&mut board(POSITION_5), 3), 62_379);
}

#[test]
fn mirrored_position_4_matches() {
    let mirrored = board("r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ -");
    assert_perft(mirrored, &[6, 264, 9_467]);
}

#[test]
fn divide_matches_kiwipete_totals() {
    let mut b = board(KIWIPETE);
    let divide = perft_divide(&mut b, 2);
    assert_eq!(divide.len(), 48);
    assert_eq!(divide.iter().map(|(_, n)| n).sum::<u64>(), 2_039);

    let castle = divide
        .iter()
        .find(|(m, _)| m.to_uci() == "e1g1")
        .expect("kingside castle is legal");
    assert_eq!(castle.1, 43);
}
