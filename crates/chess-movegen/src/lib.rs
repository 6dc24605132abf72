//! Bitboard chess move generation.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit square sets with shift, scan and flip primitives
//! - Attack tables for leapers and magic-bitboard tables for sliders, with a
//!   data file format for storing them
//! - [`Board`] - position state mutated in place by make/unmake
//! - Legal move generation, check detection, [`ScopedMove`] and [`perft`]
//!
//! # Architecture
//!
//! Every piece kind and side has its own bitboard; a mailbox mirrors the
//! placement so captures can be recorded in the packed [`Move`]. Legal moves
//! are the pseudo-legal moves that do not leave the mover in check, found by
//! make, test, unmake on the one board.
//!
//! The crate never parses notation. Positions come in as
//! [`chess_core::Setup`] records, typically from [`chess_core::parse_setup`].
//!
//! # Example
//!
//! ```
//! use chess_core::parse_setup;
//! use chess_movegen::{perft, Board};
//!
//! let mut board = Board::new_initial();
//! let moves = board.legal_moves(board.side_to_move());
//! assert_eq!(moves.len(), 20);
//! assert_eq!(perft(&mut board, 2), 400);
//!
//! let setup = parse_setup("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
//! let mut board = Board::from_setup(&setup);
//! assert!(!board.in_check(board.side_to_move()));
//! ```
//!
//! [`Move`]: chess_core::Move

mod bitboard;
mod board;
mod error;
pub mod movegen;
mod status;

pub use bitboard::{Bitboard, BitboardIter};
pub use board::{Board, ScopedMove};
pub use error::{MoveError, TableError};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{
    attack_tables, bishop_attacks, init_attack_tables, king_attacks, knight_attacks,
    pawn_attacks, queen_attacks, rook_attacks, store_attack_tables, AttackTables, MoveList,
    Slider, TableSource,
};
pub use status::{GameStatus, FIFTY_MOVE_PLIES};
