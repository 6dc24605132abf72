//! Shared vocabulary for the move generator.
//!
//! This crate provides the types every layer agrees on:
//! - [`Piece`] and [`Color`]
//! - [`Square`], [`File`] and [`Rank`] in little-endian rank-file order
//! - [`Move`], the packed 21-bit move encoding
//! - [`CastlingRights`]
//! - [`Setup`] / [`PlacedPiece`], the piece-list form a board is loaded from
//! - a FEN front-end ([`FenParser`]) that produces a [`Setup`]

mod castling;
mod color;
mod fen;
mod mov;
mod piece;
mod setup;
mod square;

pub use castling::{CastleWing, CastlingRights};
pub use color::Color;
pub use fen::{parse_setup, FenError, FenParser};
pub use mov::Move;
pub use piece::Piece;
pub use setup::{PlacedPiece, Setup};
pub use square::{File, Rank, Square};
