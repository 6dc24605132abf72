//! Error types for table loading and checked move application.

use crate::movegen::Slider;
use chess_core::{Move, Square};
use thiserror::Error;

/// Errors raised while building, loading or storing the sliding attack tables.
///
/// Any of these is fatal for a process that wants to generate moves.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("table file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("table data has {found} bytes, expected {expected}")]
    Truncated { expected: usize, found: usize },

    #[error("{slider} table for {square} disagrees with the ray-marched attack set")]
    Corrupt { slider: Slider, square: Square },

    #[error("{slider} magic for {square} maps two blocker sets with different attacks to one slot")]
    MagicCollision { slider: Slider, square: Square },

    #[error("attack tables are already initialized")]
    AlreadyInitialized,
}

/// Errors from checked move application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("illegal move {0} in this position")]
    Illegal(Move),
}
