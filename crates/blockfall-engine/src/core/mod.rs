//! Board and piece primitives.
//!
//! - [`BlockBoard`] - Fixed-size grid of locked cells, collision and line clearing
//! - [`Piece`] - A tetromino with its shape matrix and anchor position
//! - [`PieceKind`] - The seven tetromino kinds, their spawn shapes and colors

pub use self::{block_board::*, piece::*};

pub(crate) mod block_board;
pub(crate) mod piece;
