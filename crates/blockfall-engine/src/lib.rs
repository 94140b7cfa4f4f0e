pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board width must be between 5 and 1024, got {_0}")]
    Width(#[error(not(source))] usize),
    #[display("board height must be between 4 and 1024, got {_0}")]
    Height(#[error(not(source))] usize),
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardShapeError {
    #[display("board has no rows")]
    NoRows,
    #[display("board rows have no cells")]
    ZeroWidth,
    #[display("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("invalid cell character {_0:?}")]
    InvalidCell(#[error(not(source))] char),
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PieceSequenceError {
    #[display("piece sequence is empty")]
    Empty,
    #[display("invalid piece kind {_0:?}, expected one of IJLOSTZ")]
    InvalidKind(#[error(not(source))] char),
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PieceSeedError {
    #[display("invalid seed: expected 32 hex digits, got {_0} characters")]
    Length(#[error(not(source))] usize),
    #[display("invalid seed: {_0}")]
    Digits(std::num::ParseIntError),
}
