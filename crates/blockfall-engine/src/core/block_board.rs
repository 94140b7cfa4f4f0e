use std::fmt;

use serde::{Deserialize, Serialize};

use crate::BoardShapeError;

use super::piece::{Piece, PieceKind, PiecePosition};

/// A single cell of the board.
///
/// A locked cell remembers which piece kind produced it, which is all the
/// renderer needs to color it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Block {
    /// Empty cell (no piece).
    #[default]
    Empty,
    /// Locked piece of a specific type.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    /// Returns `'.'` for an empty cell, or the piece letter.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Block::Empty => '.',
            Block::Piece(kind) => kind.as_char(),
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        if c == '.' {
            return Some(Block::Empty);
        }
        match PieceKind::from_char(c) {
            Some(kind) => Some(Block::Piece(kind)),
            None => None,
        }
    }
}

/// A single row of the board.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BlockRow {
    cells: Vec<Block>,
}

impl BlockRow {
    fn empty(width: usize) -> Self {
        Self {
            cells: vec![Block::Empty; width],
        }
    }

    #[must_use]
    pub fn cells(&self) -> &[Block] {
        &self.cells
    }

    fn is_filled(&self) -> bool {
        self.cells.iter().all(|b| !b.is_empty())
    }
}

impl fmt::Debug for BlockRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: String = self.cells.iter().map(|b| b.as_char()).collect();
        fmt::Debug::fmt(&s, f)
    }
}

impl std::str::FromStr for BlockRow {
    type Err = BoardShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells = s
            .chars()
            .map(|c| Block::from_char(c).ok_or(BoardShapeError::InvalidCell(c)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { cells })
    }
}

impl Serialize for BlockRow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: one character per cell, '.' for empty (e.g., "..TT.IIII.")
        let s: String = self.cells.iter().map(|b| b.as_char()).collect();
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for BlockRow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The fixed-size grid of locked cells.
///
/// Rows are indexed top to bottom, columns left to right. Dimensions are
/// chosen at construction and never change afterwards: clearing lines
/// removes rows and inserts the same number of empty rows at the top.
///
/// The falling piece is never stored here until it locks; see
/// [`GameState::render_board`](crate::GameState::render_board) for the
/// composited view.
///
/// # Example
///
/// ```
/// use blockfall_engine::{BlockBoard, Piece, PieceKind, PiecePosition};
///
/// let board = BlockBoard::empty(10, 20);
/// let piece = Piece::new(PieceKind::O, PiecePosition::new(0, 18));
///
/// assert!(!board.collides(&piece, (0, 0)));
/// assert!(board.collides(&piece, (0, 1))); // would pass the floor
/// assert!(board.collides(&piece, (-1, 0))); // would pass the left wall
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<BlockRow>", into = "Vec<BlockRow>")]
pub struct BlockBoard {
    width: usize,
    rows: Vec<BlockRow>,
}

impl TryFrom<Vec<BlockRow>> for BlockBoard {
    type Error = BoardShapeError;

    fn try_from(rows: Vec<BlockRow>) -> Result<Self, Self::Error> {
        let Some(first) = rows.first() else {
            return Err(BoardShapeError::NoRows);
        };
        let width = first.cells.len();
        if width == 0 {
            return Err(BoardShapeError::ZeroWidth);
        }
        if let Some((row, bad)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.cells.len() != width)
        {
            return Err(BoardShapeError::RaggedRow {
                row,
                expected: width,
                actual: bad.cells.len(),
            });
        }
        Ok(Self { width, rows })
    }
}

impl From<BlockBoard> for Vec<BlockRow> {
    fn from(board: BlockBoard) -> Self {
        board.rows
    }
}

impl BlockBoard {
    /// Creates a board of the given dimensions with every cell empty.
    #[must_use]
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            rows: vec![BlockRow::empty(width); height],
        }
    }

    /// Builds a board from textual rows, top to bottom.
    ///
    /// Each character is `.` for an empty cell or one of `IJLOSTZ`.
    ///
    /// ```
    /// use blockfall_engine::{Block, BlockBoard, PieceKind};
    ///
    /// let board = BlockBoard::parse(["....", "T..I"]).unwrap();
    /// assert_eq!(board.get(3, 1), Some(Block::Piece(PieceKind::I)));
    /// ```
    pub fn parse<'a, I>(rows: I) -> Result<Self, BoardShapeError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let rows = rows
            .into_iter()
            .map(str::parse)
            .collect::<Result<Vec<BlockRow>, _>>()?;
        Self::try_from(rows)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Returns the cell at `(x, y)`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<Block> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.cells.get(x).copied()
    }

    fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Block> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get_mut(y)?.cells.get_mut(x)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Block]> {
        self.rows.iter().map(BlockRow::cells)
    }

    /// Canonical position for a newly promoted piece: horizontally centered,
    /// top-aligned (`x = width / 2 - 1`, `y = 0`).
    #[must_use]
    pub fn spawn_position(&self) -> PiecePosition {
        let half = i32::try_from(self.width / 2).unwrap_or(i32::MAX);
        PiecePosition::new(half - 1, 0)
    }

    /// Returns whether `piece`, shifted by `offset`, would be in an illegal spot.
    ///
    /// A sub-cell collides when it is left of column 0, right of the last
    /// column, below the last row, or on an occupied cell. Sub-cells above the
    /// board (`y < 0`) only get the horizontal check, so a piece can spawn
    /// partially hidden and fall into view.
    #[must_use]
    pub fn collides(&self, piece: &Piece, (dx, dy): (i32, i32)) -> bool {
        let width = i32::try_from(self.width).unwrap_or(i32::MAX);
        let height = i32::try_from(self.height()).unwrap_or(i32::MAX);
        piece.occupied_positions().any(|(x, y)| {
            let (x, y) = (x.saturating_add(dx), y.saturating_add(dy));
            if x < 0 || x >= width || y >= height {
                return true;
            }
            y >= 0 && self.get(x, y).is_some_and(|b| !b.is_empty())
        })
    }

    /// Writes the piece's sub-cells into the board.
    ///
    /// Sub-cells above the board or otherwise outside it are dropped.
    pub fn fill_piece(&mut self, piece: &Piece) {
        let block = Block::Piece(piece.kind());
        for (x, y) in piece.occupied_positions() {
            if let Some(cell) = self.get_mut(x, y) {
                *cell = block;
            }
        }
    }

    /// Like [`Self::fill_piece`], but returns a new board.
    #[must_use]
    pub fn merged(&self, piece: &Piece) -> Self {
        let mut board = self.clone();
        board.fill_piece(piece);
        board
    }

    /// Clears filled lines and returns the number of lines cleared.
    ///
    /// A line is filled when every cell is non-empty. Cleared lines are
    /// removed, remaining rows keep their relative order and shift down, and
    /// empty rows are inserted at the top so the height is unchanged.
    pub fn clear_lines(&mut self) -> usize {
        let height = self.height();
        self.rows.retain(|row| !row.is_filled());
        let count = height - self.rows.len();
        if count > 0 {
            let width = self.width;
            self.rows
                .splice(0..0, std::iter::repeat_n(BlockRow::empty(width), count));
        }
        count
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows()
            .map(|row| row.iter().filter(|b| !b.is_empty()).count())
            .sum()
    }
}
