use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// A tetromino on (or about to enter) the board.
///
/// A piece carries its own shape matrix, so rotation is a property of the
/// piece rather than of a lookup table. Pieces are immutable: moving or
/// rotating returns a new `Piece`.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, PieceKind, PiecePosition};
///
/// let piece = Piece::new(PieceKind::T, PiecePosition::new(4, 0));
/// let moved = piece.moved(-1, 1);
/// assert_eq!(moved.position(), PiecePosition::new(3, 1));
///
/// let rotated = moved.rotated();
/// assert_eq!(rotated.position(), moved.position());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    kind: PieceKind,
    shape: PieceShape,
    position: PiecePosition,
}

impl Piece {
    /// Creates a piece of `kind` in its spawn orientation at `position`.
    #[must_use]
    pub const fn new(kind: PieceKind, position: PiecePosition) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            position,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn shape(&self) -> &PieceShape {
        &self.shape
    }

    #[must_use]
    pub const fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub const fn color(&self) -> Rgb {
        self.kind.color()
    }

    /// Returns the absolute board coordinates of every occupied sub-cell.
    ///
    /// Coordinates may lie outside the board; callers decide how to treat them.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied_cells()
            .map(move |(dx, dy)| (self.position.x + dx, self.position.y + dy))
    }

    #[must_use]
    pub const fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            kind: self.kind,
            shape: self.shape,
            position: self.position.offset(dx, dy),
        }
    }

    /// Returns this piece rotated 90° clockwise about its own matrix center.
    ///
    /// The anchor position is unchanged; no wall kick is attempted.
    #[must_use]
    pub const fn rotated(&self) -> Self {
        Self {
            kind: self.kind,
            shape: self.shape.rotated(),
            position: self.position,
        }
    }
}

/// Top-left anchor of a piece's shape matrix, in board coordinates.
///
/// `y` grows downward and may be negative while a piece is still above the
/// visible board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// Square occupancy matrix of a piece, at most 4×4.
///
/// Only the leading `size × size` region is meaningful; cells outside it are
/// always empty.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceShape {
    size: usize,
    cells: [[bool; PieceShape::MAX_SIZE]; PieceShape::MAX_SIZE],
}

impl PieceShape {
    pub const MAX_SIZE: usize = 4;

    const fn from_rows(size: usize, cells: [[bool; Self::MAX_SIZE]; Self::MAX_SIZE]) -> Self {
        Self { size, cells }
    }

    /// Side length of the matrix.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Iterates over occupied cells as `(x, y)` offsets from the anchor.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let size = self.size;
        self.cells[..size]
            .iter()
            .enumerate()
            .flat_map(move |(y, row)| {
                row[..size]
                    .iter()
                    .enumerate()
                    .filter(|&(_, &cell)| cell)
                    .map(move |(x, _)| (coord(x), coord(y)))
            })
    }

    /// Iterates over the rows of the meaningful `size × size` region.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells[..self.size].iter().map(|row| &row[..self.size])
    }

    /// Rotates the matrix 90° clockwise: `rotated[y][x] = self[size - 1 - x][y]`.
    #[must_use]
    pub const fn rotated(&self) -> Self {
        let size = self.size;
        let mut cells = [[false; Self::MAX_SIZE]; Self::MAX_SIZE];
        let mut y = 0;
        while y < size {
            let mut x = 0;
            while x < size {
                cells[y][x] = self.cells[size - 1 - x][y];
                x += 1;
            }
            y += 1;
        }
        Self { size, cells }
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn coord(v: usize) -> i32 {
    // shape offsets are below `PieceShape::MAX_SIZE`
    v as i32
}

impl fmt::Debug for PieceShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rows().map(shape_row_string))
            .finish()
    }
}

fn shape_row_string(row: &[bool]) -> String {
    row.iter().map(|&c| if c { '#' } else { '.' }).collect()
}

impl Serialize for PieceShape {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: one string per row, '#' for occupied (e.g., [".#.", "###", "..."])
        serializer.collect_seq(self.rows().map(shape_row_string))
    }
}

impl<'de> Deserialize<'de> for PieceShape {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<String>::deserialize(deserializer)?;
        let size = rows.len();
        if !(1..=Self::MAX_SIZE).contains(&size) {
            return Err(serde::de::Error::custom(format!(
                "shape must have 1 to {} rows, got {size}",
                Self::MAX_SIZE
            )));
        }

        let mut cells = [[false; Self::MAX_SIZE]; Self::MAX_SIZE];
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != size {
                return Err(serde::de::Error::custom(format!(
                    "shape must be square, row {y} is '{row}'"
                )));
            }
            for (x, c) in row.chars().enumerate() {
                cells[y][x] = match c {
                    '#' => true,
                    '.' => false,
                    _ => {
                        return Err(serde::de::Error::custom(format!(
                            "invalid shape cell '{c}' in row {y}"
                        )));
                    }
                };
            }
        }

        let shape = Self::from_rows(size, cells);
        if shape.occupied_cells().next().is_none() {
            return Err(serde::de::Error::custom("shape has no occupied cells"));
        }
        Ok(shape)
    }
}

/// The seven tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// T-piece.
    T = 5,
    /// Z-piece.
    Z = 6,
}

/// Uniform choice among the seven kinds; each draw is independent.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Shape matrix in spawn orientation.
    #[must_use]
    pub const fn shape(self) -> PieceShape {
        PIECE_SHAPES[self as usize]
    }

    /// Display color of the piece and of the cells it locks into.
    #[must_use]
    pub const fn color(self) -> Rgb {
        match self {
            PieceKind::I => Rgb(0, 240, 240),
            PieceKind::J => Rgb(0, 0, 240),
            PieceKind::L => Rgb(240, 160, 0),
            PieceKind::O => Rgb(240, 240, 0),
            PieceKind::S => Rgb(0, 240, 0),
            PieceKind::T => Rgb(160, 0, 240),
            PieceKind::Z => Rgb(240, 0, 0),
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single uppercase character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// 24-bit display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

const PIECE_SHAPES: [PieceShape; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];
    [
        // I-piece
        PieceShape::from_rows(4, [EEEE, [C, C, C, C], EEEE, EEEE]),
        // J-piece
        PieceShape::from_rows(3, [[C, E, E, E], [C, C, C, E], EEEE, EEEE]),
        // L-piece
        PieceShape::from_rows(3, [[E, E, C, E], [C, C, C, E], EEEE, EEEE]),
        // O-piece
        PieceShape::from_rows(2, [[C, C, E, E], [C, C, E, E], EEEE, EEEE]),
        // S-piece
        PieceShape::from_rows(3, [[E, C, C, E], [C, C, E, E], EEEE, EEEE]),
        // T-piece
        PieceShape::from_rows(3, [[E, C, E, E], [C, C, C, E], EEEE, EEEE]),
        // Z-piece
        PieceShape::from_rows(3, [[C, C, E, E], [E, C, C, E], EEEE, EEEE]),
    ]
};
