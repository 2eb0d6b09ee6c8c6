use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::shape;

/// Enum representing the type of piece.
///
/// Discriminants start at 1 so that a kind doubles as the nonzero fill
/// value of a locked grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 1,
    /// O-piece.
    O = 2,
    /// T-piece.
    T = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// S-piece.
    S = 6,
    /// Z-piece.
    Z = 7,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..=6) {
            0 => PieceKind::I,
            1 => PieceKind::O,
            2 => PieceKind::T,
            3 => PieceKind::J,
            4 => PieceKind::L,
            5 => PieceKind::S,
            _ => PieceKind::Z,
        }
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All kinds, in discriminant order.
    pub const ALL: [PieceKind; PieceKind::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::J,
        PieceKind::L,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Returns the single character representation of this piece kind.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// Offset of one cell relative to a piece's anchor (the top-left corner
/// of its bounding grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub row: i8,
    pub col: i8,
}

impl Block {
    #[must_use]
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }
}

/// Rotation index of a piece.
///
/// Counts rotations without bound; lookups interpret it modulo the
/// kind's number of distinct states (1, 2, or 4). There is no backward
/// rotation, so the index only ever grows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rotation(u32);

impl Rotation {
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// A falling piece: kind, anchor position, rotation, and the cell
/// offsets derived from the two.
///
/// The piece is a dumb position-and-shape holder; whether a move or
/// rotation is legal is decided by the board, which inspects
/// [`Self::blocks_in_next_rotation`] before committing.
///
/// # Coordinate system
///
/// - `row`/`col` locate the anchor on the board grid, row 0 at the top.
/// - The anchor row is negative while part of the piece is still above
///   the visible board.
/// - `blocks` is always consistent with `(kind, rotation)` per the
///   shape table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    row: i16,
    col: i16,
    rotation: Rotation,
    blocks: [Block; 4],
}

impl Piece {
    /// Builds a piece at the spawn position for a board `cols` wide:
    /// horizontally centered on its bounding grid, anchor lifted so the
    /// lowest spawn cell sits on row 0.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub fn spawn(kind: PieceKind, cols: usize) -> Self {
        let blocks = shape::of(kind, Rotation::default());
        let max_row_offset = blocks.iter().fold(0, |max, b| max.max(b.row));
        Self {
            kind,
            row: -i16::from(max_row_offset),
            col: ((cols - shape::grid_width(kind)) / 2) as i16,
            rotation: Rotation::default(),
            blocks,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn row(&self) -> i16 {
        self.row
    }

    #[must_use]
    pub fn col(&self) -> i16 {
        self.col
    }

    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[must_use]
    pub fn blocks(&self) -> &[Block; 4] {
        &self.blocks
    }

    /// Absolute board positions of the piece's cells.
    pub fn cell_positions(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.blocks
            .iter()
            .map(move |b| (self.row + i16::from(b.row), self.col + i16::from(b.col)))
    }

    pub fn move_left(&mut self) {
        self.col -= 1;
    }

    pub fn move_right(&mut self) {
        self.col += 1;
    }

    pub fn move_down(&mut self) {
        self.row += 1;
    }

    /// Advances to the next rotation state and recomputes the blocks.
    pub fn rotate(&mut self) {
        self.rotation = self.rotation.next();
        self.blocks = shape::of(self.kind, self.rotation);
    }

    /// Pure lookahead: the blocks the piece would have after [`Self::rotate`].
    #[must_use]
    pub fn blocks_in_next_rotation(&self) -> [Block; 4] {
        shape::of(self.kind, self.rotation.next())
    }
}
