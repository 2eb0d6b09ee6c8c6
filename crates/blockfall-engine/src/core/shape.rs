//! Static cell-offset tables for the 7 piece kinds across their
//! rotation states.
//!
//! States are authored as visual 4×4 grids and reduced to offset sets
//! at compile time. I, S, and Z repeat under 180° and carry 2 states;
//! O carries 1; T, J, and L carry 4. Lookups are total over all
//! rotation indices (the index wraps modulo the state count).

use super::piece::{Block, PieceKind, Rotation};

/// Visual grid a shape state is authored in. Nonzero cells are occupied.
type ShapeGrid = [[u8; 4]; 4];

/// Extracts the 4 cell offsets from a visual grid, scanning row-major.
#[expect(clippy::cast_possible_truncation)]
const fn offsets(grid: ShapeGrid) -> [Block; 4] {
    let mut out = [Block::new(0, 0); 4];
    let mut found = 0;
    let mut row = 0;
    while row < 4 {
        let mut col = 0;
        while col < 4 {
            if grid[row][col] != 0 {
                assert!(found < 4, "shape grid has more than 4 cells");
                out[found] = Block::new(row as i8, col as i8);
                found += 1;
            }
            col += 1;
        }
        row += 1;
    }
    assert!(found == 4, "shape grid has fewer than 4 cells");
    out
}

const I_STATES: [[Block; 4]; 2] = [
    offsets([[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]),
    offsets([[0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0]]),
];

const O_STATES: [[Block; 4]; 1] = [
    offsets([[0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
];

const T_STATES: [[Block; 4]; 4] = [
    offsets([[0, 1, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    offsets([[0, 1, 0, 0], [0, 1, 1, 0], [0, 1, 0, 0], [0, 0, 0, 0]]),
    offsets([[0, 0, 0, 0], [1, 1, 1, 0], [0, 1, 0, 0], [0, 0, 0, 0]]),
    offsets([[0, 1, 0, 0], [1, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]]),
];

const J_STATES: [[Block; 4]; 4] = [
    offsets([[1, 0, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    offsets([[0, 1, 1, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]]),
    offsets([[0, 0, 0, 0], [1, 1, 1, 0], [0, 0, 1, 0], [0, 0, 0, 0]]),
    offsets([[0, 1, 0, 0], [0, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0]]),
];

const L_STATES: [[Block; 4]; 4] = [
    offsets([[0, 0, 1, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    offsets([[0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0]]),
    offsets([[0, 0, 0, 0], [1, 1, 1, 0], [1, 0, 0, 0], [0, 0, 0, 0]]),
    offsets([[1, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]]),
];

const S_STATES: [[Block; 4]; 2] = [
    offsets([[0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    offsets([[0, 1, 0, 0], [0, 1, 1, 0], [0, 0, 1, 0], [0, 0, 0, 0]]),
];

const Z_STATES: [[Block; 4]; 2] = [
    offsets([[1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    offsets([[0, 0, 1, 0], [0, 1, 1, 0], [0, 1, 0, 0], [0, 0, 0, 0]]),
];

const fn states(kind: PieceKind) -> &'static [[Block; 4]] {
    match kind {
        PieceKind::I => &I_STATES,
        PieceKind::O => &O_STATES,
        PieceKind::T => &T_STATES,
        PieceKind::J => &J_STATES,
        PieceKind::L => &L_STATES,
        PieceKind::S => &S_STATES,
        PieceKind::Z => &Z_STATES,
    }
}

/// Number of distinct rotation states for a kind.
#[must_use]
pub const fn state_count(kind: PieceKind) -> usize {
    states(kind).len()
}

/// The 4 cell offsets for `kind` in the given rotation.
#[must_use]
pub fn of(kind: PieceKind, rotation: Rotation) -> [Block; 4] {
    let table = states(kind);
    table[rotation.index() as usize % table.len()]
}

/// Width of the kind's bounding grid, used to center pieces at spawn.
#[must_use]
pub const fn grid_width(kind: PieceKind) -> usize {
    match kind {
        PieceKind::I | PieceKind::O => 4,
        PieceKind::T | PieceKind::J | PieceKind::L | PieceKind::S | PieceKind::Z => 3,
    }
}
