use std::collections::VecDeque;

use arrayvec::ArrayVec;

use crate::core::{
    grid::{Cell, LockedGrid},
    piece::Piece,
};

use super::piece_source::PieceSource;

/// Notification the board pushes after a successful mutation.
///
/// Queued internally and consumed via [`Board::pop_event`]; the board
/// never calls into presentation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    /// The locked grid or the falling piece changed.
    Changed,
    /// A new next piece was generated.
    NextPieceChanged,
}

/// The board state machine: locked grid, falling piece, next piece.
///
/// Movement and rotation are validated here, not in [`Piece`]; an
/// illegal request returns `false` and leaves all state untouched.
/// Blocks of a freshly spawned piece may sit above the visible board
/// (negative rows); such blocks are exempt from collision checks until
/// they enter the grid.
#[derive(Debug)]
pub struct Board {
    locked: LockedGrid,
    current: Piece,
    next: Piece,
    source: Box<dyn PieceSource>,
    events: VecDeque<BoardEvent>,
}

#[expect(clippy::cast_sign_loss)]
fn to_grid(row: i16, col: i16) -> (usize, usize) {
    debug_assert!(row >= 0 && col >= 0);
    (row as usize, col as usize)
}

impl Board {
    /// Creates a board with an empty grid and a freshly spawned pair of
    /// pieces drawn from `source`.
    ///
    /// # Panics
    ///
    /// Panics if `cols < 4` (pieces are centered on a bounding grid up
    /// to 4 cells wide) or if a dimension does not fit in `i16`.
    #[must_use]
    pub fn new(rows: usize, cols: usize, mut source: Box<dyn PieceSource>) -> Self {
        assert!(cols >= 4, "board must be at least 4 columns wide");
        assert!(
            i16::try_from(rows).is_ok() && i16::try_from(cols).is_ok(),
            "board dimensions out of range"
        );
        let current = Piece::spawn(source.next_kind(), cols);
        let next = Piece::spawn(source.next_kind(), cols);
        let mut events = VecDeque::new();
        events.push_back(BoardEvent::Changed);
        events.push_back(BoardEvent::NextPieceChanged);
        Self {
            locked: LockedGrid::new(rows, cols),
            current,
            next,
            source,
            events,
        }
    }

    /// Clears the grid and spawns a fresh pair of pieces (new game).
    pub fn reset(&mut self) {
        self.locked.clear_all();
        self.current = self.fresh_piece();
        self.next = self.fresh_piece();
        self.push(BoardEvent::Changed);
        self.push(BoardEvent::NextPieceChanged);
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.locked.rows()
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.locked.cols()
    }

    #[must_use]
    pub fn locked_grid(&self) -> &LockedGrid {
        &self.locked
    }

    #[must_use]
    pub fn current_piece(&self) -> &Piece {
        &self.current
    }

    #[must_use]
    pub fn next_piece(&self) -> &Piece {
        &self.next
    }

    /// Pops the oldest pending notification, if any.
    pub fn pop_event(&mut self) -> Option<BoardEvent> {
        self.events.pop_front()
    }

    #[cfg(test)]
    pub(crate) fn locked_grid_mut(&mut self) -> &mut LockedGrid {
        &mut self.locked
    }

    fn push(&mut self, event: BoardEvent) {
        self.events.push_back(event);
    }

    fn fresh_piece(&mut self) -> Piece {
        Piece::spawn(self.source.next_kind(), self.locked.cols())
    }

    #[expect(clippy::cast_possible_truncation)]
    fn rows_i16(&self) -> i16 {
        self.locked.rows() as i16
    }

    #[expect(clippy::cast_possible_truncation)]
    fn cols_i16(&self) -> i16 {
        self.locked.cols() as i16
    }

    /// Whether the grid is empty at a position. Positions above the
    /// board (`row < 0`) count as free; callers keep columns in range.
    fn is_free(&self, row: i16, col: i16) -> bool {
        if row < 0 {
            return true;
        }
        let (row, col) = to_grid(row, col);
        self.locked.cell(row, col).is_empty()
    }

    /// Moves the falling piece one column left unless a wall or locked
    /// cell is in the way.
    pub fn try_move_left(&mut self) -> bool {
        let ok = self
            .current
            .cell_positions()
            .all(|(row, col)| col >= 1 && self.is_free(row, col - 1));
        if ok {
            self.current.move_left();
            self.push(BoardEvent::Changed);
        }
        ok
    }

    /// Moves the falling piece one column right unless a wall or locked
    /// cell is in the way.
    pub fn try_move_right(&mut self) -> bool {
        let cols = self.cols_i16();
        let ok = self
            .current
            .cell_positions()
            .all(|(row, col)| col + 2 <= cols && self.is_free(row, col + 1));
        if ok {
            self.current.move_right();
            self.push(BoardEvent::Changed);
        }
        ok
    }

    /// Commits the next rotation state unless any resulting block would
    /// leave the board horizontally, pass the floor, or overlap a
    /// locked cell. A rejected rotation is not nudged (no wall kicks).
    pub fn try_rotate(&mut self) -> bool {
        let rows = self.rows_i16();
        let cols = self.cols_i16();
        let anchor_row = self.current.row();
        let anchor_col = self.current.col();
        let ok = self.current.blocks_in_next_rotation().iter().all(|b| {
            let row = anchor_row + i16::from(b.row);
            let col = anchor_col + i16::from(b.col);
            col >= 0 && col + 1 <= cols && row + 1 <= rows && self.is_free(row, col)
        });
        if ok {
            self.current.rotate();
            self.push(BoardEvent::Changed);
        }
        ok
    }

    /// Moves the falling piece one row down. Only blocks that have
    /// reached the top edge (`row >= -1`) are checked against the floor
    /// and the locked grid. On failure the caller decides whether to
    /// lock.
    pub fn try_move_down(&mut self) -> bool {
        let rows = self.rows_i16();
        let ok = self
            .current
            .cell_positions()
            .filter(|&(row, _)| row >= -1)
            .all(|(row, col)| row + 2 <= rows && self.is_free(row + 1, col));
        if ok {
            self.current.move_down();
            self.push(BoardEvent::Changed);
        }
        ok
    }

    /// Locks the falling piece into the grid, removes the rows it
    /// completed, and shifts the rows above down. Returns the number of
    /// cleared rows.
    ///
    /// Blocks still above the visible board are discarded; whether that
    /// situation ends the game is decided by the spawn check in
    /// [`Self::next_piece_collides_with_locked`].
    pub fn lock_piece_and_clear_rows(&mut self) -> usize {
        let kind = self.current.kind();
        for (row, col) in self.current.cell_positions() {
            if row >= 0 {
                let (row, col) = to_grid(row, col);
                self.locked.set(row, col, Cell::Locked(kind));
            }
        }

        // Distinct visible rows the piece occupies that are now complete.
        let mut complete: ArrayVec<usize, 4> = ArrayVec::new();
        for (row, _) in self.current.cell_positions() {
            if row < 0 {
                continue;
            }
            let (row, _) = to_grid(row, 0);
            if !complete.contains(&row) && self.locked.is_row_complete(row) {
                complete.push(row);
            }
        }

        // Compact: walking up from the bottom, every surviving row drops
        // by the number of complete rows at or below it.
        let mut shift = 0;
        for row in (0..self.locked.rows()).rev() {
            if complete.contains(&row) {
                shift += 1;
            } else if shift > 0 {
                self.locked.copy_row(row, row + shift);
            }
        }
        for row in 0..shift {
            self.locked.clear_row(row);
        }

        self.push(BoardEvent::Changed);
        shift
    }

    /// The game-over predicate: whether the next piece, at its spawn
    /// position, already overlaps a locked cell. Blocks that spawn
    /// above the visible board cannot collide.
    #[must_use]
    pub fn next_piece_collides_with_locked(&self) -> bool {
        self.next
            .cell_positions()
            .any(|(row, col)| !self.is_free(row, col))
    }

    /// Promotes the next piece to falling and draws a fresh successor.
    pub fn advance_to_next_piece(&mut self) {
        self.current = self.next;
        self.next = self.fresh_piece();
        self.push(BoardEvent::NextPieceChanged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::piece::PieceKind,
        engine::piece_source::ScriptedPieceSource,
    };

    fn board_with(script: &[PieceKind]) -> Board {
        Board::new(20, 10, Box::new(ScriptedPieceSource::new(script.to_vec())))
    }

    fn drain(board: &mut Board) -> Vec<BoardEvent> {
        let mut events = Vec::new();
        while let Some(event) = board.pop_event() {
            events.push(event);
        }
        events
    }

    fn fill_row_except(board: &mut Board, row: usize, skip: &[usize]) {
        for col in 0..board.cols() {
            if !skip.contains(&col) {
                board.locked.set(row, col, Cell::Locked(PieceKind::J));
            }
        }
    }

    fn drop_to_floor(board: &mut Board) {
        while board.try_move_down() {}
    }

    #[test]
    fn test_construction_spawns_and_notifies() {
        let mut board = board_with(&[PieceKind::T, PieceKind::O]);
        assert_eq!(board.current_piece().kind(), PieceKind::T);
        assert_eq!(board.next_piece().kind(), PieceKind::O);
        assert_eq!(
            drain(&mut board),
            vec![BoardEvent::Changed, BoardEvent::NextPieceChanged],
        );
    }

    #[test]
    fn test_move_left_stops_at_wall() {
        let mut board = board_with(&[PieceKind::I]);
        // Leftmost I block starts at column 3.
        assert!(board.try_move_left());
        assert!(board.try_move_left());
        assert!(board.try_move_left());
        let col = board.current_piece().col();
        assert!(!board.try_move_left());
        assert_eq!(board.current_piece().col(), col);
        assert!(
            board
                .current_piece()
                .cell_positions()
                .any(|(_, col)| col == 0)
        );
    }

    #[test]
    fn test_move_right_stops_at_wall() {
        let mut board = board_with(&[PieceKind::I]);
        // Rightmost I block starts at column 6.
        for _ in 0..3 {
            assert!(board.try_move_right());
        }
        assert!(!board.try_move_right());
        assert!(
            board
                .current_piece()
                .cell_positions()
                .any(|(_, col)| col == 9)
        );
    }

    #[test]
    fn test_locked_cell_blocks_lateral_move() {
        let mut board = board_with(&[PieceKind::O]);
        // O occupies rows -1..=0, columns 4-5; block the cell left of (0, 4).
        board.locked.set(0, 3, Cell::Locked(PieceKind::I));
        assert!(!board.try_move_left());
        // The blocked cell only matters on the visible row; free it and
        // the move succeeds.
        board.locked.set(0, 3, Cell::Empty);
        assert!(board.try_move_left());
    }

    #[test]
    fn test_failed_move_emits_no_event() {
        let mut board = board_with(&[PieceKind::I]);
        drain(&mut board);
        for _ in 0..3 {
            board.try_move_left();
        }
        drain(&mut board);
        assert!(!board.try_move_left());
        assert_eq!(drain(&mut board), vec![]);
    }

    #[test]
    fn test_rotation_rejected_at_left_wall() {
        let mut board = board_with(&[PieceKind::I]);
        // Vertical I hugging the left wall: the horizontal state would
        // reach column -2.
        assert!(board.try_rotate());
        for _ in 0..5 {
            assert!(board.try_move_left());
        }
        let piece = *board.current_piece();
        assert!(!board.try_rotate());
        assert_eq!(*board.current_piece(), piece);
    }

    #[test]
    fn test_rotation_rejected_at_floor() {
        let mut board = board_with(&[PieceKind::I]);
        // Horizontal I resting on the floor: the vertical state would
        // reach row 21.
        drop_to_floor(&mut board);
        assert!(!board.try_rotate());
        assert_eq!(board.current_piece().rotation().index(), 0);
    }

    #[test]
    fn test_rotation_rejected_on_locked_cell() {
        let mut board = board_with(&[PieceKind::I]);
        // The vertical I at spawn would occupy (2, 5).
        board.locked.set(2, 5, Cell::Locked(PieceKind::Z));
        assert!(!board.try_rotate());
        board.locked.set(2, 5, Cell::Empty);
        assert!(board.try_rotate());
    }

    #[test]
    fn test_gravity_reaches_floor() {
        let mut board = board_with(&[PieceKind::O]);
        // Bottom cells spawn on row 0 and may descend to row 19.
        let mut descents = 0;
        while board.try_move_down() {
            descents += 1;
        }
        assert_eq!(descents, 19);
        assert!(
            board
                .current_piece()
                .cell_positions()
                .any(|(row, _)| row == 19)
        );
    }

    #[test]
    fn test_lock_without_complete_rows_only_writes_piece_cells() {
        let mut board = board_with(&[PieceKind::O]);
        drop_to_floor(&mut board);
        assert_eq!(board.lock_piece_and_clear_rows(), 0);
        assert_eq!(board.locked_grid().cell(19, 4), Cell::Locked(PieceKind::O));
        assert_eq!(board.locked_grid().cell(19, 5), Cell::Locked(PieceKind::O));
        assert_eq!(board.locked_grid().cell(18, 4), Cell::Locked(PieceKind::O));
        assert_eq!(board.locked_grid().cell(18, 5), Cell::Locked(PieceKind::O));
        let occupied = (0..20)
            .flat_map(|row| (0..10).map(move |col| (row, col)))
            .filter(|&(row, col)| !board.locked_grid().cell(row, col).is_empty())
            .count();
        assert_eq!(occupied, 4);
    }

    #[test]
    fn test_lock_clears_single_row_and_shifts() {
        let mut board = board_with(&[PieceKind::O]);
        // Row 19 filled except the two columns the O will land on.
        fill_row_except(&mut board, 19, &[8, 9]);
        for _ in 0..4 {
            assert!(board.try_move_right());
        }
        drop_to_floor(&mut board);

        assert_eq!(board.lock_piece_and_clear_rows(), 1);
        // The O's top half dropped into the cleared row.
        assert_eq!(board.locked_grid().cell(19, 8), Cell::Locked(PieceKind::O));
        assert_eq!(board.locked_grid().cell(19, 9), Cell::Locked(PieceKind::O));
        for col in 0..8 {
            assert!(board.locked_grid().cell(19, col).is_empty());
        }
        assert!(board.locked_grid().row_cells(18).iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_incomplete_row_is_not_cleared() {
        let mut board = board_with(&[PieceKind::O]);
        // One gap remains in row 19 after the O lands at columns 8-9.
        fill_row_except(&mut board, 19, &[7, 8, 9]);
        for _ in 0..4 {
            assert!(board.try_move_right());
        }
        drop_to_floor(&mut board);
        assert_eq!(board.lock_piece_and_clear_rows(), 0);
        assert!(board.locked_grid().cell(19, 7).is_empty());
        assert_eq!(board.locked_grid().cell(18, 8), Cell::Locked(PieceKind::O));
    }

    #[test]
    fn test_vertical_i_clears_four_rows_at_once() {
        let mut board = board_with(&[PieceKind::I]);
        for row in 16..20 {
            fill_row_except(&mut board, row, &[9]);
        }
        assert!(board.try_rotate());
        for _ in 0..4 {
            assert!(board.try_move_right());
        }
        drop_to_floor(&mut board);

        assert_eq!(board.lock_piece_and_clear_rows(), 4);
        for row in 0..20 {
            assert!(
                board.locked_grid().row_cells(row).iter().all(|c| c.is_empty()),
                "row {row} should be empty after a quadruple clear",
            );
        }
    }

    #[test]
    fn test_compaction_preserves_row_order() {
        let mut board = board_with(&[PieceKind::I]);
        fill_row_except(&mut board, 19, &[9]);
        board.locked.set(18, 0, Cell::Locked(PieceKind::T));
        board.locked.set(18, 1, Cell::Locked(PieceKind::T));
        board.locked.set(17, 0, Cell::Locked(PieceKind::S));
        // Vertical I in column 9 completes row 19 only.
        assert!(board.try_rotate());
        for _ in 0..4 {
            assert!(board.try_move_right());
        }
        drop_to_floor(&mut board);

        assert_eq!(board.lock_piece_and_clear_rows(), 1);
        // Everything moved down one row, same relative order.
        assert_eq!(board.locked_grid().cell(19, 0), Cell::Locked(PieceKind::T));
        assert_eq!(board.locked_grid().cell(19, 1), Cell::Locked(PieceKind::T));
        assert_eq!(board.locked_grid().cell(19, 9), Cell::Locked(PieceKind::I));
        assert_eq!(board.locked_grid().cell(18, 0), Cell::Locked(PieceKind::S));
        assert_eq!(board.locked_grid().cell(18, 9), Cell::Locked(PieceKind::I));
        assert_eq!(board.locked_grid().cell(17, 9), Cell::Locked(PieceKind::I));
        assert!(board.locked_grid().cell(16, 9).is_empty());
    }

    #[test]
    fn test_next_piece_collision_detects_blocked_spawn() {
        let mut board = board_with(&[PieceKind::T, PieceKind::O]);
        assert!(!board.next_piece_collides_with_locked());
        // The next O's visible spawn cells are (0, 4) and (0, 5).
        board.locked.set(0, 4, Cell::Locked(PieceKind::I));
        assert!(board.next_piece_collides_with_locked());
        board.locked.set(0, 4, Cell::Empty);
        assert!(!board.next_piece_collides_with_locked());
    }

    #[test]
    fn test_advance_to_next_piece() {
        let mut board = board_with(&[PieceKind::T, PieceKind::O, PieceKind::I]);
        drain(&mut board);
        board.advance_to_next_piece();
        assert_eq!(board.current_piece().kind(), PieceKind::O);
        assert_eq!(board.next_piece().kind(), PieceKind::I);
        assert_eq!(drain(&mut board), vec![BoardEvent::NextPieceChanged]);
    }

    #[test]
    fn test_reset_clears_grid_and_respawns() {
        let mut board = board_with(&[PieceKind::T, PieceKind::O, PieceKind::I, PieceKind::L]);
        drop_to_floor(&mut board);
        board.lock_piece_and_clear_rows();
        drain(&mut board);

        board.reset();
        for row in 0..20 {
            assert!(board.locked_grid().row_cells(row).iter().all(|c| c.is_empty()));
        }
        assert_eq!(board.current_piece().kind(), PieceKind::I);
        assert_eq!(board.next_piece().kind(), PieceKind::L);
        assert_eq!(
            drain(&mut board),
            vec![BoardEvent::Changed, BoardEvent::NextPieceChanged],
        );
    }
}
