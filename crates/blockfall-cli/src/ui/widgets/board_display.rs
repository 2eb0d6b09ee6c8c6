use blockfall_engine::{Board, Cell, LockedGrid, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::BlockDisplay;

/// The playfield: the locked grid with the falling piece drawn on top.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self { board, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        self.board.cols() as u16 * BlockDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        self.board.rows() as u16 * BlockDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }
}

/// The cell to draw at a board position; the falling piece wins over
/// the grid.
#[expect(clippy::cast_possible_truncation)]
fn display_cell(grid: &LockedGrid, piece: &Piece, row: usize, col: usize) -> Cell {
    let (piece_row, piece_col) = (row as i16, col as i16);
    if piece
        .cell_positions()
        .any(|(r, c)| r == piece_row && c == piece_col)
    {
        return Cell::Locked(piece.kind());
    }
    grid.cell(row, col)
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let grid = self.board.locked_grid();
        let piece = self.board.current_piece();

        let vertical =
            Layout::vertical((0..grid.rows()).map(|_| Constraint::Length(BlockDisplay::height())));
        let horizontal =
            Layout::horizontal((0..grid.cols()).map(|_| Constraint::Length(BlockDisplay::width())))
                .flex(Flex::Center);

        for (row, row_area) in area.layout_vec(&vertical).into_iter().enumerate() {
            for (col, cell_area) in row_area.layout_vec(&horizontal).into_iter().enumerate() {
                let cell = display_cell(grid, piece, row, col);
                BlockDisplay::from_cell(cell, true).render(cell_area, buf);
            }
        }
    }
}
