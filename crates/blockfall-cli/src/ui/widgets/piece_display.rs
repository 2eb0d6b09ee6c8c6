use blockfall_engine::{Block, PieceKind, Rotation, core::shape};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::BlockDisplay;

// Every spawn-state shape fits in the top 2 rows of its 4-wide grid.
const PREVIEW_ROWS: u16 = 2;
const PREVIEW_COLS: u16 = 4;

/// Preview of a piece kind in its spawn orientation (the NEXT panel).
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    kind: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            kind: None,
            block: None,
        }
    }

    pub fn kind(self, kind: PieceKind) -> Self {
        Self {
            kind: Some(kind),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        PREVIEW_COLS * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        PREVIEW_ROWS * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Default for PieceDisplay<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let shape = self
            .kind
            .map(|kind| (kind, shape::of(kind, Rotation::default())));

        let vertical =
            Layout::vertical((0..PREVIEW_ROWS).map(|_| Constraint::Length(BlockDisplay::height())));
        let horizontal = Layout::horizontal(
            (0..PREVIEW_COLS).map(|_| Constraint::Length(BlockDisplay::width())),
        )
        .flex(Flex::Center);

        for (row, row_area) in area.layout_vec(&vertical).into_iter().enumerate() {
            for (col, cell_area) in row_area.layout_vec(&horizontal).into_iter().enumerate() {
                #[expect(clippy::cast_possible_truncation)]
                let offset = Block::new(row as i8, col as i8);
                let display = match &shape {
                    Some((kind, blocks)) if blocks.contains(&offset) => {
                        BlockDisplay::from_kind(*kind)
                    }
                    _ => BlockDisplay::new(super::style::EMPTY, ""),
                };
                display.render(cell_area, buf);
            }
        }
    }
}
