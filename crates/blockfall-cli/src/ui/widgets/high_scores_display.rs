use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::{high_score::HighScoreEntry, ui::widgets::style};

/// The top-5 table panel.
#[derive(Debug)]
pub struct HighScoresDisplay<'a> {
    entries: &'a [HighScoreEntry],
    block: Option<BlockWidget<'a>>,
}

impl<'a> HighScoresDisplay<'a> {
    pub fn new(entries: &'a [HighScoreEntry]) -> Self {
        Self {
            entries,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        16 + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        self.entries.len() as u16 + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for HighScoresDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &HighScoresDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let row_areas =
            Layout::vertical((0..self.entries.len()).map(|_| Constraint::Length(1))).split(area);
        for (entry, row_area) in self.entries.iter().zip(row_areas.iter().copied()) {
            Line::styled(entry.initials.clone(), style::DEFAULT)
                .left_aligned()
                .render(row_area, buf);
            Line::styled(entry.score.to_string(), style::DEFAULT)
                .right_aligned()
                .render(row_area, buf);
        }
    }
}
