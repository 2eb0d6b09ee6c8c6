use blockfall_engine::GameStats;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

const ROW_COUNT: usize = 4;

/// Level/score/lines/time panel.
#[derive(Debug)]
pub struct StatsDisplay<'a> {
    stats: &'a GameStats,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(stats: &'a GameStats) -> Self {
        Self { stats, block: None }
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
        ROW_COUNT as u16 + super::block_vertical_margin(self.block.as_ref())
    }
}

fn format_time(total_seconds: usize) -> String {
    format!("{}:{:0>2}", total_seconds / 60, total_seconds % 60)
}

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let rows: [(&str, String); ROW_COUNT] = [
            ("LEVEL:", self.stats.level().to_string()),
            ("SCORE:", self.stats.score().to_string()),
            ("LINES:", self.stats.lines().to_string()),
            ("TIME:", format_time(self.stats.time_seconds())),
        ];

        let row_areas =
            Layout::vertical((0..ROW_COUNT).map(|_| Constraint::Length(1))).split(area);
        for ((label, value), row_area) in rows.into_iter().zip(row_areas.iter().copied()) {
            Line::styled(label, style::DEFAULT)
                .left_aligned()
                .render(row_area, buf);
            Line::styled(value, style::DEFAULT)
                .right_aligned()
                .render(row_area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(59), "0:59");
        assert_eq!(format_time(60), "1:00");
        assert_eq!(format_time(754), "12:34");
    }
}
