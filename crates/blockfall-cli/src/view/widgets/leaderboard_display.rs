use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::Style,
    text::Line,
    widgets::{Block as BlockWidget, Row, Table, Widget},
};

use crate::{
    leaderboard::{LeaderboardEntry, TOP_ENTRIES},
    view::widgets::{color, style},
};

/// Ranked table of the best solo scores.
#[derive(Debug)]
pub struct LeaderboardDisplay<'a> {
    entries: &'a [LeaderboardEntry],
    highlight: Option<&'a LeaderboardEntry>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> LeaderboardDisplay<'a> {
    pub fn new(entries: &'a [LeaderboardEntry]) -> Self {
        Self {
            entries,
            highlight: None,
            block: None,
        }
    }

    /// Marks the row of a just-submitted entry.
    pub fn highlight(self, entry: Option<&'a LeaderboardEntry>) -> Self {
        Self {
            highlight: entry,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width() -> u16 {
        52
    }

    pub fn height(&self) -> u16 {
        let rows = u16::try_from(TOP_ENTRIES).unwrap_or(u16::MAX) + 1;
        rows + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for LeaderboardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let header = Row::new(["#", "NICKNAME", "SCORE", "LV", "DATE"])
            .style(Style::new().fg(color::CYAN).bg(color::BLACK));
        let rows = self.entries.iter().enumerate().map(|(i, entry)| {
            let date = entry
                .local_time()
                .map_or_else(String::new, |time| time.format("%Y-%m-%d %H:%M").to_string());
            let style = if self.highlight == Some(entry) {
                style::HIGHLIGHT
            } else {
                style::DEFAULT
            };
            Row::new([
                (i + 1).to_string(),
                entry.nickname.clone(),
                entry.score.to_string(),
                entry.level.to_string(),
                date,
            ])
            .style(style)
        });
        let widths = [
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(7),
            Constraint::Length(3),
            Constraint::Length(16),
        ];
        let inner = self.block.as_ref().map_or(area, |block| block.inner(area));
        let empty = self.entries.is_empty();
        let mut table = Table::new(rows, widths).header(header).style(style::DEFAULT);
        if let Some(block) = self.block {
            table = table.block(block);
        }
        table.render(area, buf);
        if empty && let Some(line_area) = inner.rows().nth(1) {
            Line::styled("no scores yet", style::EMPTY_DOT)
                .centered()
                .render(line_area, buf);
        }
    }
}
