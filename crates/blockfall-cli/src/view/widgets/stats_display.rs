use std::{iter, time::Duration};

use blockfall_engine::ScoreState;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::style;

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(&'static dyn Fn(&ScoreState) -> String),
    LabelValue(&'static str, &'static dyn Fn(&ScoreState) -> String),
    Clock,
}

const SOLO_ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|stats| stats.score().to_string()),
    Row::Clock,
    Row::Empty,
    Row::LabelValue("LEVEL:", &|stats| stats.level().to_string()),
    Row::LabelValue("LINES:", &|stats| stats.lines().to_string()),
    Row::LabelValue("PIECES:", &|stats| stats.pieces().to_string()),
    Row::Empty,
    Row::LabelValue("SINGLES:", &|stats| stats.line_clear_counter()[1].to_string()),
    Row::LabelValue("DOUBLES:", &|stats| stats.line_clear_counter()[2].to_string()),
    Row::LabelValue("TRIPLES:", &|stats| stats.line_clear_counter()[3].to_string()),
    Row::LabelValue("TETRIS:", &|stats| stats.line_clear_counter()[4].to_string()),
];

const VERSUS_ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|stats| stats.score().to_string()),
    Row::Empty,
    Row::LabelValue("LEVEL:", &|stats| stats.level().to_string()),
    Row::LabelValue("LINES:", &|stats| stats.lines().to_string()),
    Row::Empty,
    Row::LabelValue("SENT:", &|stats| stats.garbage_sent().to_string()),
    Row::LabelValue("RECV:", &|stats| stats.garbage_received().to_string()),
];

/// Score panel. Solo panels also carry the play clock.
pub struct StatsDisplay<'a> {
    stats: &'a ScoreState,
    rows: &'static [Row],
    clock: Option<Duration>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn solo(stats: &'a ScoreState, play_time: Duration) -> Self {
        Self {
            stats,
            rows: SOLO_ROWS,
            clock: Some(play_time),
            block: None,
        }
    }

    pub fn versus(stats: &'a ScoreState) -> Self {
        Self {
            stats,
            rows: VERSUS_ROWS,
            clock: None,
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
        18 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(self.rows.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

/// Formats `m:ss.cc`.
pub fn format_clock(time: Duration) -> String {
    format!(
        "{}:{:0>2}.{:0>2}",
        time.as_secs() / 60,
        time.as_secs() % 60,
        time.subsec_millis() / 10
    )
}

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;
        let rows_areas =
            Layout::vertical((0..self.rows.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(self.rows.iter().copied(), rows_areas.iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.stats), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::Clock => {
                    if let Some(time) = self.clock {
                        Line::styled(format!("TIME: {}", format_clock(time)), style)
                            .right_aligned()
                            .render(area, buf);
                    }
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.stats), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(Duration::ZERO), "0:00.00");
        assert_eq!(format_clock(Duration::from_millis(83_456)), "1:23.45");
    }
}
