use std::time::Duration;

use blockfall_engine::PieceController;
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::view::widgets::{BoardDisplay, PieceDisplay, StatsDisplay, style};

/// Board, hold, next piece and stats of one player.
#[derive(Debug)]
pub struct PlayerDisplay<'a> {
    controller: &'a PieceController,
    title: Option<String>,
    border: Color,
    show_piece: bool,
    play_time: Option<Duration>,
    popup: Option<(String, Style)>,
}

impl<'a> PlayerDisplay<'a> {
    pub fn new(controller: &'a PieceController, border: Color) -> Self {
        Self {
            controller,
            title: None,
            border,
            show_piece: true,
            play_time: None,
            popup: None,
        }
    }

    pub fn title(self, title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..self
        }
    }

    /// Hides the falling piece and its ghost, e.g. during the countdown.
    pub fn show_piece(self, show_piece: bool) -> Self {
        Self { show_piece, ..self }
    }

    /// Shows solo stats with the play clock instead of versus stats.
    pub fn solo(self, play_time: Duration) -> Self {
        Self {
            play_time: Some(play_time),
            ..self
        }
    }

    /// Overlays a message on the board.
    pub fn popup(self, popup: Option<(String, Style)>) -> Self {
        Self { popup, ..self }
    }

    fn panel(&self, title: &'a str) -> Block<'a> {
        Block::bordered()
            .title(Line::from(title).centered())
            .padding(Padding::symmetric(1, 0))
            .border_style(self.border)
            .style(style::DEFAULT)
    }
}

impl Widget for PlayerDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PlayerDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let controller = self.controller;

        let mut board_block = Block::bordered()
            .border_style(self.border)
            .style(style::DEFAULT);
        if let Some(title) = &self.title {
            board_block = board_block.title(Line::from(title.as_str()).centered());
        }
        let mut board = BoardDisplay::new(controller.board()).block(board_block);
        if self.show_piece && !controller.is_game_over() {
            board = board
                .ghost(controller.ghost_position(), controller.current())
                .falling_piece(controller.position(), controller.current());
        }
        let hold = PieceDisplay::new(controller.held())
            .dimmed(!controller.can_hold())
            .block(self.panel("HOLD"));
        let next = PieceDisplay::new(Some(controller.next())).block(self.panel("NEXT"));
        let stats = match self.play_time {
            Some(play_time) => StatsDisplay::solo(controller.stats(), play_time),
            None => StatsDisplay::versus(controller.stats()),
        }
        .block(self.panel("STATS"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(u16::max(hold.width(), stats.width())),
            Constraint::Length(board.width()),
            Constraint::Length(next.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [hold_area, stats_area] = Layout::vertical([
            Constraint::Length(hold.height()),
            Constraint::Length(stats.height()),
        ])
        .spacing(1)
        .areas(left_column);
        let hold_area =
            hold_area.layout::<1>(&Layout::horizontal([Constraint::Length(hold.width())]).flex(Flex::End))[0];
        let [board_area] =
            Layout::vertical([Constraint::Length(board.height())]).areas(center_column);
        let [next_area] = Layout::vertical([Constraint::Length(next.height())]).areas(right_column);

        let board_width = board.width();
        hold.render(hold_area, buf);
        stats.render(stats_area, buf);
        board.render(board_area, buf);
        next.render(next_area, buf);

        if let Some((text, style)) = &self.popup {
            let block = Block::new().style(*style);
            let area = board_area.centered(Constraint::Length(board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            Text::styled(text.as_str(), *style)
                .centered()
                .render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
