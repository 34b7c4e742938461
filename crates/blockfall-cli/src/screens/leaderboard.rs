use std::{path::PathBuf, time::Duration};

use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    text::Line,
    widgets::Block,
};

use crate::{
    leaderboard::{FallbackLeaderboard, JsonFileLeaderboard, LeaderboardEntry},
    tui::{RenderMode, Screen, ScreenTransition, Tui},
    view::widgets::{KeyBindingDisplay, KeyHint, LeaderboardDisplay, style},
};

const HINTS: &[KeyHint] = &[("R", "Reload"), ("Esc", "Back")];

#[derive(Debug)]
pub struct LeaderboardScreen {
    leaderboard: FallbackLeaderboard<JsonFileLeaderboard>,
    top: Vec<LeaderboardEntry>,
}

impl LeaderboardScreen {
    pub fn new(path: PathBuf) -> Self {
        let leaderboard = FallbackLeaderboard::new(JsonFileLeaderboard::new(path));
        let top = leaderboard.top();
        Self { leaderboard, top }
    }
}

impl Screen for LeaderboardScreen {
    fn on_active(&mut self, tui: &mut Tui) {
        tui.set_tick_interval(None);
        tui.set_render_mode(RenderMode::OnDirty);
    }

    fn on_inactive(&mut self, _tui: &mut Tui) {}

    fn on_close(&mut self, _tui: &mut Tui) {}

    fn handle_event(&mut self, _tui: &mut Tui, event: &Event) -> ScreenTransition {
        match super::pressed_key(event) {
            Some(KeyCode::Esc | KeyCode::Char('q')) => ScreenTransition::Pop,
            Some(KeyCode::Char('r')) => {
                self.top = self.leaderboard.refresh();
                ScreenTransition::Stay
            }
            _ => ScreenTransition::Stay,
        }
    }

    fn update(&mut self, _tui: &mut Tui, _elapsed: Duration) {}

    fn draw(&self, frame: &mut Frame) {
        let table = LeaderboardDisplay::new(&self.top).block(
            Block::bordered()
                .title(Line::from("LEADERBOARD").centered())
                .style(style::DEFAULT),
        );
        let [table_area, error_area, help_area] = Layout::vertical([
            Constraint::Length(table.height()),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .areas(frame.area());
        let [table_area] = Layout::horizontal([Constraint::Length(LeaderboardDisplay::width())])
            .flex(Flex::Center)
            .areas(table_area);

        frame.render_widget(table, table_area);
        if let Some(error) = self.leaderboard.last_error() {
            frame.render_widget(
                Line::styled(error.to_string(), style::NOTICE).centered(),
                error_area,
            );
        }
        frame.render_widget(KeyBindingDisplay::hints(HINTS), help_area);
    }
}
