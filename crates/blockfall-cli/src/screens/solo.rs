use std::{path::PathBuf, time::Duration};

use blockfall_engine::{GameEvent, GameSession, PieceSeed, SessionState};
use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    style::Style,
    text::Line,
    widgets::{Block, Clear},
};

use crate::{
    keymap,
    leaderboard::{FallbackLeaderboard, JsonFileLeaderboard, LeaderboardEntry},
    tui::{RenderMode, Screen, ScreenTransition, Tui},
    view::widgets::{
        KeyBindingDisplay, KeyHint, LeaderboardDisplay, PlayerDisplay, color, style,
    },
};

const CONTROL_HINTS: &[KeyHint] = &[("P", "Pause"), ("R", "Restart"), ("Esc", "Menu")];

#[derive(Debug, Clone)]
pub struct SoloOptions {
    /// Name submitted to the leaderboard. Scores are not submitted without one.
    pub nickname: Option<String>,
    pub leaderboard: PathBuf,
    pub seed: Option<PieceSeed>,
}

#[derive(Debug)]
pub struct SoloScreen {
    session: GameSession,
    nickname: Option<String>,
    leaderboard: FallbackLeaderboard<JsonFileLeaderboard>,
    top: Vec<LeaderboardEntry>,
    submitted: Option<LeaderboardEntry>,
}

impl SoloScreen {
    pub fn new(options: SoloOptions) -> Self {
        let session = options
            .seed
            .map_or_else(GameSession::new, GameSession::with_seed);
        let leaderboard = FallbackLeaderboard::new(JsonFileLeaderboard::new(options.leaderboard));
        let top = leaderboard.top();
        Self {
            session,
            nickname: options.nickname.filter(|name| !name.trim().is_empty()),
            leaderboard,
            top,
            submitted: None,
        }
    }

    fn restart(&mut self) {
        self.session.restart();
        self.submitted = None;
    }

    fn submit_score(&mut self) {
        let stats = self.session.controller().stats();
        let Some(nickname) = &self.nickname else {
            log::info!("final score {} not submitted: no nickname", stats.score());
            self.top = self.leaderboard.top();
            return;
        };
        let entry = LeaderboardEntry::now(nickname.as_str(), stats.score(), stats.level());
        log::info!("submitting score {} for {nickname}", entry.score);
        self.top = self.leaderboard.submit(entry.clone());
        self.submitted = Some(entry);
    }

    fn border_color(&self) -> ratatui::style::Color {
        match self.session.state() {
            SessionState::CountingDown => color::CYAN,
            SessionState::Playing => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        }
    }

    fn popup(&self) -> Option<(String, Style)> {
        match self.session.state() {
            SessionState::CountingDown => self
                .session
                .countdown()
                .map(|n| (n.to_string(), Style::new().fg(color::BLACK).bg(color::CYAN))),
            SessionState::Playing => None,
            SessionState::Paused => Some((
                "PAUSED".to_owned(),
                Style::new().fg(color::BLACK).bg(color::YELLOW),
            )),
            SessionState::GameOver => Some((
                format!("GAME OVER  {}", self.session.controller().stats().score()),
                Style::new().fg(color::WHITE).bg(color::RED),
            )),
        }
    }

    fn status_line(&self) -> Line<'_> {
        if let Some(error) = self.leaderboard.last_error() {
            return Line::styled(format!("leaderboard: {error} (kept in memory)"), style::NOTICE);
        }
        match (&self.submitted, &self.nickname) {
            (Some(entry), _) => Line::styled(
                format!("score {} saved for {}", entry.score, entry.nickname),
                style::DEFAULT,
            ),
            (None, Some(nickname)) => Line::styled(format!("playing as {nickname}"), style::DEFAULT),
            (None, None) => Line::styled("no nickname: scores are not saved", style::EMPTY_DOT),
        }
    }
}

impl Screen for SoloScreen {
    fn on_active(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(60.0);
        tui.set_render_mode(RenderMode::from_rate(60.0));
    }

    fn on_inactive(&mut self, _tui: &mut Tui) {}

    fn on_close(&mut self, _tui: &mut Tui) {
        log::info!(
            "solo game closed at score {}",
            self.session.controller().stats().score()
        );
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: &Event) -> ScreenTransition {
        let Some(code) = super::pressed_key(event) else {
            return ScreenTransition::Stay;
        };
        match code {
            KeyCode::Esc | KeyCode::Char('q') => return ScreenTransition::Pop,
            KeyCode::Char('p') => self.session.toggle_pause(),
            KeyCode::Char('r') => self.restart(),
            code => {
                if let Some(action) = keymap::lookup(keymap::SOLO, code) {
                    _ = self.session.apply(action);
                }
            }
        }
        ScreenTransition::Stay
    }

    fn update(&mut self, _tui: &mut Tui, elapsed: Duration) {
        self.session.advance(elapsed);
        let events: Vec<_> = self.session.drain_events().collect();
        for event in events {
            match event {
                GameEvent::GameOver => self.submit_score(),
                GameEvent::LevelChanged(level) => log::info!("reached level {level}"),
                event => log::trace!("{event:?}"),
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let [main_area, status_area, help_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .areas(frame.area());

        let state = self.session.state();
        let player = PlayerDisplay::new(self.session.controller(), self.border_color())
            .title("BLOCKFALL")
            .solo(self.session.play_time())
            .show_piece(!state.is_counting_down())
            .popup(self.popup());
        frame.render_widget(&player, main_area);
        frame.render_widget(self.status_line().centered(), status_area);
        frame.render_widget(
            KeyBindingDisplay::new(keymap::SOLO).with(CONTROL_HINTS),
            help_area,
        );

        if state.is_game_over() {
            let table = LeaderboardDisplay::new(&self.top)
                .highlight(self.submitted.as_ref())
                .block(Block::bordered().title(Line::from("LEADERBOARD").centered()));
            let [_, table_area] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(table.height()),
            ])
            .areas(main_area);
            let [table_area] = Layout::horizontal([Constraint::Length(LeaderboardDisplay::width())])
                .flex(Flex::Center)
                .areas(table_area);
            frame.render_widget(Clear, table_area);
            frame.render_widget(table, table_area);
        }
    }
}
