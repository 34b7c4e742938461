use std::time::Duration;

use blockfall_engine::{MatchConfig, MatchOutcome, MatchPhase, PieceSeed, Player, VersusMatch};
use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Line,
};

use crate::{
    keymap,
    tui::{RenderMode, Screen, ScreenTransition, Tui},
    view::widgets::{KeyBindingDisplay, KeyHint, PlayerDisplay, color, format_clock, style},
};

const CONTROL_HINTS: &[KeyHint] = &[("R", "Restart"), ("Esc", "Menu")];

#[derive(Debug, Clone, Default)]
pub struct VersusOptions {
    pub config: MatchConfig,
    /// Both players draw pieces from this seed when set.
    pub seed: Option<PieceSeed>,
}

/// Two players sharing one keyboard.
#[derive(Debug)]
pub struct VersusScreen {
    versus: VersusMatch,
}

impl VersusScreen {
    pub fn new(options: VersusOptions) -> Self {
        let mut versus = match options.seed {
            Some(seed) => VersusMatch::with_seeds(options.config, [seed, seed]),
            None => VersusMatch::new(options.config),
        };
        versus.start();
        Self { versus }
    }

    fn header(&self) -> Line<'_> {
        match self.versus.phase() {
            MatchPhase::Idle => Line::styled("waiting", style::EMPTY_DOT),
            MatchPhase::CountingDown => Line::styled("GET READY", style::NOTICE),
            MatchPhase::Active => {
                let remaining = Duration::from_secs(u64::from(self.versus.remaining_secs()));
                Line::styled(
                    format!("TIME {}", format_clock(remaining)),
                    style::DEFAULT,
                )
            }
            MatchPhase::Finished => match self.versus.outcome() {
                Some(outcome) => Line::styled(format!("{outcome}  |  R to play again"), style::NOTICE),
                None => Line::styled("finished", style::NOTICE),
            },
        }
    }

    fn border_color(&self, player: Player) -> Color {
        match (self.versus.phase(), self.versus.outcome()) {
            (MatchPhase::CountingDown, _) => color::CYAN,
            (MatchPhase::Finished, Some(outcome)) => match outcome.winner() {
                Some(winner) if winner == player => color::GREEN,
                Some(_) => color::RED,
                None => color::YELLOW,
            },
            _ => color::WHITE,
        }
    }

    fn popup(&self, player: Player) -> Option<(String, Style)> {
        match self.versus.phase() {
            MatchPhase::CountingDown => self
                .versus
                .countdown()
                .map(|n| (n.to_string(), Style::new().fg(color::BLACK).bg(color::CYAN))),
            MatchPhase::Finished => {
                let outcome = self.versus.outcome()?;
                let (text, bg) = match outcome {
                    MatchOutcome::Tie(_) => ("DRAW", color::YELLOW),
                    MatchOutcome::Winner { player: winner, .. } if winner == player => {
                        ("WIN", color::GREEN)
                    }
                    MatchOutcome::Winner { .. } => ("LOSE", color::RED),
                };
                Some((text.to_owned(), Style::new().fg(color::BLACK).bg(bg)))
            }
            MatchPhase::Idle | MatchPhase::Active => None,
        }
    }
}

impl Screen for VersusScreen {
    fn on_active(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(60.0);
        tui.set_render_mode(RenderMode::from_rate(60.0));
    }

    fn on_inactive(&mut self, _tui: &mut Tui) {}

    fn on_close(&mut self, _tui: &mut Tui) {
        self.versus.abandon();
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: &Event) -> ScreenTransition {
        let Some(code) = super::pressed_key(event) else {
            return ScreenTransition::Stay;
        };
        match code {
            KeyCode::Esc | KeyCode::Char('q') => return ScreenTransition::Pop,
            KeyCode::Char('r') => self.versus.restart(),
            code => {
                if let Some((player, action)) = keymap::lookup_versus(code) {
                    _ = self.versus.apply(player, action);
                }
            }
        }
        ScreenTransition::Stay
    }

    fn update(&mut self, _tui: &mut Tui, elapsed: Duration) {
        self.versus.advance(elapsed);
        for player in Player::BOTH {
            for event in self.versus.drain_events(player) {
                log::trace!("{player}: {event:?}");
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let [header_area, boards_area, help_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(frame.area());
        frame.render_widget(self.header().centered(), header_area);

        let board_areas: [_; 2] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(boards_area);
        let show_piece = !self.versus.phase().is_counting_down();
        for (player, area) in Player::BOTH.into_iter().zip(board_areas) {
            let display = PlayerDisplay::new(self.versus.controller(player), self.border_color(player))
                .title(player.to_string())
                .show_piece(show_piece)
                .popup(self.popup(player));
            frame.render_widget(&display, area);
        }

        let [p1_area, p2_area, control_area] =
            Layout::vertical([Constraint::Length(1); 3]).areas(help_area);
        frame.render_widget(
            KeyBindingDisplay::new(keymap::PLAYER_ONE).title("P1"),
            p1_area,
        );
        frame.render_widget(
            KeyBindingDisplay::new(keymap::PLAYER_TWO).title("P2"),
            p2_area,
        );
        frame.render_widget(KeyBindingDisplay::hints(CONTROL_HINTS), control_area);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn screen() -> VersusScreen {
        VersusScreen::new(VersusOptions {
            config: MatchConfig {
                duration_secs: 5,
                countdown_from: 0,
            },
            seed: Some(PieceSeed::from_bytes([7; 16])),
        })
    }

    #[test]
    fn test_keys_route_to_each_player() {
        let mut screen = screen();
        let mut tui = Tui::new();
        assert!(screen.versus.phase().is_active());

        _ = screen.handle_event(&mut tui, &press(KeyCode::Char('e')));
        assert_eq!(screen.versus.controller(Player::One).stats().pieces(), 1);
        assert_eq!(screen.versus.controller(Player::Two).stats().pieces(), 0);

        _ = screen.handle_event(&mut tui, &press(KeyCode::Char(' ')));
        assert_eq!(screen.versus.controller(Player::Two).stats().pieces(), 1);
    }

    #[test]
    fn test_time_up_shows_outcome_and_restart_resets() {
        let mut screen = screen();
        let mut tui = Tui::new();
        screen.update(&mut tui, Duration::from_secs(5));
        assert!(screen.versus.phase().is_finished());
        assert_eq!(
            screen.popup(Player::One).map(|(text, _)| text).as_deref(),
            Some("DRAW")
        );

        _ = screen.handle_event(&mut tui, &press(KeyCode::Char('r')));
        assert!(screen.versus.phase().is_active());
        assert_eq!(screen.versus.remaining_secs(), 5);
    }

    #[test]
    fn test_escape_returns_to_menu() {
        let mut screen = screen();
        let mut tui = Tui::new();
        assert!(matches!(
            screen.handle_event(&mut tui, &press(KeyCode::Esc)),
            ScreenTransition::Pop
        ));
    }
}
