use std::time::Duration;

use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    text::{Line, Text},
    widgets::{Block, Padding, Paragraph},
};

use crate::{
    screens::{LeaderboardScreen, SoloOptions, SoloScreen, VersusOptions, VersusScreen},
    tui::{RenderMode, Screen, ScreenTransition, Tui},
    view::widgets::{KeyBindingDisplay, KeyHint, style},
};

const HINTS: &[KeyHint] = &[("↑/↓", "Select"), ("Enter", "Start"), ("Esc", "Quit")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Solo,
    Versus,
    Leaderboard,
    Quit,
}

impl MenuItem {
    const ALL: [MenuItem; 4] = [
        MenuItem::Solo,
        MenuItem::Versus,
        MenuItem::Leaderboard,
        MenuItem::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuItem::Solo => "Single Player",
            MenuItem::Versus => "Battle Mode",
            MenuItem::Leaderboard => "Leaderboard",
            MenuItem::Quit => "Quit",
        }
    }
}

/// Mode selection shown when no subcommand is given.
#[derive(Debug)]
pub struct MenuScreen {
    solo: SoloOptions,
    versus: VersusOptions,
    selected: usize,
}

impl MenuScreen {
    pub fn new(solo: SoloOptions, versus: VersusOptions) -> Self {
        Self {
            solo,
            versus,
            selected: 0,
        }
    }

    fn select_next(&mut self) {
        self.selected = (self.selected + 1) % MenuItem::ALL.len();
    }

    fn select_previous(&mut self) {
        self.selected = (self.selected + MenuItem::ALL.len() - 1) % MenuItem::ALL.len();
    }

    fn open(&self, item: MenuItem) -> ScreenTransition {
        log::debug!("menu: {}", item.label());
        match item {
            MenuItem::Solo => ScreenTransition::Push(Box::new(SoloScreen::new(self.solo.clone()))),
            MenuItem::Versus => {
                ScreenTransition::Push(Box::new(VersusScreen::new(self.versus.clone())))
            }
            MenuItem::Leaderboard => ScreenTransition::Push(Box::new(LeaderboardScreen::new(
                self.solo.leaderboard.clone(),
            ))),
            MenuItem::Quit => ScreenTransition::Exit,
        }
    }
}

impl Screen for MenuScreen {
    fn on_active(&mut self, tui: &mut Tui) {
        tui.set_tick_interval(None);
        tui.set_render_mode(RenderMode::OnDirty);
    }

    fn on_inactive(&mut self, _tui: &mut Tui) {}

    fn on_close(&mut self, _tui: &mut Tui) {}

    fn handle_event(&mut self, _tui: &mut Tui, event: &Event) -> ScreenTransition {
        let Some(code) = super::pressed_key(event) else {
            return ScreenTransition::Stay;
        };
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => self.select_next(),
            KeyCode::Enter | KeyCode::Char(' ') => return self.open(MenuItem::ALL[self.selected]),
            KeyCode::Char('1') => return self.open(MenuItem::Solo),
            KeyCode::Char('2') => return self.open(MenuItem::Versus),
            KeyCode::Char('3') => return self.open(MenuItem::Leaderboard),
            KeyCode::Esc | KeyCode::Char('q') => return ScreenTransition::Exit,
            _ => {}
        }
        ScreenTransition::Stay
    }

    fn update(&mut self, _tui: &mut Tui, _elapsed: Duration) {}

    fn draw(&self, frame: &mut Frame) {
        let lines: Vec<Line> = MenuItem::ALL
            .iter()
            .enumerate()
            .map(|(i, item)| {
                if i == self.selected {
                    Line::styled(format!("> {} <", item.label()), style::HIGHLIGHT)
                } else {
                    Line::styled(item.label(), style::DEFAULT)
                }
            })
            .collect();
        let height = u16::try_from(lines.len()).unwrap_or(u16::MAX) + 2;
        let menu = Paragraph::new(Text::from(lines)).centered().block(
            Block::bordered()
                .title(Line::from("BLOCKFALL").centered())
                .padding(Padding::horizontal(2))
                .style(style::DEFAULT),
        );

        let [menu_area, help_area] =
            Layout::vertical([Constraint::Length(height), Constraint::Length(1)])
                .flex(Flex::Center)
                .spacing(1)
                .areas(frame.area());
        let [menu_area] = Layout::horizontal([Constraint::Length(28)])
            .flex(Flex::Center)
            .areas(menu_area);
        frame.render_widget(menu, menu_area);
        frame.render_widget(KeyBindingDisplay::hints(HINTS), help_area);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    fn menu() -> MenuScreen {
        MenuScreen::new(
            SoloOptions {
                nickname: None,
                leaderboard: PathBuf::from("unused.json"),
                seed: None,
            },
            VersusOptions::default(),
        )
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_selection_wraps() {
        let mut menu = menu();
        let mut tui = Tui::new();
        _ = menu.handle_event(&mut tui, &press(KeyCode::Up));
        assert_eq!(MenuItem::ALL[menu.selected], MenuItem::Quit);
        _ = menu.handle_event(&mut tui, &press(KeyCode::Down));
        assert_eq!(MenuItem::ALL[menu.selected], MenuItem::Solo);
    }

    #[test]
    fn test_quit_and_escape_exit() {
        let mut menu = menu();
        let mut tui = Tui::new();
        assert!(matches!(
            menu.handle_event(&mut tui, &press(KeyCode::Esc)),
            ScreenTransition::Exit
        ));
        menu.selected = 3;
        assert!(matches!(
            menu.handle_event(&mut tui, &press(KeyCode::Enter)),
            ScreenTransition::Exit
        ));
    }

    #[test]
    fn test_enter_opens_selected_mode() {
        let mut menu = menu();
        let mut tui = Tui::new();
        _ = menu.handle_event(&mut tui, &press(KeyCode::Down));
        assert!(matches!(
            menu.handle_event(&mut tui, &press(KeyCode::Enter)),
            ScreenTransition::Push(_)
        ));
    }
}
