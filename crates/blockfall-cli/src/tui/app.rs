use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Tui;

/// Application driven by [`Tui::run`].
pub trait App {
    /// Called once before the event loop starts.
    fn init(&mut self, tui: &mut Tui);

    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, resize, etc.).
    fn handle_event(&mut self, tui: &mut Tui, event: Event);

    fn draw(&self, frame: &mut Frame);

    /// Advances game logic by the wall time elapsed since the previous tick.
    fn update(&mut self, tui: &mut Tui, elapsed: Duration);
}
