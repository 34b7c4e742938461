use std::{fmt, time::Duration};

use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::{App, Tui};

/// One screen of the application, managed by a [`ScreenStack`].
///
/// # Lifecycle
///
/// ```text
/// on_active() <-----------+
///   |                     | screen above pops
/// (foreground)            |
///   |                     |
/// on_inactive() --------> (background)
///   |
/// on_close()   only on Pop and Exit
/// ```
///
/// Screens configure the [`Tui`] tick and render settings in
/// [`Self::on_active`], so the settings follow whichever screen is on top.
pub trait Screen: fmt::Debug {
    /// Called when the screen reaches the top of the stack.
    fn on_active(&mut self, tui: &mut Tui);

    /// Called when the screen leaves the top of the stack, whether it is
    /// covered or removed.
    fn on_inactive(&mut self, tui: &mut Tui);

    /// Called after [`Self::on_inactive`] when the screen is removed for good.
    fn on_close(&mut self, tui: &mut Tui);

    fn handle_event(&mut self, tui: &mut Tui, event: &Event) -> ScreenTransition;

    /// Advances the screen by the time elapsed since the previous tick.
    fn update(&mut self, tui: &mut Tui, elapsed: Duration);

    fn draw(&self, frame: &mut Frame);
}

/// What the stack does after a screen handled an event.
#[derive(Debug)]
pub enum ScreenTransition {
    Stay,
    /// Covers the current screen with a new one.
    Push(Box<dyn Screen>),
    /// Removes the current screen and reactivates the one below.
    Pop,
    /// Closes every screen and leaves the event loop.
    Exit,
}

#[derive(Debug)]
pub struct ScreenStack {
    screens: Vec<Box<dyn Screen>>,
    should_exit: bool,
}

impl ScreenStack {
    pub fn new(initial: Box<dyn Screen>) -> Self {
        Self {
            screens: vec![initial],
            should_exit: false,
        }
    }

    fn close_top(&mut self, tui: &mut Tui) {
        if let Some(mut screen) = self.screens.pop() {
            screen.on_inactive(tui);
            screen.on_close(tui);
        }
    }

    fn apply_transition(&mut self, tui: &mut Tui, transition: ScreenTransition) {
        match transition {
            ScreenTransition::Stay => {}
            ScreenTransition::Push(mut screen) => {
                if let Some(current) = self.screens.last_mut() {
                    current.on_inactive(tui);
                }
                screen.on_active(tui);
                self.screens.push(screen);
            }
            ScreenTransition::Pop => {
                self.close_top(tui);
                if let Some(previous) = self.screens.last_mut() {
                    previous.on_active(tui);
                }
            }
            ScreenTransition::Exit => {
                while !self.screens.is_empty() {
                    self.close_top(tui);
                }
                self.should_exit = true;
            }
        }
    }
}

impl App for ScreenStack {
    fn init(&mut self, tui: &mut Tui) {
        if let Some(screen) = self.screens.last_mut() {
            screen.on_active(tui);
        }
    }

    fn should_exit(&self) -> bool {
        self.should_exit || self.screens.is_empty()
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) {
        if let Some(current) = self.screens.last_mut() {
            let transition = current.handle_event(tui, &event);
            self.apply_transition(tui, transition);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        if let Some(current) = self.screens.last() {
            current.draw(frame);
        }
    }

    fn update(&mut self, tui: &mut Tui, elapsed: Duration) {
        if let Some(current) = self.screens.last_mut() {
            current.update(tui, elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;

    type Journal = Rc<RefCell<Vec<String>>>;

    #[derive(Debug)]
    struct Probe {
        name: &'static str,
        journal: Journal,
        next: Option<ScreenTransition>,
    }

    impl Probe {
        fn boxed(name: &'static str, journal: &Journal) -> Box<Self> {
            Box::new(Self {
                name,
                journal: Rc::clone(journal),
                next: None,
            })
        }

        fn then(mut self: Box<Self>, transition: ScreenTransition) -> Box<Self> {
            self.next = Some(transition);
            self
        }

        fn note(&self, call: &str) {
            self.journal.borrow_mut().push(format!("{} {call}", self.name));
        }
    }

    impl Screen for Probe {
        fn on_active(&mut self, _tui: &mut Tui) {
            self.note("active");
        }

        fn on_inactive(&mut self, _tui: &mut Tui) {
            self.note("inactive");
        }

        fn on_close(&mut self, _tui: &mut Tui) {
            self.note("close");
        }

        fn handle_event(&mut self, _tui: &mut Tui, _event: &Event) -> ScreenTransition {
            self.note("event");
            self.next.take().unwrap_or(ScreenTransition::Stay)
        }

        fn update(&mut self, _tui: &mut Tui, elapsed: Duration) {
            self.note(&format!("update {}ms", elapsed.as_millis()));
        }

        fn draw(&self, _frame: &mut Frame) {}
    }

    fn key() -> Event {
        Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
    }

    fn drain(journal: &Journal) -> Vec<String> {
        journal.borrow_mut().drain(..).collect()
    }

    #[test]
    fn test_push_then_pop_reactivates_parent() {
        let journal = Journal::default();
        let child = Probe::boxed("child", &journal).then(ScreenTransition::Pop);
        let mut stack =
            ScreenStack::new(Probe::boxed("menu", &journal).then(ScreenTransition::Push(child)));
        let mut tui = Tui::new();

        stack.init(&mut tui);
        stack.handle_event(&mut tui, key());
        assert_eq!(
            drain(&journal),
            ["menu active", "menu event", "menu inactive", "child active"]
        );

        stack.update(&mut tui, Duration::from_millis(16));
        stack.handle_event(&mut tui, key());
        assert_eq!(
            drain(&journal),
            [
                "child update 16ms",
                "child event",
                "child inactive",
                "child close",
                "menu active",
            ]
        );
        assert!(!stack.should_exit());
    }

    #[test]
    fn test_exit_closes_every_screen_top_down() {
        let journal = Journal::default();
        let mut stack = ScreenStack::new(Probe::boxed("a", &journal));
        let mut tui = Tui::new();
        stack.init(&mut tui);
        stack.apply_transition(&mut tui, ScreenTransition::Push(Probe::boxed("b", &journal)));
        drain(&journal);

        stack.apply_transition(&mut tui, ScreenTransition::Exit);
        assert_eq!(
            drain(&journal),
            ["b inactive", "b close", "a inactive", "a close"]
        );
        assert!(stack.should_exit());
    }

    #[test]
    fn test_popping_last_screen_exits() {
        let journal = Journal::default();
        let mut stack = ScreenStack::new(Probe::boxed("a", &journal).then(ScreenTransition::Pop));
        let mut tui = Tui::new();
        stack.init(&mut tui);
        assert!(!stack.should_exit());
        stack.handle_event(&mut tui, key());
        assert!(stack.should_exit());
    }
}
