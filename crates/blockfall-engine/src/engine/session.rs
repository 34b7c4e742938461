use std::time::Duration;

use super::{
    bag::PieceSeed,
    controller::{GameEvent, LockOutcome, PieceController},
    input::Action,
    timer::{IntervalTimer, earliest_due},
};

/// Seconds counted down before play starts.
pub const COUNTDOWN_FROM: u8 = 3;

const CLOCK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    CountingDown,
    Playing,
    Paused,
    GameOver,
}

/// A solo game: one board, a countdown, gravity and pause.
///
/// All timing comes from [`Self::advance`]; the session never reads the wall
/// clock.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{GameSession, PieceSeed};
///
/// let mut session = GameSession::with_seed(PieceSeed::from_bytes([1; 16]));
/// assert_eq!(session.countdown(), Some(3));
///
/// session.advance(Duration::from_secs(3));
/// assert!(session.state().is_playing());
///
/// // Level 1 gravity moves the piece one row every 600 ms.
/// session.advance(Duration::from_millis(1300));
/// assert_eq!(session.controller().position().y(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    seed: Option<PieceSeed>,
    controller: PieceController,
    state: SessionState,
    countdown: u8,
    clock: IntervalTimer,
    gravity: IntervalTimer,
    play_time: Duration,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Creates a session with a random seed, already counting down.
    #[must_use]
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Like [`Self::new`], but every game of this session, including restarts,
    /// uses `seed`.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::build(Some(seed))
    }

    fn build(seed: Option<PieceSeed>) -> Self {
        let controller = seed.map_or_else(PieceController::new, PieceController::with_seed);
        let gravity = IntervalTimer::disarmed(controller.gravity_interval());
        Self {
            seed,
            controller,
            state: SessionState::CountingDown,
            countdown: COUNTDOWN_FROM,
            clock: IntervalTimer::new(CLOCK_PERIOD),
            gravity,
            play_time: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &PieceController {
        &self.controller
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the remaining countdown while counting down.
    #[must_use]
    pub fn countdown(&self) -> Option<u8> {
        self.state.is_counting_down().then_some(self.countdown)
    }

    /// Returns the time spent playing, excluding countdown and pauses.
    #[must_use]
    pub fn play_time(&self) -> Duration {
        self.play_time
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.controller.drain_events()
    }

    /// Pauses or resumes play. Has no effect outside play.
    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            state => state,
        };
    }

    /// Cancels every timer, then starts a new game with a fresh board.
    pub fn restart(&mut self) {
        self.clock.cancel();
        self.gravity.cancel();
        *self = Self::build(self.seed);
        log::info!("solo session restarted");
    }

    /// Applies a player action. Inputs are ignored unless playing.
    pub fn apply(&mut self, action: Action) -> Option<LockOutcome> {
        if !self.state.is_playing() {
            return None;
        }
        let outcome = self.controller.apply(action);
        // A hold can top out without locking.
        if outcome.is_some() || self.controller.is_game_over() {
            self.after_lock();
        }
        outcome
    }

    /// Advances the session by `dt`, firing due timers in chronological order.
    ///
    /// Time does not pass while paused or after game over.
    pub fn advance(&mut self, dt: Duration) {
        let mut budget = dt;
        while matches!(
            self.state,
            SessionState::CountingDown | SessionState::Playing
        ) {
            let Some((_, wait)) = earliest_due(&[&self.clock, &self.gravity], budget) else {
                self.pass_time(budget);
                break;
            };
            budget -= wait;
            let clock_fired = self.clock.advance(wait) > 0;
            let gravity_fired = self.gravity.advance(wait) > 0;
            self.pass_play_time(wait);
            if clock_fired && self.clock.is_armed() {
                self.on_clock();
            }
            if gravity_fired && self.gravity.is_armed() {
                self.on_gravity();
            }
        }
    }

    fn pass_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
        self.gravity.advance(dt);
        self.pass_play_time(dt);
    }

    fn pass_play_time(&mut self, dt: Duration) {
        if self.state.is_playing() {
            self.play_time += dt;
        }
    }

    fn on_clock(&mut self) {
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return;
        }
        self.clock.cancel();
        self.gravity.rearm(self.controller.gravity_interval());
        self.state = SessionState::Playing;
        log::info!("solo game started");
    }

    fn on_gravity(&mut self) {
        if self.controller.gravity_tick().is_some() {
            self.after_lock();
        }
    }

    fn after_lock(&mut self) {
        if self.controller.is_game_over() {
            self.clock.cancel();
            self.gravity.cancel();
            self.state = SessionState::GameOver;
            return;
        }
        let interval = self.controller.gravity_interval();
        if interval != self.gravity.period() {
            self.gravity.rearm(interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{Board, Cell};

    use super::*;

    fn session() -> GameSession {
        GameSession::with_seed(PieceSeed::from_bytes([11; 16]))
    }

    fn playing() -> GameSession {
        let mut session = session();
        session.advance(Duration::from_secs(u64::from(COUNTDOWN_FROM)));
        session
    }

    #[test]
    fn test_countdown_then_play() {
        let mut session = session();
        assert_eq!(session.countdown(), Some(3));
        session.advance(Duration::from_millis(999));
        assert_eq!(session.countdown(), Some(3));
        session.advance(Duration::from_millis(1));
        assert_eq!(session.countdown(), Some(2));
        session.advance(Duration::from_secs(2));
        assert_eq!(session.countdown(), None);
        assert!(session.state().is_playing());
        assert_eq!(session.play_time(), Duration::ZERO);
    }

    #[test]
    fn test_inputs_ignored_during_countdown() {
        let mut session = session();
        assert_eq!(session.apply(Action::HardDrop), None);
        assert!(session.controller().board().is_empty());
    }

    #[test]
    fn test_gravity_moves_piece() {
        let mut session = playing();
        session.advance(Duration::from_millis(599));
        assert_eq!(session.controller().position().y(), 0);
        session.advance(Duration::from_millis(1));
        assert_eq!(session.controller().position().y(), 1);
        session.advance(Duration::from_millis(1800));
        assert_eq!(session.controller().position().y(), 4);
        assert_eq!(session.play_time(), Duration::from_millis(2400));
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut session = playing();
        session.toggle_pause();
        assert!(session.state().is_paused());
        session.advance(Duration::from_secs(10));
        assert_eq!(session.controller().position().y(), 0);
        assert_eq!(session.play_time(), Duration::ZERO);
        assert_eq!(session.apply(Action::MoveLeft), None);
        session.toggle_pause();
        session.advance(Duration::from_millis(600));
        assert_eq!(session.controller().position().y(), 1);
    }

    #[test]
    fn test_pause_ignored_during_countdown() {
        let mut session = session();
        session.toggle_pause();
        assert!(session.state().is_counting_down());
    }

    #[test]
    fn test_hard_drop_scores_lock() {
        let mut session = playing();
        let outcome = session.apply(Action::HardDrop).unwrap();
        assert_eq!(outcome.rows_cleared, 0);
        assert_eq!(session.controller().stats().pieces(), 1);
        assert_eq!(
            session.drain_events().collect::<Vec<_>>(),
            [GameEvent::ScoreChanged(0)]
        );
    }

    #[test]
    fn test_game_over_stops_session() {
        let mut session = playing();
        while !session.state().is_game_over() {
            session.apply(Action::HardDrop);
        }
        assert!(session.controller().is_game_over());
        let pieces = session.controller().stats().pieces();
        let play_time = session.play_time();
        session.advance(Duration::from_secs(60));
        assert_eq!(session.play_time(), play_time);
        assert_eq!(session.controller().stats().pieces(), pieces);
        session.toggle_pause();
        assert!(session.state().is_game_over());
    }

    #[test]
    fn test_hold_top_out_ends_session() {
        let mut session = playing();
        while session.controller.move_left() {}
        for _ in 0..3 {
            session.controller.soft_drop();
        }
        let mut board = Board::EMPTY;
        for (x, y) in [(4, 0), (5, 0), (4, 1), (5, 1)] {
            board.set_cell(x, y, Cell::Garbage);
        }
        session.controller.replace_board(board);
        assert!(!session.controller().is_game_over());

        assert_eq!(session.apply(Action::Hold), None);
        assert!(session.controller().is_game_over());
        assert!(session.state().is_game_over());
        session.advance(Duration::from_secs(10));
        assert_eq!(session.play_time(), Duration::ZERO);
    }

    #[test]
    fn test_gravity_locks_and_spawns() {
        let mut session = playing();
        // 19 rows at most for any piece, plus the locking tick.
        session.advance(Duration::from_millis(600 * 20));
        assert!(session.controller().stats().pieces() >= 1);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut session = playing();
        let first = session.controller().current();
        session.apply(Action::HardDrop);
        session.advance(Duration::from_secs(5));
        session.restart();
        assert_eq!(session.countdown(), Some(COUNTDOWN_FROM));
        assert!(session.controller().board().is_empty());
        assert_eq!(session.controller().stats().score(), 0);
        assert_eq!(session.controller().current(), first);
        assert_eq!(session.play_time(), Duration::ZERO);
        // No gravity fire survives the restart.
        session.advance(Duration::from_millis(2999));
        assert_eq!(session.controller().position().y(), 0);
    }
}
