use std::{cmp::Ordering, time::Duration};

use super::{
    bag::PieceSeed,
    controller::{GameEvent, LockOutcome, PieceController},
    garbage::GarbageExchange,
    input::{Action, Player},
    session::COUNTDOWN_FROM,
    timer::{IntervalTimer, earliest_due},
};

const CLOCK_PERIOD: Duration = Duration::from_secs(1);

/// Default match length in seconds.
pub const DEFAULT_MATCH_SECS: u32 = 60;

/// Match settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    /// Match length in seconds after the countdown.
    pub duration_secs: u32,
    /// First value of the countdown. Zero starts the match immediately.
    pub countdown_from: u8,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_MATCH_SECS,
            countdown_from: COUNTDOWN_FROM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MatchPhase {
    Idle,
    CountingDown,
    Active,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum FinishReason {
    #[display("time up")]
    TimeUp,
    #[display("top out")]
    TopOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MatchOutcome {
    #[display("{player} wins ({reason})")]
    Winner {
        player: Player,
        reason: FinishReason,
    },
    #[display("tie ({_0})")]
    Tie(FinishReason),
}

impl MatchOutcome {
    #[must_use]
    pub fn winner(self) -> Option<Player> {
        match self {
            MatchOutcome::Winner { player, .. } => Some(player),
            MatchOutcome::Tie(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
struct PlayerSlot {
    controller: PieceController,
    gravity: IntervalTimer,
}

impl PlayerSlot {
    fn new(seed: Option<PieceSeed>) -> Self {
        let controller = seed.map_or_else(PieceController::new, PieceController::with_seed);
        let gravity = IntervalTimer::disarmed(controller.gravity_interval());
        Self {
            controller,
            gravity,
        }
    }
}

/// A timed head-to-head match between two boards.
///
/// `idle → counting down → active → finished`. The shared clock ticks once
/// per second: first through the countdown, then through the match time.
/// Each board runs its own gravity timer. Clearing two or more rows sends
/// garbage to the opponent, delivered before the call that cleared them
/// returns.
///
/// The match ends when the time runs out (higher score wins) or when a board
/// tops out (the other board wins; if both top out at the same instant the
/// scores decide).
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{FinishReason, MatchConfig, MatchOutcome, VersusMatch};
///
/// let config = MatchConfig { duration_secs: 5, ..MatchConfig::default() };
/// let mut versus = VersusMatch::new(config);
/// versus.start();
/// versus.advance(Duration::from_secs(3));
/// assert!(versus.phase().is_active());
///
/// versus.advance(Duration::from_secs(5));
/// assert_eq!(versus.outcome(), Some(MatchOutcome::Tie(FinishReason::TimeUp)));
/// ```
#[derive(Debug, Clone)]
pub struct VersusMatch {
    config: MatchConfig,
    seeds: Option<[PieceSeed; 2]>,
    phase: MatchPhase,
    countdown: u8,
    remaining_secs: u32,
    clock: IntervalTimer,
    players: [PlayerSlot; 2],
    exchange: GarbageExchange,
    outcome: Option<MatchOutcome>,
}

impl VersusMatch {
    /// Creates an idle match with random seeds.
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        Self::build(config, None)
    }

    /// Like [`Self::new`], but every game of this match, including restarts,
    /// uses the given seeds for player one and two.
    #[must_use]
    pub fn with_seeds(config: MatchConfig, seeds: [PieceSeed; 2]) -> Self {
        Self::build(config, Some(seeds))
    }

    fn build(config: MatchConfig, seeds: Option<[PieceSeed; 2]>) -> Self {
        let [seed1, seed2] = seeds.map_or([None, None], |seeds| seeds.map(Some));
        Self {
            config,
            seeds,
            phase: MatchPhase::Idle,
            countdown: config.countdown_from,
            remaining_secs: config.duration_secs,
            clock: IntervalTimer::disarmed(CLOCK_PERIOD),
            players: [PlayerSlot::new(seed1), PlayerSlot::new(seed2)],
            exchange: GarbageExchange::new(),
            outcome: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Returns the remaining countdown while counting down.
    #[must_use]
    pub fn countdown(&self) -> Option<u8> {
        self.phase.is_counting_down().then_some(self.countdown)
    }

    /// Returns the remaining match time in whole seconds.
    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    #[must_use]
    pub fn controller(&self, player: Player) -> &PieceController {
        &self.players[player.index()].controller
    }

    /// Gives direct access to a board, for example to set up a position
    /// before the match starts.
    pub fn controller_mut(&mut self, player: Player) -> &mut PieceController {
        &mut self.players[player.index()].controller
    }

    pub fn drain_events(&mut self, player: Player) -> impl Iterator<Item = GameEvent> + '_ {
        self.players[player.index()].controller.drain_events()
    }

    /// Starts the countdown. Has no effect unless idle.
    pub fn start(&mut self) {
        if !self.phase.is_idle() {
            return;
        }
        log::info!("match starting");
        self.countdown = self.config.countdown_from;
        if self.countdown == 0 {
            self.activate();
            return;
        }
        self.phase = MatchPhase::CountingDown;
        self.clock.rearm(CLOCK_PERIOD);
    }

    /// Cancels every timer, resets both boards and the clock, and starts a
    /// new countdown.
    pub fn restart(&mut self) {
        self.abandon();
        self.start();
    }

    /// Cancels every timer and returns to idle with fresh boards.
    pub fn abandon(&mut self) {
        self.cancel_timers();
        *self = Self::build(self.config, self.seeds);
        log::info!("match reset");
    }

    /// Applies `action` to `player`'s board. Inputs are ignored unless active.
    pub fn apply(&mut self, player: Player, action: Action) -> Option<LockOutcome> {
        if !self.phase.is_active() {
            return None;
        }
        let outcome = self.players[player.index()].controller.apply(action);
        if let Some(outcome) = outcome {
            self.after_lock(player, outcome);
        }
        self.check_top_out();
        outcome
    }

    /// Advances the match by `dt`, firing due timers in chronological order.
    ///
    /// Timers due at the same instant fire clock first, then player one, then
    /// player two. Top-out is checked once all of them have fired.
    pub fn advance(&mut self, dt: Duration) {
        let mut budget = dt;
        while matches!(self.phase, MatchPhase::CountingDown | MatchPhase::Active) {
            let [p1, p2] = &self.players;
            let timers = [&self.clock, &p1.gravity, &p2.gravity];
            let Some((_, wait)) = earliest_due(&timers, budget) else {
                self.advance_timers(budget);
                break;
            };
            budget -= wait;
            let [clock, gravity1, gravity2] = self.advance_timers(wait);
            if clock && self.clock.is_armed() {
                self.on_clock();
            }
            for (player, fired) in [(Player::One, gravity1), (Player::Two, gravity2)] {
                if fired && self.players[player.index()].gravity.is_armed() {
                    self.on_gravity(player);
                }
            }
            self.check_top_out();
        }
    }

    fn advance_timers(&mut self, dt: Duration) -> [bool; 3] {
        let [p1, p2] = &mut self.players;
        [&mut self.clock, &mut p1.gravity, &mut p2.gravity].map(|timer| timer.advance(dt) > 0)
    }

    fn cancel_timers(&mut self) {
        self.clock.cancel();
        for slot in &mut self.players {
            slot.gravity.cancel();
        }
    }

    fn activate(&mut self) {
        self.phase = MatchPhase::Active;
        self.remaining_secs = self.config.duration_secs;
        self.clock.rearm(CLOCK_PERIOD);
        for slot in &mut self.players {
            slot.gravity.rearm(slot.controller.gravity_interval());
        }
        log::info!("match started: {} seconds", self.remaining_secs);
    }

    fn on_clock(&mut self) {
        match self.phase {
            MatchPhase::CountingDown => {
                self.countdown = self.countdown.saturating_sub(1);
                if self.countdown == 0 {
                    self.activate();
                }
            }
            MatchPhase::Active => {
                self.remaining_secs = self.remaining_secs.saturating_sub(1);
                if self.remaining_secs == 0 {
                    self.finish(self.by_score(FinishReason::TimeUp));
                }
            }
            MatchPhase::Idle | MatchPhase::Finished => {}
        }
    }

    fn on_gravity(&mut self, player: Player) {
        if !self.phase.is_active() {
            return;
        }
        if let Some(outcome) = self.players[player.index()].controller.gravity_tick() {
            self.after_lock(player, outcome);
        }
    }

    /// Sends and delivers garbage for a lock and keeps gravity in step with
    /// the level.
    fn after_lock(&mut self, player: Player, outcome: LockOutcome) {
        if outcome.garbage > 0 {
            self.exchange.send(player, outcome.garbage);
            self.players[player.index()]
                .controller
                .record_garbage_sent(outcome.garbage);
            log::debug!("{player} sends {} garbage rows", outcome.garbage);
        }
        let opponent = player.opponent();
        if let Some(rows) = self.exchange.take(opponent) {
            self.players[opponent.index()]
                .controller
                .receive_garbage(rows.get());
        }

        let slot = &mut self.players[player.index()];
        let interval = slot.controller.gravity_interval();
        if slot.gravity.is_armed() && interval != slot.gravity.period() {
            slot.gravity.rearm(interval);
        }
    }

    fn check_top_out(&mut self) {
        if !self.phase.is_active() {
            return;
        }
        let [p1, p2] = &self.players;
        let outcome = match (p1.controller.is_game_over(), p2.controller.is_game_over()) {
            (false, false) => return,
            (true, false) => MatchOutcome::Winner {
                player: Player::Two,
                reason: FinishReason::TopOut,
            },
            (false, true) => MatchOutcome::Winner {
                player: Player::One,
                reason: FinishReason::TopOut,
            },
            (true, true) => self.by_score(FinishReason::TopOut),
        };
        self.finish(outcome);
    }

    fn by_score(&self, reason: FinishReason) -> MatchOutcome {
        let [p1, p2] = &self.players;
        let player = match p1
            .controller
            .stats()
            .score()
            .cmp(&p2.controller.stats().score())
        {
            Ordering::Greater => Player::One,
            Ordering::Less => Player::Two,
            Ordering::Equal => return MatchOutcome::Tie(reason),
        };
        MatchOutcome::Winner { player, reason }
    }

    fn finish(&mut self, outcome: MatchOutcome) {
        self.cancel_timers();
        self.exchange.clear();
        self.phase = MatchPhase::Finished;
        self.outcome = Some(outcome);
        log::info!("match finished: {outcome}");
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{Board, Cell, PieceKind};

    use super::*;

    fn config(duration_secs: u32) -> MatchConfig {
        MatchConfig {
            duration_secs,
            countdown_from: 3,
        }
    }

    fn seeds() -> [PieceSeed; 2] {
        [PieceSeed::from_bytes([1; 16]), PieceSeed::from_bytes([2; 16])]
    }

    fn active(duration_secs: u32) -> VersusMatch {
        let mut versus = VersusMatch::with_seeds(config(duration_secs), seeds());
        versus.start();
        versus.advance(Duration::from_secs(3));
        assert!(versus.phase().is_active());
        versus
    }

    #[test]
    fn test_idle_until_started() {
        let mut versus = VersusMatch::with_seeds(config(60), seeds());
        assert!(versus.phase().is_idle());
        versus.advance(Duration::from_secs(10));
        assert!(versus.phase().is_idle());
        assert_eq!(versus.apply(Player::One, Action::HardDrop), None);
    }

    #[test]
    fn test_countdown_ticks_once_per_second() {
        let mut versus = VersusMatch::with_seeds(config(60), seeds());
        versus.start();
        assert_eq!(versus.countdown(), Some(3));
        versus.advance(Duration::from_secs(1));
        assert_eq!(versus.countdown(), Some(2));
        assert_eq!(versus.apply(Player::Two, Action::HardDrop), None);
        versus.advance(Duration::from_secs(2));
        assert_eq!(versus.countdown(), None);
        assert!(versus.phase().is_active());
        assert_eq!(versus.remaining_secs(), 60);
    }

    #[test]
    fn test_zero_countdown_starts_immediately() {
        let mut versus = VersusMatch::new(MatchConfig {
            duration_secs: 10,
            countdown_from: 0,
        });
        versus.start();
        assert!(versus.phase().is_active());
    }

    #[test]
    fn test_clock_counts_match_time() {
        let mut versus = active(60);
        versus.advance(Duration::from_millis(2500));
        assert_eq!(versus.remaining_secs(), 58);
    }

    #[test]
    fn test_time_up_with_equal_scores_is_a_tie() {
        let mut versus = active(5);
        versus.advance(Duration::from_secs(5));
        assert!(versus.phase().is_finished());
        assert_eq!(versus.outcome(), Some(MatchOutcome::Tie(FinishReason::TimeUp)));
    }

    #[test]
    fn test_both_boards_fall_independently() {
        let mut versus = active(60);
        versus.apply(Player::One, Action::SoftDrop);
        versus.advance(Duration::from_millis(600));
        assert_eq!(versus.controller(Player::One).position().y(), 2);
        assert_eq!(versus.controller(Player::Two).position().y(), 1);
    }

    #[test]
    fn test_top_out_ends_match() {
        let mut versus = active(60);
        while versus.phase().is_active() {
            versus.apply(Player::Two, Action::HardDrop);
        }
        assert_eq!(
            versus.outcome(),
            Some(MatchOutcome::Winner {
                player: Player::One,
                reason: FinishReason::TopOut,
            })
        );
        assert!(!versus.controller(Player::One).is_game_over());
        // Finished is terminal.
        let pieces = versus.controller(Player::One).stats().pieces();
        versus.advance(Duration::from_secs(120));
        assert_eq!(versus.apply(Player::One, Action::HardDrop), None);
        assert_eq!(versus.controller(Player::One).stats().pieces(), pieces);
    }

    #[test]
    fn test_hold_top_out_ends_match_immediately() {
        let mut versus = active(60);
        let p1 = versus.controller_mut(Player::One);
        while p1.move_left() {}
        for _ in 0..3 {
            p1.soft_drop();
        }
        let mut board = Board::EMPTY;
        for (x, y) in [(4, 0), (5, 0), (4, 1), (5, 1)] {
            board.set_cell(x, y, Cell::Garbage);
        }
        p1.replace_board(board);
        assert!(!versus.controller(Player::One).is_game_over());

        assert_eq!(versus.apply(Player::One, Action::Hold), None);
        assert!(versus.phase().is_finished());
        assert_eq!(
            versus.outcome(),
            Some(MatchOutcome::Winner {
                player: Player::Two,
                reason: FinishReason::TopOut,
            })
        );
        assert_eq!(versus.remaining_secs(), 60);
    }

    #[test]
    fn test_simultaneous_top_out_decided_by_score() {
        let seed = PieceSeed::from_bytes([5; 16]);
        let mut versus = VersusMatch::with_seeds(config(600), [seed, seed]);
        versus.start();
        versus.advance(Duration::from_secs(3));
        // Identical boards fed by identical gravity top out at the same instant.
        versus.advance(Duration::from_secs(590));
        assert_eq!(versus.outcome(), Some(MatchOutcome::Tie(FinishReason::TopOut)));
        assert!(versus.controller(Player::One).is_game_over());
        assert!(versus.controller(Player::Two).is_game_over());
    }

    #[test]
    fn test_garbage_sent_on_double() {
        let o_first = (0..=u8::MAX)
            .map(|byte| PieceSeed::from_bytes([byte; 16]))
            .find(|seed| PieceController::with_seed(*seed).current().kind() == PieceKind::O)
            .unwrap();
        let mut versus = VersusMatch::with_seeds(config(60), [o_first, seeds()[1]]);
        versus.start();
        versus.advance(Duration::from_secs(3));

        let mut board = Board::EMPTY;
        for y in 18..20 {
            for x in (0..4).chain(6..10) {
                board.set_cell(x, y, Cell::Garbage);
            }
        }
        versus.controller_mut(Player::One).replace_board(board);

        let outcome = versus.apply(Player::One, Action::HardDrop).unwrap();
        assert_eq!(outcome.rows_cleared, 2);
        assert_eq!(outcome.garbage, 1);
        assert!(
            versus
                .drain_events(Player::One)
                .any(|event| event == GameEvent::GarbageSent(1))
        );
        let p2 = versus.controller(Player::Two);
        assert_eq!(p2.stats().garbage_received(), 1);
        assert_eq!(p2.board().filled_cells(), 9);
        assert!(!versus.exchange.is_pending(Player::Two));
    }

    #[test]
    fn test_abandon_returns_to_idle() {
        let mut versus = active(60);
        versus.apply(Player::One, Action::HardDrop);
        versus.abandon();
        assert!(versus.phase().is_idle());
        assert!(versus.controller(Player::One).board().is_empty());
        versus.advance(Duration::from_secs(30));
        assert!(versus.phase().is_idle());
        assert_eq!(versus.controller(Player::One).position().y(), 0);
    }

    #[test]
    fn test_restart_after_finish() {
        let mut versus = active(2);
        versus.apply(Player::One, Action::HardDrop);
        versus.advance(Duration::from_secs(2));
        assert!(versus.phase().is_finished());

        versus.restart();
        assert_eq!(versus.countdown(), Some(3));
        assert_eq!(versus.outcome(), None);
        assert_eq!(versus.remaining_secs(), 2);
        for player in Player::BOTH {
            let controller = versus.controller(player);
            assert!(controller.board().is_empty());
            assert_eq!(controller.stats().pieces(), 0);
        }
        versus.advance(Duration::from_millis(2900));
        assert!(versus.phase().is_counting_down());
        assert_eq!(versus.controller(Player::Two).position().y(), 0);
    }
}
