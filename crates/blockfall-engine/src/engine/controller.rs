use std::time::Duration;

use rand::SeedableRng as _;
use rand_pcg::Pcg32;

use crate::core::{Board, Position, Tetromino};

use super::{
    bag::{PieceBag, PieceSeed},
    input::Action,
    scoring::{self, ScoreState},
};

/// Observable state of a [`PieceController`].
///
/// Spawning and locking happen synchronously inside a single call, so a
/// controller is either falling or topped out between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum ControllerState {
    Falling,
    GameOver,
}

/// Notification queued by a controller for its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameEvent {
    /// Rows removed by the last lock.
    LinesCleared(usize),
    /// Score after a lock. Emitted for every lock, even when nothing was cleared.
    ScoreChanged(u32),
    /// New level after a lock raised it.
    LevelChanged(u8),
    /// Garbage rows sent to the opponent.
    GarbageSent(u8),
    /// Garbage rows pushed into this board.
    GarbageReceived(u8),
    /// The board topped out.
    GameOver,
}

/// Result of a lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockOutcome {
    /// Number of completed rows removed.
    pub rows_cleared: usize,
    /// Points added to the score.
    pub score_delta: u32,
    /// Garbage rows this lock is worth in a match.
    pub garbage: u8,
    /// Whether the following spawn collided.
    pub topped_out: bool,
}

/// The active piece of one board, together with the board, the randomizers
/// and the statistics that the lock step updates.
///
/// Illegal inputs are no-ops: movement methods report whether they applied,
/// and drop methods report the [`LockOutcome`] of a lock if one happened.
/// After top-out every input is ignored.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceController, Position};
///
/// let mut controller = PieceController::new();
/// assert_eq!(controller.position(), Position::SPAWN);
///
/// let ghost = controller.ghost_position();
/// let outcome = controller.hard_drop().unwrap();
/// assert_eq!(outcome.rows_cleared, 0);
/// assert!(ghost.y() > 0);
/// assert_eq!(controller.stats().pieces(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct PieceController {
    board: Board,
    bag: PieceBag,
    garbage_rng: Pcg32,
    current: Tetromino,
    position: Position,
    next: Tetromino,
    held: Option<Tetromino>,
    hold_available: bool,
    stats: ScoreState,
    state: ControllerState,
    events: Vec<GameEvent>,
}

impl Default for PieceController {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceController {
    /// Creates a controller on an empty board with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Like [`Self::new`], but with a specific seed for the piece sequence and
    /// the garbage holes.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let mut root = Pcg32::from_seed(*seed.as_bytes());
        let mut bag = PieceBag::from_rng(Pcg32::from_rng(&mut root));
        let garbage_rng = Pcg32::from_rng(&mut root);
        let current = bag.next();
        let next = bag.next();
        Self {
            board: Board::EMPTY,
            bag,
            garbage_rng,
            current,
            position: Position::SPAWN,
            next,
            held: None,
            hold_available: true,
            stats: ScoreState::new(),
            state: ControllerState::Falling,
            events: vec![],
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Replaces the stack, for example to start from a prepared position.
    ///
    /// If the active piece overlaps the new stack the board tops out.
    pub fn replace_board(&mut self, board: Board) {
        self.board = board;
        if self.state.is_falling() && self.board.collides(self.position, self.current) {
            self.top_out();
        }
    }

    #[must_use]
    pub fn current(&self) -> Tetromino {
        self.current
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn next(&self) -> Tetromino {
        self.next
    }

    #[must_use]
    pub fn held(&self) -> Option<Tetromino> {
        self.held
    }

    /// Returns whether [`Self::hold`] may be used before the next lock.
    #[must_use]
    pub fn can_hold(&self) -> bool {
        self.hold_available
    }

    #[must_use]
    pub fn stats(&self) -> &ScoreState {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Returns the gravity interval for the current level.
    #[must_use]
    pub fn gravity_interval(&self) -> Duration {
        scoring::gravity_interval(self.stats.level())
    }

    /// Removes and returns every queued event, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// Returns where the current piece would land on a hard drop.
    #[must_use]
    pub fn ghost_position(&self) -> Position {
        let mut position = self.position;
        while !self.board.collides(position.down(), self.current) {
            position = position.down();
        }
        position
    }

    pub fn move_left(&mut self) -> bool {
        self.shift_to(self.position.left())
    }

    pub fn move_right(&mut self) -> bool {
        self.shift_to(self.position.right())
    }

    fn shift_to(&mut self, position: Position) -> bool {
        if !self.state.is_falling() || self.board.collides(position, self.current) {
            return false;
        }
        self.position = position;
        true
    }

    /// Rotates the current piece clockwise around its anchor. There are no
    /// wall kicks: a rotation that would collide is rejected.
    pub fn rotate(&mut self) -> bool {
        let rotated = self.current.rotated();
        if !self.state.is_falling() || self.board.collides(self.position, rotated) {
            return false;
        }
        self.current = rotated;
        true
    }

    /// Moves the piece down one row, or locks it if it cannot move.
    pub fn soft_drop(&mut self) -> Option<LockOutcome> {
        if !self.state.is_falling() {
            return None;
        }
        let below = self.position.down();
        if self.board.collides(below, self.current) {
            return Some(self.lock());
        }
        self.position = below;
        None
    }

    /// One gravity step. Identical to [`Self::soft_drop`].
    pub fn gravity_tick(&mut self) -> Option<LockOutcome> {
        self.soft_drop()
    }

    /// Moves the piece to its landing row and locks it.
    pub fn hard_drop(&mut self) -> Option<LockOutcome> {
        if !self.state.is_falling() {
            return None;
        }
        self.position = self.ghost_position();
        Some(self.lock())
    }

    /// Stores the current piece, or swaps it with the stored one.
    ///
    /// - Hold is unavailable again until the next lock.
    /// - With an empty hold the next piece spawns in place of the current one.
    /// - With an occupied hold the swap is rejected if the held piece would
    ///   collide at the spawn anchor.
    ///
    /// The held piece keeps its orientation.
    pub fn hold(&mut self) -> bool {
        if !self.state.is_falling() || !self.hold_available {
            return false;
        }
        match self.held {
            None => {
                self.held = Some(self.current);
                self.hold_available = false;
                self.spawn();
            }
            Some(held) => {
                if self.board.collides(Position::SPAWN, held) {
                    return false;
                }
                self.held = Some(self.current);
                self.current = held;
                self.position = Position::SPAWN;
                self.hold_available = false;
            }
        }
        true
    }

    /// Applies a player action. Returns the lock outcome if the action locked
    /// the piece.
    pub fn apply(&mut self, action: Action) -> Option<LockOutcome> {
        match action {
            Action::MoveLeft => _ = self.move_left(),
            Action::MoveRight => _ = self.move_right(),
            Action::Rotate => _ = self.rotate(),
            Action::Hold => _ = self.hold(),
            Action::SoftDrop => return self.soft_drop(),
            Action::HardDrop => return self.hard_drop(),
        }
        None
    }

    /// Pushes `rows` garbage rows into the board.
    ///
    /// If the raised stack overlaps the active piece, the piece is lifted by
    /// the smallest amount up to `rows` that frees it without leaving the top
    /// of the board; if none does, the board tops out.
    pub fn receive_garbage(&mut self, rows: u8) {
        if !self.state.is_falling() || rows == 0 {
            return;
        }
        self.board.inject_garbage(usize::from(rows), &mut self.garbage_rng);
        self.stats.record_garbage_received(rows);
        self.events.push(GameEvent::GarbageReceived(rows));
        log::debug!("received {rows} garbage rows");

        if !self.board.collides(self.position, self.current) {
            return;
        }
        let lifted = (1..=i16::from(rows))
            .map(|dy| self.position.offset(0, -dy))
            .take_while(|position| position.y() >= 0)
            .find(|position| !self.board.collides(*position, self.current));
        match lifted {
            Some(position) => self.position = position,
            None => self.top_out(),
        }
    }

    /// Counts garbage rows that the owner sent to the opponent on this board's
    /// behalf.
    pub fn record_garbage_sent(&mut self, rows: u8) {
        if rows == 0 {
            return;
        }
        self.stats.record_garbage_sent(rows);
        self.events.push(GameEvent::GarbageSent(rows));
    }

    fn lock(&mut self) -> LockOutcome {
        let touched = self.board.place(self.position, self.current);
        let rows_cleared = self.board.clear_completed_rows();
        let level_before = self.stats.level();
        let score_delta = self.stats.record_lock(rows_cleared);
        log::trace!(
            "locked {:?} at {:?} on rows {touched:?}",
            self.current.kind(),
            self.position
        );

        if rows_cleared > 0 {
            log::debug!("cleared {rows_cleared} rows, +{score_delta} points");
            self.events.push(GameEvent::LinesCleared(rows_cleared));
        }
        self.events.push(GameEvent::ScoreChanged(self.stats.score()));
        if self.stats.level() != level_before {
            log::info!("level up: {}", self.stats.level());
            self.events.push(GameEvent::LevelChanged(self.stats.level()));
        }

        self.hold_available = true;
        let topped_out = !self.spawn();
        LockOutcome {
            rows_cleared,
            score_delta,
            garbage: scoring::garbage_for_rows(rows_cleared),
            topped_out,
        }
    }

    /// Promotes the next piece to the spawn anchor. Returns `false` and tops
    /// out if it collides there.
    fn spawn(&mut self) -> bool {
        self.current = self.next;
        self.next = self.bag.next();
        self.position = Position::SPAWN;
        if self.board.collides(self.position, self.current) {
            self.top_out();
            return false;
        }
        true
    }

    fn top_out(&mut self) {
        log::info!(
            "topped out with score {} after {} pieces",
            self.stats.score(),
            self.stats.pieces()
        );
        self.state = ControllerState::GameOver;
        self.events.push(GameEvent::GameOver);
    }
}
