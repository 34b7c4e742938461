//! Game rules and state management.
//!
//! This module builds playable games out of the [`core`](crate::core) data model:
//!
//! - [`PieceBag`] - 7-bag piece randomizer, seeded by a [`PieceSeed`]
//! - [`PieceController`] - current/next/held piece of one board and the lock step
//! - [`ScoreState`] - score, level and line-clear statistics of one board
//! - [`GarbageExchange`] - single-slot garbage handoff between two boards
//! - [`IntervalTimer`] - deterministic timers driven by elapsed time
//! - [`GameSession`] - a solo game: countdown, gravity and pause
//! - [`VersusMatch`] - a timed two-player match with garbage exchange
//!
//! # Game Flow
//!
//! 1. The owner ([`GameSession`] or [`VersusMatch`]) counts down from 3
//! 2. Gravity timers and player [`Action`]s move the active piece
//! 3. A piece that cannot move down locks: rows are cleared and scored
//! 4. In a match, clearing two or more rows sends garbage to the opponent
//! 5. The next piece spawns; a spawn collision tops the board out
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{Action, GameSession};
//!
//! let mut session = GameSession::new();
//! session.advance(Duration::from_secs(3));
//! assert!(session.state().is_playing());
//!
//! session.apply(Action::HardDrop);
//! assert_eq!(session.controller().stats().pieces(), 1);
//! ```

pub use self::{
    bag::*, controller::*, garbage::*, input::*, scoring::*, session::*, timer::*, versus::*,
};

mod bag;
mod controller;
mod garbage;
mod input;
mod scoring;
mod session;
mod timer;
mod versus;
