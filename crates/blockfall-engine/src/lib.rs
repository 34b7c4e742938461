//! Rules engine for a falling-block puzzle game with solo and head-to-head modes.
//!
//! - [`core`] holds the pure data model: the piece catalog, the board grid, and
//!   the collision/placement predicates over it.
//! - [`engine`] builds the game on top of it: the bag randomizer, the per-board
//!   [`PieceController`], scoring, the garbage exchange between two boards, and
//!   the [`GameSession`] / [`VersusMatch`] owners that drive everything from
//!   elapsed time.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
