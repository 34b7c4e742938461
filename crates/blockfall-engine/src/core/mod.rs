pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;

/// Number of columns on a board.
pub const BOARD_WIDTH: usize = 10;
/// Number of rows on a board.
pub const BOARD_HEIGHT: usize = 20;
