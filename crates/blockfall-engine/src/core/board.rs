use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{
    BOARD_HEIGHT, BOARD_WIDTH,
    piece::{PieceKind, Position, Tetromino},
};

/// Color tag written into injected garbage rows.
pub const GARBAGE_COLOR: &str = "gray";

/// A single cell of the board grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell locked by a piece of the given kind.
    Piece(PieceKind),
    /// Cell of an injected garbage row.
    Garbage,
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Returns the color tag of a filled cell.
    #[must_use]
    pub fn color(self) -> Option<&'static str> {
        match self {
            Cell::Empty => None,
            Cell::Piece(kind) => Some(kind.color()),
            Cell::Garbage => Some(GARBAGE_COLOR),
        }
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Piece(kind) => kind.as_char(),
            Cell::Garbage => '#',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Cell::Empty),
            '#' => Some(Cell::Garbage),
            _ => match PieceKind::from_char(c) {
                Some(kind) => Some(Cell::Piece(kind)),
                None => None,
            },
        }
    }
}

/// One row of the board grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Row {
    cells: [Cell; BOARD_WIDTH],
}

impl Row {
    pub const EMPTY: Self = Self {
        cells: [Cell::Empty; BOARD_WIDTH],
    };

    /// A garbage row with a single empty cell at `hole`.
    fn garbage(hole: usize) -> Self {
        let mut row = Self {
            cells: [Cell::Garbage; BOARD_WIDTH],
        };
        row.cells[hole] = Cell::Empty;
        row
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell; BOARD_WIDTH] {
        &self.cells
    }

    /// Returns whether every cell of the row is filled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_empty())
    }
}

/// Fixed-size 20×10 playing field.
///
/// Row 0 is the top of the board. The grid never changes size: clearing rows
/// prepends empty rows at the top and injecting garbage drops rows off the top.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, PieceKind, Position};
///
/// let mut board = Board::EMPTY;
/// let o = PieceKind::O.tetromino();
/// let landing = Position::new(4, 18);
///
/// assert!(!board.collides(landing, o));
/// board.place(landing, o);
/// assert!(board.collides(landing, o));
/// assert_eq!(board.clear_completed_rows(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: [Row; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [Row::EMPTY; BOARD_HEIGHT],
    };

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &Row> {
        self.rows.iter()
    }

    /// Returns the cell at `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.rows.get(y)?.cells.get(x).copied()
    }

    /// Overwrites a single cell. Panics outside the grid.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        self.rows[y].cells[x] = cell;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Row::is_empty)
    }

    /// Counts filled cells across the whole grid.
    #[must_use]
    pub fn filled_cells(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .filter(|cell| !cell.is_empty())
            .count()
    }

    /// Returns whether `piece` anchored at `position` would be out of bounds or
    /// overlap a filled cell.
    ///
    /// Cells above row 0 are only checked against the side walls, so a piece
    /// that is still entering the board never collides with the stack there.
    #[must_use]
    pub fn collides(&self, position: Position, piece: Tetromino) -> bool {
        piece.cells().any(|(dx, dy)| {
            let x = i32::from(position.x()) + offset(dx);
            let y = i32::from(position.y()) + offset(dy);
            if x < 0 || x >= offset(BOARD_WIDTH) || y >= offset(BOARD_HEIGHT) {
                return true;
            }
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                return false;
            };
            !self.rows[y].cells[x].is_empty()
        })
    }

    /// Writes `piece` into the grid and returns the rows it touched, top to bottom.
    ///
    /// The placement is not re-validated: callers check [`Self::collides`]
    /// first. Cells that sit above row 0 are discarded.
    pub fn place(&mut self, position: Position, piece: Tetromino) -> ArrayVec<usize, 4> {
        let mut touched = ArrayVec::new();
        for (dx, dy) in piece.cells() {
            let x = i32::from(position.x()) + offset(dx);
            let y = i32::from(position.y()) + offset(dy);
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            self.rows[y].cells[x] = Cell::Piece(piece.kind());
            if !touched.contains(&y) {
                touched.push(y);
            }
        }
        touched.sort_unstable();
        touched
    }

    /// Removes every completed row and returns how many were removed.
    ///
    /// Remaining rows keep their order and shift down; the same number of empty
    /// rows appears at the top.
    pub fn clear_completed_rows(&mut self) -> usize {
        let mut count = 0;
        for y in (0..BOARD_HEIGHT).rev() {
            if self.rows[y].is_complete() {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(Row::EMPTY);
        count
    }

    /// Pushes `count` garbage rows in from the bottom.
    ///
    /// The top `count` rows are discarded. Each new row is filled with garbage
    /// except for one uniformly chosen hole. `count` is clamped to the board
    /// height. The caller decides what a collision with the active piece means.
    pub fn inject_garbage<R>(&mut self, count: usize, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let count = count.min(BOARD_HEIGHT);
        if count == 0 {
            return;
        }
        self.rows.copy_within(count.., 0);
        for row in &mut self.rows[BOARD_HEIGHT - count..] {
            *row = Row::garbage(rng.random_range(0..BOARD_WIDTH));
        }
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn offset(n: usize) -> i32 {
    n as i32
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in row.cells {
                write!(f, "{}", cell.as_char())?;
            }
        }
        Ok(())
    }
}

/// Error returned when parsing a [`Board`] from text fails.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("expected at most {} rows, got {_0}", BOARD_HEIGHT)]
    TooManyRows(#[error(not(source))] usize),
    #[display("row {row}: expected {} cells, got {width}", BOARD_WIDTH)]
    RowWidth { row: usize, width: usize },
    #[display("row {row}, column {column}: invalid cell '{ch}'")]
    InvalidCell { row: usize, column: usize, ch: char },
}

/// Parses one line per row, `.` for empty, `#` for garbage and a piece letter
/// otherwise. Blank lines are ignored and missing rows are filled in as empty
/// rows at the top, so fixtures only need to spell out the bottom of the board.
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() > BOARD_HEIGHT {
            return Err(ParseBoardError::TooManyRows(lines.len()));
        }

        let mut board = Board::EMPTY;
        let top = BOARD_HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            if width != BOARD_WIDTH {
                return Err(ParseBoardError::RowWidth { row: i, width });
            }
            for (column, ch) in line.chars().enumerate() {
                let cell = Cell::from_char(ch)
                    .ok_or(ParseBoardError::InvalidCell { row: i, column, ch })?;
                board.rows[top + i].cells[column] = cell;
            }
        }
        Ok(board)
    }
}
