use serde::{Deserialize, Serialize};

use super::BOARD_WIDTH;

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// T-piece.
    T = 5,
    /// Z-piece.
    Z = 6,
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// Every piece kind, in catalog order.
    pub const ALL: [PieceKind; PieceKind::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Returns the catalog tetromino for this kind in its spawn orientation.
    #[must_use]
    pub const fn tetromino(self) -> Tetromino {
        CATALOG[self as usize]
    }

    /// Returns the color tag painted into board cells by this piece.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            PieceKind::I => "#40ffff",
            PieceKind::J => "#4040ff",
            PieceKind::L => "#ffc040",
            PieceKind::O => "#ffff40",
            PieceKind::S => "#40ff40",
            PieceKind::T => "#ff40ff",
            PieceKind::Z => "#ff4040",
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// A 0/1 shape matrix of at most 4×4 cells.
///
/// Each row is a bit mask where bit `x` marks column `x` as occupied. The
/// matrix is exactly as large as the piece's bounding box, so the I-piece in
/// spawn orientation is 4 wide and 1 tall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u8,
    height: u8,
    rows: [u8; 4],
}

impl Shape {
    const fn new(width: u8, height: u8, rows: [u8; 4]) -> Self {
        assert!(width >= 1 && width <= 4);
        assert!(height >= 1 && height <= 4);
        Self {
            width,
            height,
            rows,
        }
    }

    #[must_use]
    pub const fn width(self) -> usize {
        self.width as usize
    }

    #[must_use]
    pub const fn height(self) -> usize {
        self.height as usize
    }

    /// Returns whether the cell at `(x, y)` inside the bounding box is occupied.
    #[must_use]
    pub const fn is_occupied(self, x: usize, y: usize) -> bool {
        x < self.width() && y < self.height() && (self.rows[y] & (1 << x)) != 0
    }

    /// Iterates over occupied `(dx, dy)` offsets, row by row.
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (0..self.height()).flat_map(move |dy| {
            (0..self.width())
                .filter(move |&dx| self.is_occupied(dx, dy))
                .map(move |dx| (dx, dy))
        })
    }

    /// Rotates the matrix 90° clockwise by transposing it and reversing each row.
    ///
    /// Row `i` of the result is column `i` of `self` read from bottom to top,
    /// so a `w×h` shape becomes `h×w`.
    #[must_use]
    pub const fn rotated(self) -> Self {
        let w = self.width();
        let h = self.height();
        let mut rows = [0; 4];
        let mut i = 0;
        while i < w {
            let mut j = 0;
            while j < h {
                if (self.rows[h - 1 - j] & (1 << i)) != 0 {
                    rows[i] |= 1 << j;
                }
                j += 1;
            }
            i += 1;
        }
        Self::new(self.height, self.width, rows)
    }
}

/// An immutable tetromino: a shape matrix plus the color tag of its kind.
///
/// Rotation returns a new value; catalog entries are constants and are never
/// modified by play.
///
/// # Example
///
/// ```
/// use blockfall_engine::PieceKind;
///
/// let t = PieceKind::T.tetromino();
/// let rotated = t.rotated();
/// assert_eq!((rotated.shape().width(), rotated.shape().height()), (2, 3));
/// assert_eq!(PieceKind::T.tetromino(), t);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    kind: PieceKind,
    shape: Shape,
}

impl Tetromino {
    #[must_use]
    pub const fn kind(self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn shape(self) -> Shape {
        self.shape
    }

    #[must_use]
    pub const fn color(self) -> &'static str {
        self.kind.color()
    }

    #[must_use]
    pub const fn rotated(self) -> Self {
        Self {
            kind: self.kind,
            shape: self.shape.rotated(),
        }
    }

    /// Iterates over occupied `(dx, dy)` offsets relative to the anchor.
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        self.shape.cells()
    }
}

const CATALOG: [Tetromino; PieceKind::LEN] = {
    const fn t(kind: PieceKind, width: u8, height: u8, rows: [u8; 4]) -> Tetromino {
        Tetromino {
            kind,
            shape: Shape::new(width, height, rows),
        }
    }

    [
        // ####
        t(PieceKind::I, 4, 1, [0b1111, 0, 0, 0]),
        // #..
        // ###
        t(PieceKind::J, 3, 2, [0b001, 0b111, 0, 0]),
        // ..#
        // ###
        t(PieceKind::L, 3, 2, [0b100, 0b111, 0, 0]),
        // ##
        // ##
        t(PieceKind::O, 2, 2, [0b11, 0b11, 0, 0]),
        // .##
        // ##.
        t(PieceKind::S, 3, 2, [0b110, 0b011, 0, 0]),
        // .#.
        // ###
        t(PieceKind::T, 3, 2, [0b010, 0b111, 0, 0]),
        // ##.
        // .##
        t(PieceKind::Z, 3, 2, [0b011, 0b110, 0, 0]),
    ]
};

/// Board-relative anchor of a piece: the top-left corner of its bounding box.
///
/// Coordinates are signed because a piece may sit partly above row 0 while it
/// enters the board, and a candidate move may probe one column past either wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub struct Position {
    x: i16,
    y: i16,
}

impl Position {
    /// Horizontally centered top position where every piece spawns.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const SPAWN: Self = Self::new((BOARD_WIDTH / 2) as i16 - 1, 0);

    #[must_use]
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i16 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i16 {
        self.y
    }

    #[must_use]
    pub const fn offset(self, dx: i16, dy: i16) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    #[must_use]
    pub const fn left(self) -> Self {
        self.offset(-1, 0)
    }

    #[must_use]
    pub const fn right(self) -> Self {
        self.offset(1, 0)
    }

    #[must_use]
    pub const fn down(self) -> Self {
        self.offset(0, 1)
    }

    #[must_use]
    pub const fn up(self) -> Self {
        self.offset(0, -1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(shape: Shape) -> Vec<String> {
        (0..shape.height())
            .map(|y| {
                (0..shape.width())
                    .map(|x| if shape.is_occupied(x, y) { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_catalog_has_four_cells_per_piece() {
        for kind in PieceKind::ALL {
            let piece = kind.tetromino();
            assert_eq!(piece.kind(), kind);
            assert_eq!(piece.cells().count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn test_rotation_is_clockwise() {
        let j = PieceKind::J.tetromino();
        assert_eq!(render(j.shape()), ["#..", "###"]);
        assert_eq!(render(j.rotated().shape()), ["##", "#.", "#."]);
        assert_eq!(render(j.rotated().rotated().shape()), ["###", "..#"]);
    }

    #[test]
    fn test_i_piece_rotates_to_vertical() {
        let vertical = PieceKind::I.tetromino().rotated();
        assert_eq!(vertical.shape().width(), 1);
        assert_eq!(vertical.shape().height(), 4);
        assert_eq!(vertical.cells().collect::<Vec<_>>(), [(0, 0), (0, 1), (0, 2), (0, 3)]);
    }

    #[test]
    fn test_four_rotations_return_to_original() {
        for kind in PieceKind::ALL {
            let piece = kind.tetromino();
            let full_turn = piece.rotated().rotated().rotated().rotated();
            assert_eq!(full_turn, piece, "{kind:?}");
        }
    }

    #[test]
    fn test_o_piece_rotation_is_identity() {
        let o = PieceKind::O.tetromino();
        assert_eq!(o.rotated(), o);
    }

    #[test]
    fn test_rotation_does_not_touch_catalog() {
        let before = PieceKind::S.tetromino();
        let _ = before.rotated();
        assert_eq!(PieceKind::S.tetromino(), before);
    }

    #[test]
    fn test_spawn_position_is_centered() {
        assert_eq!(Position::SPAWN, Position::new(4, 0));
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('X'), None);
        assert_eq!(PieceKind::from_char('i'), None);
    }

    #[test]
    fn test_piece_kind_serialization() {
        let json = serde_json::to_string(&PieceKind::T).unwrap();
        assert_eq!(json, "\"T\"");
        let kind: PieceKind = serde_json::from_str(&json).unwrap();
        assert_eq!(kind, PieceKind::T);
    }
}
