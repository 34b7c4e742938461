use std::iter;

use blockfall_engine::{BOARD_HEIGHT, BOARD_WIDTH, Board, Cell, Position, Tetromino};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::view::widgets::BlockDisplay;

type Grid = [[BlockDisplay; BOARD_WIDTH]; BOARD_HEIGHT];

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    ghost: Option<(Position, Tetromino)>,
    falling_piece: Option<(Position, Tetromino)>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            ghost: None,
            falling_piece: None,
            block: None,
        }
    }

    pub fn ghost(self, position: Position, piece: Tetromino) -> Self {
        Self {
            ghost: Some((position, piece)),
            ..self
        }
    }

    pub fn falling_piece(self, position: Position, piece: Tetromino) -> Self {
        Self {
            falling_piece: Some((position, piece)),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        BlockDisplay::width() * u16::try_from(BOARD_WIDTH).unwrap_or(u16::MAX)
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        BlockDisplay::height() * u16::try_from(BOARD_HEIGHT).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }

    fn grid(&self) -> Grid {
        let mut grid = [[BlockDisplay::empty(true); BOARD_WIDTH]; BOARD_HEIGHT];
        for (grid_row, row) in iter::zip(&mut grid, self.board.rows()) {
            for (tile, cell) in iter::zip(grid_row, row.cells()) {
                *tile = BlockDisplay::from_cell(*cell, true);
            }
        }
        if let Some((position, piece)) = self.ghost {
            for (x, y) in visible_cells(position, piece) {
                if self.board.cell(x, y).is_some_and(|cell| cell.is_empty()) {
                    grid[y][x] = BlockDisplay::ghost(piece.kind());
                }
            }
        }
        if let Some((position, piece)) = self.falling_piece {
            let block = BlockDisplay::from_cell(Cell::Piece(piece.kind()), true);
            for (x, y) in visible_cells(position, piece) {
                grid[y][x] = block;
            }
        }
        grid
    }
}

/// Board coordinates of the piece cells inside the grid. Cells above the top
/// row are not drawn.
fn visible_cells(position: Position, piece: Tetromino) -> impl Iterator<Item = (usize, usize)> {
    piece.cells().filter_map(move |(dx, dy)| {
        let x = isize::from(position.x()) + isize::try_from(dx).ok()?;
        let y = isize::from(position.y()) + isize::try_from(dy).ok()?;
        let x = usize::try_from(x).ok().filter(|x| *x < BOARD_WIDTH)?;
        let y = usize::try_from(y).ok().filter(|y| *y < BOARD_HEIGHT)?;
        Some((x, y))
    })
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints = (0..BOARD_WIDTH).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..BOARD_HEIGHT).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<BOARD_HEIGHT>(&vertical)
            .into_iter()
            .map(|row| row.layout::<BOARD_WIDTH>(&horizontal));

        for (grid_row, tiles) in iter::zip(grid_cells, self.grid()) {
            for (grid_cell, tile) in iter::zip(grid_row, tiles) {
                tile.render(grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::PieceKind;

    use super::*;

    #[test]
    fn test_piece_drawn_over_ghost_and_board() {
        let board: Board = "ZZ........".parse().unwrap();
        let piece = PieceKind::O.tetromino();
        let display = BoardDisplay::new(&board)
            .ghost(Position::new(4, 18), piece)
            .falling_piece(Position::new(4, -1), piece);
        let grid = display.grid();

        let solid = BlockDisplay::from_cell(Cell::Piece(PieceKind::O), true);
        let ghost = BlockDisplay::ghost(PieceKind::O);
        assert_eq!(grid[0][4], solid);
        assert_eq!(grid[0][5], solid);
        assert_eq!(grid[1][4], BlockDisplay::empty(true));
        assert_eq!(grid[18][4], ghost);
        assert_eq!(grid[19][5], ghost);
        assert_eq!(
            grid[19][0],
            BlockDisplay::from_cell(Cell::Piece(PieceKind::Z), true)
        );
    }

    #[test]
    fn test_size_includes_border() {
        let board = Board::default();
        let display = BoardDisplay::new(&board).block(BlockWidget::bordered());
        assert_eq!(display.width(), 22);
        assert_eq!(display.height(), 22);
    }
}
