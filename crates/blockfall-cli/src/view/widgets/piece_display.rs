use blockfall_engine::{Cell, Tetromino};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::BlockDisplay;

/// Blocks reserved on each side; a held I piece may stand upright.
const PREVIEW_SIZE: u16 = 4;

/// Preview of a single piece in its current orientation.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<Tetromino>,
    dimmed: bool,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new(piece: Option<Tetromino>) -> Self {
        Self {
            piece,
            dimmed: false,
            block: None,
        }
    }

    /// Draws the piece as an outline, e.g. while hold is spent.
    pub fn dimmed(self, dimmed: bool) -> Self {
        Self { dimmed, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        PREVIEW_SIZE * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        PREVIEW_SIZE * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(piece) = self.piece else {
            return;
        };
        let shape = piece.shape();
        let (width, height) = (
            u16::try_from(shape.width()).unwrap_or(PREVIEW_SIZE),
            u16::try_from(shape.height()).unwrap_or(PREVIEW_SIZE),
        );
        let piece_area = area.centered(
            Constraint::Length(width * BlockDisplay::width()),
            Constraint::Length(height * BlockDisplay::height()),
        );

        let horizontal = Layout::horizontal((0..width).map(|_| Constraint::Length(BlockDisplay::width())))
            .flex(Flex::Center);
        let vertical = Layout::vertical((0..height).map(|_| Constraint::Length(BlockDisplay::height())));
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let occupied = if self.dimmed {
            BlockDisplay::ghost(piece.kind())
        } else {
            BlockDisplay::from_cell(Cell::Piece(piece.kind()), false)
        };
        let empty = BlockDisplay::empty(false);
        for (y, grid_row) in grid_rows.enumerate() {
            for (x, grid_cell) in grid_row.into_iter().enumerate() {
                let tile = if shape.is_occupied(x, y) { &occupied } else { &empty };
                tile.render(grid_cell, buf);
            }
        }
    }
}
