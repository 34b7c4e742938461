use blockfall_engine::{Cell, PieceKind};
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::view::widgets::{color, style};

/// One board cell, two terminal columns wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

impl BlockDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    pub const fn empty(show_dots: bool) -> Self {
        if show_dots {
            Self::new(style::EMPTY_DOT, ".")
        } else {
            Self::new(style::EMPTY, "")
        }
    }

    pub fn from_cell(cell: Cell, show_dots: bool) -> Self {
        match cell.color() {
            Some(tag) => Self::new(style::bg_only(color::from_tag(tag)), ""),
            None => Self::empty(show_dots),
        }
    }

    /// Outline of where the falling piece would land.
    pub fn ghost(kind: PieceKind) -> Self {
        Self::new(style::fg_bg(color::from_tag(kind.color()), color::BLACK), "[]")
    }
}

impl Widget for BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Paragraph fills the whole area, not just the symbol cells.
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::style::Color;

    use super::*;

    #[test]
    fn test_cell_colors_follow_engine_tags() {
        let block = BlockDisplay::from_cell(Cell::Piece(PieceKind::I), true);
        assert_eq!(block.style.bg, Some(Color::Rgb(0x40, 0xff, 0xff)));
        let garbage = BlockDisplay::from_cell(Cell::Garbage, true);
        assert_eq!(garbage.style.bg, Some(Color::Gray));
        assert_eq!(
            BlockDisplay::from_cell(Cell::Empty, false),
            BlockDisplay::empty(false)
        );
    }
}
