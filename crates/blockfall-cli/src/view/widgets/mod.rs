use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    block_display::*, board_display::*, key_binding_display::*, leaderboard_display::*,
    piece_display::*, player_display::*, stats_display::*,
};

mod block_display;
mod board_display;
mod key_binding_display;
mod leaderboard_display;
mod piece_display;
mod player_display;
mod stats_display;

pub mod color {
    use ratatui::style::Color;

    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const CYAN: Color = Color::Rgb(0, 255, 255);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    /// Parses an engine color tag, `#rrggbb` or a named color.
    pub fn from_tag(tag: &str) -> Color {
        tag.parse().unwrap_or(GRAY)
    }
}

pub mod style {
    use ratatui::style::{Color, Style};

    use super::color;

    pub const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY: Style = bg_only(color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::BLACK);
    pub const HIGHLIGHT: Style = fg_bg(color::BLACK, color::CYAN);
    pub const NOTICE: Style = fg_bg(color::YELLOW, color::BLACK);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
