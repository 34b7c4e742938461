use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::keymap::KeyBinding;

/// Key label and what it does.
pub type KeyHint = (&'static str, &'static str);

const KEY_STYLE: Style = Style::new().fg(Color::Cyan);
const DESCRIPTION_STYLE: Style = Style::new().fg(Color::White);
const TITLE_STYLE: Style = DESCRIPTION_STYLE.add_modifier(Modifier::BOLD);
const SEPARATOR_STYLE: Style = Style::new().fg(Color::DarkGray);

/// One-line help listing keys and their actions, wrapped on narrow terminals.
#[derive(Debug)]
pub struct KeyBindingDisplay<'a> {
    title: Option<&'a str>,
    hints: Vec<KeyHint>,
}

impl<'a> KeyBindingDisplay<'a> {
    pub fn new(bindings: &[KeyBinding]) -> Self {
        Self {
            title: None,
            hints: bindings
                .iter()
                .map(|binding| (binding.label, binding.action.label()))
                .collect(),
        }
    }

    pub fn hints(hints: &[KeyHint]) -> Self {
        Self {
            title: None,
            hints: hints.to_vec(),
        }
    }

    /// Prefixes the line, e.g. with the player it belongs to.
    pub fn title(self, title: &'a str) -> Self {
        Self {
            title: Some(title),
            ..self
        }
    }

    /// Appends keys that are not game actions.
    pub fn with(mut self, hints: &[KeyHint]) -> Self {
        self.hints.extend_from_slice(hints);
        self
    }
}

impl Widget for KeyBindingDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![];
        if let Some(title) = self.title {
            spans.push(Span::styled(format!("{title}: "), TITLE_STYLE));
        }
        for (i, (key, description)) in self.hints.iter().copied().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", SEPARATOR_STYLE));
            }
            spans.push(Span::styled(key, KEY_STYLE));
            spans.push(Span::from(" "));
            spans.push(Span::styled(description, DESCRIPTION_STYLE));
        }

        Paragraph::new(Line::from(spans))
            .centered()
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
