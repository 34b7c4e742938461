pub use self::{leaderboard::*, menu::*, solo::*, versus::*};

mod leaderboard;
mod menu;
mod solo;
mod versus;

use crossterm::event::{Event, KeyCode, KeyEventKind};

/// Returns the code of a key press, with letters lowercased. Releases and
/// repeats reported by some terminals are ignored.
fn pressed_key(event: &Event) -> Option<KeyCode> {
    let key = event.as_key_event()?;
    if key.kind != KeyEventKind::Press {
        return None;
    }
    Some(match key.code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        code => code,
    })
}
