use blockfall_engine::{Action, Player};
use crossterm::event::KeyCode;

/// A key bound to a game action, with the label shown in the help line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub label: &'static str,
    pub action: Action,
}

const fn bind(code: KeyCode, label: &'static str, action: Action) -> KeyBinding {
    KeyBinding {
        code,
        label,
        action,
    }
}

pub const SOLO: &[KeyBinding] = &[
    bind(KeyCode::Left, "←", Action::MoveLeft),
    bind(KeyCode::Right, "→", Action::MoveRight),
    bind(KeyCode::Down, "↓", Action::SoftDrop),
    bind(KeyCode::Up, "↑", Action::Rotate),
    bind(KeyCode::Char(' '), "Space", Action::HardDrop),
    bind(KeyCode::Char('m'), "M", Action::Hold),
];

/// Player 1 sits on the left of the keyboard. Terminals do not report a bare
/// Shift press, so hard drop lives on `E`.
pub const PLAYER_ONE: &[KeyBinding] = &[
    bind(KeyCode::Char('a'), "A", Action::MoveLeft),
    bind(KeyCode::Char('d'), "D", Action::MoveRight),
    bind(KeyCode::Char('s'), "S", Action::SoftDrop),
    bind(KeyCode::Char('w'), "W", Action::Rotate),
    bind(KeyCode::Char('e'), "E", Action::HardDrop),
    bind(KeyCode::Tab, "Tab", Action::Hold),
];

pub const PLAYER_TWO: &[KeyBinding] = &[
    bind(KeyCode::Left, "←", Action::MoveLeft),
    bind(KeyCode::Right, "→", Action::MoveRight),
    bind(KeyCode::Down, "↓", Action::SoftDrop),
    bind(KeyCode::Up, "↑", Action::Rotate),
    bind(KeyCode::Char(' '), "Space", Action::HardDrop),
    bind(KeyCode::Char('m'), "M", Action::Hold),
];

/// Letter keys match regardless of case, so Caps Lock does not swallow input.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        code => code,
    }
}

pub fn lookup(bindings: &[KeyBinding], code: KeyCode) -> Option<Action> {
    let code = normalize(code);
    bindings
        .iter()
        .find(|binding| binding.code == code)
        .map(|binding| binding.action)
}

pub fn versus_bindings(player: Player) -> &'static [KeyBinding] {
    match player {
        Player::One => PLAYER_ONE,
        Player::Two => PLAYER_TWO,
    }
}

/// Resolves a key to the player it belongs to and their action.
pub fn lookup_versus(code: KeyCode) -> Option<(Player, Action)> {
    Player::BOTH
        .into_iter()
        .find_map(|player| lookup(versus_bindings(player), code).map(|action| (player, action)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_action_bound_once_per_map() {
        for bindings in [SOLO, PLAYER_ONE, PLAYER_TWO] {
            for action in Action::ALL {
                let count = bindings.iter().filter(|b| b.action == action).count();
                assert_eq!(count, 1, "{action:?}");
            }
        }
    }

    #[test]
    fn test_versus_maps_do_not_overlap() {
        for one in PLAYER_ONE {
            assert!(
                PLAYER_TWO.iter().all(|two| two.code != one.code),
                "{:?} bound for both players",
                one.code
            );
        }
    }

    #[test]
    fn test_lookup_versus_routes_to_player() {
        assert_eq!(
            lookup_versus(KeyCode::Char('a')),
            Some((Player::One, Action::MoveLeft))
        );
        assert_eq!(
            lookup_versus(KeyCode::Tab),
            Some((Player::One, Action::Hold))
        );
        assert_eq!(
            lookup_versus(KeyCode::Char(' ')),
            Some((Player::Two, Action::HardDrop))
        );
        assert_eq!(lookup_versus(KeyCode::Char('q')), None);
    }

    #[test]
    fn test_lookup_ignores_letter_case() {
        assert_eq!(lookup(SOLO, KeyCode::Char('M')), Some(Action::Hold));
        assert_eq!(lookup(PLAYER_ONE, KeyCode::Char('W')), Some(Action::Rotate));
    }
}
