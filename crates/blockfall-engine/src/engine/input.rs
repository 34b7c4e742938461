use serde::{Deserialize, Serialize};

/// Logical player input, independent of any key binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    /// Rotate clockwise.
    Rotate,
    HardDrop,
    Hold,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::SoftDrop,
        Action::Rotate,
        Action::HardDrop,
        Action::Hold,
    ];

    /// Short label used by key binding help.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Action::MoveLeft => "Left",
            Action::MoveRight => "Right",
            Action::SoftDrop => "Soft drop",
            Action::Rotate => "Rotate",
            Action::HardDrop => "Hard drop",
            Action::Hold => "Hold",
        }
    }
}

/// One side of a versus match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display)]
pub enum Player {
    #[display("Player 1")]
    One,
    #[display("Player 2")]
    Two,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Returns 0 for player one and 1 for player two.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_is_involution() {
        for player in Player::BOTH {
            assert_ne!(player.opponent(), player);
            assert_eq!(player.opponent().opponent(), player);
        }
    }

    #[test]
    fn test_player_index_and_display() {
        assert_eq!(Player::One.index(), 0);
        assert_eq!(Player::Two.index(), 1);
        assert_eq!(Player::Two.to_string(), "Player 2");
    }
}
