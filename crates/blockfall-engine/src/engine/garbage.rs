use std::num::NonZeroU8;

use super::input::Player;

/// One-directional, single-slot garbage handoff.
///
/// A send overwrites nothing: sends that arrive before the pending value is
/// taken are added to it. A taken value is gone, so every row is delivered
/// exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GarbageChannel {
    slot: Option<NonZeroU8>,
}

impl GarbageChannel {
    #[must_use]
    pub const fn new() -> Self {
        Self { slot: None }
    }

    /// Queues `rows` garbage rows. Zero is ignored.
    pub fn send(&mut self, rows: u8) {
        let Some(rows) = NonZeroU8::new(rows) else {
            return;
        };
        self.slot = Some(match self.slot {
            Some(pending) => pending.saturating_add(rows.get()),
            None => rows,
        });
    }

    /// Takes the pending row count, leaving the channel empty.
    pub fn take(&mut self) -> Option<NonZeroU8> {
        self.slot.take()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

/// Garbage channels between the two boards of a match, one per direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GarbageExchange {
    inbound: [GarbageChannel; 2],
}

impl GarbageExchange {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inbound: [GarbageChannel::new(), GarbageChannel::new()],
        }
    }

    /// Sends `rows` garbage rows from `sender` to its opponent.
    pub fn send(&mut self, sender: Player, rows: u8) {
        self.inbound[sender.opponent().index()].send(rows);
    }

    /// Takes the rows pending for `receiver`.
    pub fn take(&mut self, receiver: Player) -> Option<NonZeroU8> {
        self.inbound[receiver.index()].take()
    }

    #[must_use]
    pub fn is_pending(&self, receiver: Player) -> bool {
        self.inbound[receiver.index()].is_pending()
    }

    pub fn clear(&mut self) {
        for channel in &mut self.inbound {
            channel.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_is_taken_once() {
        let mut channel = GarbageChannel::new();
        channel.send(2);
        assert!(channel.is_pending());
        assert_eq!(channel.take().map(NonZeroU8::get), Some(2));
        assert_eq!(channel.take(), None);
    }

    #[test]
    fn test_zero_is_not_sent() {
        let mut channel = GarbageChannel::new();
        channel.send(0);
        assert!(!channel.is_pending());
    }

    #[test]
    fn test_pending_sends_accumulate() {
        let mut channel = GarbageChannel::new();
        channel.send(1);
        channel.send(4);
        assert_eq!(channel.take().map(NonZeroU8::get), Some(5));
    }

    #[test]
    fn test_exchange_routes_to_opponent() {
        let mut exchange = GarbageExchange::new();
        exchange.send(Player::One, 4);
        assert!(!exchange.is_pending(Player::One));
        assert_eq!(exchange.take(Player::Two).map(NonZeroU8::get), Some(4));
        assert!(!exchange.is_pending(Player::Two));

        exchange.send(Player::Two, 1);
        exchange.clear();
        assert_eq!(exchange.take(Player::One), None);
    }
}
