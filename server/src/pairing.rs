//! Symmetric player-to-opponent table.

use std::collections::HashMap;
use ttt_shared::PlayerId;

/// Maps each player in an active game to their opponent.
///
/// `link` always writes both directions. `unlink` only drops the caller's
/// side: the opponent keeps a dangling entry until they end the game too.
#[derive(Debug, Default)]
pub struct PairingTable {
    opponents: HashMap<PlayerId, PlayerId>,
}

impl PairingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link(&mut self, a: PlayerId, b: PlayerId) {
        self.opponents.insert(a, b);
        self.opponents.insert(b, a);
    }

    pub fn opponent_of(&self, id: PlayerId) -> Option<PlayerId> {
        self.opponents.get(&id).copied()
    }

    /// Removes `id`'s entry and returns the opponent it pointed at.
    pub fn unlink(&mut self, id: PlayerId) -> Option<PlayerId> {
        self.opponents.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.opponents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opponents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_is_symmetric() {
        let mut table = PairingTable::new();
        table.link(10000, 10001);

        assert_eq!(table.opponent_of(10000), Some(10001));
        assert_eq!(table.opponent_of(10001), Some(10000));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_unlink_removes_one_side() {
        let mut table = PairingTable::new();
        table.link(10000, 10001);

        assert_eq!(table.unlink(10000), Some(10001));
        assert_eq!(table.opponent_of(10000), None);
        assert_eq!(table.opponent_of(10001), Some(10000));

        assert_eq!(table.unlink(10000), None);
        assert_eq!(table.unlink(10001), Some(10000));
        assert!(table.is_empty());
    }

    #[test]
    fn test_unknown_player() {
        let table = PairingTable::new();
        assert_eq!(table.opponent_of(42), None);
    }
}
