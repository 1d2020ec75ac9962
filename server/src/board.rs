//! Per-game board storage keyed by an order-independent pair of players.

use std::collections::HashMap;
use std::fmt;
use ttt_shared::{Board, PlayerId};

/// Canonical key for a pair of players: always `(max, min)`, so both
/// members of a game resolve to the same entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey {
    high: PlayerId,
    low: PlayerId,
}

impl PairKey {
    pub fn new(a: PlayerId, b: PlayerId) -> Self {
        Self {
            high: a.max(b),
            low: a.min(b),
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.high, self.low)
    }
}

/// Boards of all active games.
///
/// Not synchronised on its own; the matchmaker owns it behind the same lock
/// as the waiter slot and the pairing table.
#[derive(Debug, Default)]
pub struct BoardStore {
    boards: HashMap<PairKey, Board>,
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh empty board for `key`, replacing any stale one.
    pub fn create(&mut self, key: PairKey) {
        self.boards.insert(key, Board::empty());
    }

    pub fn get(&self, key: &PairKey) -> Option<Board> {
        self.boards.get(key).copied()
    }

    pub fn set(&mut self, key: PairKey, board: Board) {
        self.boards.insert(key, board);
    }

    /// Returns true if a board was removed.
    pub fn remove(&mut self, key: &PairKey) -> bool {
        self.boards.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}
