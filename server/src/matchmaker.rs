//! Pairing of waiting players and the shared state of running games
//!
//! The waiter slot, the pairing table and the board store live together
//! behind one `RwLock`. Pairing is a check-then-act across all three, so a
//! single write guard covers the whole transition: two players arriving at
//! once can never both be matched with the same waiter.
//!
//! Board reads share the read guard. Moves take the write guard for their
//! read-modify-write, so concurrent moves on one board are applied one
//! after the other and the last one wins.

use crate::board::{BoardStore, PairKey};
use crate::pairing::PairingTable;
use log::{debug, info};
use thiserror::Error;
use tokio::sync::RwLock;
use ttt_shared::{Board, PlayerId, BOARD_CELLS};

/// Result of a PLAY request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Nobody was waiting; the caller now is.
    Waiting,
    /// The caller already holds the waiter slot.
    StillWaiting,
    /// The caller was matched with the previous waiter.
    GameStarted { opponent: PlayerId },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("player {0} is not in a game")]
    NotPaired(PlayerId),
    #[error("index {0} is outside the board")]
    IndexOutOfRange(i32),
}

#[derive(Debug, Default)]
struct GameTables {
    waiter: Option<PlayerId>,
    pairings: PairingTable,
    boards: BoardStore,
}

impl GameTables {
    /// The key and board of `id`'s game, if both the pairing entry and the
    /// board are still present. After the opponent has ended the game only
    /// the pairing entry remains, which counts as no game.
    fn active_game(&self, id: PlayerId) -> Option<(PairKey, Board)> {
        let opponent = self.pairings.opponent_of(id)?;
        let key = PairKey::new(id, opponent);
        self.boards.get(&key).map(|board| (key, board))
    }
}

#[derive(Debug, Default)]
pub struct Matchmaker {
    tables: RwLock<GameTables>,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Either parks `id` as the waiter or starts a game against the
    /// current waiter.
    pub async fn request_play(&self, id: PlayerId) -> PlayOutcome {
        let mut tables = self.tables.write().await;
        let waiter = tables.waiter;

        match waiter {
            None => {
                tables.waiter = Some(id);
                debug!("Player {} is waiting for an opponent", id);
                PlayOutcome::Waiting
            }
            Some(waiter) if waiter == id => PlayOutcome::StillWaiting,
            Some(waiter) => {
                tables.pairings.link(id, waiter);
                tables.boards.create(PairKey::new(id, waiter));
                tables.waiter = None;
                info!("Started game between {} and {}", waiter, id);
                PlayOutcome::GameStarted { opponent: waiter }
            }
        }
    }

    /// Current waiter, if any.
    pub async fn waiter(&self) -> Option<PlayerId> {
        self.tables.read().await.waiter
    }

    pub async fn lookup_opponent(&self, id: PlayerId) -> Option<PlayerId> {
        self.tables.read().await.pairings.opponent_of(id)
    }

    /// Board of the game `id` is playing.
    pub async fn board(&self, id: PlayerId) -> Result<Board, GameError> {
        self.tables
            .read()
            .await
            .active_game(id)
            .map(|(_, board)| board)
            .ok_or(GameError::NotPaired(id))
    }

    /// Writes `mark` at `index` on `id`'s board and returns the new board.
    ///
    /// The range is checked before the pairing, so an unpaired player
    /// sending a bad index still gets `IndexOutOfRange`.
    pub async fn apply_move(
        &self,
        id: PlayerId,
        index: i32,
        mark: char,
    ) -> Result<Board, GameError> {
        let cell = usize::try_from(index)
            .ok()
            .filter(|&cell| cell < BOARD_CELLS)
            .ok_or(GameError::IndexOutOfRange(index))?;

        let mut tables = self.tables.write().await;
        let (key, board) = tables.active_game(id).ok_or(GameError::NotPaired(id))?;
        let next = board
            .with_mark(cell, mark)
            .ok_or(GameError::IndexOutOfRange(index))?;
        tables.boards.set(key, next);

        debug!("Player {} placed {:?} at {} on {}", id, mark, cell, key);
        Ok(next)
    }

    /// Drops `id`'s pairing entry and the shared board.
    ///
    /// Safe to call repeatedly and from both players: anything already
    /// gone is skipped. Returns false if `id` had no pairing entry.
    pub async fn end_game(&self, id: PlayerId) -> bool {
        let mut tables = self.tables.write().await;

        let Some(opponent) = tables.pairings.unlink(id) else {
            return false;
        };

        let key = PairKey::new(id, opponent);
        if tables.boards.remove(&key) {
            info!("Game {} ended by player {}", key, id);
        } else {
            debug!("Player {} left game {} after the board was removed", id, key);
        }
        true
    }

    /// Number of boards currently stored.
    pub async fn active_games(&self) -> usize {
        self.tables.read().await.boards.len()
    }
}
