//! # Tic-Tac-Toe Matchmaking Server Library
//!
//! A UDP server that pairs players into two-player games and stores the
//! board of each game. Clients talk to it with one-line text commands, one
//! command per datagram, and get at most one line back. There is no
//! connection: a player is identified only by the id REGISTER handed out.
//!
//! ## Core Responsibilities
//!
//! ### Identity
//! Player ids are allocated from a single atomic counter starting at
//! 10000 and are never reused.
//!
//! ### Matchmaking
//! At most one player waits for an opponent at a time. The next distinct
//! player to send PLAY is paired with the waiter, a fresh board is created
//! for the pair, and the waiter slot is cleared, all under one lock.
//!
//! ### Shared Game State
//! Boards are indexed by an order-independent key of the two player ids,
//! so either player reaches the same board. The server stores boards and
//! applies marks; it does not referee. Turn order, occupied cells and win
//! detection are left to the clients.
//!
//! ### Shutdown
//! Each datagram is handled on its own tokio task, tracked by the
//! shutdown coordinator. A SHUTDOWN command from a loopback address stops
//! the receive loop, waits for the outstanding handlers and releases the
//! socket.
//!
//! ## Module Organization
//!
//! - `identity`: player id allocation
//! - `board`: canonical pair keys and the board store
//! - `pairing`: the symmetric opponent table
//! - `matchmaker`: waiter slot, pairing and board mutation under one lock
//! - `dispatcher`: command routing and response selection
//! - `shutdown`: handler tracking and the shutdown signal
//! - `network`: UDP socket and receive loop
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use ttt_server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::bind("0.0.0.0:20000").await?;
//!
//!     // Runs until `SHUTDOWN` arrives from localhost, e.g.
//!     // `echo SHUTDOWN | nc -u -w1 localhost 20000`
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod board;
pub mod dispatcher;
pub mod identity;
pub mod matchmaker;
pub mod network;
pub mod pairing;
pub mod shutdown;

pub use matchmaker::{GameError, PlayOutcome};
