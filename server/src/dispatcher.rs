//! Routing of parsed requests to the game components
//!
//! The dispatcher holds no per-request state. Each datagram is handed to
//! [`Dispatcher::dispatch`] from its own task, which returns the response
//! to send back, if any. Every user-facing failure becomes a response line;
//! nothing here can take the server down.

use crate::identity::IdentityAllocator;
use crate::matchmaker::{GameError, Matchmaker, PlayOutcome};
use crate::shutdown::ShutdownCoordinator;
use log::{debug, info};
use std::net::SocketAddr;
use ttt_shared::{Command, Response};

#[derive(Debug)]
pub struct Dispatcher {
    identities: IdentityAllocator,
    matchmaker: Matchmaker,
    shutdown: ShutdownCoordinator,
}

impl Dispatcher {
    pub fn new(shutdown: ShutdownCoordinator) -> Self {
        Self {
            identities: IdentityAllocator::new(),
            matchmaker: Matchmaker::new(),
            shutdown,
        }
    }

    pub fn matchmaker(&self) -> &Matchmaker {
        &self.matchmaker
    }

    pub fn identities(&self) -> &IdentityAllocator {
        &self.identities
    }

    /// Parses `payload` and runs the matching handler. `None` means the
    /// request gets no reply (END, SHUTDOWN).
    pub async fn dispatch(&self, payload: &str, origin: SocketAddr) -> Option<Response> {
        let command = match payload.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                debug!("Bad request from {}: {}", origin, e);
                return Some(Response::BadRequest);
            }
        };

        self.execute(command, origin).await
    }

    async fn execute(&self, command: Command, origin: SocketAddr) -> Option<Response> {
        match command {
            Command::Register => {
                let id = self.identities.allocate();
                info!("Registered player {} from {}", id, origin);
                Some(Response::Registered(id))
            }

            Command::Play { user_id } => {
                let response = match self.matchmaker.request_play(user_id).await {
                    PlayOutcome::Waiting => Response::Waiting,
                    PlayOutcome::StillWaiting => Response::StillWaiting,
                    PlayOutcome::GameStarted { .. } => Response::GameStarting,
                };
                Some(response)
            }

            Command::Update { user_id } => {
                let response = match self.matchmaker.board(user_id).await {
                    Ok(board) => Response::Board(board),
                    Err(_) => Response::NoGameStarted,
                };
                Some(response)
            }

            Command::Move {
                user_id,
                index,
                mark,
            } => {
                let response = match self.matchmaker.apply_move(user_id, index, mark).await {
                    Ok(board) => Response::Board(board),
                    Err(GameError::IndexOutOfRange(_)) => Response::IndexOutOfRange,
                    Err(GameError::NotPaired(_)) => Response::NotInGame,
                };
                Some(response)
            }

            Command::End { user_id } => {
                if !self.matchmaker.end_game(user_id).await {
                    debug!("END from unpaired player {}", user_id);
                }
                None
            }

            Command::Shutdown => {
                self.shutdown.request_shutdown(origin.ip());
                None
            }
        }
    }
}
