//! Server network layer: UDP receive loop and per-datagram handler tasks

use crate::dispatcher::Dispatcher;
use crate::shutdown::ShutdownCoordinator;
use log::{debug, error, info};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use ttt_shared::{Response, MAX_PACKET_SIZE};

/// UDP front end of the matchmaking server.
///
/// Every received datagram is decoded, trimmed and handed to the
/// dispatcher on a freshly spawned task. The loop runs until a SHUTDOWN
/// from a local address (or [`ShutdownCoordinator::trigger`]) stops it, or
/// until receiving fails.
pub struct Server {
    socket: Arc<UdpSocket>,
    dispatcher: Arc<Dispatcher>,
    shutdown: ShutdownCoordinator,
}

impl Server {
    pub async fn bind(addr: &str) -> io::Result<Self> {
        let socket = Arc::new(UdpSocket::bind(addr).await?);
        info!("Server listening on {}", socket.local_addr()?);

        let shutdown = ShutdownCoordinator::new();
        let dispatcher = Arc::new(Dispatcher::new(shutdown.clone()));

        Ok(Server {
            socket,
            dispatcher,
            shutdown,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Handle for stopping the server from outside the protocol.
    pub fn shutdown_handle(&self) -> ShutdownCoordinator {
        self.shutdown.clone()
    }

    /// Spawns a tracked task that handles one datagram and sends the reply
    fn spawn_handler(&self, payload: String, addr: SocketAddr) {
        let socket = Arc::clone(&self.socket);
        let dispatcher = Arc::clone(&self.dispatcher);

        self.shutdown.spawn(async move {
            let Some(response) = dispatcher.dispatch(&payload, addr).await else {
                return;
            };

            // The client cannot be told about a failed send, so just log it.
            if let Err(e) = send_response(&socket, &response, addr).await {
                error!("Failed to send response to {}: {}", addr, e);
            }
        });
    }

    /// Main receive loop. Returns once shutdown completes; a receive error
    /// also ends the loop, after outstanding handlers have drained.
    pub async fn run(self) -> io::Result<()> {
        let mut buffer = [0u8; MAX_PACKET_SIZE];

        info!("Server started successfully");

        let result = loop {
            tokio::select! {
                _ = self.shutdown.triggered() => {
                    info!("Server shutting down");
                    break Ok(());
                }

                received = self.socket.recv_from(&mut buffer) => {
                    match received {
                        Ok((len, addr)) => {
                            let payload = String::from_utf8_lossy(&buffer[..len]).trim().to_string();
                            debug!("RECEIVED: {} (from {})", payload, addr);
                            self.spawn_handler(payload, addr);
                        }
                        Err(e) => {
                            error!("Error receiving packet: {}", e);
                            break Err(e);
                        }
                    }
                }
            }
        };

        let in_flight = self.shutdown.active_handlers();
        if in_flight > 0 {
            info!("Waiting for {} in-flight handlers", in_flight);
        }
        self.shutdown.drain().await;

        // Handlers are done with their clones; this releases the socket.
        drop(self.socket);
        info!("Server shutdown complete");

        result
    }
}

async fn send_response(socket: &UdpSocket, response: &Response, addr: SocketAddr) -> io::Result<()> {
    socket.send_to(response.wire_text().as_bytes(), addr).await?;
    Ok(())
}
