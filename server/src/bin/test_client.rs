//! Scripted client that plays one short game against a running server.
//!
//! Registers two players, pairs them, makes a move and ends the game,
//! printing every request and the server's reply.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use ttt_shared::{Command, PlayerId, MAX_PACKET_SIZE};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to talk to
    #[arg(short = 's', long, default_value = "127.0.0.1:20000")]
    server: SocketAddr,

    /// Seconds to wait for each reply
    #[arg(short = 't', long, default_value = "2")]
    timeout_secs: u64,
}

struct ScriptClient {
    socket: UdpSocket,
    server: SocketAddr,
    reply_timeout: Duration,
}

impl ScriptClient {
    /// Sends a command and waits for its single-line reply
    async fn request(&self, command: &Command) -> Result<String, Box<dyn std::error::Error>> {
        self.send(command).await?;

        let mut buf = [0u8; MAX_PACKET_SIZE];
        let (len, _) = timeout(self.reply_timeout, self.socket.recv_from(&mut buf)).await??;
        let reply = String::from_utf8_lossy(&buf[..len]).trim_end().to_string();
        println!("  <- {}", reply);
        Ok(reply)
    }

    /// Sends a command that gets no reply
    async fn send(&self, command: &Command) -> Result<(), Box<dyn std::error::Error>> {
        println!("-> {}", command);
        self.socket
            .send_to(command.to_string().as_bytes(), self.server)
            .await?;
        Ok(())
    }

    async fn register(&self) -> Result<PlayerId, Box<dyn std::error::Error>> {
        Ok(self.request(&Command::Register).await?.parse()?)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    println!("Client socket bound to {}", socket.local_addr()?);

    let client = ScriptClient {
        socket,
        server: args.server,
        reply_timeout: Duration::from_secs(args.timeout_secs),
    };

    let first = client.register().await?;
    let second = client.register().await?;

    client.request(&Command::Play { user_id: first }).await?;
    client.request(&Command::Play { user_id: second }).await?;
    client.request(&Command::Update { user_id: first }).await?;
    client
        .request(&Command::Move {
            user_id: first,
            index: 0,
            mark: 'X',
        })
        .await?;
    client.request(&Command::Update { user_id: second }).await?;

    client.send(&Command::End { user_id: first }).await?;
    client.request(&Command::Update { user_id: second }).await?;
    client.send(&Command::End { user_id: second }).await?;

    println!("Test client finished");
    Ok(())
}
