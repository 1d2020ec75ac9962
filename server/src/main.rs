use clap::Parser;
use log::{error, info};
use ttt_server::network::Server;
use ttt_shared::DEFAULT_PORT;

/// UDP matchmaking and board server for two-player tic-tac-toe
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        println!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let address = format!("{}:{}", args.host, args.port);
    let server = Server::bind(&address).await?;
    let shutdown = server.shutdown_handle();

    info!(
        "Connect with netcat (nc -u localhost {}) or start multiple clients to play",
        args.port
    );

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C, shutting down gracefully...");
                shutdown.trigger();
            }
            Err(e) => error!("Unable to listen for Ctrl+C: {}", e),
        }
    });

    server.run().await?;

    Ok(())
}
