//! Terminal chat client for the pika hub.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin pika-client -- --name alice
//! cargo run --bin pika-client -- --name bob --url ws://127.0.0.1:3000/ws
//! ```

use clap::Parser;
use pika_client::run_client;
use pika_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "pika-client")]
#[command(about = "Terminal chat client for the pika hub", long_about = None)]
struct Args {
    /// Display name shown to other participants
    #[arg(short = 'n', long)]
    name: String,

    /// WebSocket URL of the hub
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(&[env!("CARGO_CRATE_NAME")], "info");

    let args = Args::parse();

    if let Err(e) = run_client(args.url, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
