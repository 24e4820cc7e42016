//! Pika chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin pika-server
//! cargo run --bin pika-server -- --host 0.0.0.0 --port 3000 --history-capacity 500
//! ```

use clap::Parser;
use pika_server::bootstrap::{HubOptions, build_server};
use pika_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "pika-server")]
#[command(about = "Presence and messaging hub over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "PIKA_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PIKA_PORT", default_value = "8080")]
    port: u16,

    /// Maximum number of messages kept for replay (unbounded if omitted)
    #[arg(long, env = "PIKA_HISTORY_CAPACITY")]
    history_capacity: Option<usize>,

    /// Maximum number of simultaneous connections (unbounded if omitted)
    #[arg(long, env = "PIKA_MAX_CONNECTIONS")]
    max_connections: Option<usize>,

    /// Default log level, overridden by RUST_LOG
    #[arg(long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(&[env!("CARGO_CRATE_NAME"), "tower_http"], &args.log_level);

    let options = HubOptions {
        history_capacity: args.history_capacity,
        max_connections: args.max_connections,
    };
    let server = build_server(&options);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
