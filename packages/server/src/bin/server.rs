//! Hibiki real-time delivery server.
//!
//! Run with:
//! ```not_rust
//! HIBIKI_JWT_SECRET=dev-secret cargo run --bin hibiki-server
//! cargo run --bin hibiki-server -- --host 0.0.0.0 --port 3000 --jwt-secret dev-secret
//! ```

use clap::Parser;
use hibiki_server::{
    config::{DEFAULT_HOST, DEFAULT_PORT, ServerConfig},
    infrastructure::event_bus::DEFAULT_EVENT_BUS_CAPACITY,
    usecase::DEFAULT_HISTORY_LIMIT,
    wiring::build_server,
};
use hibiki_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hibiki-server")]
#[command(about = "Real-time chat delivery server (WebSocket + REST)", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HIBIKI_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "HIBIKI_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Secret used to verify HS256 bearer tokens
    #[arg(long, env = "HIBIKI_JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Number of recent messages replayed when a client joins a chat
    #[arg(long, env = "HIBIKI_HISTORY_LIMIT", default_value_t = DEFAULT_HISTORY_LIMIT)]
    history_limit: u32,

    /// Capacity of the in-process event bus
    #[arg(long, env = "HIBIKI_EVENT_BUS_CAPACITY", default_value_t = DEFAULT_EVENT_BUS_CAPACITY)]
    event_bus_capacity: usize,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, env = "HIBIKI_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            jwt_secret: args.jwt_secret,
            history_limit: args.history_limit,
            event_bus_capacity: args.event_bus_capacity,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ServerConfig::from(args);
    let server = build_server(&config);
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
