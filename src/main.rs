//! NRDT relay.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                      RELAY                       │
//!   Client Request       │  ┌─────────┐    ┌──────────┐    ┌─────────────┐  │
//!   ─────────────────────┼─▶│  http   │───▶│ routing  │───▶│  publish    │  │
//!                        │  │ server  │    │ GET/POST │    │ envelope +  │  │
//!                        │  └─────────┘    └──────────┘    │ destination │  │
//!                        │                                 └──────┬──────┘  │
//!                        │                                        ▼         │
//!   Client Response      │                                 ┌─────────────┐  │    Event
//!   ◀────────────────────┼──── acknowledgement ◀───────────│   stream    │──┼──▶ Stream
//!                        │                                 └─────────────┘  │
//!                        │  ┌────────────────────────────────────────────┐  │
//!                        │  │ config │ trace │ observability │ lifecycle │  │
//!                        │  └────────────────────────────────────────────┘  │
//!                        └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use nrdt_relay::config;
use nrdt_relay::lifecycle::startup;
use nrdt_relay::observability::init_logging;

#[derive(Parser)]
#[command(name = "nrdt-relay")]
#[command(about = "Relays HTTP messages into an event stream with trace linkage", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "RELAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = config::load_or_default(args.config.as_deref())?;

    init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        stream_backend = ?config.stream.backend,
        body_format = ?config.relay.body_format,
        unknown_selector = ?config.relay.unknown_selector,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
