//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Construct the stream client once for the process lifetime
//! - Bind the listener and run the server until shutdown
//!
//! # Design Decisions
//! - Fail fast: bind errors are fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::RelayConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::{metrics, StdoutSink};
use crate::stream;

/// Run the relay with a validated configuration.
pub async fn run(config: RelayConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let event_stream = stream::connect(&config.stream).await;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, event_stream, Arc::new(StdoutSink));
    server.run(listener, shutdown.subscribe()).await?;

    Ok(())
}
