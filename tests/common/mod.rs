//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use nrdt_relay::config::{DestinationConfig, RelayConfig, StreamBackend};
use nrdt_relay::observability::MemorySink;
use nrdt_relay::publish::DestinationTable;
use nrdt_relay::stream::InMemoryStream;
use nrdt_relay::{HttpServer, Shutdown};

/// A relay running on an ephemeral port over an in-memory stream.
pub struct TestRelay {
    pub addr: SocketAddr,
    pub stream: InMemoryStream,
    pub sink: Arc<MemorySink>,
    shutdown: Shutdown,
}

impl TestRelay {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestRelay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Default test config: `go` → stream-A, `node` → stream-B.
pub fn test_config() -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.stream.backend = StreamBackend::Memory;
    config.relay.destinations = vec![
        DestinationConfig::literal("go", "stream-A"),
        DestinationConfig::literal("node", "stream-B"),
    ];
    config
}

/// Start a relay with the given config.
pub async fn start_relay(config: RelayConfig) -> TestRelay {
    let stream = InMemoryStream::new();
    let sink = Arc::new(MemorySink::new());
    let table = DestinationTable::from_lookup(&config.relay, |_| None);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::with_destinations(config, table, Arc::new(stream.clone()), sink.clone());
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Listener is already bound; give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestRelay {
        addr,
        stream,
        sink,
        shutdown,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
