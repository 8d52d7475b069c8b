//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, timeouts, request ID)
//! - Adapt HTTP requests onto the relay router
//! - Expose the proxy-event, consumer and health endpoints
//! - Bind server to listener with graceful shutdown

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::consume::{KinesisEvent, RecordProcessor};
use crate::http::event::{InboundEvent, OutboundResponse};
use crate::lifecycle::signals::shutdown_signal;
use crate::observability::LogSink;
use crate::publish::{DestinationTable, Publisher};
use crate::routing::RequestRouter;
use crate::stream::EventStream;
use crate::trace::{TraceContext, Tracer, PROPAGATION_HEADERS};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<RequestRouter>,
    pub processor: Arc<RecordProcessor>,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server over an explicitly constructed stream client.
    ///
    /// Destinations are bound from the process environment.
    pub fn new(config: RelayConfig, stream: Arc<dyn EventStream>, sink: Arc<dyn LogSink>) -> Self {
        let destinations = DestinationTable::from_env(&config.relay);
        Self::with_destinations(config, destinations, stream, sink)
    }

    /// Create a server with a pre-built destination table.
    pub fn with_destinations(
        config: RelayConfig,
        destinations: DestinationTable,
        stream: Arc<dyn EventStream>,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        let tracer = Arc::new(Tracer::new(&config.tracing));
        let publisher = Publisher::new(
            stream,
            Arc::new(destinations),
            config.relay.partition_key.clone(),
            sink.clone(),
        );

        let state = AppState {
            router: Arc::new(RequestRouter::new(
                publisher,
                tracer.clone(),
                sink.clone(),
                config.relay.body_format,
            )),
            processor: Arc::new(RecordProcessor::new(tracer, sink)),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(relay_handler))
            .route("/invoke", post(invoke_handler))
            .route("/records", post(records_handler))
            .route("/health", get(health_handler))
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server until Ctrl+C or the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            partition_key = %self.config.relay.partition_key,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// The assembled router, for in-process use.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Adapts a real HTTP request onto the relay router.
async fn relay_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match InboundEvent::from_http(&method, &headers, body) {
        Ok(event) => state.router.handle(event).await.into_response(),
        Err(e) => {
            let trace_headers = TraceContext::from_headers(&headers, PROPAGATION_HEADERS);
            state
                .router
                .reject(method.as_str(), &trace_headers, &e)
                .into_response()
        }
    }
}

/// Accepts a proxy-style event and returns the proxy-style response document.
async fn invoke_handler(
    State(state): State<AppState>,
    Json(event): Json<InboundEvent>,
) -> Json<OutboundResponse> {
    Json(state.router.handle(event).await)
}

/// Consumes a stream-trigger batch.
async fn records_handler(
    State(state): State<AppState>,
    Json(event): Json<KinesisEvent>,
) -> Response {
    match state.processor.process(&event) {
        Ok(records) => (
            StatusCode::OK,
            Json(serde_json::json!({ "processed": records.len(), "records": records })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Batch rejected");
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DestinationConfig, StreamBackend};
    use crate::observability::MemorySink;
    use crate::stream::InMemoryStream;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> (Router, InMemoryStream) {
        let mut config = RelayConfig::default();
        config.stream.backend = StreamBackend::Memory;
        config.relay.destinations = vec![DestinationConfig::literal("go", "stream-A")];
        let stream = InMemoryStream::new();
        let table = DestinationTable::from_lookup(&config.relay, |_| None);
        let server = HttpServer::with_destinations(
            config,
            table,
            Arc::new(stream.clone()),
            Arc::new(MemorySink::new()),
        );
        (server.into_router(), stream)
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_get_root_serves_page_with_request_id() {
        let (app, stream) = app();
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/html");
        assert!(response.headers().contains_key("x-request-id"));
        assert!(body_string(response).await.contains("NRDT Demo App"));
        assert!(stream.is_empty());
    }

    #[tokio::test]
    async fn test_post_root_publishes() {
        let (app, stream) = app();
        let response = app
            .oneshot(
                Request::post("/")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message":"hi","stream":"go"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(stream.records()[0].stream_name, "stream-A");
    }

    #[tokio::test]
    async fn test_invoke_returns_response_document() {
        let (app, _) = app();
        let response = app
            .oneshot(
                Request::post("/invoke")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"httpMethod":"GET"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let doc: OutboundResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(doc.status_code, 200);
        assert_eq!(doc.content_type(), Some("text/html"));
    }

    #[tokio::test]
    async fn test_records_endpoint_rejects_bad_batch() {
        let (app, _) = app();
        let response = app
            .oneshot(
                Request::post("/records")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"Records":[{"eventName":"e","kinesis":{"data":"***"}}]}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let mut config = RelayConfig::default();
        config.security.max_body_size = 16;
        let table = DestinationTable::from_lookup(&config.relay, |_| None);
        let stream = InMemoryStream::new();
        let app = HttpServer::with_destinations(
            config,
            table,
            Arc::new(stream.clone()),
            Arc::new(MemorySink::new()),
        )
        .into_router();

        let response = app
            .oneshot(
                Request::post("/")
                    .body(Body::from("x".repeat(64)))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(stream.is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app();
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("\"ok\""));
    }
}
