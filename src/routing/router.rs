//! Request router.
//!
//! # Responsibilities
//! - Serve the static page on GET (no stream side effects)
//! - Parse POST bodies and delegate to the publisher
//! - Begin one trace transaction per invocation and log a correlated line
//! - Map errors onto proxy-style responses

use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

use crate::config::BodyFormat;
use crate::error::{RelayError, RelayResult};
use crate::http::event::{InboundEvent, OutboundResponse};
use crate::http::page::render_page;
use crate::observability::{correlated, metrics, LogSink};
use crate::publish::Publisher;
use crate::routing::body::parse_body;
use crate::stream::Acknowledgement;
use crate::trace::{TraceCollaborator, TraceContext, Tracer, Transaction};

/// Routes inbound events to the page or the publisher.
pub struct RequestRouter {
    publisher: Publisher,
    tracer: Arc<Tracer>,
    sink: Arc<dyn LogSink>,
    body_format: BodyFormat,
    page: String,
}

impl RequestRouter {
    pub fn new(
        publisher: Publisher,
        tracer: Arc<Tracer>,
        sink: Arc<dyn LogSink>,
        body_format: BodyFormat,
    ) -> Self {
        let structured = body_format != BodyFormat::Raw;
        let page = render_page(publisher.destinations().selectors(), structured);
        Self {
            publisher,
            tracer,
            sink,
            body_format,
            page,
        }
    }

    /// Handle one invocation.
    pub async fn handle(&self, event: InboundEvent) -> OutboundResponse {
        let start = Instant::now();
        let method = event.http_method.to_ascii_uppercase();
        let mut txn = self.tracer.begin(&event.trace_headers());

        let span = tracing::info_span!(
            "invocation",
            method = metrics::method_label(&method),
            trace_id = txn.trace_id().unwrap_or(""),
        );

        let response = async {
            match method.as_str() {
                "GET" => {
                    self.log(&txn, "inside GET");
                    OutboundResponse::html(self.page.as_str())
                }
                "POST" => {
                    self.log(&txn, "inside POST");
                    match self.write(&mut txn, &event).await {
                        Ok(ack) => match serde_json::to_string(&ack) {
                            Ok(body) => OutboundResponse::json(body),
                            Err(e) => OutboundResponse::error(&RelayError::Internal(e.to_string())),
                        },
                        Err(e) => {
                            tracing::warn!(error = %e, "Write request failed");
                            OutboundResponse::error(&e)
                        }
                    }
                }
                other => {
                    self.log(&txn, "unsupported method");
                    OutboundResponse::error(&RelayError::UnsupportedMethod(other.to_string()))
                }
            }
        }
        .instrument(span)
        .await;

        metrics::record_request(&method, response.status_code, start);
        response
    }

    /// Answer a request that could not be adapted into an event.
    pub fn reject(&self, method: &str, trace_headers: &TraceContext, err: &RelayError) -> OutboundResponse {
        let start = Instant::now();
        let txn = self.tracer.begin(trace_headers);
        self.log(&txn, "request rejected");
        tracing::warn!(method = metrics::method_label(method), error = %err, "Request rejected");

        let response = OutboundResponse::error(err);
        metrics::record_request(method, response.status_code, start);
        response
    }

    async fn write(&self, txn: &mut Transaction, event: &InboundEvent) -> RelayResult<Acknowledgement> {
        let request = parse_body(event.body.as_ref(), self.body_format)?;
        txn.add_attribute("myMessage", request.message.as_str());
        self.publisher
            .publish(&*txn, &request.message, request.stream.as_deref())
            .await
    }

    fn log(&self, txn: &Transaction, message: &str) {
        self.sink.emit(correlated(message, &txn.capture_linkage()));
    }
}
