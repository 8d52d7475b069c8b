//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by method, status
//! - `relay_request_duration_seconds` (histogram): end-to-end latency
//! - `relay_publish_total` (counter): stream submissions by stream, outcome
//! - `relay_consumed_records_total` (counter): records decoded by the consumer
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus exporter is opt-in via `observability.metrics_enabled`
//! - Label values come from fixed sets; client-supplied methods are folded
//!   into `OTHER`

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Bounded label for an inbound method: `GET`, `POST` or `OTHER`.
pub fn method_label(method: &str) -> &'static str {
    if method.eq_ignore_ascii_case("GET") {
        "GET"
    } else if method.eq_ignore_ascii_case("POST") {
        "POST"
    } else {
        "OTHER"
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "relay_requests_total",
        "method" => method_label(method),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("relay_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_publish(stream: &str, success: bool) {
    let outcome = if success { "ok" } else { "error" };
    metrics::counter!(
        "relay_publish_total",
        "stream" => stream.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_consumed(count: usize) {
    metrics::counter!("relay_consumed_records_total").increment(count as u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_label_is_bounded() {
        assert_eq!(method_label("GET"), "GET");
        assert_eq!(method_label("get"), "GET");
        assert_eq!(method_label("Post"), "POST");
        assert_eq!(method_label("DELETE"), "OTHER");
        assert_eq!(method_label("X-ANYTHING-1234"), "OTHER");
        assert_eq!(method_label(""), "OTHER");
    }
}
