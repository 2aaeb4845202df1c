//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_dispatch_total` (counter): dispatched calls by resource,
//!   endpoint and outcome (`handled`, `aborted`, `error`, `method_not_allowed`)
//! - `router_dispatch_duration_seconds` (histogram): handler latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Fails if the listener cannot bind or a global recorder is already set.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .inspect_err(|e| tracing::error!(error = %e, "Failed to install metrics exporter"))?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one dispatched call.
pub fn record_dispatch(resource: &str, endpoint: &str, outcome: &'static str, start: Instant) {
    let labels = [
        ("resource", resource.to_string()),
        ("endpoint", endpoint.to_string()),
        ("outcome", outcome.to_string()),
    ];
    metrics::counter!("router_dispatch_total", &labels).increment(1);
    metrics::histogram!("router_dispatch_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}
