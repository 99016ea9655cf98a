//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_probe_total` (counter): probes by service and outcome
//! - `gateway_probe_duration_seconds` (histogram): probe latency per service
//! - `gateway_service_up` (gauge): 1=healthy, 0=unhealthy or unreachable
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op, so tests need no setup
//! - Labels are limited to service name and outcome

use std::net::SocketAddr;
use std::time::Instant;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::health::ProbeResult;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record the outcome of one probe.
pub fn record_probe(service: &str, result: &ProbeResult, started: Instant) {
    let service = service.to_string();

    ::metrics::counter!(
        "gateway_probe_total",
        "service" => service.clone(),
        "outcome" => result.as_str()
    )
    .increment(1);

    ::metrics::histogram!("gateway_probe_duration_seconds", "service" => service.clone())
        .record(started.elapsed().as_secs_f64());

    ::metrics::gauge!("gateway_service_up", "service" => service)
        .set(if result.is_healthy() { 1.0 } else { 0.0 });
}
