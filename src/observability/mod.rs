//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Probe handlers produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (probe counters, durations, up gauges)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging with service/addr fields on every probe event
//! - Request ID flows through the gateway's HTTP layer
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
