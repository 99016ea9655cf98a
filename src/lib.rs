//! Health gateway library.
//!
//! Single-shot liveness probes for downstream services, and the gateway that
//! serves their outcomes over HTTP.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::GatewayConfig;
pub use health::{probe, ProbeResult, ProbeTarget, ServiceHealthProbe};
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
