//! Health probing subsystem.
//!
//! # Data Flow
//! ```text
//! Caller (gateway handler, CLI)
//!     → target.rs (validated host/port/path)
//!     → probe.rs (one GET, raced against a deadline)
//!     → outcome.rs (Healthy / Unhealthy / Unreachable)
//! ```
//!
//! # Design Decisions
//! - Probes are stateless; nothing is cached between calls
//! - No retries or backoff; the caller owns that policy
//! - Concurrent probes share nothing, each owns its socket and timer

pub mod outcome;
pub mod probe;
pub mod target;

pub use outcome::ProbeResult;
pub use probe::{probe, ServiceHealthProbe, DEFAULT_PROBE_TIMEOUT};
pub use target::{ProbeTarget, TargetError, DEFAULT_HEALTH_PATH};
