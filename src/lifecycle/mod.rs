//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!
//! Shutdown (shutdown.rs):
//!     trigger() → every subscriber's recv() resolves → tasks exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup in main: config, logging, metrics, then the listener
//! - In-flight probes finish before the server stops

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
