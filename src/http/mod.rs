//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (assign x-request-id)
//!     → handlers.rs (load config snapshot, run probes)
//!     → JSON report, 200 or 503
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use handlers::{check_service, ServiceReport, ServicesSummary};
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::GatewayServer;
