//! Single-shot HTTP health probe.
//!
//! # Responsibilities
//! - Open a dedicated connection to the target and send one GET
//! - Race the exchange against a deadline
//! - Close the connection on every exit path
//!
//! # Design Decisions
//! - No connection pool: every probe owns exactly one socket
//! - The connection driver runs in its own task, aborted when the probe ends
//! - Errors never escape; they are logged and folded into `Unreachable`

use std::time::Duration;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;

use crate::health::outcome::ProbeResult;
use crate::health::target::ProbeTarget;

/// Deadline applied when the caller does not pick one.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(3000);

/// Reasons an exchange ended without a response. Only surfaced in logs.
#[derive(Debug, Error)]
enum ExchangeError {
    #[error("connect failed: {0}")]
    Connect(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] hyper::Error),

    #[error("invalid request: {0}")]
    Request(#[from] axum::http::Error),
}

/// Aborts the connection task when dropped, closing the socket it owns.
struct ConnectionGuard {
    task: JoinHandle<()>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Liveness probe for one downstream service.
///
/// The label only names the service in log events; it has no effect on the
/// outcome.
#[derive(Debug, Clone)]
pub struct ServiceHealthProbe {
    label: String,
    timeout: Duration,
}

impl ServiceHealthProbe {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe `target` once.
    pub async fn probe(&self, target: &ProbeTarget) -> ProbeResult {
        let addr = target.authority();

        // Dropping the exchange on timeout drops its guard, which aborts the
        // connection task before the result is returned.
        match time::timeout(self.timeout, exchange(target)).await {
            Ok(Ok(status)) => {
                let result = ProbeResult::from_status(status.as_u16());
                if result.is_healthy() {
                    tracing::debug!(service = %self.label, addr = %addr, status = %status, "Health check passed");
                } else {
                    tracing::warn!(service = %self.label, addr = %addr, status = %status, "Health check failed: unhealthy status");
                }
                result
            }
            Ok(Err(e)) => {
                tracing::warn!(service = %self.label, addr = %addr, error = %e, "Health check failed: connection error");
                ProbeResult::Unreachable
            }
            Err(_) => {
                tracing::warn!(
                    service = %self.label,
                    addr = %addr,
                    timeout = ?self.timeout,
                    "Health check failed: timeout"
                );
                ProbeResult::Unreachable
            }
        }
    }
}

impl Default for ServiceHealthProbe {
    fn default() -> Self {
        Self::new("unnamed")
    }
}

/// Probe `target` once with an unlabeled probe.
pub async fn probe(target: &ProbeTarget, timeout: Duration) -> ProbeResult {
    ServiceHealthProbe::default()
        .with_timeout(timeout)
        .probe(target)
        .await
}

/// Connect, send the GET and wait for the first response head.
///
/// An interim 1xx head counts as the response: the service answered before
/// the deadline, so its status is classified like any other. The body is
/// never read; it is dropped together with the connection.
async fn exchange(target: &ProbeTarget) -> Result<StatusCode, ExchangeError> {
    let stream = TcpStream::connect((target.host(), target.port())).await?;
    let (mut sender, connection) = http1::handshake::<_, Body>(TokioIo::new(stream)).await?;

    let addr = target.authority().clone();
    let _guard = ConnectionGuard {
        task: tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::trace!(addr = %addr, error = %e, "Probe connection closed with error");
            }
        }),
    };

    let mut request = Request::builder()
        .method(Method::GET)
        .uri(target.path().as_str())
        .header(header::HOST, target.authority().as_str())
        .body(Body::empty())?;

    let (informational_tx, mut informational_rx) = mpsc::unbounded_channel();
    hyper::ext::on_informational(&mut request, move |res| {
        let _ = informational_tx.send(res.status());
    });

    // The 1xx callback runs before hyper reports anything that follows it,
    // so checking the channel first keeps the interim status authoritative.
    tokio::select! {
        biased;
        Some(status) = informational_rx.recv() => Ok(status),
        response = sender.send_request(request) => Ok(response?.status()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let probe = ServiceHealthProbe::new("users");
        assert_eq!(probe.label(), "users");
        assert_eq!(probe.timeout(), Duration::from_millis(3000));

        let probe = probe.with_timeout(Duration::from_millis(250));
        assert_eq!(probe.timeout(), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_unreachable() {
        let target = ProbeTarget::new("nonexistent.invalid", 80).unwrap();
        let result = probe(&target, Duration::from_secs(2)).await;
        assert_eq!(result, ProbeResult::Unreachable);
    }
}
