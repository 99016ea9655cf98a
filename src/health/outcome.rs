//! Probe outcomes.
//!
//! # Classification
//! ```text
//! response, 200 <= status < 500  → Healthy
//! response, any other status     → Unhealthy
//! no response before deadline    → Unreachable
//! ```
//!
//! # Design Decisions
//! - 4xx counts as healthy: the service answered, it only rejected the call
//! - Refused, reset, DNS failure and timeout all collapse into Unreachable
//! - Status codes are carried for diagnostics only

use std::fmt;
use serde::Serialize;

/// Result of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProbeResult {
    /// Responded within the deadline with a status in [200, 500).
    Healthy { status: u16 },
    /// Responded within the deadline with a status outside [200, 500).
    Unhealthy { status: u16 },
    /// No response before the deadline.
    Unreachable,
}

impl ProbeResult {
    /// Classify a status code received before the deadline.
    pub fn from_status(status: u16) -> Self {
        if (200..500).contains(&status) {
            ProbeResult::Healthy { status }
        } else {
            ProbeResult::Unhealthy { status }
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, ProbeResult::Healthy { .. })
    }

    /// Status code of the response, if one arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProbeResult::Healthy { status } | ProbeResult::Unhealthy { status } => Some(*status),
            ProbeResult::Unreachable => None,
        }
    }

    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeResult::Healthy { .. } => "healthy",
            ProbeResult::Unhealthy { .. } => "unhealthy",
            ProbeResult::Unreachable => "unreachable",
        }
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status() {
            Some(status) => write!(f, "{} ({})", self.as_str(), status),
            None => f.write_str(self.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_through_client_errors_are_healthy() {
        for status in 200..500 {
            assert_eq!(ProbeResult::from_status(status), ProbeResult::Healthy { status });
        }
    }

    #[test]
    fn test_informational_and_server_errors_are_unhealthy() {
        for status in (100..200).chain(500..600) {
            assert_eq!(ProbeResult::from_status(status), ProbeResult::Unhealthy { status });
        }
    }

    #[test]
    fn test_serializes_with_outcome_tag() {
        let json = serde_json::to_value(ProbeResult::Unhealthy { status: 503 }).unwrap();
        assert_eq!(json, serde_json::json!({ "outcome": "unhealthy", "status": 503 }));

        let json = serde_json::to_value(ProbeResult::Unreachable).unwrap();
        assert_eq!(json, serde_json::json!({ "outcome": "unreachable" }));
    }

    #[test]
    fn test_display() {
        assert_eq!(ProbeResult::Healthy { status: 404 }.to_string(), "healthy (404)");
        assert_eq!(ProbeResult::Unreachable.to_string(), "unreachable");
        assert!(!ProbeResult::Unreachable.is_healthy());
    }
}
