//! Probe targets.
//!
//! A target is the address a single probe is aimed at. It is validated once at
//! construction so the probe itself never has to fail on bad input.

use std::fmt;
use std::str::FromStr;
use axum::http::uri::{Authority, PathAndQuery};
use thiserror::Error;

/// Path probed when the caller does not supply one.
pub const DEFAULT_HEALTH_PATH: &str = "/health";

/// Errors raised while building a [`ProbeTarget`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("host must not be empty")]
    EmptyHost,

    #[error("port must be in 1..=65535, got {0}")]
    InvalidPort(u16),

    #[error("invalid authority '{0}'")]
    InvalidAuthority(String),

    #[error("health path '{0}' must be an absolute path starting with '/'")]
    InvalidPath(String),
}

/// Host, port and path of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    host: String,
    port: u16,
    authority: Authority,
    path: PathAndQuery,
}

impl ProbeTarget {
    /// Build a target probing [`DEFAULT_HEALTH_PATH`].
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, TargetError> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(TargetError::EmptyHost);
        }
        if port == 0 {
            return Err(TargetError::InvalidPort(port));
        }

        // IPv6 literals need brackets inside an authority.
        let raw = if host.contains(':') && !host.starts_with('[') {
            format!("[{}]:{}", host, port)
        } else {
            format!("{}:{}", host, port)
        };
        let authority = Authority::from_str(&raw)
            .map_err(|_| TargetError::InvalidAuthority(raw.clone()))?;

        Ok(Self {
            host,
            port,
            authority,
            path: PathAndQuery::from_static(DEFAULT_HEALTH_PATH),
        })
    }

    /// Replace the probed path.
    pub fn with_path(mut self, path: &str) -> Result<Self, TargetError> {
        if !path.starts_with('/') {
            return Err(TargetError::InvalidPath(path.to_string()));
        }
        self.path = PathAndQuery::from_str(path)
            .map_err(|_| TargetError::InvalidPath(path.to_string()))?;
        Ok(self)
    }

    pub fn host(&self) -> &str {
        self.host.trim_start_matches('[').trim_end_matches(']')
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Value sent in the `Host` header.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    pub fn path(&self) -> &PathAndQuery {
        &self.path
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http://{}{}", self.authority, self.path)
    }
}
