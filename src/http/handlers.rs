//! Health API handlers.
//!
//! Every request probes its services afresh; nothing is cached between
//! requests. `Unhealthy` and `Unreachable` both mean "do not route", so
//! either one turns the response into a 503.

use std::time::{Duration, Instant};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures_util::future::join_all;
use serde::Serialize;

use crate::config::{GatewayConfig, ServiceConfig};
use crate::health::{ProbeResult, ServiceHealthProbe};
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;

#[derive(Debug, Serialize)]
pub struct GatewayStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// Probe outcome for one service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceReport {
    pub service: String,
    pub address: String,
    pub path: String,
    #[serde(flatten)]
    pub result: ProbeResult,
    pub latency_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct ServicesSummary {
    pub healthy: bool,
    pub services: Vec<ServiceReport>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Probe one service with the current probe settings.
pub async fn check_service(config: &GatewayConfig, service: &ServiceConfig) -> ServiceReport {
    let started = Instant::now();

    let (address, path, result) = match config.target_for(service) {
        Ok(target) => {
            let result = ServiceHealthProbe::new(service.name.as_str())
                .with_timeout(config.probe.timeout())
                .probe(&target)
                .await;
            (target.authority().to_string(), target.path().to_string(), result)
        }
        Err(e) => {
            // Validation rejects these, so this only guards hand-built configs.
            tracing::error!(service = %service.name, error = %e, "Invalid probe target");
            let path = service.path.clone().unwrap_or_else(|| config.probe.default_path.clone());
            (format!("{}:{}", service.host, service.port), path, ProbeResult::Unreachable)
        }
    };

    metrics::record_probe(&service.name, &result, started);

    ServiceReport {
        service: service.name.clone(),
        address,
        path,
        result,
        latency_ms: whole_millis(started.elapsed()),
    }
}

/// Whole milliseconds, saturating instead of wrapping.
fn whole_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

fn status_for(healthy: bool) -> StatusCode {
    if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// `GET /health`: liveness of the gateway itself.
pub async fn gateway_health() -> Json<GatewayStatus> {
    Json(GatewayStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /health/services`: probe every configured service concurrently.
pub async fn all_services(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (StatusCode, Json<ServicesSummary>) {
    let config = state.config.load_full();

    tracing::debug!(
        request_id = %request_id(&headers),
        services = config.services.len(),
        "Probing all services"
    );

    let services = join_all(
        config.services.iter().map(|service| check_service(&config, service)),
    )
    .await;

    let healthy = services.iter().all(|report| report.result.is_healthy());
    if !healthy {
        let down: Vec<&str> = services
            .iter()
            .filter(|report| !report.result.is_healthy())
            .map(|report| report.service.as_str())
            .collect();
        tracing::warn!(request_id = %request_id(&headers), down = ?down, "Some services are not healthy");
    }

    (status_for(healthy), Json(ServicesSummary { healthy, services }))
}

/// `GET /health/services/{name}`: probe a single service.
pub async fn one_service(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    let config = state.config.load_full();

    let Some(service) = config.service(&name) else {
        tracing::warn!(request_id = %request_id(&headers), service = %name, "Unknown service");
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorBody { error: format!("unknown service '{}'", name) }),
        )
            .into_response();
    };

    let report = check_service(&config, service).await;
    (status_for(report.result.is_healthy()), Json(report)).into_response()
}
